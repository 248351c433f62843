use async_trait::async_trait;

use crate::{
    error::{CatalogFetchError, ExecutionError, QuoteError},
    types::{PreparedSwap, Route, RouteRequest, RoutingGraph, SwapOutcome, Token},
};

/// Source of the tradable token universe.
#[async_trait]
pub trait TokenListSource: Send + Sync {
    async fn fetch_tokens(&self) -> Result<Vec<Token>, CatalogFetchError>;
}

/// Swap-routing service: route graph, quotes and exchange preparation.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn route_map(&self) -> Result<RoutingGraph, QuoteError>;

    /// Candidate routes, best first.
    async fn compute_routes(&self, request: &RouteRequest) -> Result<Vec<Route>, QuoteError>;

    async fn exchange(&self, route: &Route) -> Result<PreparedSwap, ExecutionError>;
}

/// Signs and broadcasts a prepared exchange.
///
/// Rejections reported by the network come back as `SwapOutcome::Failure`;
/// `Err` is reserved for failures to talk to the network at all.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, prepared: PreparedSwap) -> Result<SwapOutcome, ExecutionError>;
}
