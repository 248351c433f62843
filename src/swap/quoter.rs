use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::info;

use crate::{
    blockchain::{from_smallest_units, to_smallest_units},
    dex::traits::RouteProvider,
    error::QuoteError,
    types::{Route, RouteRequest, Token},
};

pub struct RouteQuoter {
    provider: Arc<dyn RouteProvider>,
}

impl RouteQuoter {
    pub fn new(provider: Arc<dyn RouteProvider>) -> Self {
        Self { provider }
    }

    /// Fresh routes for `amount` (UI units of the input token), best first.
    ///
    /// `Ok(None)` when either token is missing (no request is made) or the
    /// service has no route for the pair.
    pub async fn quote(
        &self,
        input_token: Option<&Token>,
        output_token: Option<&Token>,
        amount: &BigDecimal,
        slippage_bps: u16,
    ) -> Result<Option<Vec<Route>>, QuoteError> {
        let (Some(input_token), Some(output_token)) = (input_token, output_token) else {
            return Ok(None);
        };

        info!(
            "Getting routes for {} {} -> {}...",
            amount, input_token.symbol, output_token.symbol
        );

        let request = RouteRequest {
            input_mint: input_token.address.clone(),
            output_mint: output_token.address.clone(),
            amount: to_smallest_units(amount, input_token.decimals)
                .map_err(|e| QuoteError::Protocol(e.to_string()))?,
            slippage_bps,
            force_fetch: true,
        };

        let routes = self.provider.compute_routes(&request).await?;
        let Some(best) = routes.first() else {
            return Ok(None);
        };

        info!(
            "Best quote: {} ({}) via {}, {} routes",
            from_smallest_units(best.out_amount, output_token.decimals),
            output_token.symbol,
            best.describe(),
            routes.len()
        );

        Ok(Some(routes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ExecutionError,
        types::{PreparedSwap, RoutingGraph},
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingProvider {
        out_amounts: Vec<u64>,
        requests: Mutex<Vec<RouteRequest>>,
    }

    impl RecordingProvider {
        fn new(out_amounts: Vec<u64>) -> Arc<Self> {
            Arc::new(Self {
                out_amounts,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<RouteRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RouteProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn route_map(&self) -> Result<RoutingGraph, QuoteError> {
            Ok(RoutingGraph::new())
        }

        async fn compute_routes(&self, request: &RouteRequest) -> Result<Vec<Route>, QuoteError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self
                .out_amounts
                .iter()
                .map(|out| {
                    let raw = json!({"inAmount": request.amount, "outAmount": out});
                    Route::from_quote(request, raw).unwrap()
                })
                .collect())
        }

        async fn exchange(&self, _route: &Route) -> Result<PreparedSwap, ExecutionError> {
            Err(ExecutionError::Protocol("not supported".to_string()))
        }
    }

    fn token(address: &str, symbol: &str, decimals: u8) -> Token {
        Token {
            chain_id: 101,
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            decimals,
            logo_uri: None,
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_quote_converts_amount_and_forces_fetch() {
        let provider = RecordingProvider::new(vec![25_000_000, 24_000_000]);
        let quoter = RouteQuoter::new(provider.clone());
        let sol = token("SOL_MINT", "SOL", 9);
        let usdc = token("USDC_MINT", "USDC", 6);

        let routes = quoter
            .quote(Some(&sol), Some(&usdc), &BigDecimal::from(1), 100)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].out_amount, 25_000_000);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, 1_000_000_000);
        assert_eq!(requests[0].slippage_bps, 100);
        assert!(requests[0].force_fetch);
    }

    #[tokio::test]
    async fn test_missing_token_skips_request() {
        let provider = RecordingProvider::new(vec![25_000_000]);
        let quoter = RouteQuoter::new(provider.clone());
        let usdc = token("USDC_MINT", "USDC", 6);

        let result = quoter.quote(None, Some(&usdc), &BigDecimal::from(1), 100).await.unwrap();
        assert!(result.is_none());

        let result = quoter.quote(Some(&usdc), None, &BigDecimal::from(1), 100).await.unwrap();
        assert!(result.is_none());

        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_routes_is_none() {
        let provider = RecordingProvider::new(Vec::new());
        let quoter = RouteQuoter::new(provider.clone());
        let sol = token("SOL_MINT", "SOL", 9);
        let usdc = token("USDC_MINT", "USDC", 6);

        let result = quoter
            .quote(Some(&sol), Some(&usdc), &BigDecimal::from(1), 100)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(provider.requests().len(), 1);
    }
}
