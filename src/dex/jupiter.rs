//! Jupiter v4 HTTP API client.
//!
//! Endpoints used:
//! - `GET  /indexed-route-map`  swappable pairs, as indices into `mintKeys`
//! - `GET  /quote`              candidate routes, best first
//! - `POST /swap`               unsigned swap transaction for a route

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config::JupiterConfig,
    dex::{route_cache::RouteCache, traits::RouteProvider},
    error::{ExecutionError, QuoteError},
    types::{PreparedSwap, Route, RouteRequest, RoutingGraph},
};

const PROVIDER_NAME: &str = "jupiter";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexedRouteMap {
    mint_keys: Vec<String>,
    indexed_route_map: HashMap<String, Vec<usize>>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapResponse {
    swap_transaction: String,
}

pub struct JupiterClient {
    http: Client,
    base_url: String,
    user_public_key: String,
    route_cache: Mutex<RouteCache>,
}

impl JupiterClient {
    pub fn new(config: &JupiterConfig, user_public_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.quote_api_url.trim_end_matches('/').to_string(),
            user_public_key: user_public_key.into(),
            route_cache: Mutex::new(RouteCache::new(config.route_cache_seconds)),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

async fn check_status(response: Response) -> Result<Response, (u16, String)> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err((status.as_u16(), body))
    }
}

/// Expands the index-compressed route map into address form.
fn decode_route_map(indexed: IndexedRouteMap) -> Result<RoutingGraph, QuoteError> {
    let mint = |index: usize| {
        indexed
            .mint_keys
            .get(index)
            .cloned()
            .ok_or_else(|| QuoteError::Protocol(format!("route map index {} out of range", index)))
    };

    let mut graph = RoutingGraph::with_capacity(indexed.indexed_route_map.len());
    for (key, targets) in &indexed.indexed_route_map {
        let source_index = key
            .parse::<usize>()
            .map_err(|e| QuoteError::Protocol(format!("invalid route map key '{}': {}", key, e)))?;

        let targets = targets
            .iter()
            .map(|&index| mint(index))
            .collect::<Result<Vec<_>, _>>()?;

        graph.insert(mint(source_index)?, targets);
    }

    Ok(graph)
}

fn parse_routes(request: &RouteRequest, response: QuoteResponse) -> Result<Vec<Route>, QuoteError> {
    response
        .data
        .into_iter()
        .map(|raw| {
            Route::from_quote(request, raw)
                .map_err(|e| QuoteError::Protocol(format!("malformed route: {}", e)))
        })
        .collect()
}

#[async_trait]
impl RouteProvider for JupiterClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn route_map(&self) -> Result<RoutingGraph, QuoteError> {
        let response = self.http.get(self.endpoint("indexed-route-map")).send().await?;
        let response = check_status(response)
            .await
            .map_err(|(status, body)| QuoteError::Status { status, body })?;

        let indexed: IndexedRouteMap = response.json().await?;
        let graph = decode_route_map(indexed)?;

        debug!("Route map covers {} tokens", graph.len());
        Ok(graph)
    }

    async fn compute_routes(&self, request: &RouteRequest) -> Result<Vec<Route>, QuoteError> {
        if let Some(routes) = self.route_cache.lock().await.get(request) {
            return Ok(routes);
        }

        let amount = request.amount.to_string();
        let slippage = request.slippage_bps.to_string();
        let response = self
            .http
            .get(self.endpoint("quote"))
            .query(&[
                ("inputMint", request.input_mint.as_str()),
                ("outputMint", request.output_mint.as_str()),
                ("amount", amount.as_str()),
                ("slippageBps", slippage.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response)
            .await
            .map_err(|(status, body)| QuoteError::Status { status, body })?;

        let quote: QuoteResponse = response.json().await?;
        let routes = parse_routes(request, quote)?;

        debug!("{} returned {} routes", PROVIDER_NAME, routes.len());

        let mut cache = self.route_cache.lock().await;
        cache.prune();
        cache.insert(request, routes.clone());

        Ok(routes)
    }

    async fn exchange(&self, route: &Route) -> Result<PreparedSwap, ExecutionError> {
        let body = json!({
            "route": route.raw,
            "userPublicKey": self.user_public_key,
            "wrapUnwrapSOL": true,
        });

        let response = self.http.post(self.endpoint("swap")).json(&body).send().await?;
        let response = check_status(response)
            .await
            .map_err(|(status, body)| ExecutionError::Status { status, body })?;

        let swap: SwapResponse = response.json().await?;

        Ok(PreparedSwap {
            transaction: swap.swap_transaction,
            input_mint: route.input_mint.clone(),
            output_mint: route.output_mint.clone(),
            in_amount: route.in_amount,
            out_amount: route.out_amount,
        })
    }
}
