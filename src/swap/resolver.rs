use std::collections::HashMap;
use tracing::debug;

use crate::types::{RoutingGraph, Token};

/// First catalog entry whose symbol is exactly `symbol`.
pub fn find_by_symbol<'a>(catalog: &'a [Token], symbol: &str) -> Option<&'a Token> {
    catalog.iter().find(|t| t.symbol == symbol)
}

/// Resolves the configured symbols to catalog entries.
///
/// When the input token resolves, the output lookup is restricted to the
/// tokens the routing graph lists as swappable with it. Ties between tokens
/// sharing a symbol go to the first one in catalog order.
pub fn resolve_pair(
    catalog: &[Token],
    graph: &RoutingGraph,
    input_symbol: &str,
    output_symbol: &str,
) -> (Option<Token>, Option<Token>) {
    let input = find_by_symbol(catalog, input_symbol).cloned();

    let output = match &input {
        Some(input_token) => {
            let reachable = graph
                .get(&input_token.address)
                .map(|targets| targets.as_slice())
                .unwrap_or_default();
            catalog
                .iter()
                .find(|t| t.symbol == output_symbol && reachable.contains(&t.address))
                .cloned()
        }
        None => find_by_symbol(catalog, output_symbol).cloned(),
    };

    if input.is_none() {
        debug!("Input token {} not found in catalog", input_symbol);
    }
    if output.is_none() {
        debug!("Output token {} not found or not swappable", output_symbol);
    }

    (input, output)
}

/// Every token swappable with `input_token`, keyed by address. Addresses the
/// catalog does not know map to `None`.
pub fn possible_pairs(
    catalog: &[Token],
    graph: &RoutingGraph,
    input_token: Option<&Token>,
) -> HashMap<String, Option<Token>> {
    let Some(input_token) = input_token else {
        return HashMap::new();
    };

    graph
        .get(&input_token.address)
        .map(|targets| {
            targets
                .iter()
                .map(|address| {
                    let token = catalog.iter().find(|t| &t.address == address).cloned();
                    (address.clone(), token)
                })
                .collect()
        })
        .unwrap_or_default()
}
