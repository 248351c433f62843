use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{dex::traits::TokenListSource, error::CatalogFetchError, types::Token};

pub struct TokenListClient {
    http: Client,
    url: String,
}

impl TokenListClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }
}

/// Parses a token list body. Any record missing a required field fails the
/// whole list.
pub fn parse_token_list(url: &str, body: &str) -> Result<Vec<Token>, CatalogFetchError> {
    serde_json::from_str(body).map_err(|source| CatalogFetchError::Malformed {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl TokenListSource for TokenListClient {
    async fn fetch_tokens(&self) -> Result<Vec<Token>, CatalogFetchError> {
        debug!("Fetching token list from {}", self.url);

        let request_error = |source| CatalogFetchError::Request {
            url: self.url.clone(),
            source,
        };

        let response = self.http.get(&self.url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        let tokens = parse_token_list(&self.url, &body)?;

        debug!("Fetched {} tokens", tokens.len());
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://cache.jup.ag/tokens";

    #[test]
    fn test_parse_token_list() {
        let body = r#"[
            {"chainId": 101, "address": "So11111111111111111111111111111111111111112",
             "symbol": "SOL", "name": "Wrapped SOL", "decimals": 9,
             "logoURI": "https://example.com/sol.png", "tags": []},
            {"chainId": 101, "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
             "symbol": "USDC", "name": "USD Coin", "decimals": 6, "tags": ["stablecoin"]}
        ]"#;

        let tokens = parse_token_list(URL, body).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].symbol, "USDC");
        assert_eq!(tokens[1].decimals, 6);
    }

    #[test]
    fn test_malformed_token_list() {
        let missing_decimals = r#"[{"chainId": 101, "address": "abc", "symbol": "ABC"}]"#;
        assert!(matches!(
            parse_token_list(URL, missing_decimals),
            Err(CatalogFetchError::Malformed { .. })
        ));

        assert!(matches!(
            parse_token_list(URL, r#"{"tokens": []}"#),
            Err(CatalogFetchError::Malformed { .. })
        ));
    }
}
