use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A token as listed by the token list service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub decimals: u8,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Token address -> addresses directly swappable with it.
pub type RoutingGraph = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteRequest {
    pub input_mint: String,
    pub output_mint: String,
    /// Input amount in the input token's smallest unit.
    pub amount: u64,
    pub slippage_bps: u16,
    pub force_fetch: bool,
}

impl RouteRequest {
    pub fn cache_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.input_mint, self.output_mint, self.amount, self.slippage_bps
        )
    }
}

/// One candidate conversion path. Amounts are in smallest units.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: u64,
    pub out_amount: u64,
    pub other_amount_threshold: Option<u64>,
    pub slippage_bps: Option<u16>,
    pub price_impact_pct: Option<f64>,
    pub market_labels: Vec<String>,
    /// The route exactly as the routing service returned it. Sent back
    /// verbatim when preparing the exchange.
    pub raw: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteFields {
    #[serde(deserialize_with = "deserialize_amount")]
    in_amount: u64,
    #[serde(deserialize_with = "deserialize_amount")]
    out_amount: u64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    other_amount_threshold: Option<u64>,
    #[serde(default)]
    slippage_bps: Option<u16>,
    #[serde(default)]
    price_impact_pct: Option<f64>,
    #[serde(default)]
    market_infos: Vec<MarketInfoFields>,
}

#[derive(Deserialize)]
struct MarketInfoFields {
    #[serde(default)]
    label: Option<String>,
}

impl Route {
    /// Builds a route from one entry of a quote response for `request`.
    pub fn from_quote(
        request: &RouteRequest,
        raw: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let fields = RouteFields::deserialize(&raw)?;
        Ok(Self {
            input_mint: request.input_mint.clone(),
            output_mint: request.output_mint.clone(),
            in_amount: fields.in_amount,
            out_amount: fields.out_amount,
            other_amount_threshold: fields.other_amount_threshold,
            slippage_bps: fields.slippage_bps,
            price_impact_pct: fields.price_impact_pct,
            market_labels: fields
                .market_infos
                .into_iter()
                .filter_map(|m| m.label)
                .collect(),
            raw,
        })
    }

    /// Human readable path, e.g. `Orca x Raydium`.
    pub fn describe(&self) -> String {
        if self.market_labels.is_empty() {
            "direct".to_string()
        } else {
            self.market_labels.join(" x ")
        }
    }
}

/// An exchange prepared by the routing service, ready to be signed.
#[derive(Debug, Clone)]
pub struct PreparedSwap {
    /// Base64 encoded, unsigned versioned transaction.
    pub transaction: String,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: u64,
    pub out_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapSuccess {
    pub txid: String,
    pub input_address: String,
    pub output_address: String,
    pub input_amount: u64,
    pub output_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SwapOutcome {
    Success(SwapSuccess),
    Failure { error: String },
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(u64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s.parse::<u64>().map_err(serde::de::Error::custom),
    }
}

fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "deserialize_amount")] u64);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}
