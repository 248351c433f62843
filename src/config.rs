use anyhow::{anyhow, Result};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub network: NetworkConfig,
    pub wallet: WalletConfig,
    pub swap: SwapConfig,
    pub jupiter: JupiterConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub env: NetworkEnv,
    /// Overrides the token list endpoint derived from `env`.
    #[serde(default)]
    pub token_list_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkEnv {
    MainnetBeta,
    Devnet,
    Testnet,
}

impl NetworkEnv {
    pub fn token_list_url(&self) -> &'static str {
        match self {
            NetworkEnv::MainnetBeta => "https://cache.jup.ag/tokens",
            NetworkEnv::Devnet => "https://api.jup.ag/api/tokens/devnet",
            NetworkEnv::Testnet => "https://api.jup.ag/api/tokens/testnet",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkEnv::MainnetBeta => "mainnet-beta",
            NetworkEnv::Devnet => "devnet",
            NetworkEnv::Testnet => "testnet",
        }
    }

    pub fn explorer_tx_url(&self, txid: &str) -> String {
        match self {
            NetworkEnv::MainnetBeta => format!("https://explorer.solana.com/tx/{}", txid),
            other => format!("https://explorer.solana.com/tx/{}?cluster={}", txid, other.as_str()),
        }
    }
}

#[derive(Deserialize, Serialize, Clone)]
pub struct WalletConfig {
    /// Base58 encoded 64-byte secret key.
    pub private_key: String,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SwapConfig {
    pub input_symbol: String,
    pub output_symbol: String,
    /// Trade amount in UI units of the input token.
    pub amount: String,
    pub slippage_bps: u16,
    pub check_interval_seconds: u64,
    /// Skip a timer fire while the previous tick is still in flight.
    pub single_flight: bool,
}

impl SwapConfig {
    pub fn trade_amount(&self) -> Result<BigDecimal> {
        BigDecimal::from_str(self.amount.trim())
            .map_err(|e| anyhow!("Invalid trade amount '{}': {}", self.amount, e))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JupiterConfig {
    pub quote_api_url: String,
    pub route_cache_seconds: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut settings = config::Config::builder()
            .set_default("network.rpc_url", "https://api.mainnet-beta.solana.com")?
            .set_default("network.env", "mainnet-beta")?
            .set_default("wallet.private_key", "")?
            .set_default("swap.input_symbol", "SOL")?
            .set_default("swap.output_symbol", "USDC")?
            .set_default("swap.amount", "1")?
            .set_default("swap.slippage_bps", 100)?
            .set_default("swap.check_interval_seconds", 30)?
            .set_default("swap.single_flight", false)?
            .set_default("jupiter.quote_api_url", "https://quote-api.jup.ag/v4")?
            .set_default("jupiter.route_cache_seconds", 10)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("SWAPBOT").separator("__"));

        let overrides = [
            ("SOLANA_RPC_ENDPOINT", "network.rpc_url"),
            ("ENV", "network.env"),
            ("PRIVATE_KEY", "wallet.private_key"),
            ("INPUT_TOKEN", "swap.input_symbol"),
            ("OUTPUT_TOKEN", "swap.output_symbol"),
            ("AMOUNT", "swap.amount"),
        ];
        for (var, key) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    settings = settings.set_override(key, value)?;
                }
            }
        }

        let config: Config = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.swap.input_symbol.is_empty() || self.swap.output_symbol.is_empty() {
            return Err(anyhow!("Input and output token symbols must not be empty"));
        }

        let amount = self.swap.trade_amount()?;
        if amount <= BigDecimal::from(0) {
            return Err(anyhow!("Trade amount must be positive, got {}", amount));
        }

        if self.swap.slippage_bps > 10_000 {
            return Err(anyhow!(
                "Slippage of {} bps exceeds 100%",
                self.swap.slippage_bps
            ));
        }

        if self.swap.check_interval_seconds == 0 {
            return Err(anyhow!("Check interval must be at least one second"));
        }

        Ok(())
    }

    pub fn token_list_url(&self) -> String {
        self.network
            .token_list_url
            .clone()
            .unwrap_or_else(|| self.network.env.token_list_url().to_string())
    }
}
