use solana_rpc_client_api::client_error::Error as ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogFetchError {
    #[error("token list request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("token list at {url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("token list from {url} is malformed: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("routing service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("routing service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("routing service protocol error: {0}")]
    Protocol(String),
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("execution request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("execution service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("execution protocol error: {0}")]
    Protocol(String),

    #[error("Solana RPC request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("failed to sign swap transaction: {0}")]
    Signing(String),
}

/// Everything that can abort a single tick.
#[derive(Error, Debug)]
pub enum BotError {
    #[error(transparent)]
    Catalog(#[from] CatalogFetchError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl BotError {
    pub fn stage(&self) -> &'static str {
        match self {
            BotError::Catalog(_) => "catalog",
            BotError::Quote(_) => "quote",
            BotError::Execution(_) => "execution",
        }
    }
}
