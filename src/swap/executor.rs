use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    config::NetworkEnv,
    dex::traits::{RouteProvider, TransactionSubmitter},
    error::ExecutionError,
    types::{Route, SwapOutcome},
};

pub struct SwapExecutor {
    provider: Arc<dyn RouteProvider>,
    submitter: Arc<dyn TransactionSubmitter>,
    network: NetworkEnv,
}

impl SwapExecutor {
    pub fn new(
        provider: Arc<dyn RouteProvider>,
        submitter: Arc<dyn TransactionSubmitter>,
        network: NetworkEnv,
    ) -> Self {
        Self {
            provider,
            submitter,
            network,
        }
    }

    pub async fn execute(&self, route: &Route) -> Result<SwapOutcome, ExecutionError> {
        let prepared = self.provider.exchange(route).await?;
        let outcome = self.submitter.submit(prepared).await?;

        match &outcome {
            SwapOutcome::Success(result) => {
                info!("{}", self.network.explorer_tx_url(&result.txid));
                info!(
                    "inputAddress={} outputAddress={}",
                    result.input_address, result.output_address
                );
                info!(
                    "inputAmount={} outputAmount={}",
                    result.input_amount, result.output_amount
                );
            }
            SwapOutcome::Failure { error } => {
                warn!("Swap failed: {}", error);
            }
        }

        Ok(outcome)
    }
}
