use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_rpc_client_api::{
    client_error::{Error as ClientError, ErrorKind as ClientErrorKind},
    request::RpcError,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    blockchain::{associated_token_address, parse_pubkey, SolanaRpc},
    dex::traits::TransactionSubmitter,
    error::ExecutionError,
    types::{PreparedSwap, SwapOutcome, SwapSuccess},
};

const NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

/// Why the cluster turned the swap down, if it did. Node rejections
/// (including failed preflight), on-chain errors and transactions that never
/// confirmed are outcomes; anything else means the RPC could not be reached.
fn rejection_reason(error: &ClientError) -> Option<String> {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
            warn!("Transaction rejected by the node ({}): {}", code, message);
            Some(message.clone())
        }
        ClientErrorKind::RpcError(RpcError::ForUser(message)) => Some(message.clone()),
        ClientErrorKind::TransactionError(err) => Some(format!("transaction failed: {}", err)),
        _ => None,
    }
}

/// Signs prepared swaps with the wallet keypair and sends them through the RPC.
pub struct WalletSubmitter {
    rpc: Arc<dyn SolanaRpc>,
    keypair: Keypair,
}

impl WalletSubmitter {
    pub fn new(rpc: Arc<dyn SolanaRpc>, keypair: Keypair) -> Self {
        Self { rpc, keypair }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn sign(&self, encoded: &str) -> Result<VersionedTransaction, ExecutionError> {
        let bytes = STANDARD.decode(encoded).map_err(|e| {
            ExecutionError::Protocol(format!("swap transaction is not base64: {}", e))
        })?;
        let unsigned: VersionedTransaction = bincode::deserialize(&bytes).map_err(|e| {
            ExecutionError::Protocol(format!("undecodable swap transaction: {}", e))
        })?;

        VersionedTransaction::try_new(unsigned.message, &[&self.keypair])
            .map_err(|e| ExecutionError::Signing(e.to_string()))
    }

    /// Token account the wallet uses for `mint`. Native SOL is debited from
    /// the wallet itself; other mints use the associated account under the
    /// mint's own token program.
    async fn token_account(&self, mint: &str) -> Result<String, ExecutionError> {
        let wallet = self.keypair.pubkey();
        if mint == NATIVE_MINT {
            return Ok(wallet.to_string());
        }

        let mint = parse_pubkey(mint).map_err(|e| ExecutionError::Protocol(e.to_string()))?;
        let token_program = self.rpc.mint_owner(&mint).await?;

        Ok(associated_token_address(&wallet, &mint, &token_program).to_string())
    }
}

#[async_trait]
impl TransactionSubmitter for WalletSubmitter {
    async fn submit(&self, prepared: PreparedSwap) -> Result<SwapOutcome, ExecutionError> {
        let input_address = self.token_account(&prepared.input_mint).await?;
        let output_address = self.token_account(&prepared.output_mint).await?;
        let signed = self.sign(&prepared.transaction)?;

        debug!("Sending swap transaction {}", signed.signatures[0]);

        match self.rpc.send_and_confirm(&signed).await {
            Ok(signature) => Ok(SwapOutcome::Success(SwapSuccess {
                txid: signature.to_string(),
                input_address,
                output_address,
                input_amount: prepared.in_amount,
                output_amount: prepared.out_amount,
            })),
            Err(error) => match rejection_reason(&error) {
                Some(reason) => Ok(SwapOutcome::Failure { error: reason }),
                None => Err(ExecutionError::Rpc(error)),
            },
        }
    }
}
