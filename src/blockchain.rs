use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_rpc_client_api::client_error::Result as ClientResult;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::VersionedTransaction,
};
use std::str::FromStr;
use tracing::{debug, info};

pub type SolanaRpcClient = RpcClient;

/// The slice of the Solana RPC the swap path needs.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Sends `transaction` and waits until the cluster confirms or rejects it.
    async fn send_and_confirm(&self, transaction: &VersionedTransaction) -> ClientResult<Signature>;

    /// Program owning the mint account, i.e. the token program it belongs to.
    async fn mint_owner(&self, mint: &Pubkey) -> ClientResult<Pubkey>;
}

#[async_trait]
impl SolanaRpc for SolanaRpcClient {
    async fn send_and_confirm(
        &self,
        transaction: &VersionedTransaction,
    ) -> ClientResult<Signature> {
        self.send_and_confirm_transaction(transaction).await
    }

    async fn mint_owner(&self, mint: &Pubkey) -> ClientResult<Pubkey> {
        Ok(self.get_account(mint).await?.owner)
    }
}

pub fn connect(rpc_url: &str) -> SolanaRpcClient {
    info!("Using Solana RPC: {}", rpc_url);
    SolanaRpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed())
}

pub async fn health_check(rpc: &SolanaRpcClient) -> Result<()> {
    debug!("Performing Solana RPC health check");

    rpc.get_health()
        .await
        .map_err(|e| anyhow!("RPC health check failed: {}", e))?;
    let slot = rpc
        .get_slot()
        .await
        .map_err(|e| anyhow!("Failed to get slot: {}", e))?;

    debug!("Health check passed - Slot: {}", slot);

    Ok(())
}

/// Derives the signing identity from a base58 encoded 64-byte secret key.
pub fn keypair_from_base58(secret: &str) -> Result<Keypair> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| anyhow!("Private key is not valid base58: {}", e))?;

    Keypair::try_from(bytes.as_slice()).map_err(|e| anyhow!("Invalid private key: {}", e))
}

pub fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address).map_err(|e| anyhow!("Invalid address format '{}': {}", address, e))
}

/// Address of the associated token account holding `mint` for `wallet`
/// under `token_program`.
pub fn associated_token_address(wallet: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address_with_program_id(
        wallet,
        mint,
        token_program,
    )
}

/// `10^decimals` as an exact decimal.
pub fn ten_pow(decimals: u8) -> BigDecimal {
    (0..decimals).fold(BigDecimal::from(1), |acc, _| acc * BigDecimal::from(10))
}

/// `round(amount * 10^decimals)`, the integer amount the routing service expects.
pub fn to_smallest_units(amount: &BigDecimal, decimals: u8) -> Result<u64> {
    let scaled = (amount * ten_pow(decimals)).round(0);
    scaled.to_u64().ok_or_else(|| {
        anyhow!(
            "Amount {} does not fit in smallest units with {} decimals",
            amount,
            decimals
        )
    })
}

pub fn from_smallest_units(raw: u64, decimals: u8) -> BigDecimal {
    BigDecimal::from(raw) / ten_pow(decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;

    #[test]
    fn test_parse_pubkey() {
        let usdc = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
        assert!(parse_pubkey(usdc).is_ok());
        assert!(parse_pubkey("invalid_address").is_err());
    }

    #[test]
    fn test_keypair_from_base58_round_trip() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();

        let decoded = keypair_from_base58(&encoded).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());

        assert!(keypair_from_base58("not-base58-0OIl").is_err());
        assert!(keypair_from_base58("3yZe7d").is_err());
    }

    #[test]
    fn test_associated_token_address_depends_on_mint_and_program() {
        let wallet = Keypair::new().pubkey();
        let sol = parse_pubkey("So11111111111111111111111111111111111111112").unwrap();
        let usdc = parse_pubkey("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        let token_program = parse_pubkey("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap();
        let token_2022 = parse_pubkey("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb").unwrap();

        let sol_ata = associated_token_address(&wallet, &sol, &token_program);
        assert_eq!(sol_ata, associated_token_address(&wallet, &sol, &token_program));
        assert_ne!(sol_ata, associated_token_address(&wallet, &usdc, &token_program));
        assert_ne!(sol_ata, associated_token_address(&wallet, &sol, &token_2022));
    }

    #[test]
    fn test_smallest_unit_conversions() {
        assert_eq!(to_smallest_units(&BigDecimal::from(1), 9).unwrap(), 1_000_000_000);
        assert_eq!(
            to_smallest_units(&BigDecimal::from_str("0.0000001234").unwrap(), 9).unwrap(),
            123
        );
        assert_eq!(from_smallest_units(25_000_000, 6), BigDecimal::from(25));
        assert_eq!(
            from_smallest_units(500_000, 6),
            BigDecimal::from_str("0.5").unwrap()
        );
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let cases = [("1.23456789", 6u8), ("0.5", 0), ("42.000000001", 9), ("7", 18)];
        for (amount, decimals) in cases {
            let amount = BigDecimal::from_str(amount).unwrap();
            let raw = to_smallest_units(&amount, decimals).unwrap();
            let back = from_smallest_units(raw, decimals);

            let unit = BigDecimal::from(1) / ten_pow(decimals);
            assert!((&back - &amount).abs() <= unit, "{} -> {} -> {}", amount, raw, back);
        }
    }
}
