use anyhow::Result;
use jupiter_swap_bot::{
    blockchain::{connect, health_check, keypair_from_base58},
    bot::{SwapBot, TickScheduler},
    config::Config,
    dex::{JupiterClient, TokenListClient},
    wallet::WalletSubmitter,
};
use solana_sdk::signature::Signer;
use std::{sync::Arc, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting Jupiter swap bot");

    let config = Arc::new(Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?);

    info!("Configuration loaded for {}", config.network.env.as_str());

    let keypair = keypair_from_base58(&config.wallet.private_key).map_err(|e| {
        error!("Failed to derive wallet: {}", e);
        e
    })?;
    info!("Wallet: {}", keypair.pubkey());

    let solana = Arc::new(connect(&config.network.rpc_url));
    health_check(&solana).await?;

    let token_list = Arc::new(TokenListClient::new(config.token_list_url()));
    let jupiter = Arc::new(JupiterClient::new(&config.jupiter, keypair.pubkey().to_string()));
    let submitter = Arc::new(WalletSubmitter::new(solana, keypair));

    let bot = Arc::new(SwapBot::new(config.clone(), token_list, jupiter, submitter)?);
    let scheduler = TickScheduler::new(
        bot.clone(),
        Duration::from_secs(config.swap.check_interval_seconds),
        config.swap.single_flight,
    );

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("{}", bot.metrics().await.generate_report());
    info!("Jupiter swap bot shutdown complete");
    Ok(())
}
