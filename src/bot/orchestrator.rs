use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    bot::{metrics::BotMetrics, scheduler::TickHandler},
    config::Config,
    dex::traits::{RouteProvider, TokenListSource, TransactionSubmitter},
    error::BotError,
    swap::{
        output_amount_decimal, possible_pairs, resolve_pair, should_execute, RouteQuoter,
        SwapExecutor,
    },
    types::SwapOutcome,
};

const REPORT_EVERY_TICKS: u64 = 100;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// How a tick that did not fail ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A symbol did not resolve or the routing service had no route.
    NoRoute,
    BelowThreshold { output_amount: BigDecimal },
    Executed(SwapOutcome),
}

pub struct SwapBot {
    config: Arc<Config>,
    token_list: Arc<dyn TokenListSource>,
    provider: Arc<dyn RouteProvider>,
    quoter: RouteQuoter,
    executor: SwapExecutor,
    trade_amount: BigDecimal,
    metrics: Mutex<BotMetrics>,
}

impl SwapBot {
    pub fn new(
        config: Arc<Config>,
        token_list: Arc<dyn TokenListSource>,
        provider: Arc<dyn RouteProvider>,
        submitter: Arc<dyn TransactionSubmitter>,
    ) -> Result<Self> {
        let trade_amount = config.swap.trade_amount()?;
        let quoter = RouteQuoter::new(provider.clone());
        let executor = SwapExecutor::new(provider.clone(), submitter, config.network.env);

        info!(
            "Swap bot initialized: {} {} -> {} via {}, {} bps slippage",
            trade_amount,
            config.swap.input_symbol,
            config.swap.output_symbol,
            provider.name(),
            config.swap.slippage_bps
        );

        Ok(Self {
            config,
            token_list,
            provider,
            quoter,
            executor,
            trade_amount,
            metrics: Mutex::new(BotMetrics::new()),
        })
    }

    /// One pass of the pipeline: catalog, route map, pair, quote, gate, swap.
    pub async fn run_tick(&self) -> Result<TickOutcome, BotError> {
        let swap = &self.config.swap;

        let tokens = self.token_list.fetch_tokens().await?;
        let route_map = self.provider.route_map().await?;

        let (input_token, output_token) =
            resolve_pair(&tokens, &route_map, &swap.input_symbol, &swap.output_symbol);

        let pairs = possible_pairs(&tokens, &route_map, input_token.as_ref());
        debug!("{} tokens swappable with {}", pairs.len(), swap.input_symbol);

        let routes = match self
            .quoter
            .quote(
                input_token.as_ref(),
                output_token.as_ref(),
                &self.trade_amount,
                swap.slippage_bps,
            )
            .await?
        {
            Some(routes) => routes,
            None => return Ok(TickOutcome::NoRoute),
        };

        // Routes arrive best first.
        let (Some(output_token), Some(best_route)) = (output_token.as_ref(), routes.first()) else {
            return Ok(TickOutcome::NoRoute);
        };

        let output_amount = output_amount_decimal(best_route, output_token);
        if !should_execute(best_route, &self.trade_amount, output_token) {
            return Ok(TickOutcome::BelowThreshold { output_amount });
        }

        info!("Swap {}", output_amount);
        let outcome = self.executor.execute(best_route).await?;

        Ok(TickOutcome::Executed(outcome))
    }

    pub async fn metrics(&self) -> BotMetrics {
        self.metrics.lock().await.clone()
    }
}

#[async_trait]
impl TickHandler for SwapBot {
    async fn on_tick(&self, tick: u64) {
        let span = info_span!("tick", tick, id = %Uuid::new_v4());

        async {
            debug!("Starting tick #{}", tick);
            self.metrics.lock().await.record_tick_started();

            // A panicking tick still has to settle in the counters.
            match AssertUnwindSafe(self.run_tick()).catch_unwind().await {
                Ok(Ok(outcome)) => {
                    debug!("Tick #{} settled: {:?}", tick, outcome);
                    self.metrics.lock().await.record_outcome(&outcome);
                }
                Ok(Err(e)) => {
                    error!("Tick #{} failed at {} stage: {}", tick, e.stage(), e);
                    self.metrics.lock().await.record_error(&e.to_string());
                }
                Err(payload) => {
                    let message = format!("tick panicked: {}", panic_message(payload.as_ref()));
                    error!("Tick #{} {}", tick, message);
                    self.metrics.lock().await.record_error(&message);
                }
            }

            if tick % REPORT_EVERY_TICKS == 0 {
                info!("{}", self.metrics.lock().await.generate_report());
            }
        }
        .instrument(span)
        .await
    }
}
