use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bot::orchestrator::TickOutcome;
use crate::types::SwapOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct BotMetrics {
    pub started_at: DateTime<Utc>,
    pub ticks_started: u64,
    pub ticks_completed: u64,
    pub ticks_failed: u64,
    pub no_route_ticks: u64,
    pub below_threshold_ticks: u64,
    pub swaps_succeeded: u64,
    pub swaps_failed: u64,
    pub last_error: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl BotMetrics {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            ticks_started: 0,
            ticks_completed: 0,
            ticks_failed: 0,
            no_route_ticks: 0,
            below_threshold_ticks: 0,
            swaps_succeeded: 0,
            swaps_failed: 0,
            last_error: None,
            last_updated: now,
        }
    }

    pub fn record_tick_started(&mut self) {
        self.ticks_started += 1;
        self.last_updated = Utc::now();
    }

    pub fn record_outcome(&mut self, outcome: &TickOutcome) {
        self.ticks_completed += 1;

        match outcome {
            TickOutcome::NoRoute => self.no_route_ticks += 1,
            TickOutcome::BelowThreshold { .. } => self.below_threshold_ticks += 1,
            TickOutcome::Executed(SwapOutcome::Success(_)) => self.swaps_succeeded += 1,
            TickOutcome::Executed(SwapOutcome::Failure { .. }) => self.swaps_failed += 1,
        }

        self.last_updated = Utc::now();
    }

    pub fn record_error(&mut self, error_message: &str) {
        self.ticks_failed += 1;
        self.last_error = Some(error_message.to_string());
        self.last_updated = Utc::now();
    }

    /// Ticks that have started but neither completed nor failed yet.
    pub fn in_flight(&self) -> u64 {
        self.ticks_started
            .saturating_sub(self.ticks_completed + self.ticks_failed)
    }

    pub fn success_rate(&self) -> f64 {
        let settled = self.ticks_completed + self.ticks_failed;
        if settled == 0 {
            0.0
        } else {
            self.ticks_completed as f64 / settled as f64
        }
    }

    pub fn generate_report(&self) -> String {
        let mut report = String::new();
        let uptime = Utc::now().signed_duration_since(self.started_at);

        report.push_str("=== Swap Bot Metrics Report ===\n");
        report.push_str(&format!("Uptime: {} seconds\n", uptime.num_seconds()));
        report.push_str(&format!("Ticks Started: {}\n", self.ticks_started));
        report.push_str(&format!("Ticks Completed: {}\n", self.ticks_completed));
        report.push_str(&format!("Ticks Failed: {}\n", self.ticks_failed));
        report.push_str(&format!("Ticks In Flight: {}\n", self.in_flight()));
        report.push_str(&format!("No Route: {}\n", self.no_route_ticks));
        report.push_str(&format!("Below Threshold: {}\n", self.below_threshold_ticks));
        report.push_str(&format!(
            "Swaps: {} succeeded, {} failed\n",
            self.swaps_succeeded, self.swaps_failed
        ));
        report.push_str(&format!("Success Rate: {:.2}%\n", self.success_rate() * 100.0));

        if let Some(ref error) = self.last_error {
            report.push_str(&format!("Last Error: {}\n", error));
        }

        report.push_str(&format!("Last Updated: {}\n", self.last_updated));

        report
    }
}

impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}
