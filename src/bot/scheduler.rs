use async_trait::async_trait;
use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Work performed on every timer fire. Implementations own their error
/// handling; nothing returned from a tick reaches the scheduler.
#[async_trait]
pub trait TickHandler: Send + Sync + 'static {
    async fn on_tick(&self, tick: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Holds one slot of the in-flight count for as long as a tick runs,
/// including when the tick panics.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Fires the handler at a fixed interval without waiting for earlier ticks
/// to settle, so ticks may overlap. With `single_flight` a fire is skipped
/// while any tick is still running.
pub struct TickScheduler {
    handler: Arc<dyn TickHandler>,
    period: Duration,
    single_flight: bool,
    in_flight: Arc<AtomicUsize>,
    fired: AtomicU64,
}

impl TickScheduler {
    pub fn new(handler: Arc<dyn TickHandler>, period: Duration, single_flight: bool) -> Self {
        Self {
            handler,
            period,
            single_flight,
            in_flight: Arc::new(AtomicUsize::new(0)),
            fired: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.in_flight() > 0 {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Number of ticks spawned so far.
    pub fn ticks_fired(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }

    /// Runs until the surrounding task is dropped. The first tick fires one
    /// period after the call.
    pub async fn run(&self) {
        let mut timer = interval_at(Instant::now() + self.period, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Starting scheduler with {} second intervals (single flight: {})",
            self.period.as_secs(),
            self.single_flight
        );

        loop {
            timer.tick().await;

            if self.single_flight && self.in_flight() > 0 {
                warn!("Previous tick still running, skipping this interval");
                continue;
            }

            let tick = self.fired.fetch_add(1, Ordering::SeqCst) + 1;
            let in_flight = self.in_flight();
            if in_flight > 0 {
                debug!("Tick #{} starting with {} ticks still in flight", tick, in_flight);
            }

            let guard = InFlightGuard::enter(self.in_flight.clone());
            let handler = self.handler.clone();
            tokio::spawn(async move {
                let _guard = guard;
                handler.on_tick(tick).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[derive(Default)]
    struct CountingHandler {
        started: AtomicU64,
        finished: AtomicU64,
        work: Duration,
        panic: bool,
    }

    #[async_trait]
    impl TickHandler for CountingHandler {
        async fn on_tick(&self, _tick: u64) {
            self.started.fetch_add(1, Ordering::SeqCst);
            if !self.work.is_zero() {
                sleep(self.work).await;
            }
            if self.panic {
                panic!("tick blew up");
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn start(handler: Arc<CountingHandler>, single_flight: bool) -> Arc<TickScheduler> {
        let period = Duration::from_secs(30);
        let scheduler = Arc::new(TickScheduler::new(handler, period, single_flight));
        let running = scheduler.clone();
        tokio::spawn(async move { running.run().await });
        scheduler
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_period() {
        let handler = Arc::new(CountingHandler::default());
        let scheduler = start(handler.clone(), false);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(handler.started.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        sleep(Duration::from_secs(25)).await;
        assert_eq!(handler.started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_ticks_do_not_stop_the_timer() {
        let handler = Arc::new(CountingHandler {
            panic: true,
            ..Default::default()
        });
        let scheduler = start(handler.clone(), false);

        sleep(Duration::from_secs(95)).await;

        assert_eq!(handler.started.load(Ordering::SeqCst), 3);
        assert_eq!(handler.finished.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.ticks_fired(), 3);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_overlap_when_slow() {
        let handler = Arc::new(CountingHandler {
            work: Duration::from_secs(100),
            ..Default::default()
        });
        let scheduler = start(handler.clone(), false);

        sleep(Duration::from_secs(95)).await;

        assert_eq!(handler.started.load(Ordering::SeqCst), 3);
        assert_eq!(handler.finished.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.in_flight(), 3);
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_flight_skips_while_running() {
        let handler = Arc::new(CountingHandler {
            work: Duration::from_secs(100),
            ..Default::default()
        });
        let scheduler = start(handler.clone(), true);

        sleep(Duration::from_secs(95)).await;
        assert_eq!(handler.started.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.in_flight(), 1);

        // First tick settles at 130s; the fire at 150s goes ahead.
        sleep(Duration::from_secs(60)).await;
        assert_eq!(handler.finished.load(Ordering::SeqCst), 1);
        assert_eq!(handler.started.load(Ordering::SeqCst), 2);
    }
}
