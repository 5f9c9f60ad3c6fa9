use crate::{shared::usecase::execute, sweep::run_sweep::RunSweepUseCase};
use actix_web::rt::time::{interval_at, Instant};
use nudge_infra::NudgeContext;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::{info, warn};

/// Seconds until the next whole minute
pub fn get_start_delay(now_ts: usize) -> usize {
    60 - (now_ts / 1000) % 60
}

/// Marks a sweep job run as in flight until dropped
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    /// `None` when a previous run has not finished yet
    fn try_start(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag.clone()))
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs a sweep on every tick, starting at the next whole minute.
/// Ticks that arrive while the previous sweep is still running are skipped.
pub fn start_sweep_job(ctx: NudgeContext) {
    let period = ctx.config.sweep_interval;
    if period.is_zero() {
        info!("Sweep interval is zero. The internal sweep job is disabled.");
        return;
    }

    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        let running = Arc::new(AtomicBool::new(false));
        let mut sweep_interval = interval_at(start, period);
        loop {
            sweep_interval.tick().await;
            let in_flight = match InFlight::try_start(&running) {
                Some(in_flight) => in_flight,
                None => {
                    warn!("Previous sweep is still running. Skipping this tick.");
                    continue;
                }
            };
            let context = ctx.clone();
            actix_web::rt::spawn(async move {
                let _in_flight = in_flight;
                let usecase = RunSweepUseCase {
                    now: context.sys.now(),
                };
                let _ = execute(usecase, &context).await;
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000), 10);
        assert_eq!(get_start_delay(60 * 1000), 60);
        assert_eq!(get_start_delay(59 * 1000), 1);
        assert_eq!(get_start_delay(59 * 1000 + 999), 1);
        assert_eq!(get_start_delay(0), 60);
    }

    #[test]
    fn only_one_run_is_in_flight() {
        let running = Arc::new(AtomicBool::new(false));

        let first = InFlight::try_start(&running);
        assert!(first.is_some());
        assert!(InFlight::try_start(&running).is_none());

        drop(first);
        let next = InFlight::try_start(&running);
        assert!(next.is_some());
        assert!(InFlight::try_start(&running).is_none());
    }
}
