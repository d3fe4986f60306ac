use crate::reminder::dispatch_reminders;
use agenda_infra::AgendaContext;
use std::time::Duration;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::info;

/// Seconds from the millisecond timestamp `now_ts` until the next whole minute
pub fn get_start_delay(now_ts: i64) -> u64 {
    (60 - (now_ts / 1000).rem_euclid(60)) as u64
}

/// Dispatches due reminders from inside the server when a dispatch interval
/// is configured. Runs start on whole minutes and never overlap.
pub fn start_send_reminders_job(ctx: AgendaContext) {
    let period = match ctx.config.reminders.dispatch_interval {
        Some(period) => period,
        None => {
            info!("No reminder dispatch interval configured, reminders are dispatched by an external scheduler");
            return;
        }
    };
    info!("Dispatching due reminders every {:?}", period);

    actix_web::rt::spawn(async move {
        let secs_to_next_run = get_start_delay(ctx.sys.now().timestamp_millis());
        let start = Instant::now() + Duration::from_secs(secs_to_next_run);

        sleep_until(start).await;
        let mut dispatch_interval = interval(period);
        dispatch_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            dispatch_interval.tick().await;
            // Errors are logged by the use case
            let _ = dispatch_reminders(&ctx).await;
        }
    });
}
