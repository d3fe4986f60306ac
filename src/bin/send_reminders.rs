//! Delivers every due reminder once and exits. Meant to be run by cron.

use agenda::telemetry::{get_subscriber, init_subscriber};
use agenda_api::dispatch_reminders;
use agenda_infra::setup_context;
use anyhow::anyhow;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("agenda_send_reminders".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await?;

    let report = dispatch_reminders(&context)
        .await
        .map_err(|e| anyhow!("Unable to dispatch reminders: {:?}", e))?;
    info!(
        "Reminder dispatch finished. Attempted: {}, sent: {}, failed: {}",
        report.attempted, report.sent, report.error
    );
    Ok(())
}
