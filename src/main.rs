use agenda::telemetry::{get_subscriber, init_subscriber};
use agenda_api::Application;
use agenda_infra::setup_context;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("agenda_server".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await?;

    let app = Application::new(context).await?;
    app.start().await?;
    Ok(())
}
