use agenda_api::Application;
use agenda_infra::{AgendaContext, Config, InMemoryMailTransport};
use agenda_sdk::AgendaSDK;
use std::sync::Arc;

pub struct TestApp {
    pub config: Config,
    pub ctx: AgendaContext,
    pub mail: Arc<InMemoryMailTransport>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, AgendaSDK, String) {
    let mut ctx = AgendaContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.reminders.dispatch_interval = None;
    let mail = Arc::new(InMemoryMailTransport::new());
    ctx.mail = mail.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = AgendaSDK::new(address.clone(), config.api_key.clone());
    let app = TestApp { config, ctx, mail };
    (app, sdk, address)
}
