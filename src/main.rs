use std::{io, sync::Arc};

use actix_web::{App, HttpServer};
use rowhook::observability::prom;
use rowhook::{
    app_state, configure, init_tracing, DiscordWebhook, DryRunSink, Notifier, NotifierConfig,
    RequestMetrics, ServerConfig, WebhookSink,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();
    prom::init_prometheus();

    let notifier_cfg = NotifierConfig::from_env();
    let server_cfg = ServerConfig::from_env();

    if notifier_cfg.webhook_url().is_none() {
        tracing::warn!(
            target: "rowhook",
            "WEBHOOK_URL is not set; every event will fail until it is configured"
        );
    }

    let sink: Arc<dyn WebhookSink> = if notifier_cfg.dry_run {
        tracing::info!(target: "rowhook", "dry run enabled, notifications are only logged");
        Arc::new(DryRunSink::new())
    } else {
        Arc::new(DiscordWebhook::from_config(&notifier_cfg).map_err(io::Error::other)?)
    };

    tracing::info!(
        target: "rowhook",
        bind = %server_cfg.bind_addr,
        table = %notifier_cfg.table_name,
        "listening for insert events"
    );

    let state = app_state(Notifier::new(notifier_cfg), sink);
    let bind_addr = server_cfg.bind_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(RequestMetrics::with_config(server_cfg.clone()))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
