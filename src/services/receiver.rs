use std::sync::Arc;

use actix_web::{error::InternalError, web, HttpResponse};
use serde_json::json;
use tracing::Instrument;

use crate::domain::{InsertEvent, Notifier, TriggerSpec};
use crate::error::NotifyError;
use crate::observability::prom;
use crate::webhook::WebhookSink;

pub const EVENTS_PATH: &str = "/events";

/// Shared by every worker: the notifier, its outbound sink and the trigger filter.
pub struct AppState {
    pub notifier: Notifier,
    pub sink: Arc<dyn WebhookSink>,
    pub trigger: TriggerSpec,
}

pub fn app_state(notifier: Notifier, sink: Arc<dyn WebhookSink>) -> web::Data<AppState> {
    let trigger = TriggerSpec::for_table(notifier.config().table_name.clone());
    web::Data::new(AppState {
        notifier,
        sink,
        trigger,
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_cfg = web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({
            "status": "failed",
            "error": "malformed_event",
            "message": err.to_string(),
        });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    cfg.app_data(json_cfg)
        .route(EVENTS_PATH, web::post().to(receive_event))
        .route("/health", web::get().to(health))
        .route("/metrics", web::get().to(prom::metrics_handler));
}

async fn receive_event(
    state: web::Data<AppState>,
    event: web::Json<InsertEvent>,
) -> Result<HttpResponse, NotifyError> {
    let event = event.into_inner();
    let span = tracing::info_span!(
        target: "rowhook::receiver",
        "event",
        trigger = state.trigger.id,
        table = %event.table,
        op = ?event.operation_type,
    );

    async move {
        if let Err(reason) = state.trigger.filter.check(&event) {
            prom::observe_event("skipped");
            tracing::debug!(target: "rowhook::receiver", %reason, "event skipped");
            return Ok(HttpResponse::Ok().json(json!({
                "status": "skipped",
                "reason": reason.to_string(),
            })));
        }

        match state.notifier.handle(&event, state.sink.as_ref()).await {
            Ok(message) => {
                prom::observe_event("sent");
                Ok(HttpResponse::Ok().json(json!({
                    "status": "sent",
                    "title": message.title(),
                })))
            }
            Err(e) => {
                prom::observe_event("failed");
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "webhook_configured": state.notifier.config().webhook_url().is_some(),
        "trigger": &state.trigger,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifierConfig;
    use crate::webhook::RecordingSink;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    const URL: &str = "https://discord.example/webhook/abc";

    fn state(cfg: NotifierConfig, sink: Arc<RecordingSink>) -> web::Data<AppState> {
        app_state(Notifier::new(cfg), sink)
    }

    fn configured() -> NotifierConfig {
        NotifierConfig::default().with_webhook_url(URL)
    }

    #[actix_web::test]
    async fn insert_on_watched_table_is_sent() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(configured(), sink.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(EVENTS_PATH)
            .set_json(json!({
                "table": "users",
                "record": { "email": "new@user.com" },
                "operationType": "INSERT"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "sent");
        assert_eq!(body["title"], "New row created in users: new@user.com");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.requests()[0].url, URL);
    }

    #[actix_web::test]
    async fn filtered_events_are_acknowledged_and_skipped() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(configured(), sink.clone()))
                .configure(configure),
        )
        .await;

        for payload in [
            json!({ "table": "users", "record": { "email": "a@b.c" }, "operationType": "UPDATE" }),
            json!({ "table": "orders", "record": { "email": "a@b.c" }, "operationType": "INSERT" }),
        ] {
            let req = test::TestRequest::post()
                .uri(EVENTS_PATH)
                .set_json(payload)
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["status"], "skipped");
        }
        assert!(sink.is_empty());
    }

    #[actix_web::test]
    async fn watched_table_comes_from_config() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(configured().with_table_name("orders"), sink.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(EVENTS_PATH)
            .set_json(json!({ "table": "orders", "record": { "email": "a@b.c" }, "type": "INSERT" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(sink.len(), 1);
    }

    #[actix_web::test]
    async fn both_operation_keys_prefer_operation_type() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(configured(), sink.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(EVENTS_PATH)
            .set_json(json!({
                "table": "users",
                "record": { "email": "a@b.c" },
                "operationType": "INSERT",
                "type": "INSERT"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(sink.len(), 1);
    }

    #[actix_web::test]
    async fn missing_url_is_server_error_and_server_keeps_serving() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(NotifierConfig::default(), sink.clone()))
                .configure(configure),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri(EVENTS_PATH)
                .set_json(json!({ "table": "users", "record": { "email": "a@b.c" }, "operationType": "INSERT" }))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["error"], "configuration");
        }
        assert!(sink.is_empty());
    }

    #[actix_web::test]
    async fn missing_email_is_unprocessable() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(configured(), sink.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(EVENTS_PATH)
            .set_json(json!({ "table": "users", "record": { "id": 1 }, "operationType": "INSERT" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(sink.is_empty());
    }

    #[actix_web::test]
    async fn malformed_body_is_bad_request() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(configured(), sink.clone()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(EVENTS_PATH)
            .set_json(json!({ "table": "users" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "malformed_event");
    }

    #[actix_web::test]
    async fn health_reports_trigger() {
        let sink = Arc::new(RecordingSink::new());
        let app = test::init_service(
            App::new()
                .app_data(state(NotifierConfig::default(), sink))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["webhook_configured"], false);
        assert_eq!(body["trigger"]["id"], "supabase-to-discord");
        assert_eq!(body["trigger"]["filter"]["table"][0], "users");
    }
}
