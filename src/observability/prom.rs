use actix_web::HttpResponse;
use once_cell::sync::OnceCell;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_inflight: IntGauge,
    http_duration: HistogramVec,
    events: IntCounterVec,
    notifications: IntCounterVec,
    webhook_duration: HistogramVec,
}

static METRICS: OnceCell<Metrics> = OnceCell::new();

fn default_buckets_seconds() -> Vec<f64> {
    // Prometheus-default-ish buckets for latency (seconds)
    vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
}

fn build() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new();

    let http_requests = IntCounterVec::new(
        Opts::new("rowhook_http_requests_total", "HTTP requests total"),
        &["method", "status"],
    )?;

    let http_inflight =
        IntGauge::new("rowhook_http_inflight_requests", "Inflight HTTP requests")?;

    let http_duration = HistogramVec::new(
        HistogramOpts::new("rowhook_http_request_duration_seconds", "HTTP request duration (s)")
            .buckets(default_buckets_seconds()),
        &["method"],
    )?;

    let events = IntCounterVec::new(
        Opts::new("rowhook_events_total", "Inbound insert events by outcome"),
        &["outcome"], // sent | skipped | failed
    )?;

    let notifications = IntCounterVec::new(
        Opts::new("rowhook_notifications_total", "Notifier invocations by result"),
        &["result"], // sent | configuration | invalid_event | delivery
    )?;

    let webhook_duration = HistogramVec::new(
        HistogramOpts::new("rowhook_webhook_post_duration_seconds", "Outbound webhook POST latency (s)")
            .buckets(default_buckets_seconds()),
        &["result"],
    )?;

    registry.register(Box::new(http_requests.clone()))?;
    registry.register(Box::new(http_inflight.clone()))?;
    registry.register(Box::new(http_duration.clone()))?;
    registry.register(Box::new(events.clone()))?;
    registry.register(Box::new(notifications.clone()))?;
    registry.register(Box::new(webhook_duration.clone()))?;

    Ok(Metrics {
        registry,
        http_requests,
        http_inflight,
        http_duration,
        events,
        notifications,
        webhook_duration,
    })
}

pub fn init_prometheus() {
    if let Err(e) = METRICS.get_or_try_init(build) {
        tracing::error!(target: "rowhook::prom", "metrics registry unavailable: {}", e);
    }
}

// Called by middleware
pub fn inc_inflight() {
    if let Some(m) = METRICS.get() { m.http_inflight.inc(); }
}
pub fn dec_inflight() {
    if let Some(m) = METRICS.get() { m.http_inflight.dec(); }
}
pub fn observe_request(method: &str, status: u16, dur_seconds: f64) {
    if let Some(m) = METRICS.get() {
        let status = status.to_string();
        m.http_requests
            .with_label_values(&[method, status.as_str()])
            .inc();
        m.http_duration.with_label_values(&[method]).observe(dur_seconds);
    }
}

// Called by the receiver
pub fn observe_event(outcome: &str) {
    if let Some(m) = METRICS.get() {
        m.events.with_label_values(&[outcome]).inc();
    }
}

// Called by the notifier
pub fn observe_notification(result: &str) {
    if let Some(m) = METRICS.get() {
        m.notifications.with_label_values(&[result]).inc();
    }
}
pub fn observe_webhook_post(result: &str, dur_seconds: f64) {
    if let Some(m) = METRICS.get() {
        m.webhook_duration.with_label_values(&[result]).observe(dur_seconds);
    }
}

pub async fn metrics_handler() -> HttpResponse {
    init_prometheus();
    match METRICS.get() {
        Some(m) => encode(&m.registry),
        None => HttpResponse::ServiceUnavailable().body("metrics registry unavailable"),
    }
}

fn encode(registry: &Registry) -> HttpResponse {
    let encoder = TextEncoder::new();
    let mf = registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&mf, &mut buf) {
        return HttpResponse::InternalServerError().body(format!("encode error: {e}"));
    }
    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buf)
}
