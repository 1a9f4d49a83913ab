use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = "storage/logs";

/// Logs every request with a fresh request id, at a level chosen by the
/// response status class.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(request_id = %request_id, method = %method, path = %path, "Incoming request");

    let response = next.run(req).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Client error"
        ),
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Server error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            "Request completed"
        ),
    }

    response
}

/// Compact console output filtered by `RUST_LOG`, plus a daily rolling file
/// under `storage/logs` that only receives errors.
pub fn init_tracing() {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,userdesk_db=info,tower_http=warn",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_layer = match std::fs::create_dir_all(LOG_DIR) {
        Ok(()) => {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "userdesk.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new("error")),
            )
        }
        Err(e) => {
            eprintln!("Cannot create {}: {}. Logging to console only.", LOG_DIR, e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
