use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";
// 服务层的 debug 日志（存储写入、登录失败等）在 JSON 模式下默认打开
const JSON_FILTER: &str = "info,service=debug,tower_http=info";

/// `RUST_LOG` wins over the built-in directive.
fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact human-readable logs on stdout.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter_or(DEFAULT_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event on stdout, for log shippers.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(filter_or(JSON_FILTER))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the log format from `LOG_FORMAT` (`json` or anything else for compact).
pub fn init_logging_from_env() {
    match std::env::var("LOG_FORMAT") {
        Ok(v) if v.eq_ignore_ascii_case("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}
