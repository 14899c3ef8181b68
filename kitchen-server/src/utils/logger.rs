//! Logging Infrastructure
//!
//! - console output, pretty or JSON
//! - optional daily rolling files under `LOG_DIR`: `app/` for everything
//!   except the `security` target, `security/` for auth and permission events

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_layer(appender: RollingFileAppender, json_format: bool) -> BoxedLayer {
    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false)
        .with_writer(appender);
    if json_format {
        layer.json().with_current_span(true).boxed()
    } else {
        layer.boxed()
    }
}

/// Initialize the logging system
///
/// `RUST_LOG` wins over `level` when set.
///
/// ```no_run
/// // Development (console only)
/// kitchen_server::init_logger_with_file("debug", false, None)?;
///
/// // Production (JSON console + files)
/// kitchen_server::init_logger_with_file("info", true, Some("./logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console: BoxedLayer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let mut layers = vec![console];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_dir = log_dir.join("app");
        let security_dir = log_dir.join("security");
        fs::create_dir_all(&app_dir)?;
        fs::create_dir_all(&security_dir)?;

        let app_log = RollingFileAppender::new(Rotation::DAILY, app_dir, "app.log");
        layers.push(
            file_layer(app_log, json_format)
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "security"
                }))
                .boxed(),
        );

        let security_log = RollingFileAppender::new(Rotation::DAILY, security_dir, "security.log");
        layers.push(
            file_layer(security_log, json_format)
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "security"
                }))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}
