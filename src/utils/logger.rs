use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogConfig;

const LOG_FILE_NAME: &str = "twig.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// JSON lines written to a daily rolling file.
fn file_layer(log_config: &LogConfig) -> Option<BoxedLayer> {
    if !log_config.file_enabled {
        return None;
    }

    log_config.dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        // The writer flushes on drop of the guard; keep it for the whole run.
        std::mem::forget(guard);

        fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_target(true)
            .boxed()
    })
}

fn console_layer(log_config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    match log_config.console_format.as_str() {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// levels when set.
pub fn init_logging(log_config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.filter_directives()));

    let layers: Vec<BoxedLayer> = std::iter::once(console_layer(log_config))
        .chain(file_layer(log_config))
        .collect();

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();
}
