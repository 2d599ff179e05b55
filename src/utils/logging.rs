use crate::config::LoggingSettings;
use std::fs;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `RUST_LOG` is unset: the configured level, with this
/// crate at debug and the HTTP stack quieted.
fn default_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(level)?;
    filter = filter.add_directive("wear_a_hat=debug".parse()?);
    filter = filter.add_directive("hyper=warn".parse()?);
    filter = filter.add_directive("reqwest=warn".parse()?);
    filter = filter.add_directive("rustls=warn".parse()?);
    Ok(filter)
}

/// Initialize logging: console output plus an optional plain-text log file.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&settings.level)?,
    };

    let file_layer = match &settings.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let log_file = fs::File::create(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(log_file))
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(settings.ansi))
        .with(file_layer)
        .try_init()?;

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("Panic occurred: {}", panic_info);
        if let Some(location) = panic_info.location() {
            tracing::error!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }
    }));

    tracing::info!("Logging initialized with level: {}", settings.level);
    if let Some(path) = &settings.file {
        tracing::info!("File logging enabled: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_enables_crate_debug() {
        let filter = default_filter("info").unwrap().to_string();
        assert!(filter.contains("wear_a_hat=debug"), "filter: {}", filter);
        assert!(filter.contains("reqwest=warn"), "filter: {}", filter);
        assert!(filter.contains("info"), "filter: {}", filter);
    }

    #[test]
    fn test_default_filter_rejects_bad_level() {
        assert!(default_filter("wear_a_hat=verbose").is_err());
    }
}
