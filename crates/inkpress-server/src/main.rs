use std::env;

use inkpress_server::{InkpressServer, build_app, build_state, config::load_config, observability};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From INKPRESS_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (inkpress.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (INKPRESS_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present; absence is not an error.
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: failed to load .env file: {e}");
    }

    let (config_path, source) = resolve_config_path();

    // A missing or invalid secret is fatal here, before anything binds.
    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    observability::init_tracing(&cfg.logging.level);
    tracing::info!(path = %config_path, source = %source, "configuration loaded");

    let addr = match cfg.addr() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let state = build_state(&cfg);
    let app = build_app(state);

    if let Err(err) = InkpressServer::new(addr, app).run().await {
        eprintln!("Server error: {err}");
        std::process::exit(1);
    }
}

/// Resolves the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: INKPRESS_CONFIG
/// 3. Default: inkpress.toml
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config"
            && let Some(path) = args.next()
        {
            return (path, ConfigSource::CliArgument);
        }
    }

    if let Ok(path) = env::var("INKPRESS_CONFIG") {
        return (path, ConfigSource::EnvironmentVariable);
    }

    ("inkpress.toml".to_string(), ConfigSource::Default)
}
