use anyhow::Context;
use gpu_portal::{
    api::routes::build_app,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    utils::toml_config::{LogFormat, PortalConfig, PortalConfigManager},
    AppState,
};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                host,
                port,
            };
            match init::run(config, &output) {
                InitResult::Success => Ok(()),
                InitResult::AlreadyExists => std::process::exit(1),
                InitResult::Error(e) => {
                    output.error(&e);
                    std::process::exit(1)
                }
            }
        }
        Some(Commands::Config { full, validate }) => {
            show_config(&cli.config, full, validate, &output);
            Ok(())
        }
        None => serve(&cli.config, cli.verbose, &output).await,
    }
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) {
    let config = match PortalConfig::parse_file(path) {
        Ok(config) => config,
        Err(e) => {
            output.error(&e.to_string());
            output.hint("Run `gpu-portal init` to create a configuration");
            std::process::exit(1);
        }
    };

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("bind", &config.bind_addr());
    output.kv("log level", &config.server.log_level);
    output.kv(
        "log format",
        match config.server.log_format {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        },
    );
    output.kv("jwt secret env", &config.auth.jwt_secret_env);
    output.kv("token expiry", &format!("{}s", config.auth.jwt_access_expiry));
    output.kv("ui dist", &config.ui.dist_dir.display().to_string());

    if full {
        let origins = if config.server.cors_origins.is_empty() {
            "any".to_string()
        } else {
            config.server.cors_origins.join(", ")
        };
        output.kv("cors origins", &origins);

        output.subheader("Simulated latency");
        let mock = &config.mock;
        output.table_header(&["Operation", "Milliseconds"]);
        for (name, millis) in [
            ("auth", mock.auth),
            ("notifications", mock.notifications),
            ("page_load", mock.page_load),
            ("request_form", mock.request_form),
            ("submit_request", mock.submit_request),
            ("profile_save", mock.profile_save),
        ] {
            output.table_row(&[name, &millis.to_string()]);
        }
    }

    if validate {
        output.newline();
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                std::process::exit(1);
            }
        }
    }
}

async fn serve(path: &Path, verbose: bool, output: &Output) -> anyhow::Result<()> {
    let mut config_manager = match PortalConfigManager::new(path) {
        Ok(manager) => manager,
        Err(e) => {
            output.error(&format!("Failed to load {}: {}", path.display(), e));
            output.hint("Run `gpu-portal init` to create a configuration");
            std::process::exit(1);
        }
    };

    let config = config_manager.config();
    init_tracing(&config.server.log_level, config.server.log_format, verbose);

    output.banner();

    if let Err(e) = config_manager.start_watching() {
        warn!("Config hot-reload disabled: {}", e);
    }

    let state = AppState::from_config(config_manager).context("failed to build application state")?;
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    output.success(&format!("Listening on http://{}", addr));
    info!(%addr, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(log_level: &str, format: LogFormat, verbose: bool) {
    let default_filter = if verbose { "debug" } else { log_level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
