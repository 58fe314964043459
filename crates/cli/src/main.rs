mod config_commands;
mod xmpp_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    boxpanel_actions::{ActionRunner, CliActionRunner},
    boxpanel_config::BoxpanelConfig,
    boxpanel_services::ServiceRegistry,
    boxpanel_web::PluginRegistry,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "boxpanel", about = "boxpanel, web administration for a self-hosted box", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true, env = "BOXPANEL_BIND")]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true, env = "BOXPANEL_PORT")]
    port: Option<u16>,
    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "BOXPANEL_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the panel (default when no subcommand is provided).
    Serve,
    /// XMPP server administration.
    Xmpp {
        #[command(subcommand)]
        action: xmpp_commands::XmppAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
    /// List the services announced by the installed apps.
    Services {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load the explicit config file, or discover one. An explicit file that
/// fails to load is an error; a discovered one falls back to defaults.
fn load_config(cli: &Cli) -> anyhow::Result<BoxpanelConfig> {
    let mut config = match cli.config {
        Some(ref path) => boxpanel_config::load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => boxpanel_config::discover_and_load(),
    };

    if let Some(ref bind) = cli.bind {
        config.server.bind.clone_from(bind);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

/// Page plugins enabled by `config`.
fn plugin_registry(config: &BoxpanelConfig) -> PluginRegistry {
    let mut plugins = PluginRegistry::new();
    if config.xmpp.enabled {
        plugins.extend(boxpanel_xmpp::plugins());
    } else {
        info!("xmpp app disabled in config");
    }
    plugins
}

async fn serve(config: BoxpanelConfig) -> anyhow::Result<()> {
    if !config.actions.dir.is_dir() {
        warn!(dir = %config.actions.dir.display(), "actions directory not found");
    }

    let runner: Arc<dyn ActionRunner> = Arc::new(CliActionRunner::from_config(&config.actions));
    let plugins = plugin_registry(&config);
    if plugins.is_empty() {
        warn!("no apps enabled, the panel will only serve its index");
    }

    let server = config.server.clone();
    let app = boxpanel_web::build_app(config, runner, &plugins);
    boxpanel_web::serve(&server, app).await
}

fn list_services(config: &BoxpanelConfig, json: bool) -> anyhow::Result<()> {
    let services = ServiceRegistry::new();
    plugin_registry(config).register_services(&services);

    if json {
        println!("{}", serde_json::to_string_pretty(&services.list())?);
        return Ok(());
    }

    if services.is_empty() {
        println!("No services registered.");
        return Ok(());
    }
    for service in services.list() {
        let scope = if service.is_external {
            "external"
        } else {
            "internal"
        };
        let state = if service.enabled {
            "enabled"
        } else {
            "disabled"
        };
        println!(
            "  {:<14} {:<9} {:<9} {}",
            service.id, scope, state, service.description
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "boxpanel starting");

    match cli.command.take() {
        None | Some(Commands::Serve) => serve(load_config(&cli)?).await,
        Some(Commands::Xmpp { action }) => {
            let config = load_config(&cli)?;
            xmpp_commands::handle_xmpp(action, &config).await
        },
        Some(Commands::Config { action }) => config_commands::handle_config(action, cli.config),
        Some(Commands::Services { json }) => list_services(&load_config(&cli)?, json),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["boxpanel", "--bind", "0.0.0.0", "--port", "9000", "serve"])
            .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let cli = Cli::try_parse_from(["boxpanel", "--config", missing.to_str().unwrap()]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn xmpp_register_reads_password_flag() {
        let cli =
            Cli::try_parse_from(["boxpanel", "xmpp", "register", "alice", "--password", "pw"])
                .unwrap();
        match cli.command {
            Some(Commands::Xmpp {
                action: xmpp_commands::XmppAction::Register { username, password },
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(password, "pw");
            },
            _ => panic!("expected xmpp register"),
        }
    }

    #[test]
    fn disabled_xmpp_mounts_nothing() {
        let mut config = BoxpanelConfig::default();
        assert_eq!(plugin_registry(&config).names().len(), 3);
        config.xmpp.enabled = false;
        assert!(plugin_registry(&config).is_empty());
    }
}
