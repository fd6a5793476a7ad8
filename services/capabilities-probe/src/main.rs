//! Capabilities probe.
//!
//! Resolves the layers advertised by an OGC service, or the option list of
//! a catalogue search field, and prints the result as JSON on stdout.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use csw_metadata::{create_domain_cache, CatalogueConfig, MetadataFieldHandler};
use ows_common::ServiceConnectInfo;
use ows_protocol::{FetchConfig, HttpFetcher, ProtocolRegistry};

#[derive(Parser, Debug)]
#[command(name = "capabilities-probe")]
#[command(about = "Query OGC capabilities and catalogue domains")]
struct Args {
    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the layers of a service
    Layers {
        /// Protocol identifier (wmslayer, wfslayer, wmtslayer, csw)
        #[arg(short, long)]
        protocol: String,

        /// Service endpoint
        #[arg(short, long)]
        url: String,

        /// Protocol version (default: the protocol's default)
        #[arg(long)]
        version: Option<String>,

        #[arg(long, env = "OWS_USER")]
        user: Option<String>,

        #[arg(long, env = "OWS_PASS", hide_env_values = true)]
        pass: Option<String>,
    },

    /// List the legal values of a catalogue search field
    Domain {
        /// Catalogue configuration file
        #[arg(short, long, env = "CSW_CONFIG", default_value = "config/catalogue.yaml")]
        config: PathBuf,

        /// Field name as configured
        #[arg(short, long)]
        field: String,

        #[arg(long, default_value = "en")]
        language: String,

        /// Replace spaces in values with this string
        #[arg(long)]
        space_char: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let fetcher = Arc::new(HttpFetcher::new(FetchConfig::from_env())?);

    let output = match args.command {
        Command::Layers {
            protocol,
            url,
            version,
            user,
            pass,
        } => {
            let mut src = ServiceConnectInfo::new(url);
            if let Some(version) = version {
                src = src.with_version(version);
            }
            if let Some(user) = user {
                src = src.with_credentials(user, pass.unwrap_or_default());
            }

            let registry = ProtocolRegistry::with_defaults();
            let layers = registry
                .get_layers_from_service(&protocol, fetcher.as_ref(), &src)
                .await
                .with_context(|| format!("Failed to read capabilities from {}", src.url))?;
            info!(protocol = %protocol, layers = layers.len(), "Capabilities resolved");
            // stable key order for output
            let layers: BTreeMap<_, _> = layers.into_iter().collect();
            serde_json::to_string_pretty(&layers)?
        }
        Command::Domain {
            config,
            field,
            language,
            space_char,
        } => {
            let config = CatalogueConfig::from_file(&config)?;
            let field = config
                .field(&field)
                .cloned()
                .ok_or_else(|| anyhow!("Field '{}' is not configured", field))?;
            let cache = create_domain_cache(config.cache_ttl_secs);
            let handler = MetadataFieldHandler::from_config(field, &config, fetcher, cache);

            let options = match space_char.or_else(|| handler.field().space_char.clone()) {
                Some(space_char) => {
                    handler
                        .get_options_with_space_char(&language, &space_char)
                        .await
                }
                None => handler.get_options(&language).await,
            };
            info!(field = %handler.field().name, options = options.len(), "Domain resolved");
            serde_json::to_string_pretty(&options)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
