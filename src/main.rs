//! Orgo connector CLI.
//!
//! # Commands
//!
//! - `orgo serve` - Activate the trigger and receive deliveries until Ctrl-C
//! - `orgo activate` / `orgo deactivate` - Create or delete the subscription
//! - `orgo status` - Show the stored pointer and whether it still exists
//! - `orgo subscriptions <list|get|update|test|delete>` - Administration
//! - `orgo whoami` - Check the API token
//! - `orgo sign <file>` - Compute the signature the platform would send

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use orgo::{build_trigger, http_client, open_store};
use orgo_config::{ENV_PREFIX, EnvLoader, OrgoConfig, load_dotenv};
use orgo_http_client::RestClient;
use orgo_webhooks::server::{self, IngressState};
use orgo_webhooks::{
    ChannelSink, LifecycleState, SignatureScheme, SubscriptionApi, SubscriptionId,
    SubscriptionPatch, WebhookSignature, parse_events,
};
use serde_json::{Value, json};
use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Orgo webhook trigger connector
#[derive(Parser)]
#[command(name = "orgo")]
#[command(version)]
#[command(about = "Orgo webhook trigger: subscription lifecycle and event ingress")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Load this .env file instead of ./.env
    #[arg(long, global = true, env = "ORGO_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, env = "ORGO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Activate the trigger and print each delivery as a JSON line
    Serve(ServeArgs),

    /// Make sure the subscription exists
    Activate(SchemeArgs),

    /// Delete the subscription
    Deactivate,

    /// Show the subscription pointer and check it remotely
    Status,

    /// Manage webhook subscriptions directly
    #[command(subcommand)]
    Subscriptions(SubscriptionCommand),

    /// Show the account the API token belongs to
    Whoami,

    /// Sign a payload the way the platform does
    Sign(SignArgs),
}

#[derive(Args)]
struct SchemeArgs {
    /// Signature algorithm shared with the platform
    #[arg(long, env = "ORGO_SIGNATURE_SCHEME", value_enum, default_value_t = SchemeArg::Rolling)]
    signature_scheme: SchemeArg,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    scheme: SchemeArgs,

    /// Leave the subscription in place on shutdown
    #[arg(long)]
    keep_subscription: bool,

    /// Envelopes buffered before deliveries wait on stdout
    #[arg(long, default_value_t = 64)]
    buffer: usize,
}

#[derive(Subcommand)]
enum SubscriptionCommand {
    /// List subscriptions
    List {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one subscription
    Get { id: String },

    /// Change selected fields of a subscription
    Update {
        id: String,

        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        url: Option<String>,

        /// Comma-separated event types
        #[arg(long, value_delimiter = ',')]
        events: Vec<String>,

        #[arg(long)]
        max_retries: Option<u8>,

        #[arg(long)]
        timeout_seconds: Option<u16>,
    },

    /// Ask the platform for a test delivery
    Test { id: String },

    /// Delete a subscription
    Delete { id: String },
}

#[derive(Args)]
struct SignArgs {
    /// Payload file, or `-` for stdin
    file: PathBuf,

    #[arg(long, env = "ORGO_WEBHOOK_SECRET", hide_env_values = true)]
    secret: String,

    #[arg(long, value_enum, default_value_t = SchemeArg::Rolling)]
    scheme: SchemeArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Rolling,
    Hmac,
}

impl From<SchemeArg> for SignatureScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Rolling => SignatureScheme::RollingHash,
            SchemeArg::Hmac => SignatureScheme::HmacSha256,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `env` fallbacks can come from the env files.
    // Variables already set win; the explicit file is loaded before ./.env.
    if let Some(path) = env_file_arg(std::env::args_os().skip(1))
        .or_else(|| std::env::var_os("ORGO_ENV_FILE").map(PathBuf::from))
    {
        load_dotenv(Some(&path)).with_context(|| format!("loading {}", path.display()))?;
    }
    load_dotenv(None)?;
    let cli = Cli::parse();
    init_tracing(cli.log_format);
    if let Some(path) = &cli.env_file {
        debug!(path = %path.display(), "Loaded env file");
    }

    if let Commands::Sign(args) = &cli.command {
        return sign(args);
    }

    let config = OrgoConfig::from_loader(&EnvLoader::new(Some(ENV_PREFIX.to_string())))
        .context("loading configuration")?;

    match cli.command {
        Commands::Serve(args) => serve(config, args).await,
        Commands::Activate(args) => activate(config, args).await,
        Commands::Deactivate => deactivate(config).await,
        Commands::Status => status(config).await,
        Commands::Subscriptions(command) => subscriptions(config, command).await,
        Commands::Whoami => {
            let api = SubscriptionApi::new(Arc::new(http_client(&config)?));
            print_json(&api.whoami().await?)
        }
        Commands::Sign(_) => Ok(()),
    }
}

/// Find `--env-file <path>` or `--env-file=<path>` ahead of clap.
fn env_file_arg(args: impl IntoIterator<Item = OsString>) -> Option<PathBuf> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--env-file" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.to_str().and_then(|a| a.strip_prefix("--env-file=")) {
            return Some(PathBuf::from(path));
        }
        if arg == "--" {
            break;
        }
    }
    None
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output; logs go to stderr.
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn client(config: &OrgoConfig) -> anyhow::Result<Arc<dyn RestClient>> {
    Ok(Arc::new(http_client(config)?))
}

async fn serve(config: OrgoConfig, args: ServeArgs) -> anyhow::Result<()> {
    let trigger = build_trigger(
        &config,
        client(&config)?,
        open_store(&config)?,
        args.scheme.signature_scheme.into(),
    )?;
    let id = trigger.activate().await.context("activating trigger")?;

    let (sink, mut rx) = ChannelSink::new(args.buffer.max(1));
    let tenant_id = config.credentials.tenant_id;
    let printer = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let delivered = envelope.tenant_id.as_ref().and_then(Value::as_u64);
            if let (Some(expected), Some(delivered)) = (tenant_id, delivered)
                && expected != delivered
            {
                warn!(expected, delivered, event_id = %envelope.event_id(), "Delivery for another tenant");
            }
            match serde_json::to_string(&envelope) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!(error = %e, "Failed to serialize envelope"),
            }
        }
    });

    let listener = TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    let app = server::router(
        &config.server.path,
        IngressState::new(trigger.receiver(), Arc::new(sink)),
    );
    info!(
        subscription_id = %id,
        target_url = %trigger.target_url(),
        path = %config.server.path,
        "Receiving deliveries"
    );

    server::serve(listener, app, shutdown_signal()).await?;
    printer.await?;

    if args.keep_subscription {
        info!(subscription_id = %id, "Keeping subscription");
    } else if !trigger.deactivate().await {
        bail!("failed to delete subscription {}", id);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn activate(config: OrgoConfig, args: SchemeArgs) -> anyhow::Result<()> {
    let trigger = build_trigger(
        &config,
        client(&config)?,
        open_store(&config)?,
        args.signature_scheme.into(),
    )?;
    let id = trigger.activate().await?;
    print_json(&json!({ "subscription_id": id, "url": trigger.target_url() }))
}

async fn deactivate(config: OrgoConfig) -> anyhow::Result<()> {
    let manager = orgo_webhooks::SubscriptionManager::new(client(&config)?, open_store(&config)?);
    let previous = manager.subscription_id();
    if !manager.deactivate().await {
        bail!("failed to delete subscription; pointer kept");
    }
    print_json(&json!({ "deleted": previous }))
}

async fn status(config: OrgoConfig) -> anyhow::Result<()> {
    let manager = orgo_webhooks::SubscriptionManager::new(client(&config)?, open_store(&config)?);
    let stored = match manager.state() {
        LifecycleState::Registered(id) => Some(id),
        LifecycleState::Unregistered => None,
    };
    let exists = manager.check_exists().await;

    print_json(&json!({
        "workflow_id": config.trigger.workflow_id,
        "subscription_id": stored,
        "exists": exists,
        "state": if manager.state().is_registered() { "registered" } else { "unregistered" },
    }))
}

async fn subscriptions(config: OrgoConfig, command: SubscriptionCommand) -> anyhow::Result<()> {
    let api = SubscriptionApi::new(client(&config)?);

    match command {
        SubscriptionCommand::List { limit } => print_json(&api.list(limit).await?),
        SubscriptionCommand::Get { id } => print_json(&api.get(&SubscriptionId::from(id.as_str())).await?),
        SubscriptionCommand::Update {
            id,
            active,
            url,
            events,
            max_retries,
            timeout_seconds,
        } => {
            let patch = SubscriptionPatch {
                is_active: active,
                url,
                event_types: if events.is_empty() {
                    None
                } else {
                    Some(parse_events(events.as_slice())?)
                },
                max_retries,
                timeout_seconds,
                ..SubscriptionPatch::default()
            };
            print_json(&api.update(&SubscriptionId::from(id.as_str()), &patch).await?)
        }
        SubscriptionCommand::Test { id } => {
            print_json(&api.test(&SubscriptionId::from(id.as_str())).await?)
        }
        SubscriptionCommand::Delete { id } => {
            let id = SubscriptionId::from(id.as_str());
            api.delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn sign(args: &SignArgs) -> anyhow::Result<()> {
    let payload = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("reading {}", args.file.display()))?
    };

    let signature = WebhookSignature::new(args.secret.as_str())
        .with_scheme(args.scheme.into())
        .sign(&payload);
    println!("{}", signature);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
