use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_router_status::config::Config;
use gcp_router_status::datasource::{
    get_all_data_source_keys, get_data_source, read_concurrent, ROUTER_STATUS,
    ROUTER_STATUS_BY_ID,
};
use gcp_router_status::gcp::auth::GcpCredentials;
use gcp_router_status::gcp::client::GcpClient;
use gcp_router_status::VERSION;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Read the status of GCP Cloud Routers
#[derive(Parser, Debug)]
#[command(name = "gcp-router-status", version, about, long_about = None)]
struct Args {
    /// Routers to read: names or self-links, or identifiers with --by-id
    #[arg(required = true)]
    routers: Vec<String>,

    /// Treat each router argument as a data source identifier
    #[arg(long)]
    by_id: bool,

    /// GCP project to use when a router does not name one
    #[arg(short, long)]
    project: Option<String>,

    /// GCP region to use when a router does not name one
    #[arg(short, long)]
    region: Option<String>,

    /// Compute API endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Maximum number of reads in flight
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Store --project/--region/--endpoint as defaults for later runs
    #[arg(long)]
    save_defaults: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-router-status {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcp-router-status").join("gcp-router-status.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcp-router-status").join("gcp-router-status.log");
    }
    PathBuf::from("gcp-router-status.log")
}

fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("Failed to render JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    // Persist CLI overrides before they are applied
    let mut config = Config::load();
    if args.save_defaults {
        if let Some(project) = &args.project {
            config.project_id = Some(project.clone());
        }
        if let Some(region) = &args.region {
            config.region = Some(region.clone());
        }
        if let Some(endpoint) = &args.endpoint {
            config.compute_endpoint = Some(endpoint.clone());
        }
        config.save().context("Failed to save configuration")?;
    }

    let provider = config.provider_config(args.project.as_deref(), args.region.as_deref());
    tracing::debug!("Provider defaults: {:?}", provider);

    let credentials = GcpCredentials::from_env().await.context(
        "Failed to initialize GCP authentication. Run 'gcloud auth application-default login'",
    )?;
    let mut client = GcpClient::new(credentials)?;
    if let Some(endpoint) = args.endpoint.as_ref().or(config.compute_endpoint.as_ref()) {
        client = client.with_compute_endpoint(endpoint)?;
    }
    tracing::debug!("Compute endpoint: {}", client.compute_endpoint());

    // Select data source
    let key = if args.by_id { ROUTER_STATUS_BY_ID } else { ROUTER_STATUS };
    let data_source = get_data_source(key).with_context(|| {
        format!(
            "Unknown data source: {} (known: {})",
            key,
            get_all_data_source_keys().join(", ")
        )
    })?;

    let records = args
        .routers
        .iter()
        .map(|router| {
            if args.by_id {
                data_source.import(router)
            } else {
                let mut config = serde_json::Map::new();
                config.insert("name".to_string(), Value::String(router.clone()));
                data_source.new_data(config)
            }
        })
        .collect();

    // Each router is an independent read; output keeps argument order
    let results = read_concurrent(data_source, records, &provider, &client, args.concurrency).await;

    let mut states = Vec::new();
    let mut failed = false;
    for (router, result) in args.routers.iter().zip(results) {
        match result {
            Ok(data) => states.push(data.to_json()),
            Err(err) => {
                failed = true;
                tracing::error!("Reading {} failed: {}", router, err);
                eprintln!("Error reading router {}: {}", router, err);
                if let Some(hint) = err.hint() {
                    eprintln!("  {}", hint);
                }
            },
        }
    }

    // A single router prints as an object, several as an array
    if !states.is_empty() {
        let output = if args.routers.len() == 1 {
            states.remove(0)
        } else {
            json!(states)
        };
        println!("{}", render(&output, args.output)?);
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
