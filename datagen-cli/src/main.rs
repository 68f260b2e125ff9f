// ABOUTME: Command-line front end for the datagen client.
// ABOUTME: `datagen exec <tool>` runs one tool and prints the result as JSON.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use datagen::prelude::*;

#[derive(Parser)]
#[command(name = "datagen")]
#[command(about = "Execute tools on a Datagen gateway", long_about = None)]
#[command(version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "DATAGEN_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// API key (defaults to DATAGEN_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a tool and print its result
    Exec {
        /// Tool alias name, e.g. mcp_Linear_list_projects
        tool: String,
        /// Parameters as a JSON object
        #[arg(long)]
        params: Option<String>,
        /// Single parameter as key=value; value is parsed as JSON when possible
        #[arg(short = 'p', long = "param", value_parser = parse_pair)]
        pairs: Vec<(String, Value)>,
        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: f64,
        /// Retries after the first attempt for transient failures
        #[arg(long, default_value = "0")]
        retries: u32,
        /// Backoff base in seconds
        #[arg(long, default_value = "0.5")]
        backoff: f64,
    },
}

fn parse_pair(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn build_parameters(
    params: Option<&str>,
    pairs: Vec<(String, Value)>,
) -> Result<Map<String, Value>> {
    let mut map = match params {
        Some(raw) => {
            let value: Value = serde_json::from_str(raw).context("--params is not valid JSON")?;
            match value {
                Value::Object(map) => map,
                other => bail!("--params must be a JSON object, got {}", other),
            }
        }
        None => Map::new(),
    };
    map.extend(pairs);
    Ok(map)
}

fn seconds(value: f64, flag: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("invalid --{} value: {}", flag, value))
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Exec {
            tool,
            params,
            pairs,
            timeout,
            retries,
            backoff,
        } => {
            let mut builder = ClientConfig::builder()
                .base_url(cli.base_url)
                .timeout(seconds(timeout, "timeout")?)
                .max_retries(retries)
                .backoff_base(seconds(backoff, "backoff")?);
            if let Some(key) = cli.api_key {
                builder = builder.api_key(key);
            }

            let client = DatagenClient::with_config(builder.build()?)?;
            let parameters = build_parameters(params.as_deref(), pairs)?;
            let request = ToolRequest::new(tool).parameters(parameters);
            let result = client.execute_request(&request).await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
