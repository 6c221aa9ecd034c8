//! Jikan CLI - Command-line interface for the Jikan API client

use clap::{Parser, Subcommand};
use jikan::{ApiRequest, Client, ParamValue, PathSegment, Reply, Response, BASE_URL_ENV};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Jikan - query the Jikan anime/manga metadata API
#[derive(Parser, Debug)]
#[command(name = "jikan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the API
    #[arg(long, global = true, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Statuses at or above this value are failures
    #[arg(long, global = true)]
    threshold: Option<u16>,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// GET a path such as `anime 1 episodes` and print the response as JSON
    Get {
        /// Path segments; all-digit segments are sent as numeric ids
        #[arg(required = true)]
        segments: Vec<String>,

        /// Query parameter as key=value (repeatable)
        #[arg(long = "param", short = 'p', value_parser = parse_key_value::<'='>)]
        params: Vec<(String, String)>,

        /// Request header as name:value (repeatable)
        #[arg(long = "header", short = 'H', value_parser = parse_key_value::<':'>)]
        headers: Vec<(String, String)>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Raise failures as errors instead of printing the failure response
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = Client::builder();
    if let Some(base_url) = cli.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(threshold) = cli.threshold {
        builder = builder.failure_threshold(threshold);
    }
    if let Some(ua) = cli.user_agent {
        builder = builder.user_agent(ua);
    }

    let client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Get {
            segments,
            params,
            headers,
            timeout,
            strict,
        } => {
            let mut request = ApiRequest::new(segments.into_iter().map(segment_from_arg))
                .params(params.into_iter().map(|(k, v)| (k, param_from_arg(v))));
            for (name, value) in headers {
                request = request.header(name, value);
            }
            if let Some(secs) = timeout {
                request = request.timeout(Duration::from_secs(secs));
            }

            run_get(&client, &request, strict).await;
        }
    }
}

async fn run_get(client: &Client, request: &ApiRequest, strict: bool) {
    if strict {
        match client.send_or_error(request).await {
            Ok(response) => print_response(&response),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match client.send(request).await {
        Ok(Reply::Success(response)) => print_response(&response),
        Ok(Reply::Failure(failure)) => {
            print_response(&failure.response);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_response(response: &Response) {
    let json = serde_json::to_string_pretty(response).unwrap_or_else(|e| {
        eprintln!("Error serializing response: {}", e);
        std::process::exit(1);
    });
    writeln_safe(&json);
}

/// Canonical decimal arguments become numeric segments
///
/// Anything that would not print back identically (`007`, `+1`) stays text.
fn segment_from_arg(arg: String) -> PathSegment {
    match arg.parse::<u64>() {
        Ok(n) if n.to_string() == arg => PathSegment::Numeric(n),
        _ => PathSegment::Text(arg),
    }
}

/// Canonical integer values become integer parameters
fn param_from_arg(arg: String) -> ParamValue {
    match arg.parse::<i64>() {
        Ok(n) if n.to_string() == arg => ParamValue::Integer(n),
        _ => ParamValue::Text(arg),
    }
}

/// Parse `key<SEP>value`
fn parse_key_value<const SEP: char>(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(SEP) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY{}VALUE, got `{}`", SEP, raw)),
    }
}

/// Write to stdout, ignoring broken pipe errors
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", s);
}
