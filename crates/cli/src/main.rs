// ABOUTME: CLI for fetching raw HTML with the ensi content fetcher.
// ABOUTME: Fetches each file:// reference or URL and prints the content; failures are logged to stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ensi_fetcher::{ContentFetcher, DEFAULT_TIMEOUT};
use reqwest::header::{HeaderName, HeaderValue};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Fetch raw HTML from URLs or local files.
#[derive(Parser, Debug)]
#[command(name = "ensi-fetch")]
#[command(about = "Fetch raw HTML from http(s) URLs or file:// references", long_about = None)]
struct Args {
    /// Locations to fetch: http(s) URLs or file://<path> (relative paths resolve against the CWD).
    #[arg(required = true)]
    locations: Vec<String>,

    /// Write fetched content to this file instead of stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Override the User-Agent header.
    #[arg(long = "user-agent")]
    user_agent: Option<String>,

    /// Extra request header as "Name: value"; replaces a default header of the same name.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("expected \"Name: value\", got {:?}", raw))?;
    let name = name.trim();
    let value = value.trim();
    HeaderName::from_bytes(name.as_bytes())
        .with_context(|| format!("invalid header name {:?}", name))?;
    HeaderValue::from_str(value).with_context(|| format!("invalid value for header {}", name))?;
    Ok((name.to_string(), value.to_string()))
}

fn build_fetcher(args: &Args) -> Result<ContentFetcher> {
    let mut builder = ContentFetcher::builder().timeout(Duration::from_secs(args.timeout));
    if let Some(ua) = &args.user_agent {
        builder = builder.user_agent(ua);
    }
    for (name, value) in &args.headers {
        builder = builder.header(name, value);
    }
    builder.build().context("building fetcher")
}

fn run(args: &Args) -> Result<bool> {
    let fetcher = build_fetcher(args)?;

    let mut contents = Vec::new();
    let mut had_error = false;
    for location in &args.locations {
        match fetcher.fetch(location) {
            Some(content) => {
                debug!("fetched {} ({} bytes)", location, content.len());
                contents.push(content);
            }
            None => had_error = true,
        }
    }

    if !contents.is_empty() {
        let output = contents.join("\n\n");
        match &args.output {
            Some(path) => fs::write(path, &output)
                .with_context(|| format!("writing {}", path.display()))?,
            None => println!("{}", output),
        }
    }

    Ok(!had_error)
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
