//! `httpclient [GET|POST] URL` over raw TCP sockets.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use sockhttp_core::{ClientConfig, HttpClient, HttpMethod, Params, RequestArgs};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "httpclient [GET/POST] [URL]";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, override_usage = USAGE)]
struct Args {
    /// Either `URL`, or `METHOD URL`
    #[arg(num_args = 0..=2, value_name = "ARGS")]
    positional: Vec<String>,

    /// Pre-encoded `k1=v1&k2=v2` string sent as query (GET) or body (POST)
    #[arg(short, long, conflicts_with = "field")]
    data: Option<String>,

    /// `key=value` pair to percent-encode, repeatable
    #[arg(short = 'F', long = "field", value_parser = parse_field)]
    field: Vec<(String, String)>,

    /// Connect, read and write timeout in seconds
    #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Print the parsed response as JSON
    #[arg(long)]
    json: bool,

    /// Log each stage of the exchange to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

impl Args {
    fn method_and_url(&self) -> anyhow::Result<(HttpMethod, &str)> {
        match self.positional.as_slice() {
            [url] => Ok((HttpMethod::Get, url.as_str())),
            [method, url] => Ok((method.parse::<HttpMethod>()?, url.as_str())),
            _ => bail!("expected URL or METHOD URL"),
        }
    }

    fn request_args(&self) -> RequestArgs {
        if let Some(data) = &self.data {
            RequestArgs::Query(data.clone())
        } else if !self.field.is_empty() {
            RequestArgs::Form(self.field.iter().cloned().collect::<Params>())
        } else {
            RequestArgs::None
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let (method, url) = args.method_and_url()?;
    let config = ClientConfig::default().with_timeout(Duration::from_secs(args.timeout));
    let client = HttpClient::with_config(config);
    tracing::debug!(%method, url, timeout_secs = args.timeout, "sending request");

    let response = client
        .command(url, method, args.request_args())
        .with_context(|| format!("{method} {url}"))?;

    if args.json {
        let json = serde_json::to_string_pretty(&response)?;
        println!("{json}");
    } else {
        println!("{response}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.positional.is_empty() {
        println!("{USAGE}\n");
        return ExitCode::FAILURE;
    }

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
