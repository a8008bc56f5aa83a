//! render_request — print the HTTP request a batch plan turns into
//!
//! Usage:
//!   render_request <plan-file> [--base-url <url>]

use anyhow::Context;
use es_request_kit::plan::BatchPlan;
use es_request_kit::{ClientConfig, Fireable};
use std::io::Write;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || matches!(args[1].as_str(), "help" | "--help" | "-h") {
        print_usage();
        std::process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    if let Err(e) = run(&args[1..]) {
        eprintln!("render_request: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"render_request — print the HTTP request a batch plan turns into

USAGE:
    render_request <plan-file> [--base-url <url>]

ENVIRONMENT:
    SEARCH_BASE_URL             Base URL used when --base-url is not given
    RUST_LOG                    Log filter (e.g. es_request_kit=debug)"#
    );
}

/// Command-line arguments; `--base-url` may appear before or after the plan file.
#[derive(Debug, PartialEq, Eq)]
struct CliArgs<'a> {
    plan_path: &'a str,
    base_url: Option<&'a str>,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs<'_>> {
    let mut plan_path = None;
    let mut base_url = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-url" => {
                let raw = iter.next().context("--base-url needs a value")?;
                base_url = Some(raw.as_str());
            }
            other if plan_path.is_none() => plan_path = Some(other),
            other => anyhow::bail!("unexpected argument '{}'", other),
        }
    }
    Ok(CliArgs {
        plan_path: plan_path.context("missing <plan-file>")?,
        base_url,
    })
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let CliArgs {
        plan_path,
        base_url,
    } = parse_args(args)?;
    let config = match base_url {
        Some(raw) => ClientConfig::new(ClientConfig::parse_base_url(raw)?),
        None => ClientConfig::from_env()?,
    };

    let request = BatchPlan::from_path(plan_path)?
        .into_request()
        .with_context(|| format!("building request from {}", plan_path))?;
    let http = request.to_http_request()?;
    let url = http.url(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{} {}", http.method, url)?;
    out.write_all(&http.body)?;
    out.flush()?;
    Ok(())
}
