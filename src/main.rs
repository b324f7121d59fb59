use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use nexus_terminal::config::Config;
use nexus_terminal::desk::Desk;
use nexus_terminal::llm::GeminiClient;
use nexus_terminal::parser;
use nexus_terminal::report::{render_dashboard, render_setup};

const USAGE: &str = "usage: nexus-terminal <analyze IMAGE | chat | sentiment | parse [FILE]>";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or_default();

    match command {
        "parse" => parse_saved(args.get(2)).await,
        "analyze" => {
            let path = args.get(2).context(USAGE)?;
            analyze(&cfg, Path::new(path)).await
        }
        "chat" => chat(&cfg).await,
        "sentiment" => sentiment(&cfg).await,
        _ => bail!(USAGE),
    }
}

fn new_desk(cfg: &Config) -> Result<Desk> {
    let client = GeminiClient::new(cfg).context("Failed to build model client")?;
    Ok(Desk::new(cfg, Box::new(client)))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Offline extraction of a saved reply, from a file or stdin.
async fn parse_saved(path: Option<&String>) -> Result<()> {
    let raw = match path {
        Some(p) => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("Failed to read {}", p))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let parsed = parser::extract(&raw);
    if let Some(body) = parser::trade_setup_body(&raw) {
        if let Err(e) = parser::decode_trade_setup(body) {
            info!("No trade setup: {}", e);
        }
    }
    print!("{}", render_dashboard(&parsed));
    Ok(())
}

async fn analyze(cfg: &Config, path: &Path) -> Result<()> {
    let image = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read chart {}", path.display()))?;

    let mut desk = new_desk(cfg)?;
    let parsed = desk.analyze_chart(&image, mime_for(path), None).await;
    print!("{}", render_dashboard(&parsed));
    Ok(())
}

async fn chat(cfg: &Config) -> Result<()> {
    let mut desk = new_desk(cfg)?;
    println!("NEXUS ADVISOR CORE. Type a message, /setup for a trade setup, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/setup" => {
                let id = format!("SETUP-{}", Utc::now().timestamp_millis());
                match desk.generate_setup(&id, None).await {
                    Ok(setup) => {
                        let mut card = String::new();
                        render_setup(&mut card, &setup)?;
                        print!("{}", card);
                    }
                    Err(_) => println!("{}", nexus_terminal::desk::SETUP_FAILURE),
                }
            }
            message => match desk.chat(message).await {
                Ok(parsed) => print!("{}", render_dashboard(&parsed)),
                Err(e) => println!("ADVISORY NODE OFFLINE: {}", e),
            },
        }
    }
    Ok(())
}

async fn sentiment(cfg: &Config) -> Result<()> {
    let mut desk = new_desk(cfg)?;
    let report = desk.market_sentiment().await?;

    println!("{}", report.text);
    if !report.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &report.sources {
            println!("  {} <{}>", source.title, source.uri);
        }
    }
    Ok(())
}
