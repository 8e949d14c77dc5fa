use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::Command;

use clap::ValueEnum;
use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, Field, OutputFormat};
use ytq::output::QueryResult;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytq.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytq")
        .join("logs")
}

fn tool_version(name: &str) -> Option<String> {
    Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn build_after_help() -> String {
    let yt_dlp = tool_version("yt-dlp");

    let yt_dlp_line = match &yt_dlp {
        Some(v) => format!("  \x1b[32m✅\x1b[0m yt-dlp     {v}"),
        None => "  \x1b[31m❌\x1b[0m yt-dlp     (not found — needed for metadata extraction)".to_string(),
    };

    let log_path = log_dir().join("ytq.log");

    format!(
        "\nREQUIRED TOOLS:\n{yt_dlp_line}\n\nLogs are written to: {}",
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytq::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config defaults
    let lang = cli
        .lang
        .clone()
        .or_else(|| config.default_lang.clone())
        .unwrap_or_else(|| "en".to_string());
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|s| OutputFormat::from_str(s, true).ok())
        })
        .unwrap_or(OutputFormat::Json);

    if cli.verbose {
        let config_path = ytq::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        debug!("Requested lang: {lang}");
    }

    let client = reqwest::Client::new();

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.is_empty() {
        bail!("no URL or video ID provided\n\nUsage: ytq <URL>\n       echo <URL> | ytq");
    }

    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }

        let video_id = ytq::extract_video_id(url_input)
            .ok_or_else(|| eyre::eyre!("could not extract video ID from: {url_input}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"))?;

        // Metadata failures are the one hard error: every lookup stage needs it
        let metadata = ytq::metadata::fetch_metadata(&ytq::watch_url(&video_id))?;

        let mut result = QueryResult::default();

        if cli.fields.contains(&Field::Title) {
            result.title = Some(metadata.title.clone());
        }

        if cli.fields.contains(&Field::Transcript) {
            result.transcript_requested = true;
            result.transcript = ytq::transcript::get_transcript(&client, &metadata, &lang).await;
        }

        if cli.verbose {
            match result.transcript {
                Some(ref t) => eprintln!(
                    "Video: {} ({})\nSource: {}\nLanguage: {lang}\nSegments: {}",
                    metadata.title,
                    metadata.id,
                    t.source,
                    t.segments.len(),
                ),
                None if result.transcript_requested => {
                    eprintln!("No transcript available for {} in {lang}", metadata.id);
                }
                None => {}
            }
        }

        if cli.fields.contains(&Field::Metadata) {
            result.metadata = Some(metadata);
        }

        let rendered = match format {
            OutputFormat::Json => ytq::output::render_json(&result)?,
            OutputFormat::Text => ytq::output::render_text(&result),
        };

        if let Some(ref path) = cli.output {
            std::fs::write(path, &rendered)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }
    }

    Ok(())
}
