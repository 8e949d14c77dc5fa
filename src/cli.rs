use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Field {
    Title,
    Metadata,
    Transcript,
}

#[derive(Parser)]
#[command(
    name = "ytq",
    about = "YouTube video metadata and transcript extractor",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Fields to include in the response
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [Field::Title, Field::Metadata, Field::Transcript],
    )]
    pub fields: Vec<Field>,

    /// Output format: json (default), text
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show lookup details on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
