use std::process::Command;

use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::tracks::CaptionTrackSet;

/// Typed view of the yt-dlp metadata record. Unknown fields are dropped at
/// this boundary; the caption maps keep the shape the fallback pipeline
/// selects from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subtitles: CaptionTrackSet,
    #[serde(default)]
    pub automatic_captions: CaptionTrackSet,
}

/// Extract video metadata via yt-dlp. Unlike transcript stages, failures here
/// are hard errors: without metadata no lookup stage can run.
pub fn fetch_metadata(url: &str) -> Result<VideoMetadata> {
    debug!("Extracting metadata via yt-dlp: {url}");

    let output = Command::new("yt-dlp")
        .args(["--dump-json", "--skip-download", "--no-playlist", "--no-warnings", url])
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!(
                "yt-dlp not found. Install it to enable metadata extraction:\n  \
                 pip install yt-dlp\n  \
                 or: brew install yt-dlp"
            );
        }
        Err(e) => bail!("failed to run yt-dlp: {e}"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("yt-dlp exited with status {}: {}", output.status, stderr.trim());
    }

    let metadata: VideoMetadata = serde_json::from_slice(&output.stdout)
        .map_err(|e| eyre::eyre!("could not parse yt-dlp metadata record: {e}"))?;

    debug!(
        "Metadata for {}: {} subtitle language(s), {} automatic caption language(s)",
        metadata.id,
        metadata.subtitles.len(),
        metadata.automatic_captions.len()
    );

    Ok(metadata)
}
