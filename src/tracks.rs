use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

/// One fetchable rendition of a caption track in one encoding.
/// Field names follow the yt-dlp metadata record it is deserialized from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionFormatEntry {
    pub ext: String,
    pub url: String,
}

/// Per-language caption renditions, keyed by language code
pub type CaptionTrackSet = HashMap<String, Vec<CaptionFormatEntry>>;

/// Encodings tried first, in order, within a matching track
const PREFERRED_FORMATS: &[&str] = &["vtt", "json3", "srv1"];

/// Pick a caption entry for `lang` from the given track sets.
///
/// Sets are tried in the order given (direct subtitles before automatic
/// captions). The first set that lists `lang` with at least one entry wins;
/// within it the entry is chosen by format preference, falling back to the
/// first listed entry when no preferred format is present. No scoring across
/// sets: a later set is never consulted once a language match is found.
pub fn select<'a>(track_sets: &[&'a CaptionTrackSet], lang: &str) -> Option<&'a CaptionFormatEntry> {
    for set in track_sets {
        let Some(entries) = set.get(lang) else {
            continue;
        };
        if entries.is_empty() {
            continue;
        }

        for format in PREFERRED_FORMATS {
            if let Some(entry) = entries.iter().find(|e| e.ext == *format) {
                debug!("Selected {lang} caption track with preferred format {format}");
                return Some(entry);
            }
        }

        debug!(
            "No preferred format for {lang}, falling back to first entry ({})",
            entries[0].ext
        );
        return Some(&entries[0]);
    }

    None
}
