use log::debug;
use serde::Deserialize;

use crate::Segment;

/// Caption encoding, decided once from the track entry's `ext`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    /// json3-style document: a list of timed events with text sub-segments
    EventStream,
    /// Line-oriented cues: timestamp lines followed by text lines (vtt, srt, ...)
    CueList,
}

impl CaptionFormat {
    pub fn from_ext(ext: &str) -> Self {
        if ext == "json3" {
            CaptionFormat::EventStream
        } else {
            CaptionFormat::CueList
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventStreamDoc {
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: f64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: f64,
    segs: Option<Vec<EventSeg>>,
}

#[derive(Debug, Deserialize)]
struct EventSeg {
    #[serde(default)]
    utf8: String,
}

/// Parse raw caption content into normalized segments.
///
/// Returns `None` for anything unusable (malformed documents, content that
/// yields zero segments) so the caller can move on to its next fallback
/// stage. Never an empty list, never an error.
pub fn parse(content: &str, format: CaptionFormat) -> Option<Vec<Segment>> {
    let segments = match format {
        CaptionFormat::EventStream => parse_event_stream(content)?,
        CaptionFormat::CueList => parse_cue_list(content),
    };

    if segments.is_empty() {
        debug!("Caption content produced no usable segments");
        return None;
    }
    Some(segments)
}

fn parse_event_stream(content: &str) -> Option<Vec<Segment>> {
    let doc: EventStreamDoc = match serde_json::from_str(content) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("Event-stream caption content did not deserialize: {e}");
            return None;
        }
    };

    let segments = doc
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text = segs
                .iter()
                .map(|s| s.utf8.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() {
                return None;
            }
            Some(Segment {
                text,
                start: event.start_ms / 1000.0,
                duration: event.duration_ms / 1000.0,
            })
        })
        .collect();

    Some(segments)
}

fn parse_cue_list(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cue_start: Option<f64> = None;
    let mut cue_lines: Vec<&str> = Vec::new();

    let mut flush = |start: f64, lines: &mut Vec<&str>| {
        if !lines.is_empty() {
            segments.push(Segment {
                text: lines.join(" "),
                start,
                duration: 0.0,
            });
            lines.clear();
        }
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line == "WEBVTT" {
            continue;
        }
        // cue index numbers carry no content
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        if let Some(idx) = line.find("-->") {
            match parse_timestamp(&line[..idx]) {
                Some(start) => {
                    if let Some(prev) = cue_start.replace(start) {
                        flush(prev, &mut cue_lines);
                    }
                }
                // unparseable timing line: no new cue, no flush
                None => debug!("Skipping unparseable timing line: {line}"),
            }
            continue;
        }

        if cue_start.is_some() {
            cue_lines.push(line);
        }
    }

    if let Some(start) = cue_start {
        flush(start, &mut cue_lines);
    }

    segments
}

/// Convert a `[[HH:]MM:]SS[.mmm]` timestamp to total seconds.
/// A comma is accepted before the milliseconds (srt-style cues).
fn parse_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.trim().replace(',', ".");
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut seconds = 0.0;
    for part in parts {
        seconds = seconds * 60.0 + part.trim().parse::<f64>().ok()?;
    }

    if seconds.is_finite() && seconds >= 0.0 {
        Some(seconds)
    } else {
        None
    }
}
