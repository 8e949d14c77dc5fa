use eyre::Result;
use serde_json::{Map, Value};

use crate::Transcript;
use crate::metadata::VideoMetadata;

/// Assembled response for one video lookup. `title` and `metadata` appear
/// only when requested; a requested transcript that could not be found
/// renders as JSON null rather than being omitted.
#[derive(Debug, Default)]
pub struct QueryResult {
    pub title: Option<String>,
    pub metadata: Option<VideoMetadata>,
    pub transcript_requested: bool,
    pub transcript: Option<Transcript>,
}

pub fn render_json(result: &QueryResult) -> Result<String> {
    let mut map = Map::new();

    if let Some(ref title) = result.title {
        map.insert("title".to_string(), Value::String(title.clone()));
    }
    if let Some(ref metadata) = result.metadata {
        map.insert("metadata".to_string(), serde_json::to_value(metadata)?);
    }
    if result.transcript_requested {
        let value = match result.transcript {
            Some(ref t) => serde_json::to_value(t)?,
            None => Value::Null,
        };
        map.insert("transcript".to_string(), value);
    }

    Ok(serde_json::to_string_pretty(&Value::Object(map))?)
}

/// Render the transcript as plain text, one segment per line
pub fn render_text(result: &QueryResult) -> String {
    match result.transcript {
        Some(ref t) => t
            .segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Segment, TranscriptSource};

    fn sample_transcript() -> Transcript {
        Transcript::new(
            vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    duration: 1.5,
                },
                Segment {
                    text: "This is a test".to_string(),
                    start: 1.5,
                    duration: 2.0,
                },
            ],
            TranscriptSource::Fallback,
        )
    }

    #[test]
    fn test_render_json_all_fields() {
        let result = QueryResult {
            title: Some("Test Video".to_string()),
            metadata: None,
            transcript_requested: true,
            transcript: Some(sample_transcript()),
        };

        let rendered = render_json(&result).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["title"], "Test Video");
        assert_eq!(value["transcript"]["text"], "Hello world This is a test");
        assert_eq!(value["transcript"]["source"], "fallback");
        assert_eq!(value["transcript"]["segments"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_render_json_requested_transcript_missing_is_null() {
        let result = QueryResult {
            title: None,
            metadata: None,
            transcript_requested: true,
            transcript: None,
        };

        let rendered = render_json(&result).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert!(value["transcript"].is_null());
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_render_json_unrequested_transcript_omitted() {
        let result = QueryResult {
            title: Some("Only title".to_string()),
            ..Default::default()
        };

        let rendered = render_json(&result).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert!(value.get("transcript").is_none());
        assert_eq!(value["title"], "Only title");
    }

    #[test]
    fn test_render_text() {
        let result = QueryResult {
            transcript_requested: true,
            transcript: Some(sample_transcript()),
            ..Default::default()
        };
        assert_eq!(render_text(&result), "Hello world\nThis is a test");
    }

    #[test]
    fn test_render_text_no_transcript() {
        let result = QueryResult::default();
        assert_eq!(render_text(&result), "");
    }
}
