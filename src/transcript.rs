use log::debug;

use crate::captions::{self, CaptionFormat};
use crate::metadata::VideoMetadata;
use crate::{Segment, Transcript, TranscriptSource, fetch, tracks, youtube};

/// Best-effort transcript lookup: structured direct, then translated, then
/// raw captions. Stages run strictly in order with one collaborator call
/// each; a stage error counts as "found nothing". `None` means the whole
/// chain came up empty, which is a valid outcome rather than an error.
pub async fn get_transcript(
    client: &reqwest::Client,
    metadata: &VideoMetadata,
    lang: &str,
) -> Option<Transcript> {
    if let Some(segments) = structured_lookup(client, &metadata.id, lang).await {
        let source = structured_source(metadata, lang);
        return Some(Transcript::new(segments, source));
    }

    get_fallback_subtitle(client, metadata, lang).await
}

async fn structured_lookup(client: &reqwest::Client, video_id: &str, lang: &str) -> Option<Vec<Segment>> {
    match youtube::fetch_direct(client, video_id, lang).await {
        Ok(segments) => return Some(segments),
        Err(e) => debug!("Direct transcript lookup failed: {e}"),
    }

    match youtube::list_and_translate(client, video_id, lang).await {
        Ok(segments) => Some(segments),
        Err(e) => {
            debug!("Translated transcript lookup failed: {e}");
            None
        }
    }
}

/// A structured-API hit counts as direct only when the requested language is
/// literally listed among the video's own subtitle tracks.
fn structured_source(metadata: &VideoMetadata, lang: &str) -> TranscriptSource {
    if metadata.subtitles.contains_key(lang) {
        TranscriptSource::Direct
    } else {
        TranscriptSource::Translated
    }
}

/// Last stage: select a raw caption track from the metadata record and parse
/// its fetched content into segments.
pub async fn get_fallback_subtitle(
    client: &reqwest::Client,
    metadata: &VideoMetadata,
    lang: &str,
) -> Option<Transcript> {
    let sets = [&metadata.subtitles, &metadata.automatic_captions];
    let entry = tracks::select(&sets, lang)?;

    debug!("Fetching raw {} captions from {}", entry.ext, entry.url);
    let body = fetch::fetch(client, &entry.url).await?;

    let segments = captions::parse(&body, CaptionFormat::from_ext(&entry.ext))?;
    Some(Transcript::new(segments, TranscriptSource::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::{CaptionFormatEntry, CaptionTrackSet};

    fn metadata_with_subtitle_langs(langs: &[&str]) -> VideoMetadata {
        let mut subtitles = CaptionTrackSet::new();
        for lang in langs {
            subtitles.insert(
                lang.to_string(),
                vec![CaptionFormatEntry {
                    ext: "vtt".to_string(),
                    url: "https://example.invalid/captions".to_string(),
                }],
            );
        }
        VideoMetadata {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Test".to_string(),
            duration: Some(212.0),
            view_count: None,
            channel: None,
            upload_date: None,
            description: None,
            subtitles,
            automatic_captions: CaptionTrackSet::new(),
        }
    }

    #[test]
    fn test_structured_source_direct_when_lang_listed() {
        let metadata = metadata_with_subtitle_langs(&["en"]);
        assert_eq!(structured_source(&metadata, "en"), TranscriptSource::Direct);
    }

    #[test]
    fn test_structured_source_translated_when_lang_not_listed() {
        let metadata = metadata_with_subtitle_langs(&["fr"]);
        assert_eq!(structured_source(&metadata, "en"), TranscriptSource::Translated);

        let metadata = metadata_with_subtitle_langs(&[]);
        assert_eq!(structured_source(&metadata, "en"), TranscriptSource::Translated);
    }

    #[tokio::test]
    async fn test_fallback_returns_none_without_matching_track() {
        let client = reqwest::Client::new();
        let metadata = metadata_with_subtitle_langs(&[]);
        assert!(get_fallback_subtitle(&client, &metadata, "en").await.is_none());
    }
}
