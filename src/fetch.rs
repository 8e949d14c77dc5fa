use log::debug;

/// Retrieve the body at `url`, treating anything but HTTP 200 as no result.
///
/// Transport errors and non-200 statuses are logged and swallowed; the
/// fallback pipeline continues without them.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Option<String> {
    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!("Caption fetch failed: {e}");
            return None;
        }
    };

    if resp.status() != reqwest::StatusCode::OK {
        debug!("Caption fetch returned status {}", resp.status());
        return None;
    }

    match resp.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            debug!("Caption body read failed: {e}");
            None
        }
    }
}
