//! Release version resolution.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{InstallError, Result};
use crate::io::http::HttpClient;

#[derive(Debug, Deserialize)]
struct LatestRelease {
    #[serde(default)]
    tag_name: String,
}

/// Return the pinned version verbatim, or ask the release API for the
/// latest tag. No format validation is applied to either.
pub async fn resolve_version(
    pin: Option<&str>,
    http: &HttpClient,
    releases_api: &str,
) -> Result<String> {
    if let Some(pin) = pin {
        debug!(version = pin, "using pinned version");
        return Ok(pin.to_string());
    }

    let body = http.fetch_text(releases_api).await?;
    let version = parse_latest_tag(&body)?;
    info!(%version, "resolved latest release");
    Ok(version)
}

/// Extract a non-empty `tag_name` from release metadata.
pub fn parse_latest_tag(body: &str) -> Result<String> {
    let release: LatestRelease = serde_json::from_str(body)
        .map_err(|e| InstallError::VersionResolution(format!("invalid release metadata: {e}")))?;

    let tag = release.tag_name.trim();
    if tag.is_empty() {
        return Err(InstallError::VersionResolution(
            "release metadata has no tag_name".to_string(),
        ));
    }
    Ok(tag.to_string())
}
