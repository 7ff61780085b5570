//! Release artifact naming and download.

use std::path::PathBuf;

use installer_schema::{PackageFormat, Platform};
use tracing::info;

use crate::error::Result;
use crate::io::http::HttpClient;
use crate::paths::filename_from_url;
use crate::workspace::Workspace;

/// Where one release asset and its checksum manifest live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub asset_name: String,
    pub download_url: String,
    pub checksum_url: String,
}

impl ArtifactRef {
    /// Derive names and URLs for `version` on `platform`.
    ///
    /// The asset uses the bare version, while the manifest file name carries
    /// a `v` prefix. The release host publishes them that way.
    pub fn new(base: &str, version: &str, platform: Platform, format: PackageFormat) -> Self {
        let base = base.trim_end_matches('/');
        let asset_name = format!(
            "azion_{version}_{}_{}.{}",
            platform.os,
            platform.arch,
            format.extension()
        );
        Self {
            download_url: format!("{base}/{version}/{asset_name}"),
            checksum_url: format!("{base}/{version}/azion_v{version}_checksum"),
            asset_name,
        }
    }

    /// Download the asset and the manifest into `workspace`.
    pub async fn fetch(&self, http: &HttpClient, workspace: &Workspace) -> Result<Downloaded> {
        let archive = workspace.file(&self.asset_name);
        let manifest = workspace.file(filename_from_url(&self.checksum_url));

        info!(url = %self.download_url, "downloading artifact");
        http.fetch_to_file(&self.download_url, &archive).await?;
        info!(url = %self.checksum_url, "downloading checksum manifest");
        http.fetch_to_file(&self.checksum_url, &manifest).await?;

        Ok(Downloaded { archive, manifest })
    }
}

/// Paths of a fetched artifact inside the workspace.
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub archive: PathBuf,
    pub manifest: PathBuf,
}
