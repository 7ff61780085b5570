use std::path::{Path, PathBuf};

/// Name of the executable shipped in every release.
pub const BINARY_NAME: &str = "azion";

/// Azion home relative to the user's home directory.
const AZION_HOME_DIR: &str = ".azion";

/// `<home>/.azion`
pub fn azion_home_in(home: &Path) -> PathBuf {
    home.join(AZION_HOME_DIR)
}

/// Default manual-install target: `<home>/.azion/bin`
pub fn default_install_dir(home: &Path) -> PathBuf {
    azion_home_in(home).join("bin")
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}
