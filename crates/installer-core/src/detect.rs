//! Environment detection: platform and package manager.
//!
//! Both are pure reads of the host. Nothing here changes state.

use installer_schema::{Arch, Os, PackageManager, Platform};
use tracing::{debug, info};

use crate::config::InstallMethod;
use crate::error::Result;
use crate::host::Host;

/// Detect the host platform from `uname`, falling back to the compile-time
/// target when `uname` is unavailable.
pub fn detect_platform(host: &dyn Host) -> Result<Platform> {
    let sysname = host
        .uname("-s")
        .unwrap_or_else(|| Os::compiled_name().to_string());
    let machine = host
        .uname("-m")
        .unwrap_or_else(|| Arch::compiled_machine().to_string());

    debug!(%sysname, %machine, "host identification");
    let platform = Platform::from_uname(&sysname, &machine)?;
    info!(os = %platform.os, arch = %platform.arch, "detected platform");
    Ok(platform)
}

/// Select at most one package manager for this platform.
///
/// macOS only ever considers Homebrew; Linux checks in
/// [`PackageManager::LINUX_PRIORITY`] order; other systems get none.
pub fn detect_package_manager(
    os: Os,
    method: InstallMethod,
    host: &dyn Host,
) -> Option<PackageManager> {
    if method == InstallMethod::Binary {
        debug!("package managers disabled by install method");
        return None;
    }

    let candidates: &[PackageManager] = match os {
        Os::Darwin => &[PackageManager::Homebrew],
        Os::Linux => &PackageManager::LINUX_PRIORITY,
        Os::FreeBsd => &[],
    };

    let selected = candidates.iter().copied().find(|pm| {
        pm.required_tools()
            .iter()
            .all(|tool| host.has_command(tool))
    });

    match selected {
        Some(pm) => info!(package_manager = %pm, "selected package manager"),
        None => info!("no package manager selected, using binary install"),
    }
    selected
}
