//! Detection, download, verification and install phases of the Azion CLI
//! installer. [`pipeline::Installer`] drives them in order.

pub mod artifact;
pub mod config;
pub mod detect;
pub mod error;
pub mod host;
pub mod io;
pub mod outcome;
pub mod paths;
pub mod pipeline;
pub mod profile;
pub mod release;
pub mod strategy;
pub mod verify;
pub mod workspace;

pub mod reporter;

pub use config::{InstallMethod, InstallerConfig, ToolMode};
pub use error::{InstallError, Result};
pub use host::{Host, SystemHost};
pub use paths::*;
pub use pipeline::{Installer, RunSummary};
pub use reporter::{NullReporter, Reporter};

/// User Agent string for release API and download requests
pub const USER_AGENT: &str = concat!("azion-installer/", env!("CARGO_PKG_VERSION"));
