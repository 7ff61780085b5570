//! IO modules - side effects (network, filesystem, external tools)

pub mod digest;
pub mod extract;
pub mod http;
