//! # camsweep-core
//!
//! The subnet sweep engine: probes every host of a /24 for an open port,
//! resolves responders' MACs, matches them against a credential directory
//! and synthesizes RTSP links, reporting as it goes.

pub mod directory;
pub mod links;
pub mod network;
pub mod scanner;

pub use directory::CredentialDirectory;
pub use scanner::{ScanOutcome, ScanParams, ScanRequest, Scanner};
