//! # camsweep-common
//!
//! Domain models shared by the scan engine and its front ends.
//!
//! * **[`network`]**: hardware addresses and /24 subnet prefixes.
//! * **[`credentials`]**: operator-supplied device logins keyed by MAC.
//! * **[`device`]**: what a scan reports about a responsive host.
//! * **[`event`]**: the incremental event stream a scan emits.
//! * **[`config`]** and **[`error`]**: tunables and the validation taxonomy.

pub mod config;
pub mod credentials;
pub mod device;
pub mod error;
pub mod event;
pub mod network;
