use crate::network::subnet::SubnetParseError;

/// Reasons a scan request is refused before any probe is sent.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("missing port")]
    MissingPort,
    #[error("invalid port {0}, expected 1-65535")]
    InvalidPort(i64),
    #[error("missing subnet prefix")]
    MissingSubnet,
    #[error(transparent)]
    InvalidSubnet(#[from] SubnetParseError),
}
