//! # Credential Directory
//!
//! Maps hardware addresses to device logins. The on-disk format is one record
//! per line:
//!
//! ```text
//! aa:bb:cc:dd:ee:ff  admin  s3cret  Tapo
//! AA-BB-CC-DD-EE-01  root   hunter2 Acme Vision Systems
//! ```
//!
//! The manufacturer swallows every token after the password, so labels with
//! spaces work without quoting. The directory is loaded fresh for each scan.

use std::io::ErrorKind;
use std::path::Path;

use camsweep_common::credentials::{CredentialEntry, CredentialRecord};
use camsweep_common::network::mac::MacAddress;
use tracing::{debug, warn};

const MIN_FIELDS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read credential file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialDirectory {
    entries: Vec<CredentialEntry>,
}

impl CredentialDirectory {
    /// Parses the line-oriented text format. Malformed lines are skipped and
    /// logged, never fatal.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| parse_line(idx + 1, line))
            .collect();
        Self { entries }
    }

    /// Reads and parses `path`. A missing file is an empty directory.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => {
                let directory = Self::parse(&text);
                debug!(
                    "Loaded {} credential(s) from {}",
                    directory.len(),
                    path.display()
                );
                Ok(directory)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, using an empty directory", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(DirectoryError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Builds a directory from a client-supplied `cameraDetails` payload.
    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        let entries = records
            .into_iter()
            .filter_map(CredentialRecord::into_entry)
            .collect();
        Self { entries }
    }

    /// First entry whose address equals `mac`, in source order.
    pub fn lookup(&self, mac: &MacAddress) -> Option<&CredentialEntry> {
        self.entries.iter().find(|e| &e.hardware_address == mac)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_line(line_no: usize, line: &str) -> Option<CredentialEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_FIELDS {
        warn!(
            "Skipping credential line {line_no}: expected {MIN_FIELDS} fields, found {}",
            tokens.len()
        );
        return None;
    }

    let mac = match tokens[0].parse::<MacAddress>() {
        Ok(mac) => mac,
        Err(e) => {
            warn!("Skipping credential line {line_no}: {e}");
            return None;
        }
    };

    Some(CredentialEntry::new(
        mac,
        tokens[1],
        tokens[2],
        tokens[3..].join(" "),
    ))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mac(s: &str) -> MacAddress {
        s.parse().unwrap()
    }

    #[test]
    fn parse_reads_four_fields_with_multi_word_manufacturer() {
        let dir = CredentialDirectory::parse(
            "aa:bb:cc:dd:ee:ff admin pass Tapo\n\
             AA-BB-CC-DD-EE-01   root\thunter2  Acme   Vision Systems\n",
        );

        assert_eq!(dir.len(), 2);
        let acme = dir.lookup(&mac("aa:bb:cc:dd:ee:01")).unwrap();
        assert_eq!(acme.username, "root");
        assert_eq!(acme.password, "hunter2");
        assert_eq!(acme.manufacturer, "Acme Vision Systems");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = CredentialDirectory::parse(
            "AA:BB:CC:DD:EE:FF user\n\
             \n\
             # comment line\n\
             zz:bb:cc:dd:ee:ff admin pass Tapo\n\
             11:22:33:44:55:66 admin pass Dahua\n",
        );

        assert_eq!(dir.len(), 1);
        assert!(dir.lookup(&mac("aa:bb:cc:dd:ee:ff")).is_none());
        assert!(dir.lookup(&mac("11:22:33:44:55:66")).is_some());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dir = CredentialDirectory::parse("AA:BB:CC:DD:EE:FF admin pass Tapo");
        let entry = dir.lookup(&mac("aa:bb:cc:dd:ee:ff")).unwrap();
        assert_eq!(entry.manufacturer, "Tapo");
    }

    #[test]
    fn first_match_wins() {
        let dir = CredentialDirectory::parse(
            "aa:bb:cc:dd:ee:ff first pass Tapo\n\
             AA:BB:CC:DD:EE:FF second pass Dahua\n",
        );
        assert_eq!(dir.lookup(&mac("aa:bb:cc:dd:ee:ff")).unwrap().username, "first");
    }

    #[test]
    fn from_records_drops_unparseable_macs() {
        let dir = CredentialDirectory::from_records(vec![
            CredentialRecord {
                mac: "AA:BB:CC:DD:EE:FF".into(),
                username: "admin".into(),
                password: "pass".into(),
                company: "Tapo".into(),
            },
            CredentialRecord {
                mac: "garbage".into(),
                username: "admin".into(),
                password: "pass".into(),
                company: "Tapo".into(),
            },
        ]);
        assert_eq!(dir.len(), 1);
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = CredentialDirectory::load(tmp.path().join("cameras.txt"))
            .await
            .unwrap();
        assert!(dir.is_empty());
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "aa:bb:cc:dd:ee:ff admin pass Tapo").unwrap();
        writeln!(file, "broken line").unwrap();

        let dir = CredentialDirectory::load(file.path()).await.unwrap();
        assert_eq!(dir.len(), 1);
    }

    #[tokio::test]
    async fn load_directory_path_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(CredentialDirectory::load(tmp.path()).await.is_err());
    }
}
