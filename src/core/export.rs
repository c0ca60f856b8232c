//! Downloadable copy of the analysis.

use std::path::{Path, PathBuf};

pub const DOWNLOAD_FILE_NAME: &str = "analise_gastos.txt";
pub const DOWNLOAD_MIME: &str = "text/plain";

/// The analysis as a plain-text attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadPayload {
    pub fn from_analysis(analysis: &str) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME,
            mime: DOWNLOAD_MIME,
            bytes: analysis.as_bytes().to_vec(),
        }
    }

    /// Write the payload into `dir`, creating it if needed. Returns the file path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_utf8_analysis() {
        let payload = DownloadPayload::from_analysis("Gastos: R$ 2.300,00");
        assert_eq!(payload.file_name, "analise_gastos.txt");
        assert_eq!(payload.mime, "text/plain");
        assert_eq!(payload.bytes, "Gastos: R$ 2.300,00".as_bytes());
    }

    #[test]
    fn test_write_to_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let path = DownloadPayload::from_analysis("T").write_to(&target).unwrap();
        assert_eq!(path, target.join("analise_gastos.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "T");
    }

    #[test]
    fn test_write_to_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        DownloadPayload::from_analysis("old").write_to(dir.path()).unwrap();
        let path = DownloadPayload::from_analysis("new").write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }
}
