//! Where finished reports go.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ReportError;

/// The file-save primitive: persist a finished document under a name.
pub trait ReportSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ReportError>;
}

/// Writes reports into a directory on disk, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_saved: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the most recent save, if any.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

impl ReportSink for DirectorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<(), ReportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        log::info!("saved {} bytes to {}", bytes.len(), path.display());
        self.last_saved = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_into_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path().join("reports").join("october"));
        sink.save("food-diary-7-days.pdf", b"%PDF-1.7").unwrap();
        let path = sink.last_saved().unwrap().to_path_buf();
        assert!(path.ends_with("october/food-diary-7-days.pdf"));
        assert_eq!(fs::read(path).unwrap(), b"%PDF-1.7");
    }
}
