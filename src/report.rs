use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const REPORT_FILE: &str = "mirror-report.json";

/// Summary of one mirroring run, persisted next to the mirror tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorReport {
    pub root_url: String,
    pub pages_downloaded: usize,
    pub resources_downloaded: usize,
    pub failed_fetches: usize,
    pub pages_rewritten: usize,
    pub rewrite_failures: usize,
}

impl MirrorReport {
    pub fn new(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            ..Self::default()
        }
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(REPORT_FILE);
        let body = serde_json::to_vec_pretty(self)?;
        fs::write(&path, body)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_through_json() {
        let tmp = tempdir().unwrap();
        let mut report = MirrorReport::new("https://example.com");
        report.pages_downloaded = 3;
        report.resources_downloaded = 7;

        let path = report.save(tmp.path()).unwrap();
        let loaded: MirrorReport =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();

        assert_eq!(loaded.root_url, "https://example.com");
        assert_eq!(loaded.pages_downloaded, 3);
        assert_eq!(loaded.resources_downloaded, 7);
    }
}
