use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Filesystem side of the mirror: writes resource bytes at their
/// '/'-joined local paths, creating directories on demand.
///
/// Every write is checked to land under the download directory — the
/// local-path invariant is the only boundary keeping a crafted URL from
/// escaping the mirror tree.
#[derive(Clone)]
pub struct FileManager {
    base_dir: PathBuf,
}

impl FileManager {
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn save_file(&self, local_path: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.checked_path(local_path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn file_exists(&self, local_path: &str) -> bool {
        Path::new(local_path).is_file()
    }

    fn checked_path(&self, local_path: &str) -> Result<PathBuf> {
        let path = PathBuf::from(local_path);
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if escapes || !path.starts_with(&self.base_dir) {
            return Err(Error::OutsideMirrorRoot(path));
        }
        Ok(path)
    }
}
