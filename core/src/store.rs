//! Persistent cache for the last-known transfer count.
//!
//! A single key, stored as one plain file under the platform data directory.
//! Read once at startup as the cold-start display value; written after each
//! count refresh. Never consulted again while the process runs.

use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};

const COUNT_FILE: &str = "transfer_count";

pub struct CountStore {
    path: PathBuf,
}

impl CountStore {
    /// Open the store in the default data directory, creating it if needed.
    pub fn open() -> Result<Self> {
        let dir = crate::data_dir()?;
        Self::open_in(&dir)
    }

    /// Open the store in an explicit directory.
    pub fn open_in(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| ClientError::Storage(format!("Failed to create {}: {e}", dir.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700));
        }
        Ok(Self {
            path: dir.join(COUNT_FILE),
        })
    }

    /// Last cached count, if one was ever written and still parses.
    pub fn get(&self) -> Option<u64> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Overwrite the cached count.
    pub fn set(&self, count: u64) -> Result<()> {
        std::fs::write(&self.path, count.to_string()).map_err(|e| {
            ClientError::Storage(format!(
                "Failed to write count to {}: {e}",
                self.path.display()
            ))
        })
    }
}
