//! File Source
//!
//! Loader that reads values from files in a directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use async_trait::async_trait;

use crate::group::Getter;

// == File Source ==
/// Serves `<root>/<key>` as the value for `key`.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys map to a single file name directly under the root.
    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        if key.starts_with('.') || key.contains(&['/', '\\', '\0'][..]) {
            bail!("invalid key for file source: {:?}", key);
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl Getter for FileSource {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))
    }
}
