//! Locates the record tree inside a registry checkout.
//!
//! The daemon serves records from the `data` directory of a registry
//! repository. Startup fails fast when that directory is missing so operators
//! notice a misconfigured `--registry` immediately instead of answering every
//! query with `% 404`.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::Config;

const DATA_DIRECTORY: &str = "data";

/// Validated paths into the registry checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
    root: Utf8PathBuf,
    data_dir: Utf8PathBuf,
}

impl RegistryPaths {
    /// Resolves and validates the registry paths for a configuration.
    pub fn from_config(config: &Config) -> Result<Self, RegistryPathError> {
        Self::from_root(&config.registry)
    }

    /// Resolves and validates the registry paths below `root`.
    pub fn from_root(root: &Utf8Path) -> Result<Self, RegistryPathError> {
        let data_dir = root.join(DATA_DIRECTORY);
        let metadata = fs::metadata(data_dir.as_std_path()).map_err(|source| {
            RegistryPathError::Inaccessible {
                path: data_dir.clone(),
                source,
            }
        })?;
        if !metadata.is_dir() {
            return Err(RegistryPathError::NotADirectory { path: data_dir });
        }
        Ok(Self {
            root: root.to_path_buf(),
            data_dir,
        })
    }

    /// Registry checkout root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory holding one sub-directory per object type.
    #[must_use]
    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }
}

/// Errors raised while locating the registry data directory.
#[derive(Debug, Error)]
pub enum RegistryPathError {
    /// The data directory could not be read.
    #[error("cannot access '{path}', should be in the registry repository: {source}")]
    Inaccessible {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The data path exists but is not a directory.
    #[error("registry data path '{path}' is not a directory")]
    NotADirectory { path: Utf8PathBuf },
}
