//! Read-only data layer consumed by the connection manager.
//!
//! The channel needs two records before it can open: the distribution
//! descriptor (project routing) and the mapping table for the configured
//! source language. Either being absent disables the channel for the
//! session.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::DataError;
use crate::mapping::MappingTable;

/// Project identity and routing data for the push channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionDescriptor {
    /// Project id.
    pub project_id: String,
    /// Websocket routing hash of the project.
    pub project_ws_hash: String,
    /// Id of the user whose drafts are followed.
    pub user_id: String,
}

/// Read interface to the persisted descriptor and mapping tables.
#[cfg_attr(test, mockall::automock)]
pub trait DataSource: Send + Sync {
    /// Distribution descriptor, if one has been stored.
    fn distribution(&self) -> Option<DistributionDescriptor>;

    /// Mapping table for `source_language`, if one has been stored.
    fn mapping(&self, source_language: &str) -> Option<MappingTable>;
}

/// In-memory [`DataSource`], for hosts that fetch the records themselves.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    distribution: RwLock<Option<DistributionDescriptor>>,
    mappings: RwLock<HashMap<String, MappingTable>>,
}

impl MemoryDataSource {
    /// Empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style descriptor.
    #[must_use]
    pub fn with_distribution(self, descriptor: DistributionDescriptor) -> Self {
        self.set_distribution(Some(descriptor));
        self
    }

    /// Builder-style mapping table, keyed by its language.
    #[must_use]
    pub fn with_mapping(self, table: MappingTable) -> Self {
        self.set_mapping(table);
        self
    }

    /// Replace or clear the descriptor.
    pub fn set_distribution(&self, descriptor: Option<DistributionDescriptor>) {
        *self.distribution.write() = descriptor;
    }

    /// Insert or replace the table for `table.language`.
    pub fn set_mapping(&self, table: MappingTable) {
        let _ = self.mappings.write().insert(table.language.clone(), table);
    }
}

impl DataSource for MemoryDataSource {
    fn distribution(&self) -> Option<DistributionDescriptor> {
        self.distribution.read().clone()
    }

    fn mapping(&self, source_language: &str) -> Option<MappingTable> {
        self.mappings.read().get(source_language).cloned()
    }
}

/// [`DataSource`] over a directory laid out as:
///
/// ```text
/// <root>/distribution.json
/// <root>/mapping/<language>.json
/// ```
///
/// Missing files mean "not stored". Unreadable or malformed files are logged
/// and treated the same way.
#[derive(Clone, Debug)]
pub struct DirectoryDataSource {
    root: PathBuf,
}

impl DirectoryDataSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the descriptor file.
    pub fn distribution_path(&self) -> PathBuf {
        self.root.join("distribution.json")
    }

    /// Path of the mapping file for `language`.
    pub fn mapping_path(&self, language: &str) -> PathBuf {
        self.root.join("mapping").join(format!("{language}.json"))
    }

    /// Read the descriptor, `Ok(None)` if the file does not exist.
    pub fn load_distribution(&self) -> Result<Option<DistributionDescriptor>, DataError> {
        read_json(&self.distribution_path())
    }

    /// Read the mapping table for `language`, `Ok(None)` if absent.
    pub fn load_mapping(&self, language: &str) -> Result<Option<MappingTable>, DataError> {
        let table: Option<MappingTable> = read_json(&self.mapping_path(language))?;
        Ok(table.map(|mut table| {
            if table.language.is_empty() {
                language.clone_into(&mut table.language);
            }
            table
        }))
    }
}

impl DataSource for DirectoryDataSource {
    fn distribution(&self) -> Option<DistributionDescriptor> {
        self.load_distribution().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable distribution descriptor");
            None
        })
    }

    fn mapping(&self, source_language: &str) -> Option<MappingTable> {
        self.load_mapping(source_language).unwrap_or_else(|err| {
            warn!(language = source_language, error = %err, "ignoring unreadable mapping table");
            None
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, DataError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "data file not found");
            return Ok(None);
        }
        Err(source) => {
            return Err(DataError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })
}
