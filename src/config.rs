//! Dashboard manifests.
//!
//! A manifest is a TOML file declaring the page title, the tab order, the
//! datasets and the blocks:
//!
//! ```toml
//! title = "SAKSHAM Baseline Dashboard"
//! default_buffer = 30
//! fragment_root = "fragments"
//!
//! [tables.gender]
//! columns = ["gender", "respondents"]
//! rows = [["Female", 412], ["Male", 388]]
//!
//! [[blocks]]
//! id = "gender"
//! category = "demographic"
//! display_label = "Gender of Respondents"
//! declared_min_height = 320
//! content = { kind = "chart", table = "gender", chart = { kind = "pie", x = "gender", y = "respondents" } }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::height::{DEFAULT_BUFFER, HeightResolver};
use crate::model::{BlockContent, BlockDescriptor, Category, Datasets};
use crate::registry::{Registry, RegistryError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read manifest at {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("block '{block}' refers to dataset '{table}' which is not defined")]
    UnknownDataset { block: String, table: String },
}

fn default_buffer() -> u32 {
    DEFAULT_BUFFER
}

/// On-disk form of a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub title: String,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default = "default_buffer")]
    pub default_buffer: u32,
    /// Directory external fragments are resolved against, relative to the manifest.
    #[serde(default)]
    pub fragment_root: Option<Utf8PathBuf>,
    /// Tab order. Defaults to every category.
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub tables: Datasets,
    #[serde(default)]
    pub blocks: Vec<BlockDescriptor>,
}

impl Manifest {
    pub fn from_toml_str(text: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_path(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Build the registry, checking ids, categories and dataset references.
    pub fn into_dashboard(self, base_dir: &Utf8Path) -> Result<Dashboard, ConfigError> {
        let mut registry = match self.categories {
            Some(cats) => Registry::with_categories(cats),
            None => Registry::new(),
        };
        for block in self.blocks {
            if let BlockContent::Chart { table, .. } = &block.content {
                if !self.tables.contains_key(table) {
                    return Err(ConfigError::UnknownDataset {
                        block: block.id.clone(),
                        table: table.clone(),
                    });
                }
            }
            registry.register(block)?;
        }
        let fragment_root = match self.fragment_root {
            Some(root) if root.is_absolute() => root,
            Some(root) => base_dir.join(root),
            None => base_dir.to_path_buf(),
        };
        info!(blocks = registry.len(), title = %self.title, "dashboard loaded");
        Ok(Dashboard {
            title: self.title,
            intro: self.intro,
            registry,
            datasets: self.tables,
            heights: HeightResolver::new(self.default_buffer),
            fragment_root,
        })
    }
}

/// A fully initialised dashboard: read-only once built.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    pub intro: Option<String>,
    pub registry: Registry,
    pub datasets: Datasets,
    pub heights: HeightResolver,
    pub fragment_root: Utf8PathBuf,
}

impl Dashboard {
    /// Load a manifest file; relative fragment paths resolve against its directory.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let base = path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or(Utf8Path::new("."));
        Manifest::load_from_path(path)?.into_dashboard(base)
    }
}
