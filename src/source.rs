//! Fragment sources: where externally-sourced markup is fetched from.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::io::{Read, Seek};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fragment {0} not found")]
    NotFound(Utf8PathBuf),

    #[error("fragment {path} could not be read: {source}")]
    Unreadable {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("fragment {path} could not be read from bundle: {source}")]
    Archive {
        path: Utf8PathBuf,
        source: zip::result::ZipError,
    },
}

/// Fetches the raw bytes of a fragment by its logical path.
pub trait FragmentSource {
    fn fetch(&mut self, path: &Utf8Path) -> Result<Vec<u8>, FetchError>;
}

impl<T: FragmentSource + ?Sized> FragmentSource for &mut T {
    fn fetch(&mut self, path: &Utf8Path) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(path)
    }
}

impl<T: FragmentSource + ?Sized> FragmentSource for Box<T> {
    fn fetch(&mut self, path: &Utf8Path) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(path)
    }
}

/// Reads fragments from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: Utf8PathBuf,
}

impl FsSource {
    pub fn new(root: impl AsRef<Utf8Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl FragmentSource for FsSource {
    fn fetch(&mut self, path: &Utf8Path) -> Result<Vec<u8>, FetchError> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        // errors name the logical path; the resolved one only goes to the log
        std::fs::read(full.as_std_path()).map_err(|source| {
            warn!(path = %full, error = %source, "fragment read failed");
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(path.to_path_buf())
            } else {
                FetchError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })
    }
}

/// Reads fragments from a ZIP bundle, e.g. a set of exported chart embeds.
pub struct ZipSource<R: Read + Seek> {
    zip: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self, FetchError> {
        let zip = zip::ZipArchive::new(reader).map_err(|source| FetchError::Archive {
            path: Utf8PathBuf::from("<bundle>"),
            source,
        })?;
        Ok(Self { zip })
    }

    /// Names of all files in the bundle.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names()
    }
}

impl<R: Read + Seek> FragmentSource for ZipSource<R> {
    fn fetch(&mut self, path: &Utf8Path) -> Result<Vec<u8>, FetchError> {
        let name = path
            .as_str()
            .trim_start_matches("./")
            .trim_start_matches('/')
            .to_string();
        let mut f = self.zip.by_name(&name).map_err(|source| match source {
            zip::result::ZipError::FileNotFound => FetchError::NotFound(path.to_path_buf()),
            source => FetchError::Archive {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let mut bytes = Vec::new();
        f.read_to_end(&mut bytes)
            .map_err(|source| FetchError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(bytes)
    }
}

/// In-memory fragments keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemSource {
    files: HashMap<Utf8PathBuf, Vec<u8>>,
}

impl MemSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with(mut self, path: impl Into<Utf8PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

impl FragmentSource for MemSource {
    fn fetch(&mut self, path: &Utf8Path) -> Result<Vec<u8>, FetchError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_path_buf()))
    }
}
