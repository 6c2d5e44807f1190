use std::path::PathBuf;

use thiserror::Error;

use crate::progress::ModuleId;

/// Errors surfaced by key-value storage backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError
{
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("failed to lock {path}: {source}")]
    Lock
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage I/O error at {path}: {source}")]
    Io
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError
{
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self
    {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the progress model itself.
#[derive(Debug, Error)]
pub enum ProgressError
{
    #[error("unknown module '{0}'")]
    UnknownModule(String),

    #[error("record shape does not match module '{0}'")]
    RecordMismatch(ModuleId),
}

/// Errors while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError
{
    #[error("failed to read config file {path}: {source}")]
    Read
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse
    {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
