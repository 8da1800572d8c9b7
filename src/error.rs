use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A directory listing or stat call failed.
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("cannot list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// A navigation request that cannot be applied to the current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("already at the root directory")]
    AtRoot,

    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Errors from writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
