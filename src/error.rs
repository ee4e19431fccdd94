//! Fatal error types for a run.
//!
//! Per-address failures never show up here; they are recovered inside the
//! collector. Anything in [`Error`] stops the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The local database file does not exist.
    #[error("'{}' file does not exist", .0.display())]
    DatabaseMissing(PathBuf),

    /// The local database exists but could not be opened.
    #[error("cannot open database '{}': {source}", path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: maxminddb::MaxMindDbError,
    },

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The placemark document writer failed.
    #[error("KML encoding error: {0}")]
    Kml(#[source] io::Error),
}
