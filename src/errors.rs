use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot open {path:?}: {source}")]
    FileAccess { path: PathBuf, source: io::Error },

    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// No line parsed as a number, so there is nothing to average.
    #[error("no numeric values in {path:?}")]
    NoData { path: PathBuf },

    #[error("cannot write report: {0}")]
    Output(#[from] io::Error),
}
