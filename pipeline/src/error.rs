//! Error types

use thiserror::Error;

/// A boxed error raised by a frame source or viewer implementation.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Failures that stop a pipeline run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("motion analysis failed: {0}")]
    Motion(#[from] blockmatch_rs::Error),

    #[error("frame source failed: {0}")]
    Source(#[source] CollaboratorError),

    #[error("viewer failed: {0}")]
    Viewer(#[source] CollaboratorError),
}

pub type Result<T> = std::result::Result<T, Error>;
