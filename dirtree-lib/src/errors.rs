// --- FILE: dirtree-lib/src/errors.rs ---

use thiserror::Error;

/// Errors that can occur during the `dirtree` library operations.
///
/// Both variants a caller normally sees are precondition violations in the
/// calling sequence, not runtime faults. Malformed paths never produce an
/// error; they produce a (possibly degenerate) tree instead.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The path list handed to the pipeline was empty. Nothing was processed.
    #[error("No paths were provided; select a project folder before generating its structure")]
    MissingInput,

    /// A markdown document was requested without a structure to put in it,
    /// either because no run has completed yet or because the root folder
    /// name or structure text is empty.
    #[error("Cannot generate the document: {0}")]
    Precondition(String),

    /// The background worker running a [`StructureJob`](crate::StructureJob)
    /// terminated without returning a result.
    #[error("Structure job worker terminated unexpectedly")]
    JobPanicked,
}

/// A convenience type alias for `Result<T, TreeError>`.
pub type TreeResult<T> = Result<T, TreeError>;
