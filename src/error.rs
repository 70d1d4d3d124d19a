use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced while loading a bank, generating a run, or compiling it.
///
/// Every variant is terminal for the run: this is a batch tool and partial
/// output is not useful (a half-merged answer key helps nobody).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A category asks for more questions than its pool holds.
    ///
    /// Caught at load time, and again at selection time for hand-built tests.
    #[error("category '{category}' selects {select} questions but its pool only has {available}")]
    CategoryUnderProvisioned {
        category: String,
        select: usize,
        available: usize,
    },

    /// A question violates the payload invariants (exactly one of `text` /
    /// `options`, non-empty prompt, non-empty payload).
    #[error("malformed question '{prompt}' in category '{category}': {reason}")]
    MalformedQuestion {
        category: String,
        prompt: String,
        reason: &'static str,
    },

    /// The same category name appeared twice across the test and its includes.
    #[error("category '{name}' defined more than once (while loading {path})")]
    DuplicateCategory { name: String, path: PathBuf },

    /// An include file was reached a second time while resolving includes.
    #[error("include cycle detected at {path}")]
    IncludeCycle { path: PathBuf },

    /// Reading a bank file from disk failed.
    #[error("failed to read bank file {path}: {source}")]
    BankIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A bank file is not valid YAML for the expected shape.
    #[error("failed to parse bank file {path}: {source}")]
    BankParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Writing staged markdown or reading back output failed.
    #[error("staging I/O failed at {path}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An external program could not be started at all.
    #[error("failed to run '{program}': {source}")]
    CommandSpawn {
        program: String,
        source: std::io::Error,
    },

    /// The document compiler exited non-zero for one group; the whole batch
    /// for that variant is abandoned.
    #[error("document compiler exited with {status} for group '{label}' ({variant})")]
    CompileFailed {
        label: String,
        variant: &'static str,
        status: ExitStatus,
    },

    /// A compile task was cancelled or panicked before reporting a status.
    #[error("document compiler task aborted: {source}")]
    CompileJoin { source: tokio::task::JoinError },

    /// The merge step exited non-zero. Per-group files are left behind in
    /// `kept_dir` so the failure can be inspected by hand.
    #[error("merge exited with {status} for {variant}; per-group files kept in {kept_dir}")]
    MergeFailed {
        variant: &'static str,
        status: ExitStatus,
        kept_dir: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
