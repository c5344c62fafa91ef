#![forbid(unsafe_code)]

//! Static build: load data, evaluate client state, write `index.html`.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use vicpower_data::{DataDir, Dataset};
use vicpower_runtime::{ClientStore, DetailModeProvider, DisclaimerGate, Instant, StorageError};
use vicpower_widgets::MobileDisclaimer;

use crate::cli::Opts;
use crate::page::{StoryPage, Viewport};

pub const INDEX_FILE: &str = "index.html";

/// Errors that stop a build or a trace.
#[derive(Debug)]
pub enum BuildError {
    /// Writing an output file failed.
    Write { path: PathBuf, source: io::Error },
    /// Other I/O, such as writing the trace to stdout.
    Io(io::Error),
    /// Persisting client state failed.
    Storage(StorageError),
    /// Encoding a trace line failed.
    Encode(serde_json::Error),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { path, source } => write!(f, "cannot write {}: {source}", path.display()),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Storage(e) => write!(f, "client state: {e}"),
            Self::Encode(e) => write!(f, "cannot encode trace: {e}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Write { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<io::Error> for BuildError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StorageError> for BuildError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub index: PathBuf,
    pub bytes: usize,
    /// Data files that were absent or unusable.
    pub missing_data_files: usize,
    pub disclaimer_open: bool,
}

/// Load every data file, logging how many fell back to empty.
pub fn load_dataset(data_dir: &Path) -> Dataset {
    let dataset = DataDir::new(data_dir).load_all();
    let missing = dataset.missing_count();
    if missing > 0 {
        tracing::warn!(
            data_dir = %data_dir.display(),
            missing,
            "some data files are missing or unusable; affected charts show placeholders"
        );
    } else {
        tracing::debug!(data_dir = %data_dir.display(), "all data files loaded");
    }
    dataset
}

/// Client storage: the state file when given, memory otherwise. An unreadable
/// state file starts fresh.
pub fn open_store(state_file: Option<&Path>) -> ClientStore {
    let Some(path) = state_file else {
        return ClientStore::in_memory();
    };
    let store = ClientStore::with_file(path);
    if let Err(err) = store.load() {
        tracing::warn!(
            path = %path.display(),
            error = %err,
            "state file unreadable; starting with empty client state"
        );
    }
    store
}

/// Build the page described by `opts` into `opts.out`.
pub fn build_site(opts: &Opts) -> Result<BuildReport, BuildError> {
    let dataset = load_dataset(&opts.data_dir);
    let store = open_store(opts.state_file.as_deref());
    let mut gate = DisclaimerGate::evaluate(&store, opts.viewport_width);
    if opts.dismiss_disclaimer {
        gate.dismiss()?;
    }
    let disclaimer = MobileDisclaimer::from_gate(&gate);

    let detail = DetailModeProvider::new(opts.detail);
    let page = StoryPage::mount(
        Viewport::new(opts.viewport_width, opts.viewport_height),
        Instant::now(),
    );
    let html = page.render_document(&dataset, &detail, disclaimer);

    fs::create_dir_all(&opts.out).map_err(|source| BuildError::Write {
        path: opts.out.clone(),
        source,
    })?;
    let index = opts.out.join(INDEX_FILE);
    fs::write(&index, &html).map_err(|source| BuildError::Write {
        path: index.clone(),
        source,
    })?;
    tracing::info!(path = %index.display(), bytes = html.len(), "page written");

    Ok(BuildReport {
        index,
        bytes: html.len(),
        missing_data_files: dataset.missing_count(),
        disclaimer_open: disclaimer.is_open(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_names_the_path() {
        let err = BuildError::Write {
            path: PathBuf::from("dist/index.html"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot write dist/index.html: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn corrupt_state_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2").unwrap();
        let store = open_store(Some(&path));
        assert!(store.is_empty());
    }

    #[test]
    fn no_state_file_means_memory() {
        assert_eq!(open_store(None).backend_name(), "MemoryStorage");
    }
}
