#![forbid(unsafe_code)]

//! Graceful loading of the data directory.
//!
//! Every public `load_*` method swallows its error: a missing or malformed
//! file logs a warning and yields an empty `Vec` (or `None`), so one bad file
//! degrades one chart to its placeholder and nothing else. The `try_load_*`
//! variants expose the underlying [`DataError`] for callers that want it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::results::{FevdFullRow, FevdTrendPoint, ModelReadyPoint, RenSharePoint, RollingBetaPoint};

/// Rolling pass-through estimates.
pub const ROLLING_BETA_FILE: &str = "rolling_beta.json";
/// FEVD at the headline horizon, demand ordered first.
pub const FEVD_DEMAND_FIRST_FILE: &str = "fevd_full_demand_first.json";
/// FEVD at the headline horizon, renewables ordered first.
pub const FEVD_REN_FIRST_FILE: &str = "fevd_full_ren_first.json";
/// Rolling-window FEVD shares.
pub const FEVD_TREND_FILE: &str = "fevd_trend.json";
/// Monthly renewable share.
pub const REN_SHARE_FILE: &str = "ren_share_series.json";
/// Model input panel.
pub const MODEL_READY_FILE: &str = "model_ready.json";

/// Why a data file could not be used.
#[derive(Debug)]
pub enum DataError {
    /// The file could not be read.
    Io { file: PathBuf, source: io::Error },
    /// The file is not valid JSON for the expected type.
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },
    /// The JSON parsed but does not hold what the chart needs.
    Shape { file: PathBuf, message: String },
}

impl DataError {
    /// The offending file.
    pub fn file(&self) -> &Path {
        match self {
            DataError::Io { file, .. } | DataError::Parse { file, .. } | DataError::Shape { file, .. } => {
                file
            }
        }
    }

    /// Whether the file simply does not exist.
    pub fn is_missing(&self) -> bool {
        matches!(self, DataError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io { file, source } => write!(f, "cannot read {}: {source}", file.display()),
            DataError::Parse { file, source } => {
                write!(f, "cannot parse {}: {source}", file.display())
            }
            DataError::Shape { file, message } => {
                write!(f, "unexpected shape in {}: {message}", file.display())
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io { source, .. } => Some(source),
            DataError::Parse { source, .. } => Some(source),
            DataError::Shape { .. } => None,
        }
    }
}

/// FEVD files hold a one-element array; a bare object is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Everything the page renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rolling_beta: Vec<RollingBetaPoint>,
    pub fevd_demand_first: Option<FevdFullRow>,
    pub fevd_ren_first: Option<FevdFullRow>,
    pub fevd_trend: Vec<FevdTrendPoint>,
    pub ren_share: Vec<RenSharePoint>,
    pub model_ready: Vec<ModelReadyPoint>,
}

impl Dataset {
    /// Number of files that produced no data.
    pub fn missing_count(&self) -> usize {
        [
            self.rolling_beta.is_empty(),
            self.fevd_demand_first.is_none(),
            self.fevd_ren_first.is_none(),
            self.fevd_trend.is_empty(),
            self.ren_share.is_empty(),
            self.model_ready.is_empty(),
        ]
        .into_iter()
        .filter(|missing| *missing)
        .count()
    }
}

/// A directory of pipeline outputs.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Point at `root`. Nothing is read until a loader is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a file in the directory.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, DataError> {
        let file = self.path_of(name);
        let text = fs::read_to_string(&file).map_err(|source| DataError::Io {
            file: file.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DataError::Parse { file, source })
    }

    fn read_first_row(&self, name: &str) -> Result<FevdFullRow, DataError> {
        match self.read_json::<OneOrMany<FevdFullRow>>(name)? {
            OneOrMany::One(row) => Ok(row),
            OneOrMany::Many(rows) => rows.into_iter().next().ok_or_else(|| DataError::Shape {
                file: self.path_of(name),
                message: "expected at least one row".to_string(),
            }),
        }
    }

    /// Rolling beta series, or the error.
    pub fn try_load_rolling_beta(&self) -> Result<Vec<RollingBetaPoint>, DataError> {
        self.read_json(ROLLING_BETA_FILE)
    }

    /// Demand-first FEVD row, or the error.
    pub fn try_load_fevd_demand_first(&self) -> Result<FevdFullRow, DataError> {
        self.read_first_row(FEVD_DEMAND_FIRST_FILE)
    }

    /// Renewables-first FEVD row, or the error.
    pub fn try_load_fevd_ren_first(&self) -> Result<FevdFullRow, DataError> {
        self.read_first_row(FEVD_REN_FIRST_FILE)
    }

    /// FEVD trend series, or the error.
    pub fn try_load_fevd_trend(&self) -> Result<Vec<FevdTrendPoint>, DataError> {
        self.read_json(FEVD_TREND_FILE)
    }

    /// Renewable share series, or the error.
    pub fn try_load_ren_share(&self) -> Result<Vec<RenSharePoint>, DataError> {
        self.read_json(REN_SHARE_FILE)
    }

    /// Model input panel, or the error.
    pub fn try_load_model_ready(&self) -> Result<Vec<ModelReadyPoint>, DataError> {
        self.read_json(MODEL_READY_FILE)
    }

    /// Rolling beta series; empty on failure.
    pub fn load_rolling_beta(&self) -> Vec<RollingBetaPoint> {
        or_empty(self.try_load_rolling_beta())
    }

    /// Demand-first FEVD row; `None` on failure.
    pub fn load_fevd_demand_first(&self) -> Option<FevdFullRow> {
        or_none(self.try_load_fevd_demand_first())
    }

    /// Renewables-first FEVD row; `None` on failure.
    pub fn load_fevd_ren_first(&self) -> Option<FevdFullRow> {
        or_none(self.try_load_fevd_ren_first())
    }

    /// FEVD trend series; empty on failure.
    pub fn load_fevd_trend(&self) -> Vec<FevdTrendPoint> {
        or_empty(self.try_load_fevd_trend())
    }

    /// Renewable share series; empty on failure.
    pub fn load_ren_share(&self) -> Vec<RenSharePoint> {
        or_empty(self.try_load_ren_share())
    }

    /// Model input panel; empty on failure.
    pub fn load_model_ready(&self) -> Vec<ModelReadyPoint> {
        or_empty(self.try_load_model_ready())
    }

    /// Load every file.
    pub fn load_all(&self) -> Dataset {
        let dataset = Dataset {
            rolling_beta: self.load_rolling_beta(),
            fevd_demand_first: self.load_fevd_demand_first(),
            fevd_ren_first: self.load_fevd_ren_first(),
            fevd_trend: self.load_fevd_trend(),
            ren_share: self.load_ren_share(),
            model_ready: self.load_model_ready(),
        };
        tracing::info!(
            dir = %self.root.display(),
            missing = dataset.missing_count(),
            "data directory loaded"
        );
        dataset
    }
}

fn report(err: &DataError) {
    if err.is_missing() {
        tracing::warn!(file = %err.file().display(), "data file missing; chart will show placeholder");
    } else {
        tracing::warn!(file = %err.file().display(), error = %err, "data file unusable; chart will show placeholder");
    }
}

fn or_empty<T>(result: Result<Vec<T>, DataError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        report(&err);
        Vec::new()
    })
}

fn or_none<T>(result: Result<T, DataError>) -> Option<T> {
    result.map_err(|err| report(&err)).ok()
}
