#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Arguments are parsed by hand. Every option can also come from a
//! `VICPOWER_*` environment variable; explicit flags win over the
//! environment, which wins over the defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use vicpower_runtime::DetailMode;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
vicpower: the Victorian wholesale electricity story, as a static page

USAGE:
    vicpower [OPTIONS]

OPTIONS:
    --data-dir=PATH          Directory holding the result JSON files (default: public/data)
    --out=PATH               Output directory for index.html (default: dist)
    --detail=MODE            Narrative detail: 'compact' (default) or 'detailed'
    --viewport-width=PX      Viewport width used for layout and the disclaimer (default: 1440)
    --viewport-height=PX     Viewport height used for layout (default: 900)
    --state-file=PATH        Persist client flags (disclaimer dismissal) to this JSON file
    --dismiss-disclaimer     Dismiss the small-screen disclaimer and remember it
    --trace                  Simulate scrolling the page and print one JSON line per activation
    --scroll-step=PX         Scroll distance per simulated frame (default: 120)
    --log-format=FORMAT      Log output on stderr: 'text' (default) or 'json'
    --help, -h               Show this help message
    --version, -V            Show version

FILES READ FROM --data-dir:
    rolling_beta.json              Rolling gas pass-through estimates
    fevd_full_demand_first.json    FEVD shares, demand ordered first
    fevd_full_ren_first.json       FEVD shares, renewables ordered first
    fevd_trend.json                FEVD shares over time
    ren_share_series.json          Monthly renewables share
    model_ready.json               Monthly gas, price and renewables inputs

ENVIRONMENT VARIABLES:
    VICPOWER_DATA_DIR          Override --data-dir
    VICPOWER_OUT               Override --out
    VICPOWER_DETAIL            Override --detail
    VICPOWER_VIEWPORT_WIDTH    Override --viewport-width
    VICPOWER_VIEWPORT_HEIGHT   Override --viewport-height
    VICPOWER_STATE_FILE        Override --state-file
    VICPOWER_SCROLL_STEP       Override --scroll-step
    VICPOWER_LOG_FORMAT        Override --log-format
    VICPOWER_LOG               Log filter directives (falls back to RUST_LOG, then 'info')";

/// How log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Directory holding the result JSON files.
    pub data_dir: PathBuf,
    /// Output directory.
    pub out: PathBuf,
    /// Initial narrative detail level.
    pub detail: DetailMode,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Where client flags persist. In-memory when absent.
    pub state_file: Option<PathBuf>,
    /// Dismiss the disclaimer before rendering.
    pub dismiss_disclaimer: bool,
    /// Print a scroll trace instead of writing the page.
    pub trace: bool,
    /// Pixels per simulated scroll frame.
    pub scroll_step: f64,
    pub log_format: LogFormat,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public/data"),
            out: PathBuf::from("dist"),
            detail: DetailMode::Compact,
            viewport_width: 1440.0,
            viewport_height: 900.0,
            state_file: None,
            dismiss_disclaimer: false,
            trace: false,
            scroll_step: 120.0,
            log_format: LogFormat::Text,
        }
    }
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Opts),
    Help,
    Version,
}

/// A bad command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A flag was given a value it cannot take.
    InvalidValue { flag: &'static str, value: String },
    /// An argument no option recognises.
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

fn positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn invalid(flag: &'static str, value: &str) -> CliError {
    CliError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits when asked to; prints the error and
    /// exits with status 2 on a bad command line.
    pub fn parse() -> Self {
        match Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok()) {
            Ok(Invocation::Run(opts)) => opts,
            Ok(Invocation::Help) => {
                println!("{HELP_TEXT}");
                std::process::exit(0);
            }
            Ok(Invocation::Version) => {
                println!("vicpower {VERSION}");
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                std::process::exit(2);
            }
        }
    }

    /// Parse `args` (without the program name) over environment values read
    /// through `env`.
    pub fn from_sources<I, S>(
        args: I,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Invocation, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();
        opts.apply_env(&env);

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--version" | "-V" => return Ok(Invocation::Version),
                "--trace" => opts.trace = true,
                "--dismiss-disclaimer" => opts.dismiss_disclaimer = true,
                other => {
                    if let Some(val) = other.strip_prefix("--data-dir=") {
                        opts.data_dir = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--out=") {
                        opts.out = PathBuf::from(val);
                    } else if let Some(val) = other.strip_prefix("--detail=") {
                        opts.detail = val.parse::<DetailMode>().map_err(|_| invalid("--detail", val))?;
                    } else if let Some(val) = other.strip_prefix("--viewport-width=") {
                        opts.viewport_width =
                            positive(val).ok_or_else(|| invalid("--viewport-width", val))?;
                    } else if let Some(val) = other.strip_prefix("--viewport-height=") {
                        opts.viewport_height =
                            positive(val).ok_or_else(|| invalid("--viewport-height", val))?;
                    } else if let Some(val) = other.strip_prefix("--state-file=") {
                        opts.state_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--scroll-step=") {
                        opts.scroll_step =
                            positive(val).ok_or_else(|| invalid("--scroll-step", val))?;
                    } else if let Some(val) = other.strip_prefix("--log-format=") {
                        opts.log_format = val.parse::<LogFormat>().map_err(|_| invalid("--log-format", val))?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Invocation::Run(opts))
    }

    // Unparsable environment values are ignored.
    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) {
        if let Some(val) = env("VICPOWER_DATA_DIR") {
            self.data_dir = PathBuf::from(val);
        }
        if let Some(val) = env("VICPOWER_OUT") {
            self.out = PathBuf::from(val);
        }
        if let Some(mode) = env("VICPOWER_DETAIL").and_then(|v| v.parse::<DetailMode>().ok()) {
            self.detail = mode;
        }
        if let Some(w) = env("VICPOWER_VIEWPORT_WIDTH").and_then(|v| positive(&v)) {
            self.viewport_width = w;
        }
        if let Some(h) = env("VICPOWER_VIEWPORT_HEIGHT").and_then(|v| positive(&v)) {
            self.viewport_height = h;
        }
        if let Some(val) = env("VICPOWER_STATE_FILE") {
            self.state_file = Some(PathBuf::from(val));
        }
        if let Some(step) = env("VICPOWER_SCROLL_STEP").and_then(|v| positive(&v)) {
            self.scroll_step = step;
        }
        if let Some(format) = env("VICPOWER_LOG_FORMAT").and_then(|v| v.parse::<LogFormat>().ok()) {
            self.log_format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(args: &[&str]) -> Opts {
        match Opts::from_sources(args.iter().copied(), no_env) {
            Ok(Invocation::Run(opts)) => opts,
            other => panic!("expected options, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.data_dir, PathBuf::from("public/data"));
        assert_eq!(opts.out, PathBuf::from("dist"));
        assert_eq!(opts.detail, DetailMode::Compact);
        assert_eq!(opts.viewport_width, 1440.0);
        assert!(!opts.trace);
        assert_eq!(opts.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run(&[
            "--data-dir=/tmp/data",
            "--detail=detailed",
            "--viewport-width=375",
            "--trace",
            "--scroll-step=80.5",
            "--log-format=json",
            "--dismiss-disclaimer",
        ]);
        assert_eq!(opts.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(opts.detail, DetailMode::Detailed);
        assert_eq!(opts.viewport_width, 375.0);
        assert!(opts.trace);
        assert_eq!(opts.scroll_step, 80.5);
        assert_eq!(opts.log_format, LogFormat::Json);
        assert!(opts.dismiss_disclaimer);
    }

    #[test]
    fn flags_override_environment() {
        let env: HashMap<&str, &str> = [
            ("VICPOWER_DETAIL", "detailed"),
            ("VICPOWER_OUT", "site"),
            ("VICPOWER_VIEWPORT_HEIGHT", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let Ok(Invocation::Run(opts)) = Opts::from_sources(["--out=public"], lookup) else {
            panic!("expected options");
        };
        assert_eq!(opts.detail, DetailMode::Detailed);
        assert_eq!(opts.out, PathBuf::from("public"));
        assert_eq!(opts.viewport_height, 900.0);
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(
            Opts::from_sources(["--help", "--bogus"], no_env),
            Ok(Invocation::Help)
        );
        assert_eq!(Opts::from_sources(["-V"], no_env), Ok(Invocation::Version));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            Opts::from_sources(["--detail=verbose"], no_env),
            Err(CliError::InvalidValue {
                flag: "--detail",
                value: "verbose".into()
            })
        );
        assert!(Opts::from_sources(["--scroll-step=0"], no_env).is_err());
        assert!(Opts::from_sources(["--viewport-width=NaN"], no_env).is_err());
        assert_eq!(
            Opts::from_sources(["--frobnicate"], no_env),
            Err(CliError::UnknownArgument("--frobnicate".into()))
        );
    }

    #[test]
    fn help_text_lists_every_env_override() {
        for var in [
            "VICPOWER_DATA_DIR",
            "VICPOWER_OUT",
            "VICPOWER_DETAIL",
            "VICPOWER_VIEWPORT_WIDTH",
            "VICPOWER_VIEWPORT_HEIGHT",
            "VICPOWER_STATE_FILE",
            "VICPOWER_SCROLL_STEP",
            "VICPOWER_LOG_FORMAT",
            "VICPOWER_LOG",
        ] {
            assert!(HELP_TEXT.contains(var), "{var} missing from help");
        }
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
