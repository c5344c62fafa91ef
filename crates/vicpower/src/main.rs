#![forbid(unsafe_code)]

//! vicpower binary entry point.

use std::process::ExitCode;

use vicpower::page::Viewport;
use vicpower::{build, cli, logging, trace};

fn run(opts: &cli::Opts) -> Result<(), build::BuildError> {
    if opts.trace {
        let lines = trace::record(
            Viewport::new(opts.viewport_width, opts.viewport_height),
            opts.scroll_step,
        );
        return trace::write_jsonl(&lines, std::io::stdout().lock());
    }
    let report = build::build_site(opts)?;
    if report.missing_data_files > 0 {
        eprintln!(
            "wrote {} ({} data files missing)",
            report.index.display(),
            report.missing_data_files
        );
    } else {
        eprintln!("wrote {}", report.index.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = cli::Opts::parse();
    if let Err(e) = logging::init(opts.log_format) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "vicpower failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
