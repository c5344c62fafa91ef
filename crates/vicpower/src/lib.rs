#![forbid(unsafe_code)]

//! The vicpower binary's building blocks.
//!
//! - [`cli`]: option parsing with `VICPOWER_*` overrides.
//! - [`logging`]: stderr subscriber setup.
//! - [`story`]: static content and section order.
//! - [`page`]: mounts the story and renders the document.
//! - [`build`]: writes the static site.
//! - [`trace`]: scroll simulation as JSON Lines.

pub mod build;
pub mod cli;
pub mod logging;
pub mod page;
pub mod story;
pub mod trace;

pub use build::{BuildError, BuildReport, build_site};
pub use cli::{CliError, Invocation, LogFormat, Opts};
pub use page::{StoryPage, Viewport};
