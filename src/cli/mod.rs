//! # Command-Line Interface
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `sync [PATH]` | Rewrite quote blocks in every document under PATH |
//! | `check [PATH]` | Fail if any document has out-of-date quotes; writes nothing |
//! | `order [PATH]` | Print the order documents are rewritten in |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - The full run report as JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! mdquote --verbose sync docs
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod sync_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
