//! Command-line interface.

use clap::{ArgAction, Parser};
use offmark_config::Config;
use std::path::PathBuf;

/// Convert a Markdown file into a self-contained offline HTML page.
///
/// The page is written next to the source with an `.html` extension. Without
/// a MARKDOWN argument a file picker is opened instead.
#[derive(Debug, Parser)]
#[command(name = "offmark", version, about)]
pub struct Cli {
    /// Markdown file to convert.
    pub markdown: Option<PathBuf>,

    /// Configuration file to use instead of the per-user default.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for cached stylesheets and scripts.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Value of the document's `lang` attribute.
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Log more; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        }
    }

    /// Applies command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        if let Some(lang) = &self.lang {
            config.lang = lang.clone();
        }
    }
}
