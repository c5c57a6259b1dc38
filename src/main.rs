mod cli;

use crate::cli::Cli;
use clap::Parser;
use exn::ResultExt;
use offmark::Converter;
use offmark::error::{ErrorKind, Result};
use offmark_config::Config;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.markdown.clone() {
        Some(markdown) => batch(&cli, &markdown),
        None => interactive(&cli),
    }
}

fn converter(cli: &Cli) -> Result<Converter> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    cli.apply(&mut config);
    Converter::from_config(&config)
}

fn convert(cli: &Cli, markdown: &Path) -> Result<PathBuf> {
    converter(cli)?.convert(markdown)
}

/// Converts one file, printing the output path or the error.
fn batch(cli: &Cli, markdown: &Path) -> ExitCode {
    match convert(cli, markdown) {
        Ok(output) => {
            println!("{}", output.display());
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

/// Picks a file with a dialog and reports the outcome in another dialog.
/// Never fails the process.
#[cfg(feature = "gui")]
fn interactive(cli: &Cli) -> ExitCode {
    use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

    let Some(markdown) = FileDialog::new()
        .set_title("Select a Markdown file")
        .add_filter("Markdown files", &["md", "markdown"])
        .add_filter("All files", &["*"])
        .pick_file()
    else {
        tracing::info!("No file selected");
        return ExitCode::SUCCESS;
    };
    let (level, title, description) = match convert(cli, &markdown) {
        Ok(output) => (MessageLevel::Info, "Conversion complete", format!("Generated:\n{}", output.display())),
        Err(err) => {
            tracing::error!("{err:?}");
            (MessageLevel::Error, "Conversion failed", format!("{err:?}"))
        },
    };
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
    ExitCode::SUCCESS
}

#[cfg(not(feature = "gui"))]
fn interactive(_cli: &Cli) -> ExitCode {
    eprintln!("No Markdown file given. Pass a path, or build with `--features gui` for a file picker.");
    ExitCode::SUCCESS
}
