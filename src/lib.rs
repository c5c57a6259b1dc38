//! Converts a Markdown document into a single, self-contained offline HTML
//! file: stylesheets and scripts are inlined from a local cache, local images
//! become data URIs, and a sidebar table of contents is generated from the
//! headings.
//!
//! ```no_run
//! use offmark::Converter;
//! use offmark_config::Config;
//!
//! # fn main() -> offmark::error::Result<()> {
//! let converter = Converter::from_config(&Config::default())?;
//! let html = converter.convert("README.md")?;
//! println!("{}", html.display());
//! # Ok(())
//! # }
//! ```

mod convert;
pub mod error;

pub use crate::convert::{Converter, OUTPUT_EXTENSION, output_path};
