//! Markdown rendering and self-contained page assembly.
//!
//! - [`markdown_to_fragment`] turns Markdown into an HTML fragment.
//! - [`outline`] derives the sidebar table of contents from a fragment.
//! - [`PageRenderer`] wraps a fragment, its outline and inlined CSS/JS into a
//!   complete document with the dark two-column layout.

mod attrs;
pub mod error;
mod markdown;
mod outline;
mod page;
mod style;

pub use crate::attrs::Attributes;
pub use crate::markdown::to_fragment as markdown_to_fragment;
pub use crate::outline::{INDENT_STEP_PX, TocEntry, outline};
pub use crate::page::{DEFAULT_LANG, PAGE_TEMPLATE, PageRenderer};
pub use crate::style::{LAYOUT_STYLESHEET, StyleConfig};
