//! Renders the portfolio page: loads the content documents and fills the
//! page template with them.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod icons;
pub mod render;
pub mod sections;
pub mod source;

pub use config::SiteData;
pub use render::{render_page, RenderError};
pub use source::{load_site, DirSource, LoadError, ResourceSource};
