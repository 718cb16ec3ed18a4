//! Declarative visual-block registry for static survey dashboards.
//!
//! A dashboard is a [`registry::Registry`] of [`model::BlockDescriptor`]s,
//! grouped into categories (tabs). The [`selector::Selector`] offers the blocks
//! of a tab to a picker, the [`render::Renderer`] turns a selection into output
//! on a [`render::Surface`], and [`page`] assembles a whole HTML page.
//!
//! The binary `dashblock` renders a manifest (or the built-in sample) to HTML.

pub mod chart;
pub mod color;
pub mod config;
pub mod height;
pub mod model;
pub mod page;
pub mod registry;
pub mod render;
pub mod sample;
pub mod selector;
pub mod source;

pub use config::{ConfigError, Dashboard, Manifest};
pub use height::{DEFAULT_BUFFER, HeightResolver};
pub use model::{BlockContent, BlockDescriptor, Category};
pub use registry::{Registry, RegistryError};
pub use render::{Degraded, RenderResult, Renderer, Surface};
pub use selector::{Availability, Selection, Selector};
pub use source::{FetchError, FragmentSource};
