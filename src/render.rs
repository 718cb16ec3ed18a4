//! Rendering selected blocks onto a [`Surface`].
//!
//! [`Renderer::render`] is the one place where content kinds are dispatched.
//! Unknown ids are a caller bug and come back as [`RegistryError::NotFound`].
//! Everything that can go wrong with the content itself (a fragment that
//! cannot be fetched, a dataset that is missing, a chart that cannot be built)
//! turns into a [`RenderResult::Degraded`] for that one block.

use serde::Serialize;
use tracing::{debug, warn};

use crate::chart::{ChartBuilder, ChartObject};
use crate::height::HeightResolver;
use crate::model::{BlockContent, BlockDescriptor, Datasets};
use crate::registry::{Registry, RegistryError};
use crate::selector::Selection;
use crate::source::FragmentSource;

/// Host-managed output area. Calls are one-way and cannot fail.
pub trait Surface {
    /// Embed opaque markup in a region of the given height.
    fn embed(&mut self, markup: &str, height: u32);

    /// Lay out a built chart in a region of the given height.
    fn place_chart(&mut self, chart: &ChartObject, height: u32);

    /// Show the fallback for a block whose content was unavailable.
    fn placeholder(&mut self, _degraded: &Degraded) {}
}

/// Outcome of a degraded render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Degraded {
    pub id: String,
    /// User-facing explanation. Always names the block's label.
    pub message: String,
    /// Text shown where the content would have been.
    pub placeholder: String,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderResult {
    Rendered { id: String, height: u32 },
    Degraded(Degraded),
}

impl RenderResult {
    pub fn id(&self) -> &str {
        match self {
            RenderResult::Rendered { id, .. } => id,
            RenderResult::Degraded(d) => &d.id,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RenderResult::Degraded(_))
    }
}

/// Renders blocks from a registry using a fragment source and a chart builder.
pub struct Renderer<'r, S, C> {
    registry: &'r Registry,
    datasets: &'r Datasets,
    heights: HeightResolver,
    source: S,
    charts: C,
}

impl<'r, S: FragmentSource, C: ChartBuilder> Renderer<'r, S, C> {
    pub fn new(
        registry: &'r Registry,
        datasets: &'r Datasets,
        heights: HeightResolver,
        source: S,
        charts: C,
    ) -> Self {
        Self {
            registry,
            datasets,
            heights,
            source,
            charts,
        }
    }

    pub fn heights(&self) -> HeightResolver {
        self.heights
    }

    /// Render one block with the configured default buffer.
    ///
    /// A selection whose category does not match the block's is `NotFound`.
    pub fn render(
        &mut self,
        selection: &Selection,
        surface: &mut impl Surface,
    ) -> Result<RenderResult, RegistryError> {
        self.render_with_buffer(selection, None, surface)
    }

    pub fn render_with_buffer(
        &mut self,
        selection: &Selection,
        buffer: Option<u32>,
        surface: &mut impl Surface,
    ) -> Result<RenderResult, RegistryError> {
        let registry = self.registry;
        let descriptor = registry.get_in(selection.category, &selection.id)?;
        let height = self.heights.resolve(descriptor, buffer);

        let outcome = match &descriptor.content {
            BlockContent::Fragment { markup } => {
                surface.embed(markup, height);
                Ok(())
            }
            BlockContent::ExternalFragment { path } => self
                .source
                .fetch(path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    String::from_utf8(bytes)
                        .map_err(|_| format!("fragment {path} is not valid UTF-8"))
                })
                .map(|markup| surface.embed(&markup, height)),
            BlockContent::Chart { table, chart } => self
                .datasets
                .get(table)
                .ok_or_else(|| format!("dataset '{table}' is not loaded"))
                .and_then(|data| {
                    self.charts
                        .build_chart(data, chart)
                        .map_err(|e| format!("chart could not be built: {e}"))
                })
                .map(|built| surface.place_chart(&built, height)),
        };

        match outcome {
            Ok(()) => {
                debug!(id = %descriptor.id, height, "rendered block");
                Ok(RenderResult::Rendered {
                    id: descriptor.id.clone(),
                    height,
                })
            }
            Err(reason) => {
                let degraded = degrade(descriptor, height, &reason);
                warn!(id = %descriptor.id, %reason, "block degraded");
                surface.placeholder(&degraded);
                Ok(RenderResult::Degraded(degraded))
            }
        }
    }

    /// Render several blocks in order. A degraded block does not stop the rest.
    pub fn render_all<'s>(
        &mut self,
        selections: impl IntoIterator<Item = &'s Selection>,
        surface: &mut impl Surface,
    ) -> Result<Vec<RenderResult>, RegistryError> {
        let mut results = Vec::new();
        for selection in selections {
            results.push(self.render(selection, surface)?);
        }
        Ok(results)
    }
}

fn degrade(descriptor: &BlockDescriptor, height: u32, reason: &str) -> Degraded {
    Degraded {
        id: descriptor.id.clone(),
        message: format!(
            "Could not display \"{}\": {reason}.",
            descriptor.display_label
        ),
        placeholder: format!("{} is not available right now.", descriptor.display_label),
        height,
    }
}
