//! Display height policy for blocks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::BlockDescriptor;

/// Extra pixels added below a block's declared minimum unless configured otherwise.
pub const DEFAULT_BUFFER: u32 = 30;

/// Turns a block's declared minimum height into the height actually reserved for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightResolver {
    pub default_buffer: u32,
}

impl Default for HeightResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER)
    }
}

impl HeightResolver {
    pub fn new(default_buffer: u32) -> Self {
        Self { default_buffer }
    }

    /// `declared_min_height + buffer`, never below the declared minimum.
    pub fn resolve(&self, descriptor: &BlockDescriptor, buffer: Option<u32>) -> u32 {
        let buffer = buffer.unwrap_or(self.default_buffer);
        let height = descriptor.declared_min_height.saturating_add(buffer);
        debug!(id = %descriptor.id, height, buffer, "resolved block height");
        height
    }
}
