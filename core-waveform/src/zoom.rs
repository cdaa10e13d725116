//! Zoom control policy.
//!
//! Zoom levels index the rendering library's list of samples-per-pixel
//! scales; lower is more detailed. Zooming in moves toward the minimum,
//! zooming out toward the maximum.

use core_runtime::config::ZoomBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Enablement of the zoom buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomControls {
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
}

impl ZoomControls {
    /// Both buttons are disabled until a surface reports a level.
    pub fn for_level(level: Option<u32>, bounds: &ZoomBounds) -> Self {
        match level {
            Some(level) => Self {
                can_zoom_in: bounds.can_zoom_in(level),
                can_zoom_out: bounds.can_zoom_out(level),
            },
            None => Self::default(),
        }
    }

    pub fn allows(&self, direction: ZoomDirection) -> bool {
        match direction {
            ZoomDirection::In => self.can_zoom_in,
            ZoomDirection::Out => self.can_zoom_out,
        }
    }
}
