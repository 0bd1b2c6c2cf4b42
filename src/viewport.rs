//! Viewport size, pixel ratio and the width-dependent initial layout.

/// Widths below (camera) or not above (tooltips) this value count as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;
/// The renderer never draws at more than twice the logical resolution.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical window size plus the device pixel ratio reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Build a viewport from a physical size as reported by winit.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            f64::from(width) / scale_factor,
            f64::from(height) / scale_factor,
            scale_factor,
        )
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Size of the drawing buffer in pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            (self.width * ratio).round().max(1.0) as u32,
            (self.height * ratio).round().max(1.0) as u32,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TooltipMode {
    Desktop,
    Mobile,
}

/// Layout decisions taken once, when the page loads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub tooltips: TooltipMode,
    pub camera_distance: f32,
}

impl Layout {
    pub fn for_width(width: f64) -> Self {
        let tooltips = if width > MOBILE_BREAKPOINT {
            TooltipMode::Desktop
        } else {
            TooltipMode::Mobile
        };
        let camera_distance = if width < MOBILE_BREAKPOINT { 7.5 } else { 5.0 };
        Self {
            tooltips,
            camera_distance,
        }
    }
}
