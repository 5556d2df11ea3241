//! Draw target resource.
//!
//! Holds the framebuffer that playback systems compose frames onto during a
//! tick. It lives at a fixed resolution; presenting it is up to the host.

use bevy_ecs::prelude::Resource;

use crate::resources::raster::{Canvas, RasterSurface, Rgba};

#[derive(Resource, Debug, Clone)]
pub struct DrawTarget {
    /// The framebuffer pixels.
    pub canvas: Canvas,
    pub width: u32,
    pub height: u32,
}

impl DrawTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            width,
            height,
        }
    }

    pub fn surface_mut(&mut self) -> &mut dyn RasterSurface {
        &mut self.canvas
    }

    /// Wipe the framebuffer before composing the next tick.
    pub fn clear(&mut self) {
        self.canvas = Canvas::filled(self.width, self.height, Rgba::TRANSPARENT);
    }
}
