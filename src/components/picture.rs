//! Static bitmap display objects.
//!
//! - [`Picture`] shows a whole bitmap (or a fixed part of it) at a position.
//! - [`FilledTexture`] tiles a bitmap over a rectangle.

use bevy_ecs::prelude::Component;
use log::warn;

use crate::resources::raster::{
    BlitParams, PlayerColor, Point, RasterSurface, Rect, Rgba, Surface, SurfaceFactory,
    draw_image,
};

#[derive(Component)]
pub struct Picture {
    surface: Option<Box<dyn Surface>>,
    src_rect: Option<Rect>,
    pub pos: Rect,
    /// Redraw on every [`Picture::show`], not only on [`Picture::show_all`].
    pub need_refresh: bool,
}

impl Picture {
    pub fn from_surface(surface: Box<dyn Surface>, x: i32, y: i32) -> Self {
        let pos = Rect::new(x, y, surface.width(), surface.height());
        Self {
            surface: Some(surface),
            src_rect: None,
            pos,
            need_refresh: false,
        }
    }

    /// Load a named bitmap. A missing bitmap gives an empty picture.
    pub fn from_bitmap(factory: &dyn SurfaceFactory, name: &str, x: i32, y: i32) -> Self {
        match factory.load_bitmap(name) {
            Some(surface) => Self::from_surface(surface, x, y),
            None => {
                warn!("Bitmap {} not found", name);
                Self {
                    surface: None,
                    src_rect: None,
                    pos: Rect::new(x, y, 0, 0),
                    need_refresh: false,
                }
            }
        }
    }

    /// Solid rectangle of `color` covering `rect`.
    pub fn filled(
        factory: &dyn SurfaceFactory,
        rect: Rect,
        color: Rgba,
        screen_format: bool,
    ) -> Self {
        let mut surface = factory.new_surface(rect.w, rect.h, screen_format);
        surface.fill(color);
        Self {
            surface: Some(surface),
            src_rect: None,
            pos: rect,
            need_refresh: false,
        }
    }

    /// Show only `src` of `surface`.
    pub fn with_src_rect(surface: Box<dyn Surface>, src: Rect, x: i32, y: i32) -> Self {
        Self {
            surface: Some(surface),
            src_rect: Some(src),
            pos: Rect::new(x, y, src.w, src.h),
            need_refresh: false,
        }
    }

    pub fn surface(&self) -> Option<&dyn Surface> {
        self.surface.as_deref()
    }

    /// Replace the bitmap; the size follows the source rect or the new bitmap.
    pub fn set_surface(&mut self, surface: Box<dyn Surface>) {
        match self.src_rect {
            Some(src) => {
                self.pos.w = src.w;
                self.pos.h = src.h;
            }
            None => {
                self.pos.w = surface.width();
                self.pos.h = surface.height();
            }
        }
        self.surface = Some(surface);
    }

    pub fn show(&self, target: &mut dyn RasterSurface) {
        if self.need_refresh {
            self.show_all(target);
        }
    }

    pub fn show_all(&self, target: &mut dyn RasterSurface) {
        let Some(surface) = self.surface.as_deref() else {
            return;
        };
        match self.src_rect {
            // The source part is drawn at the picture position.
            Some(src) => {
                let at = self.pos.top_left();
                let origin = Point::new(at.x - src.x, at.y - src.y);
                draw_image(surface, target, origin, Some(src), BlitParams::default());
            }
            None => draw_image(surface, target, self.pos.top_left(), None, BlitParams::default()),
        }
    }

    pub fn convert_to_screen_bpp(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.convert_to_screen();
        }
    }

    pub fn set_alpha(&mut self, value: u32) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_alpha(value.min(255) as u8);
        }
    }

    /// Resize the bitmap to `width` x `height`.
    pub fn scale_to(&mut self, width: u32, height: u32) {
        if let Some(scaled) = self.surface.as_ref().map(|s| s.scaled(width, height)) {
            self.set_surface(scaled);
        }
    }

    pub fn colorize(&mut self, player: PlayerColor) {
        if let Some(surface) = self.surface.as_mut() {
            surface.player_colored(player);
        }
    }

    pub fn colorize_and_convert(&mut self, player: PlayerColor) {
        self.colorize(player);
        self.convert_to_screen_bpp();
    }
}

/// Bitmap repeated over a rectangle.
#[derive(Component)]
pub struct FilledTexture {
    texture: Option<Box<dyn Surface>>,
    pub pos: Rect,
}

impl FilledTexture {
    pub fn new(factory: &dyn SurfaceFactory, image_name: &str, position: Rect) -> Self {
        let texture = factory.load_bitmap(image_name);
        if texture.is_none() {
            warn!("Texture {} not found", image_name);
        }
        Self {
            texture,
            pos: position,
        }
    }

    pub fn show_all(&self, target: &mut dyn RasterSurface) {
        if let Some(texture) = self.texture.as_deref() {
            target.fill_texture(texture, self.pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::raster::{Canvas, CanvasFactory};

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const GREEN: Rgba = Rgba::opaque(0, 255, 0);

    fn factory() -> CanvasFactory {
        let mut tile = Canvas::filled(2, 2, GREEN);
        tile.set_pixel(0, 0, Rgba::opaque(0, 0, 180));
        CanvasFactory::new().with_bitmap("tile", tile)
    }

    #[test]
    fn test_from_bitmap_missing_is_empty() {
        let pic = Picture::from_bitmap(&factory(), "nope", 3, 4);
        assert!(pic.surface().is_none());
        assert_eq!(pic.pos, Rect::new(3, 4, 0, 0));
        let mut target = Canvas::new(4, 4);
        pic.show_all(&mut target);
        assert!(target.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_filled_picture_covers_rect() {
        let pic = Picture::filled(&factory(), Rect::new(1, 1, 2, 2), RED, true);
        let mut target = Canvas::new(4, 4);
        pic.show_all(&mut target);
        assert_eq!(target.pixel_at(2, 2), Some(RED));
        assert_eq!(target.pixel_at(3, 3), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_show_only_draws_when_refresh_needed() {
        let mut pic = Picture::filled(&factory(), Rect::new(0, 0, 1, 1), RED, true);
        let mut target = Canvas::new(1, 1);
        pic.show(&mut target);
        assert_eq!(target.pixel_at(0, 0), Some(Rgba::TRANSPARENT));
        pic.need_refresh = true;
        pic.show(&mut target);
        assert_eq!(target.pixel_at(0, 0), Some(RED));
    }

    #[test]
    fn test_src_rect_part_lands_at_position() {
        let mut bmp = Canvas::new(4, 4);
        bmp.set_pixel(3, 2, RED);
        let pic = Picture::with_src_rect(Box::new(bmp), Rect::new(3, 2, 1, 1), 0, 0);
        let mut target = Canvas::new(4, 4);
        pic.show_all(&mut target);
        assert_eq!(target.pixel_at(0, 0), Some(RED));
    }

    #[test]
    fn test_scale_to_updates_size() {
        let mut pic = Picture::from_bitmap(&factory(), "tile", 0, 0);
        pic.scale_to(6, 4);
        assert_eq!((pic.pos.w, pic.pos.h), (6, 4));
        assert_eq!(pic.surface().unwrap().width(), 6);
    }

    #[test]
    fn test_colorize_and_convert() {
        let mut pic = Picture::from_bitmap(&factory(), "tile", 0, 0);
        pic.colorize_and_convert(PlayerColor(0));
        let s = pic.surface().unwrap();
        assert_eq!(s.pixel(0, 0), Rgba::opaque(180, 0, 0));
        assert_eq!(s.pixel(1, 1), GREEN);
        assert_eq!(s.color_key(), Some(Rgba::DEFAULT_KEY));
    }

    #[test]
    fn test_set_alpha_clamps() {
        let mut pic = Picture::from_bitmap(&factory(), "tile", 0, 0);
        pic.set_alpha(4000);
        assert_eq!(pic.surface().unwrap().alpha_mod(), 255);
    }

    #[test]
    fn test_filled_texture_tiles_inside_its_rect() {
        let tex = FilledTexture::new(&factory(), "tile", Rect::new(0, 0, 3, 3));
        let mut target = Canvas::new(5, 5);
        tex.show_all(&mut target);
        assert_eq!(target.pixel_at(2, 2), Some(Rgba::opaque(0, 0, 180)));
        assert_eq!(target.pixel_at(1, 2), Some(GREEN));
        assert_eq!(target.pixel_at(3, 3), Some(Rgba::TRANSPARENT));
    }
}
