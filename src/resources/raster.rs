//! Raster surfaces: bitmaps, draw targets and the in-memory backend.
//!
//! Playback code never touches pixels directly. It talks to two traits:
//!
//! - [`Surface`] – a bitmap (a decoded frame, a picture, a texture).
//! - [`RasterSurface`] – something frames can be composed onto.
//!
//! [`Canvas`] implements both with a plain RGBA buffer, and [`CanvasFactory`]
//! hands out canvases by name. A windowed client would provide its own
//! implementations backed by GPU textures.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Integer position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Overlapping part of two rectangles, `None` when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, (right - x) as u32, (bottom - y) as u32))
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    /// Colour treated as transparent once a surface is converted to screen format.
    pub const DEFAULT_KEY: Rgba = Rgba::new(0, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Source-over blend of `self` onto `dst` with coverage `alpha` (0-255).
    fn blend_over(self, dst: Rgba, alpha: u32) -> Rgba {
        let inv = 255 - alpha;
        let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * inv) / 255) as u8;
        Rgba {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: (alpha + u32::from(dst.a) * inv / 255) as u8,
        }
    }
}

/// Player identifier used for palette remapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerColor(pub u8);

impl PlayerColor {
    pub const NEUTRAL: PlayerColor = PlayerColor(255);

    const PALETTE: [Rgba; 8] = [
        Rgba::opaque(0xff, 0x00, 0x00),
        Rgba::opaque(0x31, 0x52, 0xff),
        Rgba::opaque(0x9c, 0x73, 0x52),
        Rgba::opaque(0x42, 0x94, 0x29),
        Rgba::opaque(0xff, 0x84, 0x00),
        Rgba::opaque(0x8c, 0x29, 0xa5),
        Rgba::opaque(0x09, 0x9c, 0xa5),
        Rgba::opaque(0xc6, 0x7b, 0x8c),
    ];

    /// Signature colour of this player; unknown ids map to neutral grey.
    pub fn rgb(self) -> Rgba {
        Self::PALETTE
            .get(usize::from(self.0))
            .copied()
            .unwrap_or(Rgba::opaque(0x84, 0x84, 0x84))
    }
}

/// Per-blit transform applied by the draw target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitParams {
    pub alpha: u8,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Default for BlitParams {
    fn default() -> Self {
        Self {
            alpha: 255,
            flip_h: false,
            flip_v: false,
        }
    }
}

/// A bitmap that can be composed onto a [`RasterSurface`].
pub trait Surface: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Pixel at `(x, y)`; callers keep coordinates within bounds.
    fn pixel(&self, x: u32, y: u32) -> Rgba;
    /// Colour skipped when blitting, if any.
    fn color_key(&self) -> Option<Rgba>;
    /// Surface-wide alpha modulation.
    fn alpha_mod(&self) -> u8;
    fn set_alpha(&mut self, alpha: u8);
    fn fill(&mut self, color: Rgba);
    /// Remap the blue "player" hues to `player`'s colour.
    fn player_colored(&mut self, player: PlayerColor);
    /// Convert to the display format and enable the default colour key.
    fn convert_to_screen(&mut self);
    /// Copy resized to `width` x `height`.
    fn scaled(&self, width: u32, height: u32) -> Box<dyn Surface>;

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}

/// Draw target accepting blit requests.
pub trait RasterSurface {
    /// Copy `src` (in `source` coordinates) so its top-left lands on `dst`.
    fn blit(&mut self, source: &dyn Surface, src: Rect, dst: Point, params: BlitParams);

    /// Tile `texture` over `area`, never drawing outside of it.
    fn fill_texture(&mut self, texture: &dyn Surface, area: Rect) {
        let (tw, th) = (texture.width(), texture.height());
        if tw == 0 || th == 0 {
            return;
        }
        let mut y = area.y;
        while y < area.bottom() {
            let h = th.min((area.bottom() - y) as u32);
            let mut x = area.x;
            while x < area.right() {
                let w = tw.min((area.right() - x) as u32);
                self.blit(
                    texture,
                    Rect::new(0, 0, w, h),
                    Point::new(x, y),
                    BlitParams::default(),
                );
                x += tw as i32;
            }
            y += th as i32;
        }
    }
}

/// Draw `image` with its origin at `at`.
///
/// When `src` is given only that part of the image is drawn, still placed
/// relative to `at` (so the part lands at `at + src.top_left()`).
pub fn draw_image(
    image: &dyn Surface,
    target: &mut dyn RasterSurface,
    at: Point,
    src: Option<Rect>,
    params: BlitParams,
) {
    let bounds = image.bounds();
    let Some(src) = src.unwrap_or(bounds).intersect(&bounds) else {
        return;
    };
    target.blit(
        image,
        src,
        Point::new(at.x + src.x, at.y + src.y),
        params,
    );
}

/// Creates bitmaps for picture primitives.
pub trait SurfaceFactory {
    /// Bitmap registered under `name`, `None` if there is none.
    fn load_bitmap(&self, name: &str) -> Option<Box<dyn Surface>>;
    /// Blank surface; `screen_format` picks display format over paletted.
    fn new_surface(&self, width: u32, height: u32, screen_format: bool) -> Box<dyn Surface>;
}

/// In-memory RGBA bitmap; also usable as a draw target.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    alpha_mod: u8,
    color_key: Option<Rgba>,
    paletted: bool,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
            alpha_mod: 255,
            color_key: None,
            paletted: false,
        }
    }

    /// Pixel at signed coordinates, `None` outside the canvas.
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn is_paletted(&self) -> bool {
        self.paletted
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixel_at(x as i32, y as i32).unwrap_or(Rgba::TRANSPARENT)
    }

    fn color_key(&self) -> Option<Rgba> {
        self.color_key
    }

    fn alpha_mod(&self) -> u8 {
        self.alpha_mod
    }

    fn set_alpha(&mut self, alpha: u8) {
        self.alpha_mod = alpha;
    }

    fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn player_colored(&mut self, player: PlayerColor) {
        let target = player.rgb();
        for p in self.pixels.iter_mut() {
            if p.a == 0 || p.b <= p.r || p.b <= p.g {
                continue;
            }
            let intensity = u32::from(p.b);
            let scale = |c: u8| (u32::from(c) * intensity / 255) as u8;
            *p = Rgba::new(scale(target.r), scale(target.g), scale(target.b), p.a);
        }
    }

    fn convert_to_screen(&mut self) {
        self.paletted = false;
        self.color_key = Some(Rgba::DEFAULT_KEY);
    }

    fn scaled(&self, width: u32, height: u32) -> Box<dyn Surface> {
        let mut out = Canvas::new(width, height);
        out.alpha_mod = self.alpha_mod;
        out.color_key = self.color_key;
        out.paletted = self.paletted;
        if self.width == 0 || self.height == 0 {
            return Box::new(out);
        }
        for y in 0..height {
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height)) as u32;
            for x in 0..width {
                let sx = (u64::from(x) * u64::from(self.width) / u64::from(width)) as u32;
                out.set_pixel(x as i32, y as i32, self.pixel(sx, sy));
            }
        }
        Box::new(out)
    }
}

impl RasterSurface for Canvas {
    fn blit(&mut self, source: &dyn Surface, src: Rect, dst: Point, params: BlitParams) {
        let coverage = u32::from(source.alpha_mod()) * u32::from(params.alpha) / 255;
        if coverage == 0 {
            return;
        }
        let key = source.color_key();
        for j in 0..src.h {
            let sy = src.y + j as i32;
            if sy < 0 || sy as u32 >= source.height() {
                continue;
            }
            let dj = if params.flip_v { src.h - 1 - j } else { j };
            for i in 0..src.w {
                let sx = src.x + i as i32;
                if sx < 0 || sx as u32 >= source.width() {
                    continue;
                }
                let p = source.pixel(sx as u32, sy as u32);
                if key == Some(p) {
                    continue;
                }
                let a = u32::from(p.a) * coverage / 255;
                if a == 0 {
                    continue;
                }
                let di = if params.flip_h { src.w - 1 - i } else { i };
                if let Some(idx) = self.index(dst.x + di as i32, dst.y + dj as i32) {
                    self.pixels[idx] = p.blend_over(self.pixels[idx], a);
                }
            }
        }
    }
}

/// Named bitmaps kept in memory.
#[derive(Debug, Clone, Default)]
pub struct CanvasFactory {
    bitmaps: FxHashMap<String, Canvas>,
}

impl CanvasFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bitmap(mut self, name: impl Into<String>, bitmap: Canvas) -> Self {
        self.bitmaps.insert(name.into(), bitmap);
        self
    }
}

impl SurfaceFactory for CanvasFactory {
    fn load_bitmap(&self, name: &str) -> Option<Box<dyn Surface>> {
        self.bitmaps
            .get(name)
            .map(|c| Box::new(c.clone()) as Box<dyn Surface>)
    }

    fn new_surface(&self, width: u32, height: u32, screen_format: bool) -> Box<dyn Surface> {
        let mut canvas = Canvas::new(width, height);
        canvas.paletted = !screen_format;
        Box::new(canvas)
    }
}
