use image::RgbaImage;
use rayon::prelude::*;

// ============================================================================
// POINTS AND COLORS
// ============================================================================

/// Integer canvas coordinate. May lie outside the canvas; writes there are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse "r,g,b".
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return None;
        }
        let r = parts[0].trim().parse::<u8>().ok()?;
        let g = parts[1].trim().parse::<u8>().ok()?;
        let b = parts[2].trim().parse::<u8>().ok()?;
        Some(Self::new(r, g, b))
    }

    pub fn to_config_string(self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// A position plus a color: the unit of the undo log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel {
    pub pos: Point,
    pub color: Color,
}

impl Pixel {
    pub const fn new(pos: Point, color: Color) -> Self {
        Self { pos, color }
    }
}

// ============================================================================
// PIXEL BUFFER
// ============================================================================

/// Fixed-size RGB canvas, 3 bytes per pixel, row-major.
///
/// All writes go through [`PixelBuffer::set`], which silently drops anything
/// outside `[0, width) x [0, height)`. Reads outside the canvas return
/// [`Color::WHITE`].
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create an all-white buffer. Zero dimensions are clamped to 1.
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = if width == 0 || height == 0 {
            crate::log_warn!(
                "PixelBuffer::new: invalid dimensions {}x{}, clamped to 1x1",
                width,
                height
            );
            (width.max(1), height.max(1))
        } else {
            (width, height)
        };
        Self {
            width,
            height,
            data: vec![255; 3 * width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        3 * (y as usize * self.width as usize + x as usize)
    }

    /// Overwrite one pixel. Out-of-range writes are a no-op.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.offset(x, y);
        self.data[i] = color.r;
        self.data[i + 1] = color.g;
        self.data[i + 2] = color.b;
    }

    /// Read one pixel; WHITE when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        if !self.in_bounds(x, y) {
            return Color::WHITE;
        }
        let i = self.offset(x, y);
        Color::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn get_point(&self, p: Point) -> Color {
        self.get(p.x, p.y)
    }

    pub fn set_point(&mut self, p: Point, color: Color) {
        self.set(p.x, p.y, color);
    }

    /// Capture the current color at `p`.
    pub fn pixel_at(&self, p: Point) -> Pixel {
        Pixel::new(p, self.get_point(p))
    }

    /// Raw RGB bytes, read-only. This is what the host blits.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Opaque RGBA copy of the whole canvas (clipboard export).
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut rgba = vec![0u8; 4 * self.width as usize * self.height as usize];
        rgba.par_chunks_exact_mut(4)
            .zip(self.data.par_chunks_exact(3))
            .for_each(|(dst, src)| {
                dst[0] = src[0];
                dst[1] = src[1];
                dst[2] = src[2];
                dst[3] = 255;
            });
        RgbaImage::from_raw(self.width, self.height, rgba)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_white() {
        let buf = PixelBuffer::new(4, 3);
        assert_eq!(buf.as_bytes().len(), 36);
        assert!(buf.as_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn set_then_get_in_range() {
        let mut buf = PixelBuffer::new(10, 10);
        let red = Color::new(255, 0, 0);
        buf.set(3, 7, red);
        assert_eq!(buf.get(3, 7), red);
        assert_eq!(buf.get(7, 3), Color::WHITE);
        let i = 3 * (7 * 10 + 3);
        assert_eq!(&buf.as_bytes()[i..i + 3], &[255, 0, 0]);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut buf = PixelBuffer::new(5, 5);
        let before = buf.clone();
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 5), (100, -100)] {
            buf.set(x, y, Color::BLACK);
            assert_eq!(buf.get(x, y), Color::WHITE);
        }
        assert_eq!(buf, before);
    }

    #[test]
    fn zero_size_is_clamped() {
        let buf = PixelBuffer::new(0, 8);
        assert_eq!((buf.width(), buf.height()), (1, 8));
    }

    #[test]
    fn rgba_export_is_opaque() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set(1, 0, Color::new(1, 2, 3));
        let img = buf.to_rgba_image();
        assert_eq!(img.get_pixel(1, 0).0, [1, 2, 3, 255]);
        assert_eq!(img.get_pixel(0, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn color_parse() {
        assert_eq!(Color::parse("10, 20,30"), Some(Color::new(10, 20, 30)));
        assert_eq!(Color::parse("10,20"), None);
        assert_eq!(Color::parse("10,20,300"), None);
        assert_eq!(Color::new(1, 2, 3).to_config_string(), "1,2,3");
    }
}
