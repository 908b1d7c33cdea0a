// ============================================================================
// CLIPBOARD BOUNDARY: import composite, export, OS and in-app clipboards
// ============================================================================

use image::{Rgba, RgbaImage};

use crate::canvas::{Color, Pixel, PixelBuffer, Point};
use crate::components::history::Transaction;

#[derive(Debug)]
pub enum ClipboardError {
    /// The clipboard could not be opened or written.
    Unavailable(String),
    /// The clipboard holds no image.
    NoImage,
    /// The clipboard image could not be decoded.
    InvalidImage(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::Unavailable(e) => write!(f, "Clipboard unavailable: {}", e),
            ClipboardError::NoImage => write!(f, "No image on the clipboard"),
            ClipboardError::InvalidImage(e) => write!(f, "Invalid clipboard image: {}", e),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(e: arboard::Error) -> Self {
        match e {
            arboard::Error::ContentNotAvailable => ClipboardError::NoImage,
            other => ClipboardError::Unavailable(other.to_string()),
        }
    }
}

/// Source and sink for RGBA images exchanged with the outside world.
pub trait ClipboardProvider {
    fn read_image(&mut self) -> Result<RgbaImage, ClipboardError>;
    fn write_image(&mut self, img: &RgbaImage) -> Result<(), ClipboardError>;
}

// ---------------------------------------------------------------------------
//  System clipboard (OS-level copy/paste via arboard)
// ---------------------------------------------------------------------------

/// The OS clipboard. A fresh `arboard::Clipboard` is opened per call so no
/// handle is held between events.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    /// Raw image data first, then clipboard text naming an image file.
    fn read_image(&mut self) -> Result<RgbaImage, ClipboardError> {
        let mut clip = arboard::Clipboard::new()?;
        match clip.get_image() {
            Ok(img_data) => {
                let (w, h) = (img_data.width as u32, img_data.height as u32);
                return RgbaImage::from_raw(w, h, img_data.bytes.into_owned()).ok_or_else(|| {
                    ClipboardError::InvalidImage(format!("{}x{} buffer size mismatch", w, h))
                });
            }
            Err(arboard::Error::ContentNotAvailable) => {}
            Err(e) => return Err(e.into()),
        }

        let text = clip.get_text().map_err(|_| ClipboardError::NoImage)?;
        let path = std::path::Path::new(text.trim());
        if !path.is_file() {
            return Err(ClipboardError::NoImage);
        }
        image::open(path)
            .map(|img| img.to_rgba8())
            .map_err(|e| ClipboardError::InvalidImage(e.to_string()))
    }

    fn write_image(&mut self, img: &RgbaImage) -> Result<(), ClipboardError> {
        // arboard wants ImageData { width, height, bytes: Cow<[u8]> } in RGBA order.
        let mut clip = arboard::Clipboard::new()?;
        let data = arboard::ImageData {
            width: img.width() as usize,
            height: img.height() as usize,
            bytes: std::borrow::Cow::Borrowed(img.as_raw()),
        };
        clip.set_image(data)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
//  Internal clipboard (application-level)
// ---------------------------------------------------------------------------

/// In-process clipboard. Used when no OS clipboard is available, and in tests.
#[derive(Debug, Default, Clone)]
pub struct AppClipboard {
    image: Option<RgbaImage>,
}

impl AppClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(img: RgbaImage) -> Self {
        Self { image: Some(img) }
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }
}

impl ClipboardProvider for AppClipboard {
    fn read_image(&mut self) -> Result<RgbaImage, ClipboardError> {
        self.image.clone().ok_or(ClipboardError::NoImage)
    }

    fn write_image(&mut self, img: &RgbaImage) -> Result<(), ClipboardError> {
        self.image = Some(img.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
//  Import / export
// ---------------------------------------------------------------------------

/// Composite `source` onto the canvas at the origin over the overlapping
/// region. Pixels with non-zero alpha overwrite (prior color recorded first);
/// fully transparent pixels are skipped.
pub fn composite_at_origin(source: &RgbaImage, buffer: &mut PixelBuffer) -> Transaction {
    let mut txn = Transaction::new("Paste");
    let w = source.width().min(buffer.width());
    let h = source.height().min(buffer.height());
    for y in 0..h {
        for x in 0..w {
            let Rgba([r, g, b, a]) = *source.get_pixel(x, y);
            if a == 0 {
                continue;
            }
            let p = Point::new(x as i32, y as i32);
            txn.record(buffer.pixel_at(p));
            buffer.set_point(p, Color::new(r, g, b));
        }
    }
    txn
}

/// Opaque export of a captured area over its inclusive bounding box.
/// Box pixels that are not part of the area are white.
pub fn export_area(area: &[Pixel], min: Point, max: Point) -> RgbaImage {
    let w = (max.x - min.x + 1).max(1) as u32;
    let h = (max.y - min.y + 1).max(1) as u32;
    let mut img = RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]));
    for px in area {
        let x = px.pos.x - min.x;
        let y = px.pos.y - min.y;
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            img.put_pixel(x as u32, y as u32, Rgba([px.color.r, px.color.g, px.color.b, 255]));
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_skips_transparent_and_clips() {
        let mut src = RgbaImage::from_pixel(8, 2, Rgba([10, 20, 30, 255]));
        src.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        src.put_pixel(2, 0, Rgba([90, 90, 90, 1]));
        let mut buf = PixelBuffer::new(4, 4);
        let before = buf.clone();

        let txn = composite_at_origin(&src, &mut buf);
        assert_eq!(txn.len(), 7);
        assert_eq!(buf.get(0, 0), Color::new(10, 20, 30));
        assert_eq!(buf.get(1, 0), Color::WHITE);
        assert_eq!(buf.get(2, 0), Color::new(90, 90, 90));
        assert_eq!(buf.get(3, 1), Color::new(10, 20, 30));
        assert_eq!(buf.get(0, 2), Color::WHITE);

        txn.revert(&mut buf);
        assert_eq!(buf, before);
    }

    #[test]
    fn export_area_fills_gaps_white() {
        let area = [
            Pixel::new(Point::new(5, 5), Color::new(1, 2, 3)),
            Pixel::new(Point::new(6, 6), Color::new(4, 5, 6)),
        ];
        let img = export_area(&area, Point::new(5, 5), Point::new(6, 6));
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [4, 5, 6, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn app_clipboard_round_trip() {
        let mut clip = AppClipboard::new();
        assert!(matches!(clip.read_image(), Err(ClipboardError::NoImage)));
        let img = RgbaImage::from_pixel(2, 3, Rgba([7, 7, 7, 255]));
        clip.write_image(&img).unwrap();
        assert_eq!(clip.read_image().unwrap(), img);
    }
}
