use crate::error::Result;
use image::codecs::tga::TgaEncoder;
use image::{ColorType, DynamicImage};
use log::info;
use nalgebra::Vector3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Raw pixel value. Grayscale images use only the first channel,
/// RGB images ignore the last one.
pub type Pixel = [u8; 4];

/// Number and meaning of the channels stored per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Grayscale,
    Rgb,
    Rgba,
}

impl Format {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Format::Grayscale => 1,
            Format::Rgb => 3,
            Format::Rgba => 4,
        }
    }

    fn color_type(self) -> ColorType {
        match self {
            Format::Grayscale => ColorType::L8,
            Format::Rgb => ColorType::Rgb8,
            Format::Rgba => ColorType::Rgba8,
        }
    }
}

/// Converts a linear [0, 1] color to an opaque pixel, clamping every channel.
#[inline]
pub fn color_to_pixel(color: Vector3<f32>) -> Pixel {
    let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z), 255]
}

/// Flat 8-bit pixel grid. Row 0 is whatever the caller treats as the first
/// row; the renderer writes with a bottom-left origin and flips once before
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    format: Format,
    data: Vec<u8>,
}

impl Image {
    /// Creates a black (zeroed) image.
    pub fn new(width: usize, height: usize, format: Format) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; width * height * format.bytes_per_pixel()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline(always)]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.format.bytes_per_pixel()
    }

    /// Reads a pixel, `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        let d = &self.data;
        Some(match self.format {
            Format::Grayscale => [d[o], d[o], d[o], 255],
            Format::Rgb => [d[o], d[o + 1], d[o + 2], 255],
            Format::Rgba => [d[o], d[o + 1], d[o + 2], d[o + 3]],
        })
    }

    /// Writes a pixel. Returns false (and writes nothing) outside the image.
    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let o = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        self.data[o..o + bpp].copy_from_slice(&pixel[..bpp]);
        true
    }

    /// Writes a linear color, clamped to the displayable range.
    #[inline]
    pub fn set_color(&mut self, x: usize, y: usize, color: Vector3<f32>) -> bool {
        self.set(x, y, color_to_pixel(color))
    }

    /// Resets every byte to zero.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Mirrors the rows so that row 0 becomes the last one.
    pub fn flip_vertically(&mut self) {
        let row_len = self.width * self.format.bytes_per_pixel();
        let half = self.height / 2;
        for y in 0..half {
            let (top, bottom) = self.data.split_at_mut((self.height - 1 - y) * row_len);
            top[y * row_len..(y + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
        }
    }

    /// Draws a line between two pixel coordinates via Bresenham's algorithm
    /// (all octants, integer error term).
    ///
    /// The segment is clipped to the image first, so far off-screen or
    /// non-finite endpoints cost nothing beyond the visible part.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, pixel: Pixel) {
        let Some((x0, y0, x1, y1)) =
            self.clip_segment(x0 as f64, y0 as f64, x1 as f64, y1 as f64)
        else {
            return;
        };
        let snap = |v: f64, max: usize| (v.round() as i64).clamp(0, max as i64);
        let (x0, x1) = (snap(x0, self.width - 1), snap(x1, self.width - 1));
        let (y0, y1) = (snap(y0, self.height - 1), snap(y1, self.height - 1));

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x as usize, y as usize, pixel);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * error;
            if e2 >= dy {
                error += dy;
                x += sx;
            }
            if e2 <= dx {
                error += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip of a segment against `[0, width-1] x [0, height-1]`.
    fn clip_segment(
        &self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> Option<(f64, f64, f64, f64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (x_max, y_max) = ((self.width - 1) as f64, (self.height - 1) as f64);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);

        for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((x0 + t0 * dx, y0 + t0 * dy, x0 + t1 * dx, y0 + t1 * dy))
    }

    /// Encodes the image as an uncompressed TGA file, rows written as stored.
    pub fn write_tga<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        TgaEncoder::new(writer).disable_rle().encode(
            &self.data,
            self.width as u32,
            self.height as u32,
            self.format.color_type().into(),
        )?;
        info!(
            "Wrote {:?} ({}x{}, {:?})",
            path, self.width, self.height, self.format
        );
        Ok(())
    }

    /// Decodes any format supported by the `image` crate. Row 0 is the top row of the file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let decoded = image::open(path.as_ref())?;
        Ok(Self::from_dynamic(decoded))
    }

    fn from_dynamic(decoded: DynamicImage) -> Self {
        let width = decoded.width() as usize;
        let height = decoded.height() as usize;
        let color = decoded.color();
        let (format, data) = if color.has_alpha() {
            (Format::Rgba, decoded.into_rgba8().into_raw())
        } else if color.channel_count() == 1 {
            (Format::Grayscale, decoded.into_luma8().into_raw())
        } else {
            (Format::Rgb, decoded.into_rgb8().into_raw())
        };
        Self {
            width,
            height,
            format,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Pixel = [255, 0, 0, 255];

    #[test]
    fn set_and_get_respect_format() {
        let mut img = Image::new(4, 3, Format::Rgb);
        assert!(img.set(1, 2, [10, 20, 30, 40]));
        assert_eq!(img.get(1, 2), Some([10, 20, 30, 255]));

        let mut gray = Image::new(2, 2, Format::Grayscale);
        gray.set(0, 1, [99, 1, 2, 3]);
        assert_eq!(gray.get(0, 1), Some([99, 99, 99, 255]));
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut img = Image::new(2, 2, Format::Rgba);
        assert!(!img.set(2, 0, RED));
        assert!(img.get(0, 2).is_none());
        assert!(img.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn color_is_clamped_at_write() {
        let mut img = Image::new(1, 1, Format::Rgb);
        img.set_color(0, 0, Vector3::new(1.7, -0.3, 0.5));
        assert_eq!(img.get(0, 0), Some([255, 0, 128, 255]));
    }

    #[test]
    fn flip_vertically_swaps_rows() {
        let mut img = Image::new(2, 3, Format::Grayscale);
        img.set(0, 0, [1, 0, 0, 0]);
        img.set(1, 1, [2, 0, 0, 0]);
        img.set(0, 2, [3, 0, 0, 0]);
        img.flip_vertically();
        assert_eq!(img.get(0, 2).unwrap()[0], 1);
        assert_eq!(img.get(1, 1).unwrap()[0], 2);
        assert_eq!(img.get(0, 0).unwrap()[0], 3);
    }

    #[test]
    fn bresenham_covers_steep_and_shallow_lines() {
        let mut img = Image::new(10, 10, Format::Rgb);
        img.line(0.0, 0.0, 9.0, 3.0, RED);
        img.line(2.0, 9.0, 4.0, 0.0, RED);
        // Endpoints are always drawn.
        for (x, y) in [(0, 0), (9, 3), (2, 9), (4, 0)] {
            assert_eq!(img.get(x, y), Some(RED));
        }
        // A steep line touches every row it spans.
        for y in 0..10 {
            let hits = (2..=4).filter(|&x| img.get(x, y) == Some(RED)).count();
            assert!(hits >= 1, "row {y} has no pixel");
        }
    }

    #[test]
    fn lines_are_clipped_to_the_image() {
        let mut img = Image::new(32, 32, Format::Rgb);
        img.line(-1e10, 5.0, 1e10, 5.0, RED);
        for x in 0..32 {
            assert_eq!(img.get(x, 5), Some(RED), "column {x} of row 5");
        }
        assert_eq!(img.get(0, 4), Some([0, 0, 0, 255]));

        // One endpoint far off to the right: only the visible run is drawn.
        let mut img = Image::new(32, 32, Format::Rgb);
        img.line(0.0, 5.0, 5e8, 5.0, RED);
        assert_eq!(img.get(0, 5), Some(RED));
        assert_eq!(img.get(31, 5), Some(RED));

        // Entirely outside, or not finite: nothing.
        let mut img = Image::new(8, 8, Format::Rgb);
        img.line(-20.0, -3.0, -1.0, -9.0, RED);
        img.line(f32::NAN, 1.0, 3.0, 3.0, RED);
        img.line(0.0, f32::INFINITY, 3.0, 3.0, RED);
        assert!(img.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn tga_round_trip_through_disk() {
        let mut img = Image::new(3, 2, Format::Rgb);
        img.set(2, 1, [1, 2, 3, 255]);
        let path = std::env::temp_dir().join(format!("softraster-{}.tga", std::process::id()));
        img.write_tga(&path).unwrap();
        let back = Image::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.format(), Format::Rgb);
        assert_eq!(back.get(2, 1), Some([1, 2, 3, 255]));
    }
}
