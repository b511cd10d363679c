use glam::{Vec2, Vec4};
use image::RgbaImage;
use rayon::prelude::*;
use shading::{Resolution, Variant};

/// One fully evaluated frame.
///
/// Pixels are stored row-major with row 0 at the top, as unclamped `f32`
/// RGBA straight out of the evaluator. Display conversion happens in
/// [`Frame::write_rgba8`].
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    time: f32,
    pixels: Vec<Vec4>,
}

impl Frame {
    /// Evaluates `variant` for every pixel of a `width`x`height` surface.
    ///
    /// Returns `None` for zero-area surfaces.
    pub fn render(variant: Variant, width: u32, height: u32, time: f32) -> Option<Self> {
        let mut frame = Self {
            width,
            height,
            time,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
        };
        frame.rerender(variant, time).then_some(frame)
    }

    /// Re-evaluates the frame in place at its current size.
    pub(crate) fn rerender(&mut self, variant: Variant, time: f32) -> bool {
        let Some(resolution) = Resolution::from_pixels(self.width, self.height) else {
            return false;
        };
        self.time = time;
        let width = self.width as usize;
        self.pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, pixels)| shade_row(variant, resolution, time, row, pixels));
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Time the frame was evaluated at.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Converts the frame to 8-bit RGBA, saturating every channel to `[0, 1]`.
    ///
    /// `out` is resized to `width * height * 4` bytes and reused between calls.
    pub fn write_rgba8(&self, out: &mut Vec<u8>) {
        out.resize(self.pixels.len() * 4, 0);
        let texels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(out.as_mut_slice());
        texels
            .par_iter_mut()
            .zip(self.pixels.par_iter())
            .for_each(|(texel, color)| *texel = encode_color(*color));
    }

    /// Returns `None` if the pixel buffer no longer matches the frame size.
    pub fn to_image(&self) -> Option<RgbaImage> {
        let mut bytes = Vec::new();
        self.write_rgba8(&mut bytes);
        RgbaImage::from_raw(self.width, self.height, bytes)
    }
}

fn shade_row(variant: Variant, resolution: Resolution, time: f32, row: usize, pixels: &mut [Vec4]) {
    let y = row as f32 + 0.5;
    for (column, pixel) in pixels.iter_mut().enumerate() {
        let frag_coord = Vec2::new(column as f32 + 0.5, y);
        *pixel = variant.evaluate(frag_coord, resolution, time);
    }
}

/// Quantises a single channel, clamping out-of-range and NaN values.
#[inline]
pub fn encode_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
pub fn encode_color(color: Vec4) -> [u8; 4] {
    [
        encode_channel(color.x),
        encode_channel(color.y),
        encode_channel(color.z),
        encode_channel(color.w),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_frames_are_skipped() {
        assert!(Frame::render(Variant::Radial, 0, 10, 0.0).is_none());
        assert!(Frame::render(Variant::Radial, 10, 0, 0.0).is_none());
    }

    #[test]
    fn pixels_are_sampled_at_their_centres() {
        let frame = Frame::render(Variant::Gradient, 4, 2, 0.0).unwrap();
        let expected = [0.125, 0.375, 0.625, 0.875];
        for (x, value) in expected.iter().enumerate() {
            for y in 0..2 {
                let pixel = frame.pixel(x as u32, y).unwrap();
                assert!((pixel.x - value).abs() < 1e-6);
            }
        }
        assert!(frame.pixel(4, 0).is_none());
    }

    #[test]
    fn parallel_render_matches_direct_evaluation() {
        let (width, height) = (37, 23);
        let time = 1.75;
        let frame = Frame::render(Variant::Kaleidoscope, width, height, time).unwrap();
        let resolution = Resolution::from_pixels(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let expected = Variant::Kaleidoscope.evaluate(
                    Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
                    resolution,
                    time,
                );
                assert_eq!(frame.pixel(x, y).unwrap(), expected);
            }
        }
        assert_eq!(frame.time(), time);
    }

    #[test]
    fn encoding_saturates_channels() {
        assert_eq!(encode_channel(-3.0), 0);
        assert_eq!(encode_channel(0.5), 128);
        assert_eq!(encode_channel(7.0), 255);
        assert_eq!(encode_channel(f32::MAX), 255);
        assert_eq!(encode_channel(f32::NAN), 0);
        assert_eq!(encode_color(Vec4::new(2.0, 0.0, 1.0, 1.0)), [255, 0, 255, 255]);
    }

    #[test]
    fn image_conversion_keeps_dimensions() {
        let frame = Frame::render(Variant::Radial, 16, 9, 0.0).unwrap();
        let image = frame.to_image().unwrap();
        assert_eq!(image.dimensions(), (16, 9));
        assert!(image.pixels().all(|pixel| pixel.0[3] == 255));
    }

    #[test]
    fn image_conversion_rejects_mismatched_buffer() {
        let mut frame = Frame::render(Variant::Gradient, 4, 4, 0.0).unwrap();
        frame.pixels.truncate(3);
        assert!(frame.to_image().is_none());
    }
}
