//! Rasterization of decoded images into fixed-size channel matrices.

use image::{DynamicImage, imageops::FilterType};

use crate::matrix::ChannelSet;

pub const DEFAULT_SAMPLING_SIZE: u32 = 16;

/// Turns a decoded image into an exactly `width`×`height` channel set.
///
/// The pipeline only ever asks for square grids, but the capability is kept
/// general so alternative surfaces (a canvas, a test double) can stand in.
pub trait Rasterizer {
    fn rasterize(&self, image: &DynamicImage, width: u32, height: u32) -> ChannelSet;
}

/// Point sampling with no smoothing, the equivalent of drawing onto a canvas
/// with `imageSmoothingEnabled = false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestRasterizer;

impl Rasterizer for NearestRasterizer {
    fn rasterize(&self, image: &DynamicImage, width: u32, height: u32) -> ChannelSet {
        // The channel set is square; a non-square request keeps the smaller side.
        let size = width.min(height);
        if size == 0 || image.width() == 0 || image.height() == 0 {
            return ChannelSet::new(size as usize);
        }

        let resized = image::imageops::resize(&image.to_rgba8(), size, size, FilterType::Nearest);
        let mut channels = ChannelSet::new(size as usize);
        for (x, y, pixel) in resized.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            // A cleared canvas reports fully transparent pixels as black
            let color = if a == 0 {
                palette::Srgb::new(0, 0, 0)
            } else {
                palette::Srgb::new(r, g, b)
            };
            channels.set_pixel(y as usize, x as usize, color);
        }
        channels
    }
}

/// Sample `image` onto a `size`×`size` grid.
pub fn to_channel_matrices<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    image: &DynamicImage,
    size: u32,
) -> ChannelSet {
    rasterizer.rasterize(image, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use palette::Srgb;

    fn quadrants(side: u32) -> DynamicImage {
        let half = side / 2;
        DynamicImage::ImageRgba8(RgbaImage::from_fn(side, side, |x, y| {
            match (x < half, y < half) {
                (true, true) => Rgba([255, 0, 0, 255]),
                (false, true) => Rgba([0, 255, 0, 255]),
                (true, false) => Rgba([0, 0, 255, 255]),
                (false, false) => Rgba([10, 20, 30, 0]),
            }
        }))
    }

    #[test]
    fn downsamples_without_blending() {
        let channels = to_channel_matrices(&NearestRasterizer, &quadrants(64), 4);
        assert_eq!(channels.size(), 4);
        assert_eq!(channels.pixel(0, 0), Srgb::new(255, 0, 0));
        assert_eq!(channels.pixel(0, 3), Srgb::new(0, 255, 0));
        assert_eq!(channels.pixel(3, 0), Srgb::new(0, 0, 255));
        // Only the four source colors may appear
        for pixel in channels.pixels() {
            assert!(
                [
                    Srgb::new(255, 0, 0),
                    Srgb::new(0, 255, 0),
                    Srgb::new(0, 0, 255),
                    Srgb::new(0, 0, 0)
                ]
                .contains(&pixel)
            );
        }
    }

    #[test]
    fn transparent_pixels_sample_as_black() {
        let channels = to_channel_matrices(&NearestRasterizer, &quadrants(8), 8);
        assert_eq!(channels.pixel(7, 7), Srgb::new(0, 0, 0));
    }

    #[test]
    fn upsamples_small_sources() {
        let tiny = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([9, 8, 7, 255])));
        let channels = to_channel_matrices(&NearestRasterizer, &tiny, 16);
        assert_eq!(channels.size(), 16);
        assert!(channels.pixels().all(|p| p == Srgb::new(9, 8, 7)));
    }

    #[test]
    fn zero_size_is_empty() {
        let channels = to_channel_matrices(&NearestRasterizer, &quadrants(8), 0);
        assert!(channels.is_empty());
    }
}
