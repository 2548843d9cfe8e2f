// THEORY:
// The `Area` module represents the neighborhood a kernel is applied to: the
// rectangular window around one output coordinate, clamped to the raster bounds.
// It is the bridge between the flat input buffer and the per-pixel accumulation —
// the engine never indexes the raster inside its hot loop, it samples an `Area`
// once and works on the grid.
//
// Key architectural principles:
// 1.  **Clamp-to-edge by truncation**: Near a border the window *shrinks* rather
//     than padding with replicated or synthetic pixels. The sampled grid always
//     has exactly `bottom - top + 1` rows and `right - left + 1` columns, so a
//     corner neighborhood of a 3x3 kernel really is 2x2. Normalizing by the
//     actual weight sum (not the nominal kernel area) is what keeps these
//     shrunken neighborhoods correctly scaled.
// 2.  **Input to generators**: A content-adaptive kernel generator receives the
//     `Area` and must produce a kernel of exactly its shape. The statistics
//     helpers here (mean pixel, luminance spread) are the raw material such
//     generators are built from.
// 3.  **Dumb container**: The area samples and summarizes its own pixels; it
//     does not know how to weight them. That is the kernel's job.

pub mod area {
    use crate::core_modules::pixel::pixel::{Channel, Luminance, Pixel};
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;

    /// The clamped neighborhood of one output coordinate: a bounding box, the
    /// center it was built around, and the row-major grid of sampled pixels.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Area {
        /// Leftmost in-bounds column of the window.
        pub left: u32,
        /// Topmost in-bounds row of the window.
        pub top: u32,
        /// Rightmost in-bounds column of the window (inclusive).
        pub right: u32,
        /// Bottommost in-bounds row of the window (inclusive).
        pub bottom: u32,
        /// The output x coordinate this neighborhood was built around.
        pub center_x: u32,
        /// The output y coordinate this neighborhood was built around.
        pub center_y: u32,
        /// Sampled pixels within the clamped box, rows top-to-bottom.
        pub pixels: Vec<Vec<Pixel>>,
    }

    impl Area {
        /// Samples the window `[cx-half, cx+half] x [cy-half, cy+half]`, clamped
        /// per-edge to the raster bounds, from the given buffer.
        pub fn clamped(buffer: &PixelBuffer, center_x: u32, center_y: u32, half_size: u32) -> Self {
            let left = center_x.saturating_sub(half_size);
            let top = center_y.saturating_sub(half_size);
            let right = center_x.saturating_add(half_size).min(buffer.width() - 1);
            let bottom = center_y.saturating_add(half_size).min(buffer.height() - 1);

            let mut pixels = Vec::with_capacity((bottom - top + 1) as usize);
            for y in top..=bottom {
                let mut row = Vec::with_capacity((right - left + 1) as usize);
                for x in left..=right {
                    row.push(buffer.get_pixel(x, y));
                }
                pixels.push(row);
            }

            Self {
                left,
                top,
                right,
                bottom,
                center_x,
                center_y,
                pixels,
            }
        }

        /// Number of sampled rows, always `bottom - top + 1`.
        pub fn rows(&self) -> usize {
            (self.bottom - self.top + 1) as usize
        }

        /// Number of sampled columns, always `right - left + 1`.
        pub fn cols(&self) -> usize {
            (self.right - self.left + 1) as usize
        }

        /// The sample at the center coordinate. Always in-bounds: the center is
        /// never clamped away, only the window around it.
        pub fn center_pixel(&self) -> &Pixel {
            let row = (self.center_y - self.top) as usize;
            let col = (self.center_x - self.left) as usize;
            &self.pixels[row][col]
        }

        /// Average pixel value across the sampled grid. Alpha averages too;
        /// callers that do not care ignore it.
        pub fn mean_pixel(&self) -> Pixel {
            let count = (self.rows() * self.cols()) as Channel;
            let mut sum = Pixel::new(0.0, 0.0, 0.0, 0.0);
            for row in &self.pixels {
                for pixel in row {
                    sum = sum + *pixel;
                }
            }
            Pixel::new(
                sum.red / count,
                sum.green / count,
                sum.blue / count,
                sum.alpha / count,
            )
        }

        /// Mean luminance of the sampled grid.
        pub fn mean_luminance(&self) -> Luminance {
            let count = (self.rows() * self.cols()) as Luminance;
            let sum: Luminance = self
                .pixels
                .iter()
                .flatten()
                .map(|pixel| pixel.luminance())
                .sum();
            sum / count
        }

        /// Standard deviation of luminance across the sampled grid. A cheap
        /// "how busy is this neighborhood" signal for adaptive generators.
        pub fn luminance_stddev(&self) -> Luminance {
            let mean = self.mean_luminance();
            let count = (self.rows() * self.cols()) as Luminance;
            let variance: Luminance = self
                .pixels
                .iter()
                .flatten()
                .map(|pixel| {
                    let delta = pixel.luminance() - mean;
                    delta * delta
                })
                .sum::<Luminance>()
                / count;
            variance.sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::area::Area;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;

    /// 4x4 buffer whose red channel counts 0,10,20,... row-major; other color
    /// channels zero, alpha opaque.
    fn ramp_buffer() -> PixelBuffer {
        let mut data = Vec::new();
        for index in 0..16u8 {
            data.extend_from_slice(&[index * 10, 0, 0, 255]);
        }
        PixelBuffer::from_raw(4, 4, data).unwrap()
    }

    #[test]
    fn interior_window_is_full_size() {
        let buffer = ramp_buffer();
        let area = Area::clamped(&buffer, 1, 1, 1);
        assert_eq!((area.left, area.top, area.right, area.bottom), (0, 0, 2, 2));
        assert_eq!(area.rows(), 3);
        assert_eq!(area.cols(), 3);
        assert_eq!(area.pixels.len(), 3);
        assert_eq!(area.pixels[0].len(), 3);
    }

    #[test]
    fn corner_window_shrinks_instead_of_padding() {
        let buffer = ramp_buffer();
        let area = Area::clamped(&buffer, 0, 0, 1);
        assert_eq!((area.left, area.top, area.right, area.bottom), (0, 0, 1, 1));
        assert_eq!(area.rows(), 2);
        assert_eq!(area.cols(), 2);
    }

    #[test]
    fn edges_clamp_independently() {
        let buffer = ramp_buffer();
        let area = Area::clamped(&buffer, 3, 1, 1);
        assert_eq!((area.left, area.top, area.right, area.bottom), (2, 0, 3, 2));
        assert_eq!(area.rows(), 3);
        assert_eq!(area.cols(), 2);
    }

    #[test]
    fn center_pixel_survives_clamping() {
        let buffer = ramp_buffer();
        let area = Area::clamped(&buffer, 0, 0, 2);
        // Center (0,0) has red value 0.
        assert_eq!(area.center_pixel().red, 0.0);
        let area = Area::clamped(&buffer, 3, 3, 2);
        // Center (3,3) is the 16th pixel, red 150.
        assert_eq!(area.center_pixel().red, 150.0);
    }

    #[test]
    fn mean_pixel_averages_the_grid() {
        let buffer = ramp_buffer();
        let area = Area::clamped(&buffer, 0, 0, 1);
        // Red samples: 0, 10, 40, 50 -> mean 25.
        let mean = area.mean_pixel();
        assert_eq!(mean.red, 25.0);
        assert_eq!(mean.green, 0.0);
        assert_eq!(mean.alpha, 255.0);
    }

    #[test]
    fn luminance_stddev_is_zero_on_flat_regions() {
        let data = vec![100u8; 3 * 3 * 4];
        let buffer = PixelBuffer::from_raw(3, 3, data).unwrap();
        let area = Area::clamped(&buffer, 1, 1, 1);
        assert!(area.luminance_stddev().abs() < 1e-9);
    }
}
