// THEORY:
// The `PixelBuffer` module is the raster the engine reads from and writes into:
// a width x height grid of RGBA pixels stored as one flat byte array, row-major,
// top-to-bottom, four bytes per pixel. Its entire job is coordinate math — the
// invariant `offset(x, y) = (y * width + x) * 4` — and single-pixel access on
// top of it.
//
// Key architectural principles:
// 1.  **Validated at the boundary, trusted in the loop**: `from_raw` is the only
//     way to build a buffer from outside bytes and it checks dimensions against
//     the byte length once. After that, `offset` assumes in-range coordinates;
//     the clamped `Area` construction guarantees the engine never hands it
//     anything else.
// 2.  **Immutable in spirit**: An input buffer is never mutated during a pass.
//     `put_pixel` exists solely so the engine can fill a freshly allocated
//     output buffer.
// 3.  **Dumb container**: No filtering logic lives here. The buffer knows how to
//     find a pixel, not what to do with it.

pub mod pixel_buffer {
    use crate::core_modules::error::{ConvolveError, Result};
    use crate::core_modules::pixel::pixel::{Byte, CHANNELS, Pixel};

    /// A flat RGBA raster with row-major, top-to-bottom pixel layout.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PixelBuffer {
        /// The width of the raster in pixels.
        width: u32,
        /// The height of the raster in pixels.
        height: u32,
        /// The flat channel array, `width * height * 4` bytes, R,G,B,A order.
        data: Vec<Byte>,
    }

    impl PixelBuffer {
        /// Builds a buffer from raw bytes, validating that the byte length
        /// matches the claimed dimensions and that both dimensions are nonzero.
        pub fn from_raw(width: u32, height: u32, data: Vec<Byte>) -> Result<Self> {
            if width == 0 || height == 0 {
                return Err(ConvolveError::InvalidSource(format!(
                    "raster with zero dimension ({width}x{height})"
                )));
            }
            let expected = (width as usize) * (height as usize) * CHANNELS;
            if data.len() != expected {
                return Err(ConvolveError::InvalidSource(format!(
                    "{width}x{height} raster with {} bytes (expected {expected})",
                    data.len()
                )));
            }
            Ok(Self {
                width,
                height,
                data,
            })
        }

        /// Allocates a zeroed buffer of the given dimensions. Used by the engine
        /// for output rasters, which are fully overwritten before being returned.
        pub fn blank(width: u32, height: u32) -> Self {
            let size = (width as usize) * (height as usize) * CHANNELS;
            Self {
                width,
                height,
                data: vec![0; size],
            }
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        pub fn data(&self) -> &[Byte] {
            &self.data
        }

        pub fn into_data(self) -> Vec<Byte> {
            self.data
        }

        /// Byte offset of the pixel at (x, y). Callers must pass in-range
        /// coordinates; the clamped neighborhood construction enforces this.
        pub fn offset(&self, x: u32, y: u32) -> usize {
            debug_assert!(x < self.width && y < self.height);
            ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
        }

        /// Reads the pixel at (x, y). No side effects.
        pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
            let offset = self.offset(x, y);
            Pixel::from(&self.data[offset..offset + CHANNELS])
        }

        /// Writes four channel bytes at (x, y). Only used while constructing an
        /// output raster.
        pub fn put_pixel(&mut self, x: u32, y: u32, channels: [Byte; CHANNELS]) {
            let offset = self.offset(x, y);
            self.data[offset..offset + CHANNELS].copy_from_slice(&channels);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel_buffer::PixelBuffer;
    use crate::core_modules::error::ConvolveError;
    use crate::core_modules::pixel::pixel::Pixel;

    #[test]
    fn offset_follows_row_major_layout() {
        let buffer = PixelBuffer::blank(7, 5);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(buffer.offset(x, y), ((y * 7 + x) * 4) as usize);
            }
        }
    }

    #[test]
    fn from_raw_rejects_mismatched_byte_length() {
        let result = PixelBuffer::from_raw(2, 2, vec![0; 15]);
        assert!(matches!(result, Err(ConvolveError::InvalidSource(_))));
    }

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        let result = PixelBuffer::from_raw(0, 3, Vec::new());
        assert!(matches!(result, Err(ConvolveError::InvalidSource(_))));
    }

    #[test]
    fn get_and_put_round_trip() {
        let mut buffer = PixelBuffer::blank(3, 2);
        buffer.put_pixel(2, 1, [10, 20, 30, 255]);
        let pixel = buffer.get_pixel(2, 1);
        assert_eq!(pixel, Pixel::new(10.0, 20.0, 30.0, 255.0));
    }

    #[test]
    fn reading_four_consecutive_bytes_yields_the_pixel() {
        let mut data = vec![0u8; 2 * 2 * 4];
        let offset = (1 * 2 + 1) * 4;
        data[offset..offset + 4].copy_from_slice(&[9, 8, 7, 6]);
        let buffer = PixelBuffer::from_raw(2, 2, data).unwrap();
        assert_eq!(buffer.get_pixel(1, 1), Pixel::new(9.0, 8.0, 7.0, 6.0));
    }
}
