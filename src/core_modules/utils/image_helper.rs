// File plumbing around the engine: decode an on-disk image into a `PixelBuffer`
// and encode a buffer back out as PNG. The engine itself never touches disk.

pub mod image_helper {
    use crate::core_modules::error::Result;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
    use image::ImageEncoder;
    use std::path::Path;

    /// Decodes an image file into an RGBA raster.
    pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        PixelBuffer::from_raw(width, height, decoded.into_raw())
    }

    /// Encodes a raster as a PNG file.
    pub fn save(path: impl AsRef<Path>, buffer: &PixelBuffer) -> Result<()> {
        let output = std::fs::File::create(path).map_err(image::ImageError::IoError)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            buffer.data(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(())
    }
}
