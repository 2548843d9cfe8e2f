// THEORY:
// The `engine` module is the top-level API for the convolution pass and the only
// place with real algorithmic content. For every output coordinate it: samples
// the clamped neighborhood from the input raster, resolves the kernel (static
// grid or per-pixel generator), validates the kernel's shape and weight sums,
// accumulates the weighted per-channel sums, normalizes by the weight actually
// applied, and writes the quantized result into a fresh output raster of
// identical dimensions.
//
// Key architectural principles:
// 1.  **Normalized convolution**: The division is by the sum of the weights that
//     were actually applied, never by a fixed kernel area. This is what keeps
//     edge-clamped (shrunken) neighborhoods correctly scaled instead of
//     darkening toward the borders.
// 2.  **Pure per-pixel function**: Each output pixel depends only on the input
//     buffer and the kernel source. There is no cross-pixel ordering, which is
//     what lets `parallel_engine` split the pass by rows with no locking.
// 3.  **Validate before accumulating**: Kernel shape and degenerate weight sums
//     are rejected with typed, coordinate-carrying errors before the weighted
//     accumulation runs. A failed pass produces no partial output.
// 4.  **Boundary dispatch once**: `ImageSource` resolves whatever the caller has
//     (raw bytes, an already-built raster, a decoded image) into a `PixelBuffer`
//     at the API boundary, never inside the hot loop.

use crate::core_modules::area::area::Area;
use crate::core_modules::error::{ConvolveError, Result};
use crate::core_modules::kernel::{Kernel, KernelSource};
use crate::core_modules::pixel::pixel::{Byte, CHANNELS, CHANNEL_MAX, Channel};
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use tracing::debug;

/// Kernel side length used when the caller supplies neither an explicit size
/// nor a static kernel whose own length can serve as one.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

/// How a normalized channel value becomes a storage byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Truncate toward zero. The standard behavior.
    #[default]
    Truncate,
    /// Round to nearest. Opt-in, for parity with implementations that round.
    Round,
}

/// Tunable behavior of the engine. Passed explicitly — there is no process-wide
/// mutable default.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fallback kernel side length when no size can be inferred.
    pub default_kernel_size: usize,
    /// Channel quantization at the final write.
    pub rounding: Rounding,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_kernel_size: DEFAULT_KERNEL_SIZE,
            rounding: Rounding::default(),
        }
    }
}

/// The raster representations the engine accepts at its boundary. Resolved into
/// a `PixelBuffer` exactly once; anything unrecognizable fails there with
/// `InvalidSource`.
pub enum ImageSource {
    /// An already-built raster.
    Raster(PixelBuffer),
    /// Raw RGBA bytes with claimed dimensions, validated on resolve.
    Rgba {
        width: u32,
        height: u32,
        data: Vec<Byte>,
    },
    /// A decoded image, converted to RGBA8 on resolve.
    Decoded(image::DynamicImage),
}

impl ImageSource {
    /// Resolves this source into a validated raster.
    pub fn resolve(self) -> Result<PixelBuffer> {
        match self {
            ImageSource::Raster(buffer) => Ok(buffer),
            ImageSource::Rgba {
                width,
                height,
                data,
            } => PixelBuffer::from_raw(width, height, data),
            ImageSource::Decoded(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                PixelBuffer::from_raw(width, height, rgba.into_raw())
            }
        }
    }
}

/// The main, top-level struct for the convolution engine. Holds no state across
/// calls — a pass is a pure function of its inputs and the config.
#[derive(Debug, Clone, Default)]
pub struct ConvolutionEngine {
    config: EngineConfig,
}

impl ConvolutionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pass: every output coordinate of a freshly allocated
    /// raster of identical dimensions is the weighted, normalized average of
    /// its clamped neighborhood in `input`.
    ///
    /// `size` is the kernel side length. If omitted it defaults to a static
    /// kernel's own grid length, or to the configured default for generators.
    pub fn convolve(
        &self,
        input: &PixelBuffer,
        kernel_source: &KernelSource,
        size: Option<usize>,
    ) -> Result<PixelBuffer> {
        let size = self.resolve_size(kernel_source, size);
        let half_size = (size / 2) as u32;
        debug!(
            width = input.width(),
            height = input.height(),
            size,
            "starting convolution pass"
        );

        let mut output = PixelBuffer::blank(input.width(), input.height());
        for y in 0..input.height() {
            for x in 0..input.width() {
                let channels = self.convolve_at(input, kernel_source, half_size, x, y)?;
                output.put_pixel(x, y, channels);
            }
        }
        Ok(output)
    }

    /// Boundary-dispatching variant: resolves whatever raster representation
    /// the caller has, then runs the pass.
    pub fn convolve_source(
        &self,
        source: ImageSource,
        kernel_source: &KernelSource,
        size: Option<usize>,
    ) -> Result<PixelBuffer> {
        let input = source.resolve()?;
        self.convolve(&input, kernel_source, size)
    }

    /// Size-defaulting rule: explicit argument, else static kernel length, else
    /// the configured default.
    pub(crate) fn resolve_size(&self, kernel_source: &KernelSource, size: Option<usize>) -> usize {
        size.unwrap_or_else(|| {
            kernel_source
                .static_side()
                .unwrap_or(self.config.default_kernel_size)
        })
    }

    /// Computes one output row as raw bytes. The unit of work handed to the
    /// parallel pass.
    pub(crate) fn convolve_row(
        &self,
        input: &PixelBuffer,
        kernel_source: &KernelSource,
        half_size: u32,
        y: u32,
    ) -> Result<Vec<Byte>> {
        let mut row = Vec::with_capacity(input.width() as usize * CHANNELS);
        for x in 0..input.width() {
            row.extend_from_slice(&self.convolve_at(input, kernel_source, half_size, x, y)?);
        }
        Ok(row)
    }

    /// The per-coordinate step: neighborhood, kernel resolution, validation,
    /// weighted accumulation, normalization, quantization.
    fn convolve_at(
        &self,
        input: &PixelBuffer,
        kernel_source: &KernelSource,
        half_size: u32,
        x: u32,
        y: u32,
    ) -> Result<[Byte; CHANNELS]> {
        let area = Area::clamped(input, x, y, half_size);

        let generated;
        let (kernel, row_offset, col_offset): (&Kernel, usize, usize) = match kernel_source {
            KernelSource::Static(kernel) => {
                // A static grid stays full-size while the neighborhood shrinks
                // at edges; anchor it so kernel center stays over the area
                // center. Offsets are nonzero only where the window was clamped
                // at the top or left.
                let row_offset = (area.top as i64 - (y as i64 - half_size as i64)) as usize;
                let col_offset = (area.left as i64 - (x as i64 - half_size as i64)) as usize;
                if kernel.rows() < row_offset + area.rows()
                    || kernel.cols() < col_offset + area.cols()
                {
                    return Err(self.shape_error(x, y, kernel, &area));
                }
                (kernel, row_offset, col_offset)
            }
            KernelSource::Generator(generate) => {
                generated = generate(&area);
                // A generated kernel must shrink with its neighborhood.
                if generated.rows() != area.rows() || generated.cols() != area.cols() {
                    return Err(self.shape_error(x, y, &generated, &area));
                }
                (&generated, 0, 0)
            }
        };

        // Weight sums over the cells actually applied, checked before the
        // weighted accumulation so a degenerate kernel never divides.
        let mut weight_sum = [0.0 as Channel; 3];
        for row in 0..area.rows() {
            for col in 0..area.cols() {
                let weight = kernel.weight(row + row_offset, col + col_offset);
                weight_sum[0] += weight.red;
                weight_sum[1] += weight.green;
                weight_sum[2] += weight.blue;
            }
        }
        for (channel_sum, channel) in weight_sum.iter().zip(["red", "green", "blue"]) {
            if *channel_sum == 0.0 {
                return Err(ConvolveError::DegenerateKernel { x, y, channel });
            }
        }

        let mut area_sum = [0.0 as Channel; 3];
        for row in 0..area.rows() {
            for col in 0..area.cols() {
                let sample = &area.pixels[row][col];
                let weighted = sample.weighted_by(kernel.weight(row + row_offset, col + col_offset));
                area_sum[0] += weighted.red;
                area_sum[1] += weighted.green;
                area_sum[2] += weighted.blue;
            }
        }

        // Alpha from the neighborhood is discarded; the output is opaque.
        Ok([
            self.quantize(area_sum[0] / weight_sum[0]),
            self.quantize(area_sum[1] / weight_sum[1]),
            self.quantize(area_sum[2] / weight_sum[2]),
            CHANNEL_MAX as Byte,
        ])
    }

    fn shape_error(&self, x: u32, y: u32, kernel: &Kernel, area: &Area) -> ConvolveError {
        ConvolveError::KernelShape {
            x,
            y,
            kernel_rows: kernel.rows(),
            kernel_cols: kernel.cols(),
            area_rows: area.rows(),
            area_cols: area.cols(),
        }
    }

    /// Clamps a normalized channel value to storage range and quantizes it per
    /// the configured rounding mode.
    fn quantize(&self, value: Channel) -> Byte {
        let clamped = value.clamp(0.0, CHANNEL_MAX);
        match self.config.rounding {
            Rounding::Truncate => clamped as Byte,
            Rounding::Round => clamped.round() as Byte,
        }
    }
}
