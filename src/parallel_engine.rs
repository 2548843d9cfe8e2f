// THEORY:
// The parallel pass exploits the one structural guarantee the engine gives us:
// every output pixel is a pure function of the read-only input and the kernel
// source, with no cross-pixel ordering. Output rows are therefore partitioned
// into contiguous bands, one blocking task per band, each producing its own
// byte run; bands are joined in row order and concatenated into the output
// raster. No locking anywhere — the input is shared immutably behind an `Arc`
// and no two bands touch the same output region.
//
// The result is bit-identical to the sequential pass. Errors keep the same
// contract too: the first failing band aborts the whole pass and no partial
// output escapes.

use crate::core_modules::error::{ConvolveError, Result};
use crate::core_modules::kernel::KernelSource;
use crate::core_modules::pixel::pixel::Byte;
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::engine::{ConvolutionEngine, EngineConfig};
use std::sync::Arc;
use tracing::debug;

/// Row-partitioned variant of `ConvolutionEngine`. Same semantics, spread over
/// a pool of blocking tasks.
pub struct ParallelConvolutionEngine {
    engine: ConvolutionEngine,
    worker_count: usize,
}

impl Default for ParallelConvolutionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ParallelConvolutionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: ConvolutionEngine::new(config),
            worker_count: num_cpus::get().max(1),
        }
    }

    /// Overrides the worker count (defaults to the number of logical CPUs).
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    /// Runs the pass with output rows partitioned across worker tasks. The
    /// kernel source must be shareable because a generator may be invoked from
    /// any band.
    pub async fn convolve(
        &self,
        input: Arc<PixelBuffer>,
        kernel_source: Arc<KernelSource>,
        size: Option<usize>,
    ) -> Result<PixelBuffer> {
        let size = self.engine.resolve_size(&kernel_source, size);
        let half_size = (size / 2) as u32;
        let height = input.height();
        let band_height = height.div_ceil(self.worker_count as u32).max(1);
        debug!(
            width = input.width(),
            height,
            size,
            workers = self.worker_count,
            band_height,
            "starting parallel convolution pass"
        );

        let mut handles = Vec::new();
        let mut band_start = 0u32;
        while band_start < height {
            let band_end = (band_start + band_height).min(height);
            let engine = self.engine.clone();
            let input = Arc::clone(&input);
            let kernel_source = Arc::clone(&kernel_source);

            handles.push(tokio::task::spawn_blocking(move || -> Result<Vec<Byte>> {
                let mut band = Vec::new();
                for y in band_start..band_end {
                    band.extend(engine.convolve_row(&input, &kernel_source, half_size, y)?);
                }
                Ok(band)
            }));

            band_start = band_end;
        }

        let bands = futures::future::try_join_all(handles)
            .await
            .map_err(|join_error| ConvolveError::Worker(join_error.to_string()))?;

        let mut data = Vec::with_capacity(input.data().len());
        for band in bands {
            data.extend(band?);
        }
        PixelBuffer::from_raw(input.width(), height, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::kernel::Kernel;

    fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let value = ((x * 13 + y * 31) % 256) as u8;
                data.extend_from_slice(&[value, value.wrapping_mul(3), value / 2, 255]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[tokio::test]
    async fn parallel_pass_matches_sequential_for_static_kernels() {
        let input = gradient_buffer(16, 11);
        let kernel: KernelSource = Kernel::gaussian(5, 1.4).into();

        let sequential = ConvolutionEngine::default()
            .convolve(&input, &kernel, None)
            .unwrap();
        let parallel = ParallelConvolutionEngine::default()
            .with_worker_count(4)
            .convolve(Arc::new(input), Arc::new(kernel), None)
            .await
            .unwrap();

        assert_eq!(parallel.data(), sequential.data());
    }

    #[tokio::test]
    async fn parallel_pass_matches_sequential_for_generators() {
        let input = gradient_buffer(9, 9);
        let sequential = ConvolutionEngine::default()
            .convolve(&input, &KernelSource::luminance_adaptive(25.0), Some(3))
            .unwrap();
        let parallel = ParallelConvolutionEngine::default()
            .with_worker_count(3)
            .convolve(
                Arc::new(input),
                Arc::new(KernelSource::luminance_adaptive(25.0)),
                Some(3),
            )
            .await
            .unwrap();

        assert_eq!(parallel.data(), sequential.data());
    }

    #[tokio::test]
    async fn more_workers_than_rows_still_covers_every_row() {
        let input = gradient_buffer(5, 2);
        let kernel: KernelSource = Kernel::uniform(3).into();
        let sequential = ConvolutionEngine::default()
            .convolve(&input, &kernel, None)
            .unwrap();
        let parallel = ParallelConvolutionEngine::default()
            .with_worker_count(8)
            .convolve(Arc::new(input), Arc::new(kernel), None)
            .await
            .unwrap();
        assert_eq!(parallel.data(), sequential.data());
    }

    #[tokio::test]
    async fn band_errors_abort_the_whole_pass() {
        let input = gradient_buffer(4, 4);
        let degenerate: KernelSource = Kernel::from_scalars(vec![vec![0.0]]).into();
        let result = ParallelConvolutionEngine::default()
            .with_worker_count(2)
            .convolve(Arc::new(input), Arc::new(degenerate), Some(1))
            .await;
        assert!(matches!(
            result,
            Err(ConvolveError::DegenerateKernel { .. })
        ));
    }
}
