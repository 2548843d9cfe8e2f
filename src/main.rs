// Example runner for the `raster_kernel` library: builds a synthetic gradient
// raster, runs a Gaussian blur (static kernel), a box blur over the parallel
// engine, and an edge-preserving adaptive pass, then writes the results as PNGs
// into the working directory.

use raster_kernel::image_helper::image_helper;
use raster_kernel::{
    ConvolutionEngine, Kernel, KernelSource, ParallelConvolutionEngine, PixelBuffer,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn gradient_raster(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let ramp = ((x + y) % 256) as u8;
            data.extend_from_slice(&[ramp, 255 - ramp, ramp / 2, 255]);
        }
    }
    PixelBuffer::from_raw(width, height, data).expect("gradient raster dimensions are valid")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Raster Kernel - Example Runner");

    let input = gradient_raster(256, 256);
    let engine = ConvolutionEngine::default();

    let blurred = engine.convolve(&input, &Kernel::gaussian(5, 1.4).into(), None)?;
    image_helper::save("gaussian_blur.png", &blurred)?;
    info!("wrote gaussian_blur.png");

    let parallel = ParallelConvolutionEngine::default();
    let boxed = parallel
        .convolve(
            Arc::new(input.clone()),
            Arc::new(KernelSource::from(Kernel::uniform(5))),
            None,
        )
        .await?;
    image_helper::save("box_blur.png", &boxed)?;
    info!("wrote box_blur.png");

    let adaptive = engine.convolve(&input, &KernelSource::luminance_adaptive(20.0), Some(5))?;
    image_helper::save("adaptive_smooth.png", &adaptive)?;
    info!("wrote adaptive_smooth.png");

    Ok(())
}
