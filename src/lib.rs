// THEORY:
// This file is the main entry point for the `raster_kernel` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (the surrounding image toolkit).
//
// The primary goal is to export the `ConvolutionEngine` and its associated data
// structures (`PixelBuffer`, `Kernel`, `KernelSource`, `EngineConfig`, the error
// taxonomy) as the clean, high-level interface for the whole engine. The
// internal modules (`core_modules`) stay encapsulated; consumers work with the
// re-exports below and never need the nested module paths.

pub mod core_modules;
pub mod engine;
pub mod parallel_engine;

// Re-export key data structures for the public API.
pub use crate::core_modules::area::area::Area;
pub use crate::core_modules::error::{ConvolveError, Result};
pub use crate::core_modules::kernel::{Kernel, KernelCell, KernelGenerator, KernelSource};
pub use crate::core_modules::pixel::pixel::Pixel;
pub use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
pub use crate::core_modules::utils::image_helper;
pub use crate::engine::{
    ConvolutionEngine, DEFAULT_KERNEL_SIZE, EngineConfig, ImageSource, Rounding,
};
pub use crate::parallel_engine::ParallelConvolutionEngine;
