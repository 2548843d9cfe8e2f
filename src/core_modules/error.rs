// THEORY:
// All failures the engine can report, in one place. Every variant describes a
// caller configuration defect, not a transient condition, so nothing here is
// retried or recovered internally — errors surface synchronously to whoever
// called `convolve`, and a failed pass produces no partial output.
//
// The shape and degenerate variants carry the output coordinate that triggered
// them. Custom kernel generators are the usual culprit for both, and without the
// coordinate they are miserable to debug.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvolveError>;

#[derive(Error, Debug)]
pub enum ConvolveError {
    /// The provided image source is not a recognized raster representation.
    #[error("invalid image source: {0}")]
    InvalidSource(String),

    /// The resolved kernel's grid does not cover the (possibly edge-clamped)
    /// neighborhood it was applied to.
    #[error(
        "kernel grid of {kernel_rows}x{kernel_cols} does not cover the \
         {area_rows}x{area_cols} neighborhood at ({x}, {y})"
    )]
    KernelShape {
        x: u32,
        y: u32,
        kernel_rows: usize,
        kernel_cols: usize,
        area_rows: usize,
        area_cols: usize,
    },

    /// A color channel's total kernel weight summed to zero, making the
    /// normalization division undefined.
    #[error("kernel weights for the {channel} channel sum to zero at ({x}, {y})")]
    DegenerateKernel {
        x: u32,
        y: u32,
        channel: &'static str,
    },

    /// A worker task of the parallel pass aborted before delivering its rows.
    #[error("parallel worker failed: {0}")]
    Worker(String),

    /// Decode/encode failure in the image file plumbing.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}
