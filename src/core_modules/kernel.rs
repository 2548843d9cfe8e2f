// THEORY:
// The `Kernel` module holds the weighting side of the convolution. A kernel is a
// rectangular grid of per-channel weights, one cell per neighborhood sample. A
// cell may be written as a bare scalar — promoted to a uniform gray weight via
// `Pixel::gray`, so a number `n` weights red, green and blue equally — or as a
// full `Pixel` with independent per-channel weights. Promotion happens once, at
// construction, before any accumulation.
//
// Key architectural principles:
// 1.  **Static or generated**: A `KernelSource` is either a fixed grid applied
//     everywhere, or a generator function invoked exactly once per output
//     coordinate with that coordinate's clamped `Area`. Generators are how
//     content-adaptive filters (edge-aware smoothing, statistics-driven
//     weighting) plug into the engine without the engine knowing anything about
//     them.
// 2.  **Shape discipline**: A generated kernel must match its area's grid
//     exactly — near edges the neighborhood shrinks and the generator must
//     shrink with it. The engine enforces this; the kernel only reports its
//     shape.
// 3.  **No baked-in normalization**: Presets like `gaussian` do not normalize
//     their weights. The engine divides by the actual weight sum applied, which
//     makes any uniform scaling of a kernel a no-op.

use crate::core_modules::area::area::Area;
use crate::core_modules::pixel::pixel::{Channel, Pixel};

/// One kernel cell as written by the caller: either a bare scalar weight or a
/// full per-channel weight pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelCell {
    /// A bare number, promoted to the uniform gray weight (n, n, n, 255).
    Scalar(Channel),
    /// Independent per-channel weights.
    Weights(Pixel),
}

impl KernelCell {
    /// Applies the scalar-promotion rule, yielding the effective weight pixel.
    pub fn resolve(&self) -> Pixel {
        match self {
            KernelCell::Scalar(value) => Pixel::gray(*value),
            KernelCell::Weights(pixel) => *pixel,
        }
    }
}

impl From<Channel> for KernelCell {
    fn from(value: Channel) -> Self {
        KernelCell::Scalar(value)
    }
}

impl From<Pixel> for KernelCell {
    fn from(pixel: Pixel) -> Self {
        KernelCell::Weights(pixel)
    }
}

/// A rectangular grid of resolved per-channel weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Resolved weight grid, row-major. Rectangular by construction.
    weights: Vec<Vec<Pixel>>,
}

impl Kernel {
    /// Builds a kernel from caller-written cells, applying scalar promotion
    /// immediately. All rows must have the same length.
    pub fn from_cells(cells: Vec<Vec<KernelCell>>) -> Self {
        debug_assert!(!cells.is_empty() && !cells[0].is_empty());
        debug_assert!(cells.iter().all(|row| row.len() == cells[0].len()));
        let weights = cells
            .iter()
            .map(|row| row.iter().map(KernelCell::resolve).collect())
            .collect();
        Self { weights }
    }

    /// Convenience constructor for all-scalar kernels.
    pub fn from_scalars(rows: Vec<Vec<Channel>>) -> Self {
        Self::from_cells(
            rows.into_iter()
                .map(|row| row.into_iter().map(KernelCell::Scalar).collect())
                .collect(),
        )
    }

    /// A square all-ones box kernel. With normalized convolution this is the
    /// unweighted neighborhood mean.
    pub fn uniform(side: usize) -> Self {
        Self::from_scalars(vec![vec![1.0; side]; side])
    }

    /// The 1x1 weight-one kernel: reproduces the input (modulo the engine's
    /// forced opaque alpha).
    pub fn identity() -> Self {
        Self::uniform(1)
    }

    /// A square Gaussian kernel, unnormalized. `sigma` is in pixels.
    pub fn gaussian(side: usize, sigma: Channel) -> Self {
        let half = (side / 2) as isize;
        let denominator = 2.0 * sigma * sigma;
        let rows = (0..side as isize)
            .map(|row| {
                (0..side as isize)
                    .map(|col| {
                        let dy = (row - half) as Channel;
                        let dx = (col - half) as Channel;
                        (-(dx * dx + dy * dy) / denominator).exp()
                    })
                    .collect()
            })
            .collect();
        Self::from_scalars(rows)
    }

    pub fn rows(&self) -> usize {
        self.weights.len()
    }

    pub fn cols(&self) -> usize {
        self.weights[0].len()
    }

    /// Side length used when a static kernel's own size stands in for an
    /// omitted `size` argument.
    pub fn side(&self) -> usize {
        self.rows()
    }

    /// The resolved weight at (row, col). Callers index within `rows`/`cols`.
    pub fn weight(&self, row: usize, col: usize) -> &Pixel {
        &self.weights[row][col]
    }
}

/// Where the engine gets its kernel from: a fixed grid, or a function producing
/// one per output coordinate.
pub enum KernelSource {
    /// One grid applied at every output coordinate.
    Static(Kernel),
    /// Invoked exactly once per output coordinate with that coordinate's
    /// clamped neighborhood. Must produce a kernel of exactly the area's shape.
    Generator(KernelGenerator),
}

pub type KernelGenerator = Box<dyn Fn(&Area) -> Kernel + Send + Sync>;

impl KernelSource {
    pub fn generator(generate: impl Fn(&Area) -> Kernel + Send + Sync + 'static) -> Self {
        KernelSource::Generator(Box::new(generate))
    }

    /// The static kernel's side length, if this source is static. Feeds the
    /// size-defaulting rule.
    pub fn static_side(&self) -> Option<usize> {
        match self {
            KernelSource::Static(kernel) => Some(kernel.side()),
            KernelSource::Generator(_) => None,
        }
    }

    /// A content-adaptive preset: weights each neighbor by how close its
    /// luminance is to the center sample's, Gaussian-falloff with `sigma` on
    /// the 0..255 luminance scale. Smooths flat regions while leaving edges
    /// mostly alone. The center weight is always 1, so the weight sum can
    /// never degenerate.
    pub fn luminance_adaptive(sigma: f64) -> Self {
        Self::generator(move |area: &Area| {
            let center = area.center_pixel().luminance();
            let denominator = 2.0 * sigma * sigma;
            let rows = area
                .pixels
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|pixel| {
                            let delta = pixel.luminance() - center;
                            (-(delta * delta) / denominator).exp() as Channel
                        })
                        .collect()
                })
                .collect();
            Kernel::from_scalars(rows)
        })
    }
}

impl From<Kernel> for KernelSource {
    fn from(kernel: Kernel) -> Self {
        KernelSource::Static(kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;

    #[test]
    fn scalar_cells_promote_to_uniform_gray() {
        let cell = KernelCell::Scalar(3.0);
        assert_eq!(cell.resolve(), Pixel::new(3.0, 3.0, 3.0, 255.0));
    }

    #[test]
    fn weight_cells_resolve_to_themselves() {
        let weights = Pixel::new(1.0, -2.0, 0.5, 255.0);
        assert_eq!(KernelCell::Weights(weights).resolve(), weights);
    }

    #[test]
    fn uniform_kernel_has_all_one_weights() {
        let kernel = Kernel::uniform(3);
        assert_eq!(kernel.rows(), 3);
        assert_eq!(kernel.cols(), 3);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(*kernel.weight(row, col), Pixel::gray(1.0));
            }
        }
    }

    #[test]
    fn identity_kernel_is_one_by_one() {
        let kernel = Kernel::identity();
        assert_eq!((kernel.rows(), kernel.cols()), (1, 1));
        assert_eq!(*kernel.weight(0, 0), Pixel::gray(1.0));
    }

    #[test]
    fn gaussian_peaks_at_center_and_is_symmetric() {
        let kernel = Kernel::gaussian(5, 1.0);
        let center = kernel.weight(2, 2).red;
        assert!((center - 1.0).abs() < 1e-6);
        for row in 0..5 {
            for col in 0..5 {
                assert!(kernel.weight(row, col).red <= center);
                assert_eq!(kernel.weight(row, col).red, kernel.weight(4 - row, 4 - col).red);
            }
        }
    }

    #[test]
    fn static_side_reports_grid_length() {
        let source = KernelSource::from(Kernel::uniform(7));
        assert_eq!(source.static_side(), Some(7));
        let generated = KernelSource::generator(|_area| Kernel::identity());
        assert_eq!(generated.static_side(), None);
    }

    #[test]
    fn luminance_adaptive_matches_area_shape_and_keeps_center_weight() {
        let mut data = Vec::new();
        for value in [0u8, 50, 100, 150, 200, 250, 20, 70, 120] {
            data.extend_from_slice(&[value, value, value, 255]);
        }
        let buffer = PixelBuffer::from_raw(3, 3, data).unwrap();
        let area = crate::core_modules::area::area::Area::clamped(&buffer, 0, 0, 1);

        let source = KernelSource::luminance_adaptive(30.0);
        let KernelSource::Generator(generate) = &source else {
            panic!("expected a generator source");
        };
        let kernel = generate(&area);
        assert_eq!((kernel.rows(), kernel.cols()), (area.rows(), area.cols()));
        // Center sample is at grid (0, 0) for a top-left corner area.
        assert!((kernel.weight(0, 0).red - 1.0).abs() < 1e-6);
        // A distant luminance gets a strictly smaller weight.
        assert!(kernel.weight(1, 1).red < 1.0);
    }
}
