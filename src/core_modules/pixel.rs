// THEORY:
// The `Pixel` module is the most fundamental unit of the convolution engine. It is
// a "dumb" data container for a single RGBA color value, but with one important
// twist: its channels are stored as floats, not bytes. During a convolution pass a
// pixel plays two roles — it is both a *sample* read from the input raster and a
// *weight* inside a kernel — and weights are routinely negative or fractional.
// Channels are therefore unclamped for the whole of the accumulation; clamping and
// truncation to byte storage happen exactly once, at the final write into the
// output raster.
//
// Key architectural principles:
// 1.  **One representation for samples and weights**: Kernel weights share this
//     type, which is what makes scalar-weight promotion work — a bare number `n`
//     becomes the uniform gray weight (n, n, n, 255) via `Pixel::gray`.
// 2.  **Default conventions**: The constructor family encodes the toolkit's
//     defaulting rules: no arguments → opaque black, one value → opaque gray,
//     two → gray with alpha, three → opaque color, four → everything explicit.
// 3.  **Minimal algebra**: Only the arithmetic the engine's accumulation loop
//     needs (per-channel weighting and addition). This is not a color library.

pub mod pixel {
    pub type Byte = u8;
    pub type Bytes = Vec<Byte>;
    pub type Channel = f32;
    pub type Luminance = f64;

    pub const CHANNELS: usize = 4;
    pub const CHANNEL_MAX: Channel = 255.0;
    /// The alpha value assumed whenever a constructor leaves it unspecified.
    pub const OPAQUE: Channel = 255.0;

    /// A "dumb" data container representing a single RGBA value with unclamped
    /// float channels. Used both for raster samples and for kernel weights.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Pixel {
        /// The red channel value (conventionally 0-255, unclamped internally).
        pub red: Channel,
        /// The green channel value (conventionally 0-255, unclamped internally).
        pub green: Channel,
        /// The blue channel value (conventionally 0-255, unclamped internally).
        pub blue: Channel,
        /// The alpha channel value (conventionally 0-255).
        pub alpha: Channel,
    }

    impl Default for Pixel {
        /// Zero-argument convention: opaque black.
        fn default() -> Self {
            Pixel::new(0.0, 0.0, 0.0, OPAQUE)
        }
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// One-argument convention: a uniform gray at full alpha. This is the
        /// promotion rule for bare scalar kernel weights.
        pub fn gray(value: Channel) -> Self {
            Pixel::new(value, value, value, OPAQUE)
        }

        /// Two-argument convention: a uniform gray with an explicit alpha.
        pub fn gray_alpha(value: Channel, alpha: Channel) -> Self {
            Pixel::new(value, value, value, alpha)
        }

        /// Three-argument convention: an explicit color at full alpha.
        pub fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, OPAQUE)
        }

        /// Luminance estimate (Rec. 601 luma) on the 0..255 scale.
        /// Used by neighborhood statistics and content-adaptive kernels.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64
                + 0.587_f64 * self.green as f64
                + 0.114_f64 * self.blue as f64
        }

        /// Component-wise product of this sample's color channels with a weight
        /// pixel's color channels. Alpha is never weighted by the engine, so it
        /// is passed through untouched.
        pub fn weighted_by(&self, weights: &Pixel) -> Pixel {
            Pixel::new(
                self.red * weights.red,
                self.green * weights.green,
                self.blue * weights.blue,
                self.alpha,
            )
        }
    }

    impl std::ops::Add for Pixel {
        type Output = Pixel;

        /// Per-channel addition for accumulation. Alpha accumulates too, but the
        /// engine discards it at the final write.
        fn add(self, other: Pixel) -> Pixel {
            Pixel::new(
                self.red + other.red,
                self.green + other.green,
                self.blue + other.blue,
                self.alpha + other.alpha,
            )
        }
    }

    impl From<&[Byte]> for Pixel {
        fn from(bytes: &[Byte]) -> Self {
            if bytes.len() != CHANNELS {
                panic!("Cannot convert {} bytes into pixel.", bytes.len());
            }
            Pixel::new(
                bytes[0] as Channel,
                bytes[1] as Channel,
                bytes[2] as Channel,
                bytes[3] as Channel,
            )
        }
    }

    impl From<Pixel> for Bytes {
        /// Storage conversion: each channel clamped to 0..255 and truncated.
        fn from(pixel: Pixel) -> Self {
            vec![
                pixel.red.clamp(0.0, CHANNEL_MAX) as Byte,
                pixel.green.clamp(0.0, CHANNEL_MAX) as Byte,
                pixel.blue.clamp(0.0, CHANNEL_MAX) as Byte,
                pixel.alpha.clamp(0.0, CHANNEL_MAX) as Byte,
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn default_is_opaque_black() {
        let pixel = Pixel::default();
        assert_eq!(pixel, Pixel::new(0.0, 0.0, 0.0, 255.0));
    }

    #[test]
    fn gray_promotes_scalar_to_uniform_weight() {
        let pixel = Pixel::gray(7.0);
        assert_eq!(pixel, Pixel::new(7.0, 7.0, 7.0, 255.0));
    }

    #[test]
    fn gray_alpha_keeps_explicit_alpha() {
        let pixel = Pixel::gray_alpha(10.0, 128.0);
        assert_eq!(pixel, Pixel::new(10.0, 10.0, 10.0, 128.0));
    }

    #[test]
    fn rgb_defaults_alpha_to_opaque() {
        let pixel = Pixel::rgb(1.0, 2.0, 3.0);
        assert_eq!(pixel, Pixel::new(1.0, 2.0, 3.0, 255.0));
    }

    #[test]
    fn luminance_of_white_is_full_scale() {
        let white = Pixel::gray(255.0);
        assert!((white.luminance() - 255.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_by_multiplies_color_channels_only() {
        let sample = Pixel::new(10.0, 20.0, 30.0, 40.0);
        let weights = Pixel::new(2.0, 0.5, -1.0, 255.0);
        let weighted = sample.weighted_by(&weights);
        assert_eq!(weighted.red, 20.0);
        assert_eq!(weighted.green, 10.0);
        assert_eq!(weighted.blue, -30.0);
        assert_eq!(weighted.alpha, 40.0);
    }

    #[test]
    fn from_bytes_round_trips() {
        let bytes = [10u8, 20, 30, 255];
        let pixel = Pixel::from(&bytes[..]);
        let back: Bytes = pixel.into();
        assert_eq!(back, bytes.to_vec());
    }

    #[test]
    fn storage_conversion_clamps_and_truncates() {
        let pixel = Pixel::new(-5.0, 300.0, 12.9, 255.0);
        let bytes: Bytes = pixel.into();
        assert_eq!(bytes, vec![0, 255, 12, 255]);
    }

    #[test]
    #[should_panic]
    fn from_bytes_rejects_wrong_length() {
        let _ = Pixel::from(&[1u8, 2, 3][..]);
    }
}
