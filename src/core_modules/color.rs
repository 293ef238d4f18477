// THEORY:
// The `Color` module is the most fundamental building block of the census
// engine. It is a "dumb" data container: a single, normalized 8-bit RGB
// triple with structural equality and hashing, so that two visually
// identical pixels always collide to the same histogram key no matter which
// pixel format they were decoded from.
//
// Key architectural principles:
// 1.  **Normalization First**: A `Color` is only ever constructed from
//     non-premultiplied 8-bit channel values. Conversion from native pixel
//     encodings happens *before* a `Color` exists, never after.
// 2.  **Intrinsic Knowledge**: It contains methods (`hex`) that render
//     properties based only on its own channel data. It knows nothing about
//     other colors or how often it occurs.
// 3.  **Efficiency**: A transparent `Copy` struct, cheap to create and to
//     store as a key in large hash maps.

pub mod color {
    use image::Rgb;
    use std::fmt;

    /// A "dumb" data container representing one normalized 8-bit RGB color.
    ///
    /// The derived ordering compares the red channel first, then green, then
    /// blue. Ranking uses it as the deterministic secondary key when two
    /// colors occur equally often.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Color {
        /// The red channel value (0-255).
        pub red: u8,
        /// The green channel value (0-255).
        pub green: u8,
        /// The blue channel value (0-255).
        pub blue: u8,
    }

    impl Color {
        pub fn new(red: u8, green: u8, blue: u8) -> Self {
            Self { red, green, blue }
        }

        /// Renders the color as an uppercase `#RRGGBB` string, two
        /// zero-padded hex digits per channel.
        pub fn hex(&self) -> String {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        }
    }

    impl From<Rgb<u8>> for Color {
        fn from(pixel: Rgb<u8>) -> Self {
            let Rgb([red, green, blue]) = pixel;
            Self { red, green, blue }
        }
    }

    impl fmt::Display for Color {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.hex())
        }
    }

}
