//! # Color Module
//!
//! Converts a reflectance spectrum into the color a coated part appears to have under
//! daylight.
//!
//! ## Pipeline
//!
//! 1. **Band filtering** - Only samples between 380 and 780 nm (inclusive) are used.
//! 2. **Tristimulus integration** ([`cie`]) - Reflectance is weighted by the D65
//!    illuminant and the CIE 1931 2° observer, then normalized so that a perfect
//!    reflector has `Y = 1`.
//! 3. **Color spaces** ([`convert`]) - XYZ → CIELAB (D65 white) → LCh, and XYZ → sRGB with
//!    gamma encoding, uniform rescaling of out-of-gamut values, and 8-bit quantization.
//! 4. **Descriptors** - A hue-bucket color name (only above a chroma of 10), the
//!    wavelength of peak reflectance, and the mean reflectance over the band.
//!
//! The "dominant wavelength" reported here is the arg-max of reflectance, a simplified
//! stand-in for the colorimetric dominant wavelength.

pub mod cie;
pub mod convert;

pub use convert::{ColorName, ColorResult, Lab, Lch, Rgb, Xyz, color_from_spectrum};
