use super::cie::{CIE_END_NM, CIE_START_NM, cie_at};
use crate::core::models::spectrum::SpectrumSample;
use serde::Serialize;
use std::fmt;

const WHITE_POINT: Xyz = Xyz {
    x: 0.95047,
    y: 1.0,
    z: 1.08883,
};

const LAB_DELTA: f64 = 6.0 / 29.0;
const CHROMA_NAMING_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    /// Hue angle in degrees, `[0, 360)`.
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorName {
    Red,
    Orange,
    Yellow,
    YellowGreen,
    GreenCyan,
    CyanBlue,
    BlueMagenta,
    MagentaRed,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorResult {
    pub rgb: Rgb,
    pub hex: String,
    pub dominant_wavelength: f64,
    pub name: ColorName,
    /// Mean reflectivity over the visible samples, in percent.
    pub average_reflectivity: f64,
    pub xyz: Xyz,
    pub lab: Lab,
    pub lch: Lch,
    pub visible_samples: Vec<SpectrumSample>,
}

impl Xyz {
    pub fn to_lab(&self) -> Lab {
        let fx = lab_f(self.x / WHITE_POINT.x);
        let fy = lab_f(self.y / WHITE_POINT.y);
        let fz = lab_f(self.z / WHITE_POINT.z);
        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    pub fn to_srgb(&self) -> Rgb {
        let linear = [
            3.2406 * self.x - 1.5372 * self.y - 0.4986 * self.z,
            -0.9689 * self.x + 1.8758 * self.y + 0.0415 * self.z,
            0.0557 * self.x - 0.204 * self.y + 1.057 * self.z,
        ];
        let mut encoded = linear.map(gamma_encode);
        let peak = encoded.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if peak > 1.0 {
            encoded.iter_mut().for_each(|c| *c /= peak);
        }
        let [r, g, b] = encoded.map(quantize);
        Rgb { r, g, b }
    }
}

impl Lab {
    pub fn to_lch(&self) -> Lch {
        let mut h = self.b.atan2(self.a).to_degrees();
        if h < 0.0 {
            h += 360.0;
        }
        Lch {
            l: self.l,
            c: self.a.hypot(self.b),
            h,
        }
    }
}

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl ColorName {
    pub fn from_lch(lch: &Lch) -> Self {
        if lch.c <= CHROMA_NAMING_THRESHOLD {
            return ColorName::Neutral;
        }
        match lch.h {
            h if h < 30.0 => ColorName::Red,
            h if h < 60.0 => ColorName::Orange,
            h if h < 90.0 => ColorName::Yellow,
            h if h < 150.0 => ColorName::YellowGreen,
            h if h < 210.0 => ColorName::GreenCyan,
            h if h < 270.0 => ColorName::CyanBlue,
            h if h < 330.0 => ColorName::BlueMagenta,
            _ => ColorName::MagentaRed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Red => "Red",
            ColorName::Orange => "Orange",
            ColorName::Yellow => "Yellow",
            ColorName::YellowGreen => "Yellow-Green",
            ColorName::GreenCyan => "Green-Cyan",
            ColorName::CyanBlue => "Cyan-Blue",
            ColorName::BlueMagenta => "Blue-Magenta",
            ColorName::MagentaRed => "Magenta-Red",
            ColorName::Neutral => "Neutral/Achromatic",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_DELTA.powi(3) {
        t.cbrt()
    } else {
        t / (3.0 * LAB_DELTA * LAB_DELTA) + 4.0 / 29.0
    }
}

fn gamma_encode(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn quantize(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Tristimulus values of the visible part of `samples` (reflectivity in percent).
///
/// Returns `None` when no sample lies in the band or the illuminant weight vanishes.
pub fn tristimulus(samples: &[SpectrumSample]) -> Option<Xyz> {
    let mut xyz = Xyz {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    let mut normalization = 0.0;
    for sample in samples.iter().filter(|s| is_visible(s.wavelength)) {
        let reflectance = sample.reflectivity / 100.0;
        let cie = cie_at(sample.wavelength);
        xyz.x += reflectance * cie.d65 * cie.x;
        xyz.y += reflectance * cie.d65 * cie.y;
        xyz.z += reflectance * cie.d65 * cie.z;
        normalization += cie.d65 * cie.y;
    }
    if normalization == 0.0 {
        return None;
    }
    Some(Xyz {
        x: xyz.x / normalization,
        y: xyz.y / normalization,
        z: xyz.z / normalization,
    })
}

fn is_visible(wavelength: f64) -> bool {
    (CIE_START_NM..=CIE_END_NM).contains(&wavelength)
}

pub fn color_from_spectrum(samples: &[SpectrumSample]) -> Option<ColorResult> {
    let visible_samples: Vec<SpectrumSample> = samples
        .iter()
        .copied()
        .filter(|s| is_visible(s.wavelength))
        .collect();
    if visible_samples.is_empty() {
        return None;
    }

    let xyz = tristimulus(&visible_samples)?;
    let lab = xyz.to_lab();
    let lch = lab.to_lch();
    let rgb = xyz.to_srgb();

    let mut dominant_wavelength = 0.0;
    let mut peak = 0.0;
    for sample in &visible_samples {
        if sample.reflectivity > peak {
            peak = sample.reflectivity;
            dominant_wavelength = sample.wavelength;
        }
    }

    let average_reflectivity = visible_samples.iter().map(|s| s.reflectivity).sum::<f64>()
        / visible_samples.len() as f64;

    Some(ColorResult {
        hex: rgb.hex(),
        rgb,
        dominant_wavelength,
        name: ColorName::from_lch(&lch),
        average_reflectivity,
        xyz,
        lab,
        lch,
        visible_samples,
    })
}
