use crate::core::models::layer::Layer;
use crate::core::models::tooling::ToolingFactors;
use nalgebra::{Complex, Matrix2};
use std::f64::consts::PI;

pub type CharacteristicMatrix = Matrix2<Complex<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    /// Transverse electric.
    S,
    /// Transverse magnetic.
    P,
}

impl Polarization {
    #[inline]
    pub fn admittance(self, index: f64, cos_theta: f64) -> f64 {
        match self {
            Polarization::S => index * cos_theta,
            Polarization::P => index / cos_theta,
        }
    }
}

/// Returned when Snell's law has no real solution in some medium.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evanescent {
    pub sin_theta: f64,
}

/// Cosine of the propagation angle inside a medium of `index`, given the invariant
/// `n0·sin θ0`.
#[inline]
pub fn cos_propagation(snell_invariant: f64, index: f64) -> Result<f64, Evanescent> {
    let sin_theta = snell_invariant / index;
    if sin_theta.abs() > 1.0 {
        return Err(Evanescent { sin_theta });
    }
    Ok((1.0 - sin_theta * sin_theta).sqrt())
}

#[inline]
pub fn layer_matrix(phase: f64, admittance: f64) -> CharacteristicMatrix {
    let (sin, cos) = phase.sin_cos();
    Matrix2::new(
        Complex::new(cos, 0.0),
        Complex::new(0.0, sin / admittance),
        Complex::new(0.0, admittance * sin),
        Complex::new(cos, 0.0),
    )
}

/// Builds `L[n-1] · ... · L[0]` for the given polarization.
///
/// Thicknesses are scaled by the tooling factor of each layer's material before the
/// phase is evaluated.
pub fn stack_matrix(
    layers: &[Layer],
    tooling: &ToolingFactors,
    wavelength_nm: f64,
    snell_invariant: f64,
    polarization: Polarization,
) -> Result<CharacteristicMatrix, Evanescent> {
    let mut product = CharacteristicMatrix::identity();
    for layer in layers.iter().rev() {
        let index = layer.refractive_index(wavelength_nm);
        let cos_theta = cos_propagation(snell_invariant, index)?;
        let thickness = layer.thickness * tooling.factor_for(layer.material);
        let phase = 2.0 * PI * index * thickness * cos_theta / wavelength_nm;
        product = product * layer_matrix(phase, polarization.admittance(index, cos_theta));
    }
    Ok(product)
}

/// Amplitude reflection coefficient of an assembly with matrix `m` between media of
/// admittance `eta_incident` and `eta_substrate`.
#[inline]
pub fn reflection_coefficient(
    m: &CharacteristicMatrix,
    eta_incident: f64,
    eta_substrate: f64,
) -> Complex<f64> {
    let front = m[(0, 0)] * eta_incident + m[(0, 1)] * (eta_incident * eta_substrate);
    let back = m[(1, 0)] + m[(1, 1)] * eta_substrate;
    (front - back) / (front + back)
}
