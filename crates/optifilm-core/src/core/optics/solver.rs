use super::matrix::{self, Evanescent, Polarization};
use crate::core::models::layer::Layer;
use crate::core::models::stack::Media;
use crate::core::models::tooling::ToolingFactors;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
enum GeometryError {
    #[error("No real propagation angle (sin θ = {0:.4})")]
    Evanescent(f64),
    #[error("Wavelength must be finite and positive, got {0}")]
    InvalidWavelength(f64),
    #[error("Angle of incidence must be finite, got {0}")]
    InvalidAngle(f64),
    #[error("Reflectance evaluated to a non-finite value")]
    NonFinite,
}

impl From<Evanescent> for GeometryError {
    fn from(e: Evanescent) -> Self {
        GeometryError::Evanescent(e.sin_theta)
    }
}

/// Unpolarized reflectance (fraction in `[0, 1]`) of `layers` between the given media.
///
/// `layers[0]` sits on the substrate. An angle of exactly zero uses the normal-incidence
/// path; any other angle averages the s and p reflectances. Degenerate inputs, including
/// angles where light cannot propagate into some layer, yield `0.0`.
pub fn reflectance(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    wavelength_nm: f64,
    angle_deg: f64,
) -> f64 {
    match try_reflectance(layers, media, tooling, wavelength_nm, angle_deg) {
        Ok(value) => value,
        Err(e) => {
            trace!(wavelength = wavelength_nm, angle = angle_deg, error = %e, "Reflectance fell back to zero");
            0.0
        }
    }
}

/// Always exactly `1 - reflectance`.
pub fn transmittance(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    wavelength_nm: f64,
    angle_deg: f64,
) -> f64 {
    1.0 - reflectance(layers, media, tooling, wavelength_nm, angle_deg)
}

/// Reflectance for a single polarization; `angle_deg` may be zero.
pub fn polarized_reflectance(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    wavelength_nm: f64,
    angle_deg: f64,
    polarization: Polarization,
) -> f64 {
    validate_inputs(wavelength_nm, angle_deg)
        .and_then(|_| {
            oblique_reflectance(layers, media, tooling, wavelength_nm, angle_deg, polarization)
        })
        .unwrap_or(0.0)
}

fn validate_inputs(wavelength_nm: f64, angle_deg: f64) -> Result<(), GeometryError> {
    if !wavelength_nm.is_finite() || wavelength_nm <= 0.0 {
        return Err(GeometryError::InvalidWavelength(wavelength_nm));
    }
    if !angle_deg.is_finite() {
        return Err(GeometryError::InvalidAngle(angle_deg));
    }
    Ok(())
}

fn try_reflectance(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    wavelength_nm: f64,
    angle_deg: f64,
) -> Result<f64, GeometryError> {
    validate_inputs(wavelength_nm, angle_deg)?;

    if angle_deg == 0.0 {
        let m = matrix::stack_matrix(layers, tooling, wavelength_nm, 0.0, Polarization::S)?;
        let r = matrix::reflection_coefficient(&m, media.incident, media.substrate);
        return finite_reflectance(r.norm_sqr());
    }

    let rs = oblique_reflectance(layers, media, tooling, wavelength_nm, angle_deg, Polarization::S)?;
    let rp = oblique_reflectance(layers, media, tooling, wavelength_nm, angle_deg, Polarization::P)?;
    Ok((rs + rp) / 2.0)
}

fn oblique_reflectance(
    layers: &[Layer],
    media: &Media,
    tooling: &ToolingFactors,
    wavelength_nm: f64,
    angle_deg: f64,
    polarization: Polarization,
) -> Result<f64, GeometryError> {
    let theta0 = angle_deg.to_radians();
    let snell_invariant = media.incident * theta0.sin();

    let cos_substrate = matrix::cos_propagation(snell_invariant, media.substrate)?;
    let m = matrix::stack_matrix(layers, tooling, wavelength_nm, snell_invariant, polarization)?;

    let eta_incident = polarization.admittance(media.incident, theta0.cos());
    let eta_substrate = polarization.admittance(media.substrate, cos_substrate);
    let r = matrix::reflection_coefficient(&m, eta_incident, eta_substrate);
    finite_reflectance(r.norm_sqr())
}

fn finite_reflectance(value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value.clamp(0.0, 1.0))
    } else {
        Err(GeometryError::NonFinite)
    }
}
