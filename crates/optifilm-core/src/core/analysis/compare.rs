use crate::core::models::spectrum::{SpectralPoint, SpectrumSample};

/// Pairs each computed point with the first measured sample within `tolerance` nm.
pub fn pair_with_reference<'a>(
    computed: &'a [SpectralPoint],
    reference: &'a [SpectrumSample],
    tolerance: f64,
) -> impl Iterator<Item = (&'a SpectralPoint, &'a SpectrumSample)> + 'a {
    computed.iter().filter_map(move |point| {
        reference
            .iter()
            .find(|sample| (sample.wavelength - point.wavelength).abs() < tolerance)
            .map(|sample| (point, sample))
    })
}

/// RMS reflectivity difference in percentage points, or `None` when no computed point
/// has a measured counterpart.
pub fn reference_rms(
    computed: &[SpectralPoint],
    reference: &[SpectrumSample],
    step: f64,
) -> Option<f64> {
    let (sum_squared, count) = pair_with_reference(computed, reference, 2.0 * step).fold(
        (0.0, 0usize),
        |(sum, count), (point, sample)| {
            (sum + (point.reflectivity - sample.reflectivity).powi(2), count + 1)
        },
    );
    (count > 0).then(|| (sum_squared / count as f64).sqrt())
}
