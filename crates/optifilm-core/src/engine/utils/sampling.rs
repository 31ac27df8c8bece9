use rand::Rng;

/// Centered Irwin-Hall offset `(u1 + u2 + u3 + u4 - 2) / 2`, bounded to `[-1, 1]` with a
/// bell-shaped density (variance 1/12).
#[inline]
pub fn irwin_hall_offset(rng: &mut impl Rng) -> f64 {
    let sum: f64 = (0..4).map(|_| rng.r#gen::<f64>()).sum();
    (sum - 2.0) / 2.0
}

/// Multiplicative process error: `1 + offset * error_percent / 100`.
#[inline]
pub fn perturbation_multiplier(rng: &mut impl Rng, error_percent: f64) -> f64 {
    1.0 + irwin_hall_offset(rng) * (error_percent / 100.0)
}

/// Uniform multiplicative jitter in `[1 - amplitude, 1 + amplitude)`.
#[inline]
pub fn jitter_multiplier(rng: &mut impl Rng, amplitude: f64) -> f64 {
    1.0 - amplitude + rng.r#gen::<f64>() * (2.0 * amplitude)
}
