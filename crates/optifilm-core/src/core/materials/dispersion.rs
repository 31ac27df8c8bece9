#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispersionModel {
    /// `n² = 1 + Σ Bᵢλ²/(λ² − Cᵢ)`, λ in µm.
    Sellmeier { b: [f64; 3], c: [f64; 3] },
    /// `n = A + B/λ² + C/λ⁴`, λ in µm.
    Cauchy { a: f64, b: f64, c: f64 },
    Constant { n: f64 },
}

impl DispersionModel {
    pub fn name(&self) -> &'static str {
        match self {
            DispersionModel::Sellmeier { .. } => "sellmeier",
            DispersionModel::Cauchy { .. } => "cauchy",
            DispersionModel::Constant { .. } => "constant",
        }
    }

    #[inline]
    pub fn index_at(&self, wavelength_nm: f64) -> f64 {
        let lambda_um = wavelength_nm / 1000.0;
        match *self {
            DispersionModel::Sellmeier { b, c } => {
                let lambda2 = lambda_um * lambda_um;
                let n_squared = 1.0
                    + b.iter()
                        .zip(c.iter())
                        .map(|(bi, ci)| bi * lambda2 / (lambda2 - ci))
                        .sum::<f64>();
                // Near a resonance the sum can go negative.
                n_squared.abs().sqrt()
            }
            DispersionModel::Cauchy { a, b, c } => {
                let lambda2 = lambda_um * lambda_um;
                a + b / lambda2 + c / (lambda2 * lambda2)
            }
            DispersionModel::Constant { n } => n,
        }
    }
}
