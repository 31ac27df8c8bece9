use super::load_reference;
use crate::cli::SpectrumArgs;
use crate::config::{FileConfig, build_spectrum_job};
use crate::error::{CliError, Result};
use optifilm::core::analysis::adjust::vertical_shift_preview;
use optifilm::core::io::{SpectrumCsv, SpectrumFile};
use optifilm::workflows::{self, spectrum::SpectrumResult};
use std::path::{Path, PathBuf};
use tracing::info;

pub async fn run(args: SpectrumArgs) -> Result<()> {
    let file = FileConfig::from_file(&args.config)?;
    info!("Resolving coating stack from {:?}", &args.config);
    let job = build_spectrum_job(file, &args)?;

    let reference = args.reference.as_deref().map(load_reference).transpose()?;

    println!(
        "Computing spectrum for {} layer(s) over {}-{} nm...",
        job.stack.layers.len(),
        job.range.min,
        job.range.max
    );
    let mut result = tokio::task::block_in_place(|| {
        workflows::spectrum::run(
            &job.stack,
            &job.tooling,
            &job.range,
            &job.angles,
            reference.as_deref(),
        )
    })?;

    if let Some(shift) = job.vertical_shift {
        info!("Previewing curves shifted by {} percentage points.", shift);
        shift_sweeps(&mut result, shift);
    }
    if let Some(output) = &args.output {
        write_sweeps(&result, output)?;
    }
    print_summary(&result);
    Ok(())
}

/// Color and stress keep describing the unshifted stack.
fn shift_sweeps(result: &mut SpectrumResult, shift: f64) {
    for sweep in &mut result.sweeps {
        sweep.points = vertical_shift_preview(&sweep.points, shift);
    }
}

fn write_sweeps(result: &SpectrumResult, output: &Path) -> Result<()> {
    for sweep in &result.sweeps {
        let path = angle_output_path(output, sweep.angle, result.sweeps.len());
        info!("Writing {} points at {}° to {:?}", sweep.points.len(), sweep.angle, &path);
        SpectrumCsv::write_to_path(&sweep.points, &path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        println!("✓ Spectrum at {}° written to: {}", sweep.angle, path.display());
    }
    Ok(())
}

/// With several angles each sweep gets its own file, suffixed with the angle.
pub(crate) fn angle_output_path(base: &Path, angle: f64, sweep_count: usize) -> PathBuf {
    if sweep_count <= 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let extension = base
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    base.with_file_name(format!("{stem}_{angle}deg.{extension}"))
}

fn print_summary(result: &SpectrumResult) {
    for sweep in &result.sweeps {
        let (min, max) = sweep
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.reflectivity), hi.max(p.reflectivity))
            });
        println!(
            "  {:>5.1}°  R min {:6.2}%  max {:6.2}%  ({} points)",
            sweep.angle,
            min,
            max,
            sweep.points.len()
        );
    }

    match &result.color {
        Some(color) => {
            println!(
                "Color: {} {} ({}), L*a*b* = ({:.2}, {:.2}, {:.2})",
                color.name, color.hex, color.rgb, color.lab.l, color.lab.a, color.lab.b
            );
            println!(
                "  Peak reflectance at {} nm, average {:.2}%",
                color.dominant_wavelength, color.average_reflectivity
            );
        }
        None => println!("Color: not available (range does not cover 380-780 nm)"),
    }

    let stress = &result.stress;
    println!(
        "Stress: {:.1} MPa·nm total over {:.1} nm, risk {}",
        stress.total_stress, stress.total_physical_thickness, stress.risk_level
    );
    println!("  {}", stress.recommendation());

    if let Some(rms) = result.reference_rms {
        println!("RMS deviation from measured spectrum: {:.3}%", rms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optifilm::core::materials::MaterialId;
    use optifilm::core::models::layer::Layer;
    use optifilm::core::models::spectrum::WavelengthRange;
    use optifilm::core::models::stack::{CoatingStack, Media};
    use optifilm::core::models::tooling::ToolingFactors;

    #[test]
    fn vertical_shift_moves_every_sweep() {
        let stack = CoatingStack::new(vec![Layer::new(MaterialId::TiO2, 60.0)], Media::default());
        let range = WavelengthRange::new(500.0, 600.0, 50.0);
        let mut result =
            workflows::spectrum::run(&stack, &ToolingFactors::new(), &range, &[0.0, 30.0], None)
                .unwrap();
        let before = result.clone();

        shift_sweeps(&mut result, 5.0);

        for (shifted, original) in result.sweeps.iter().zip(&before.sweeps) {
            for (p, q) in shifted.points.iter().zip(&original.points) {
                assert_eq!(p.wavelength, q.wavelength);
                assert!((p.reflectivity - (q.reflectivity + 5.0).min(100.0)).abs() < 1e-12);
                assert!((p.transmissivity - (q.transmissivity - 5.0).max(0.0)).abs() < 1e-12);
            }
        }
        assert_eq!(result.color, before.color);
    }

    #[test]
    fn single_sweep_keeps_requested_path() {
        let base = Path::new("out/spectrum.csv");
        assert_eq!(angle_output_path(base, 0.0, 1), PathBuf::from("out/spectrum.csv"));
    }

    #[test]
    fn several_sweeps_are_suffixed_with_angle() {
        let base = Path::new("out/spectrum.csv");
        assert_eq!(
            angle_output_path(base, 45.0, 3),
            PathBuf::from("out/spectrum_45deg.csv")
        );
        assert_eq!(
            angle_output_path(base, 12.5, 3),
            PathBuf::from("out/spectrum_12.5deg.csv")
        );
    }

    #[test]
    fn missing_extension_defaults_to_csv() {
        assert_eq!(
            angle_output_path(Path::new("sweep"), 30.0, 2),
            PathBuf::from("sweep_30deg.csv")
        );
    }
}
