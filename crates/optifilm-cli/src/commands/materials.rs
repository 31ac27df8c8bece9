use crate::cli::MaterialsArgs;
use crate::error::{CliError, Result};
use optifilm::core::materials::MaterialId;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
struct CatalogRow {
    id: MaterialId,
    index: f64,
    low_index: bool,
    model: &'static str,
    stress_mpa: f64,
    ion_assist_percent: f64,
}

fn catalog_rows(wavelength: f64) -> Vec<CatalogRow> {
    MaterialId::ALL
        .iter()
        .map(|&id| {
            let material = id.material();
            CatalogRow {
                id,
                index: material.refractive_index(wavelength, None),
                low_index: material.is_low_index(),
                model: material.dispersion.name(),
                stress_mpa: material.intrinsic_stress_mpa,
                ion_assist_percent: material.default_ion_assist_increase_percent,
            }
        })
        .collect()
}

pub fn run(args: MaterialsArgs) -> Result<()> {
    if !(args.wavelength.is_finite() && args.wavelength > 0.0) {
        return Err(CliError::Argument(format!(
            "wavelength must be a positive number of nanometers, got {}",
            args.wavelength
        )));
    }
    info!("Listing material catalog at {} nm.", args.wavelength);

    println!(
        "{:<8} {:>10} {:<6} {:<10} {:>13} {:>8}",
        "Material",
        format!("n@{:.0}", args.wavelength),
        "Class",
        "Model",
        "Stress (MPa)",
        "IAD (%)"
    );
    for row in catalog_rows(args.wavelength) {
        println!(
            "{:<8} {:>10.4} {:<6} {:<10} {:>13.1} {:>8.1}",
            row.id.as_str(),
            row.index,
            if row.low_index { "low" } else { "high" },
            row.model,
            row.stress_mpa,
            row.ion_assist_percent
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rows_cover_every_material_in_order() {
        let rows = catalog_rows(550.0);
        let ids: Vec<MaterialId> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, MaterialId::ALL.to_vec());
    }

    #[test]
    fn catalog_rows_classify_by_reference_index() {
        let rows = catalog_rows(550.0);
        let class_of = |id: MaterialId| rows.iter().find(|row| row.id == id).unwrap().low_index;
        assert!(class_of(MaterialId::SiO2));
        assert!(class_of(MaterialId::MgF2));
        assert!(!class_of(MaterialId::ZrO2));
        assert!(!class_of(MaterialId::TiO2));
    }

    #[test]
    fn catalog_rows_evaluate_at_requested_wavelength() {
        let blue = catalog_rows(450.0);
        let red = catalog_rows(650.0);
        let sio2 = |rows: &[CatalogRow]| rows[0].index;
        assert!(sio2(&blue) > sio2(&red));
        assert_eq!(blue[0].model, "sellmeier");
    }

    #[test]
    fn non_positive_wavelength_is_rejected() {
        let result = run(MaterialsArgs { wavelength: 0.0 });
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
