use crate::core::materials::MaterialId;
use crate::core::models::layer::Layer;
use crate::engine::config::SearchConfig;
use crate::engine::error::{EngineError, IndexClass};
use rand::Rng;
use tracing::debug;

/// Allowed materials split by their index at the reference wavelength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialPools {
    pub low: Vec<MaterialId>,
    pub high: Vec<MaterialId>,
}

impl MaterialPools {
    /// Duplicates are dropped; the first occurrence keeps its position.
    pub fn partition(materials: &[MaterialId]) -> Result<Self, EngineError> {
        let mut low = Vec::new();
        let mut high = Vec::new();
        for &id in materials {
            let pool = if id.material().is_low_index() {
                &mut low
            } else {
                &mut high
            };
            if !pool.contains(&id) {
                pool.push(id);
            }
        }

        if low.is_empty() {
            return Err(EngineError::EmptyMaterialPool {
                missing: IndexClass::Low,
            });
        }
        if high.is_empty() {
            return Err(EngineError::EmptyMaterialPool {
                missing: IndexClass::High,
            });
        }
        debug!(low = ?low, high = ?high, "Partitioned design materials.");
        Ok(Self { low, high })
    }

    fn pick(&self, class: IndexClass, rng: &mut impl Rng) -> MaterialId {
        let pool = match class {
            IndexClass::Low => &self.low,
            IndexClass::High => &self.high,
        };
        pool[rng.gen_range(0..pool.len())]
    }
}

/// Draws one alternating low/high stack.
///
/// A coin flip picks which class sits next to the substrate side of the design layers.
/// The adhesion layer, when given, is placed at index 0 and not counted in `layer_count`.
pub fn random_candidate(
    rng: &mut impl Rng,
    pools: &MaterialPools,
    layer_count: usize,
    search: &SearchConfig,
    adhesion: Option<&Layer>,
) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(layer_count + usize::from(adhesion.is_some()));
    layers.extend(adhesion.copied());

    let mut class = if rng.r#gen::<f64>() < 0.5 {
        IndexClass::Low
    } else {
        IndexClass::High
    };
    for _ in 0..layer_count {
        let material = pools.pick(class, rng);
        let thickness =
            search.thickness_min + rng.r#gen::<f64>() * (search.thickness_max - search.thickness_min);
        layers.push(Layer::new(material, thickness));
        class = match class {
            IndexClass::Low => IndexClass::High,
            IndexClass::High => IndexClass::Low,
        };
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::DesignObjective;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn search() -> SearchConfig {
        SearchConfig::for_objective(&DesignObjective::Targets(Vec::new()))
    }

    #[test]
    fn partition_splits_on_reference_index() {
        let pools = MaterialPools::partition(&[
            MaterialId::SiO2,
            MaterialId::ZrO2,
            MaterialId::MgF2,
            MaterialId::Al2O3,
            MaterialId::SiO2,
        ])
        .unwrap();
        assert_eq!(pools.low, vec![MaterialId::SiO2, MaterialId::MgF2]);
        assert_eq!(pools.high, vec![MaterialId::ZrO2, MaterialId::Al2O3]);
    }

    #[test]
    fn missing_class_is_reported() {
        assert!(matches!(
            MaterialPools::partition(&[MaterialId::TiO2, MaterialId::ZrO2]),
            Err(EngineError::EmptyMaterialPool {
                missing: IndexClass::Low
            })
        ));
        assert!(matches!(
            MaterialPools::partition(&[MaterialId::SiO2]),
            Err(EngineError::EmptyMaterialPool {
                missing: IndexClass::High
            })
        ));
    }

    #[test]
    fn candidates_alternate_and_respect_thickness_range() {
        let pools = MaterialPools::partition(&[MaterialId::SiO2, MaterialId::TiO2]).unwrap();
        let search = search();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let layers = random_candidate(&mut rng, &pools, 6, &search, None);
            assert_eq!(layers.len(), 6);
            for pair in layers.windows(2) {
                assert_ne!(
                    pair[0].material.material().is_low_index(),
                    pair[1].material.material().is_low_index()
                );
            }
            for layer in &layers {
                assert!(layer.thickness >= search.thickness_min);
                assert!(layer.thickness < search.thickness_max);
            }
        }
    }

    #[test]
    fn adhesion_layer_is_prepended_unchanged() {
        let pools = MaterialPools::partition(&[MaterialId::SiO2, MaterialId::ZrO2]).unwrap();
        let adhesion = Layer::new(MaterialId::SiO2, 10.0);
        let mut rng = StdRng::seed_from_u64(11);
        let layers = random_candidate(&mut rng, &pools, 4, &search(), Some(&adhesion));
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0], adhesion);
    }

    #[test]
    fn both_starting_classes_occur() {
        let pools = MaterialPools::partition(&[MaterialId::SiO2, MaterialId::ZrO2]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let starts: Vec<MaterialId> = (0..64)
            .map(|_| random_candidate(&mut rng, &pools, 2, &search(), None)[0].material)
            .collect();
        assert!(starts.contains(&MaterialId::SiO2));
        assert!(starts.contains(&MaterialId::ZrO2));
    }
}
