use crate::core::models::spectrum::SpectrumSample;
use itertools::Itertools;
use serde::Serialize;

const PAIRING_TOLERANCE_NM: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingPoint {
    pub wavelength: f64,
    /// One entry per run; `None` when that run has no sample near this wavelength.
    pub runs: Vec<Option<f64>>,
    pub stats: Option<PointStatistics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointStatistics {
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl PointStatistics {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        Some(Self {
            mean,
            std_dev,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            upper_bound: mean + std_dev,
            lower_bound: mean - std_dev,
        })
    }
}

/// Per-wavelength statistics over several measured runs.
///
/// The wavelength axis is the sorted union of every run's sample wavelengths.
pub fn tracking_statistics(runs: &[Vec<SpectrumSample>]) -> Vec<TrackingPoint> {
    let wavelengths: Vec<f64> = runs
        .iter()
        .map(|run| {
            run.iter()
                .map(|s| s.wavelength)
                .sorted_by(f64::total_cmp)
                .collect::<Vec<_>>()
        })
        .kmerge_by(|a, b| a.total_cmp(b).is_lt())
        .dedup()
        .collect();

    wavelengths
        .into_iter()
        .map(|wavelength| {
            let per_run: Vec<Option<f64>> = runs
                .iter()
                .map(|run| {
                    run.iter()
                        .find(|s| (s.wavelength - wavelength).abs() < PAIRING_TOLERANCE_NM)
                        .map(|s| s.reflectivity)
                })
                .collect();
            let values: Vec<f64> = per_run.iter().flatten().copied().collect();
            TrackingPoint {
                wavelength,
                stats: PointStatistics::from_values(&values),
                runs: per_run,
            }
        })
        .collect()
}

/// Mean of the per-wavelength standard deviations, a single run-to-run spread figure.
pub fn average_std_dev(points: &[TrackingPoint]) -> Option<f64> {
    let devs: Vec<f64> = points
        .iter()
        .filter_map(|p| p.stats.map(|s| s.std_dev))
        .collect();
    (!devs.is_empty()).then(|| devs.iter().sum::<f64>() / devs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(points: &[(f64, f64)]) -> Vec<SpectrumSample> {
        points
            .iter()
            .map(|&(w, r)| SpectrumSample::new(w, r))
            .collect()
    }

    #[test]
    fn statistics_use_population_deviation() {
        let runs = vec![run(&[(500.0, 10.0)]), run(&[(500.0, 14.0)])];
        let points = tracking_statistics(&runs);
        assert_eq!(points.len(), 1);
        let stats = points[0].stats.unwrap();
        assert_eq!(stats.mean, 12.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 14.0);
        assert_eq!(stats.upper_bound, 14.0);
        assert_eq!(stats.lower_bound, 10.0);
    }

    #[test]
    fn wavelength_axis_is_sorted_union() {
        let runs = vec![run(&[(520.0, 1.0), (500.0, 2.0)]), run(&[(510.0, 3.0)])];
        let axis: Vec<_> = tracking_statistics(&runs)
            .iter()
            .map(|p| p.wavelength)
            .collect();
        assert_eq!(axis, vec![500.0, 510.0, 520.0]);
    }

    #[test]
    fn shared_wavelengths_appear_once() {
        let runs = vec![
            run(&[(600.0, 1.0), (500.0, 2.0), (550.0, 3.0)]),
            run(&[(550.0, 4.0), (500.0, 5.0)]),
            run(&[(500.0, 6.0)]),
        ];
        let points = tracking_statistics(&runs);
        let axis: Vec<_> = points.iter().map(|p| p.wavelength).collect();
        assert_eq!(axis, vec![500.0, 550.0, 600.0]);
        assert_eq!(points[0].runs, vec![Some(2.0), Some(5.0), Some(6.0)]);
    }

    #[test]
    fn runs_pair_within_half_nanometer() {
        let runs = vec![run(&[(500.0, 10.0)]), run(&[(500.3, 20.0), (530.0, 5.0)])];
        let points = tracking_statistics(&runs);
        let at_500 = &points[0];
        assert_eq!(at_500.runs, vec![Some(10.0), Some(20.0)]);
        let at_530 = points.iter().find(|p| p.wavelength == 530.0).unwrap();
        assert_eq!(at_530.runs, vec![None, Some(5.0)]);
        assert_eq!(at_530.stats.unwrap().std_dev, 0.0);
    }

    #[test]
    fn no_runs_produce_no_points() {
        assert!(tracking_statistics(&[]).is_empty());
        assert_eq!(average_std_dev(&[]), None);
    }

    #[test]
    fn average_std_dev_skips_points_without_data() {
        let runs = vec![run(&[(500.0, 10.0), (600.0, 0.0)]), run(&[(500.0, 14.0), (600.0, 0.0)])];
        let points = tracking_statistics(&runs);
        assert_eq!(average_std_dev(&points), Some(1.0));
    }
}
