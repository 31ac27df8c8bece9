//! CIE 1931 2° standard observer and D65 illuminant, tabulated at 5 nm.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CieEntry {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub d65: f64,
}

impl CieEntry {
    const ZERO: CieEntry = CieEntry::new(0.0, 0.0, 0.0, 0.0);

    const fn new(x: f64, y: f64, z: f64, d65: f64) -> Self {
        Self { x, y, z, d65 }
    }

    fn lerp(&self, other: &CieEntry, t: f64) -> CieEntry {
        CieEntry {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
            z: self.z + t * (other.z - self.z),
            d65: self.d65 + t * (other.d65 - self.d65),
        }
    }
}

pub const CIE_START_NM: f64 = 380.0;
pub const CIE_END_NM: f64 = 780.0;
pub const CIE_STEP_NM: f64 = 5.0;

static CIE_TABLE: [CieEntry; 81] = [
    CieEntry::new(0.0014, 0.0, 0.0065, 49.98), // 380
    CieEntry::new(0.0022, 0.0001, 0.0105, 52.31), // 385
    CieEntry::new(0.0042, 0.0001, 0.0201, 54.65), // 390
    CieEntry::new(0.0076, 0.0002, 0.0362, 68.7), // 395
    CieEntry::new(0.0143, 0.0004, 0.0679, 82.75), // 400
    CieEntry::new(0.0232, 0.0006, 0.1102, 87.12), // 405
    CieEntry::new(0.0435, 0.0012, 0.2074, 91.49), // 410
    CieEntry::new(0.0776, 0.0022, 0.3713, 92.46), // 415
    CieEntry::new(0.1344, 0.004, 0.6456, 93.43), // 420
    CieEntry::new(0.2148, 0.0073, 1.0391, 90.06), // 425
    CieEntry::new(0.2839, 0.0116, 1.3856, 86.68), // 430
    CieEntry::new(0.3285, 0.0168, 1.623, 95.77), // 435
    CieEntry::new(0.3483, 0.023, 1.7471, 104.86), // 440
    CieEntry::new(0.3481, 0.0298, 1.7826, 110.94), // 445
    CieEntry::new(0.3362, 0.038, 1.7721, 117.01), // 450
    CieEntry::new(0.3187, 0.048, 1.7441, 117.41), // 455
    CieEntry::new(0.2908, 0.06, 1.6692, 117.81), // 460
    CieEntry::new(0.2511, 0.0739, 1.5281, 116.34), // 465
    CieEntry::new(0.1954, 0.091, 1.2876, 114.86), // 470
    CieEntry::new(0.1421, 0.1126, 1.0419, 115.39), // 475
    CieEntry::new(0.0956, 0.139, 0.813, 115.92), // 480
    CieEntry::new(0.058, 0.1693, 0.6162, 112.37), // 485
    CieEntry::new(0.032, 0.208, 0.4652, 108.81), // 490
    CieEntry::new(0.0147, 0.2586, 0.3533, 109.08), // 495
    CieEntry::new(0.0049, 0.323, 0.272, 109.35), // 500
    CieEntry::new(0.0024, 0.4073, 0.2123, 108.58), // 505
    CieEntry::new(0.0093, 0.503, 0.1582, 107.8), // 510
    CieEntry::new(0.0291, 0.6082, 0.1117, 106.3), // 515
    CieEntry::new(0.0633, 0.71, 0.0782, 104.79), // 520
    CieEntry::new(0.1096, 0.7932, 0.0573, 106.24), // 525
    CieEntry::new(0.1655, 0.862, 0.0422, 107.69), // 530
    CieEntry::new(0.2257, 0.9149, 0.0298, 106.05), // 535
    CieEntry::new(0.2904, 0.954, 0.0203, 104.41), // 540
    CieEntry::new(0.3597, 0.9803, 0.0134, 104.23), // 545
    CieEntry::new(0.4334, 0.995, 0.0087, 104.05), // 550
    CieEntry::new(0.5121, 1.0, 0.0057, 102.02), // 555
    CieEntry::new(0.5945, 0.995, 0.0039, 100.0), // 560
    CieEntry::new(0.6784, 0.9786, 0.0027, 98.17), // 565
    CieEntry::new(0.7621, 0.952, 0.0021, 96.33), // 570
    CieEntry::new(0.8425, 0.9154, 0.0018, 96.06), // 575
    CieEntry::new(0.9163, 0.87, 0.0017, 95.79), // 580
    CieEntry::new(0.9786, 0.8163, 0.0014, 92.24), // 585
    CieEntry::new(1.0263, 0.757, 0.0011, 88.69), // 590
    CieEntry::new(1.0567, 0.6949, 0.001, 89.35), // 595
    CieEntry::new(1.0622, 0.631, 0.0008, 90.01), // 600
    CieEntry::new(1.0456, 0.5668, 0.0006, 89.8), // 605
    CieEntry::new(1.0026, 0.503, 0.0003, 89.6), // 610
    CieEntry::new(0.9384, 0.4412, 0.0002, 88.65), // 615
    CieEntry::new(0.8544, 0.381, 0.0002, 87.7), // 620
    CieEntry::new(0.7514, 0.321, 0.0001, 85.49), // 625
    CieEntry::new(0.6424, 0.265, 0.0, 83.29), // 630
    CieEntry::new(0.5419, 0.217, 0.0, 83.49), // 635
    CieEntry::new(0.4479, 0.175, 0.0, 83.7), // 640
    CieEntry::new(0.3608, 0.1382, 0.0, 81.86), // 645
    CieEntry::new(0.2835, 0.107, 0.0, 80.03), // 650
    CieEntry::new(0.2187, 0.0816, 0.0, 80.12), // 655
    CieEntry::new(0.1649, 0.061, 0.0, 80.21), // 660
    CieEntry::new(0.1212, 0.0446, 0.0, 81.25), // 665
    CieEntry::new(0.0874, 0.032, 0.0, 82.28), // 670
    CieEntry::new(0.0636, 0.0232, 0.0, 80.28), // 675
    CieEntry::new(0.0468, 0.017, 0.0, 78.28), // 680
    CieEntry::new(0.0329, 0.0119, 0.0, 74.0), // 685
    CieEntry::new(0.0227, 0.0082, 0.0, 69.72), // 690
    CieEntry::new(0.0158, 0.0057, 0.0, 70.67), // 695
    CieEntry::new(0.0114, 0.0041, 0.0, 71.61), // 700
    CieEntry::new(0.0081, 0.0029, 0.0, 72.98), // 705
    CieEntry::new(0.0058, 0.0021, 0.0, 74.35), // 710
    CieEntry::new(0.0041, 0.0015, 0.0, 67.98), // 715
    CieEntry::new(0.0029, 0.001, 0.0, 61.6), // 720
    CieEntry::new(0.002, 0.0007, 0.0, 65.74), // 725
    CieEntry::new(0.0014, 0.0005, 0.0, 69.89), // 730
    CieEntry::new(0.001, 0.0004, 0.0, 72.49), // 735
    CieEntry::new(0.0007, 0.0003, 0.0, 75.09), // 740
    CieEntry::new(0.0005, 0.0002, 0.0, 69.34), // 745
    CieEntry::new(0.0003, 0.0001, 0.0, 63.59), // 750
    CieEntry::new(0.0002, 0.0001, 0.0, 55.01), // 755
    CieEntry::new(0.0002, 0.0001, 0.0, 46.42), // 760
    CieEntry::new(0.0001, 0.0, 0.0, 56.61), // 765
    CieEntry::new(0.0001, 0.0, 0.0, 66.81), // 770
    CieEntry::new(0.0001, 0.0, 0.0, 65.09), // 775
    CieEntry::new(0.0, 0.0, 0.0, 63.38), // 780
];

fn entry_at_grid(wavelength: f64) -> Option<&'static CieEntry> {
    if !(CIE_START_NM..=CIE_END_NM).contains(&wavelength) {
        return None;
    }
    let index = ((wavelength - CIE_START_NM) / CIE_STEP_NM).round() as usize;
    CIE_TABLE.get(index)
}

/// Observer and illuminant values at `wavelength`, linearly interpolated between the
/// neighbouring 5 nm entries. Outside the table the result is zero.
pub fn cie_at(wavelength: f64) -> CieEntry {
    let lower = (wavelength / CIE_STEP_NM).floor() * CIE_STEP_NM;
    let upper = (wavelength / CIE_STEP_NM).ceil() * CIE_STEP_NM;
    match (entry_at_grid(lower), entry_at_grid(upper)) {
        (Some(l), Some(u)) if lower != upper => l.lerp(u, (wavelength - lower) / (upper - lower)),
        (Some(entry), _) | (None, Some(entry)) => *entry,
        (None, None) => CieEntry::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_points_return_tabulated_values() {
        assert_eq!(cie_at(380.0), CIE_TABLE[0]);
        assert_eq!(cie_at(555.0).y, 1.0);
        assert_eq!(cie_at(780.0), CIE_TABLE[80]);
    }

    #[test]
    fn off_grid_points_interpolate_linearly() {
        let mid = cie_at(382.5);
        assert!((mid.x - 0.0018).abs() < 1e-12);
        assert!((mid.d65 - (49.98 + 52.31) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_wavelengths_are_zero() {
        assert_eq!(cie_at(300.0), CieEntry::ZERO);
        assert_eq!(cie_at(900.0), CieEntry::ZERO);
    }

    #[test]
    fn partially_covered_interval_uses_available_neighbour() {
        assert_eq!(cie_at(781.0), CIE_TABLE[80]);
    }
}
