use super::traits::SpectrumFile;
use crate::core::models::spectrum::{SpectralPoint, SpectrumSample};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SpectrumReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No usable data: every row failed to parse as 'wavelength,reflectivity'")]
    NoUsableData,
}

pub struct SpectrumCsv;

fn parse_row(record: &csv::StringRecord) -> Option<SpectrumSample> {
    let wavelength = record.get(0)?.trim().parse::<f64>().ok()?;
    let reflectivity = record.get(1)?.trim().parse::<f64>().ok()?;
    (wavelength.is_finite() && reflectivity.is_finite())
        .then(|| SpectrumSample::new(wavelength, reflectivity))
}

impl SpectrumFile for SpectrumCsv {
    type Error = SpectrumReadError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<SpectrumSample>, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut samples = Vec::new();
        let mut skipped = 0usize;
        for record in csv_reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            match parse_row(&record) {
                Some(sample) => samples.push(sample),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, parsed = samples.len(), "Skipped unparsable spectrum rows");
        }
        if samples.is_empty() {
            return Err(SpectrumReadError::NoUsableData);
        }
        Ok(samples)
    }

    fn write_to(points: &[SpectralPoint], writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for point in points {
            csv_writer.serialize(point)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn read(text: &str) -> Result<Vec<SpectrumSample>, SpectrumReadError> {
        SpectrumCsv::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn header_is_skipped_and_rows_are_parsed() {
        let samples = read("Wavelength,Reflectivity\n400,12.5\n410, 13.0\n").unwrap();
        assert_eq!(
            samples,
            vec![SpectrumSample::new(400.0, 12.5), SpectrumSample::new(410.0, 13.0)]
        );
    }

    #[test]
    fn malformed_rows_are_skipped_silently() {
        let samples = read("wl,r\n400,1\nabc,2\n420\n\n430,3,extra\n").unwrap();
        assert_eq!(
            samples,
            vec![SpectrumSample::new(400.0, 1.0), SpectrumSample::new(430.0, 3.0)]
        );
    }

    #[test]
    fn file_without_usable_rows_is_reported() {
        assert!(matches!(read("wl,r\nfoo,bar\n"), Err(SpectrumReadError::NoUsableData)));
        assert!(matches!(read("wl,r\n"), Err(SpectrumReadError::NoUsableData)));
    }

    #[test]
    fn written_sweep_reads_back_as_samples() {
        let points = [
            SpectralPoint {
                wavelength: 500.0,
                reflectivity: 4.0,
                transmissivity: 96.0,
            },
            SpectralPoint {
                wavelength: 505.0,
                reflectivity: 4.5,
                transmissivity: 95.5,
            },
        ];
        let file = NamedTempFile::new().unwrap();
        SpectrumCsv::write_to_path(&points, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("wavelength,reflectivity,transmissivity"));

        let samples = SpectrumCsv::read_from_path(file.path()).unwrap();
        assert_eq!(samples[1], SpectrumSample::new(505.0, 4.5));
    }
}
