use crate::core::models::spectrum::{SpectralPoint, SpectrumSample};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for spectrum file formats.
pub trait SpectrumFile {
    type Error: Error + From<io::Error>;

    /// Reads measured samples from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or no usable sample is found.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<SpectrumSample>, Self::Error>;

    /// Writes a computed sweep.
    fn write_to(points: &[SpectralPoint], writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SpectrumSample>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(points: &[SpectralPoint], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(points, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
