use crate::core::models::experiment::Experiment;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing experiment snapshots.
///
/// Implementors handle format-specific parsing and serialization; the path
/// helpers wrap them with buffered file access.
pub trait ExperimentFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads an experiment from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or describes an inconsistent
    /// experiment. Nothing is partially loaded.
    fn read_from(reader: &mut impl BufRead) -> Result<Experiment, Self::Error>;

    /// Writes an experiment to a writer.
    fn write_to(experiment: &Experiment, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads an experiment from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Experiment, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes an experiment to a file path, replacing any existing file.
    fn write_to_path<P: AsRef<Path>>(experiment: &Experiment, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(experiment, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
