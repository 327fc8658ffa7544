pub mod analyze;
pub mod design;
pub mod dose_response;
pub mod edit;
pub mod export;
pub mod import;
pub mod z_factor;

use crate::error::{CliError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;
use wellplate::core::io::session::SessionFile;
use wellplate::core::io::traits::ExperimentFile;
use wellplate::core::models::experiment::Experiment;

pub(crate) fn load_session(path: &Path) -> Result<Experiment> {
    info!("Loading session from {:?}", path);
    SessionFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub(crate) fn save_session(experiment: &Experiment, path: &Path) -> Result<()> {
    info!("Writing session to {:?}", path);
    SessionFile::write_to_path(experiment, path).map_err(|e| {
        CliError::Other(anyhow::Error::new(e).context(format!(
            "Failed to write session '{}'",
            path.display()
        )))
    })
}

pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>> {
    info!("Creating output file {:?}", path);
    Ok(BufWriter::new(File::create(path)?))
}

/// Well names are accepted in either case and written in upper case.
pub(crate) fn normalize_well(well: &str) -> String {
    well.trim().to_ascii_uppercase()
}
