use super::{create_output, load_session};
use crate::cli::ExportArgs;
use crate::error::Result;
use wellplate::core::io::export;
use wellplate::workflows::analyze;

pub fn run(args: ExportArgs) -> Result<()> {
    let experiment = load_session(&args.session.path)?;

    let rows = export::write_layout_csv(
        experiment.plate(),
        &experiment.layout,
        create_output(&args.layout)?,
    )?;
    println!("✓ Layout CSV ({} rows) written to: {}", rows, args.layout.display());

    if let Some(path) = &args.results {
        let report = analyze::run(&experiment);
        let rows = export::write_results_csv(&report.summaries, create_output(path)?)?;
        println!("✓ Results CSV ({} rows) written to: {}", rows, path.display());
    }
    Ok(())
}
