use super::{load_session, save_session};
use crate::cli::ImportArgs;
use crate::error::Result;
use tracing::{info, warn};

pub fn run(args: ImportArgs) -> Result<()> {
    let mut experiment = load_session(&args.session.path)?;

    if let Some(target) = &args.target {
        if experiment.data.has_target(target) {
            experiment.data.set_active_target(target)?;
        } else {
            info!("Creating new target '{}'", target);
            experiment.data.add_target(target)?;
        }
    }

    info!("Reading pasted grid from {:?}", &args.grid);
    let text = std::fs::read_to_string(&args.grid)?;
    let plate = experiment.plate();
    let written = experiment.data.paste_grid(plate, &text)?;
    let target = experiment.data.active_target().to_string();

    if written == 0 {
        warn!("No numeric cells found in {:?}", &args.grid);
        println!("Warning: the grid held no numeric values; nothing was imported.");
        return Ok(());
    }

    save_session(&experiment, &args.session.path)?;
    println!(
        "✓ Imported {} values into target '{}' ({} wells now measured).",
        written,
        target,
        experiment.data.measured_count(&target)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SessionArg;
    use crate::commands::load_session;
    use std::fs;
    use tempfile::tempdir;
    use wellplate::core::models::experiment::Experiment;
    use wellplate::core::models::plate::PlateFormat;

    #[test]
    fn grid_is_written_to_a_new_active_target() {
        let dir = tempdir().unwrap();
        let session = dir.path().join("session.json");
        let grid = dir.path().join("grid.txt");
        save_session(&Experiment::new(PlateFormat::Six), &session).unwrap();
        fs::write(&grid, "1.5\t2\t3\n4,x,6\n").unwrap();

        run(ImportArgs {
            session: SessionArg {
                path: session.clone(),
            },
            grid,
            target: Some("OD600".to_string()),
        })
        .unwrap();

        let exp = load_session(&session).unwrap();
        assert_eq!(exp.data.active_target(), "OD600");
        assert_eq!(exp.data.value("A1", "OD600"), Some(1.5));
        assert_eq!(exp.data.value("B2", "OD600"), None);
        assert_eq!(exp.data.measured_count("OD600"), 5);
    }

    #[test]
    fn oversized_grid_leaves_session_unchanged() {
        let dir = tempdir().unwrap();
        let session = dir.path().join("session.json");
        let grid = dir.path().join("grid.txt");
        save_session(&Experiment::new(PlateFormat::Six), &session).unwrap();
        fs::write(&grid, "1\t2\t3\t4\n").unwrap();

        let result = run(ImportArgs {
            session: SessionArg {
                path: session.clone(),
            },
            grid,
            target: None,
        });
        assert!(result.is_err());
        assert_eq!(load_session(&session).unwrap().data.measured_count("Default"), 0);
    }
}
