use super::{load_session, normalize_well, save_session};
use crate::cli::{EraseArgs, PaintArgs};
use crate::error::Result;
use tracing::debug;
use wellplate::workflows::design;

pub fn paint(args: PaintArgs) -> Result<()> {
    let mut experiment = load_session(&args.session.path)?;
    for well in &args.wells {
        let well = normalize_well(well);
        design::paint(&mut experiment, &well, &args.group)?;
        debug!("Painted {} with '{}'", well, args.group);
    }
    save_session(&experiment, &args.session.path)?;
    println!(
        "✓ Painted {} wells with '{}' ({} wells in the group).",
        args.wells.len(),
        args.group,
        experiment.layout.count_of(&args.group)
    );
    Ok(())
}

pub fn erase(args: EraseArgs) -> Result<()> {
    let mut experiment = load_session(&args.session.path)?;
    let mut cleared = 0;
    for well in &args.wells {
        let well = normalize_well(well);
        match design::erase(&mut experiment, &well)? {
            Some(previous) => {
                debug!("Erased {} (was '{}' #{})", well, previous.group, previous.replicate);
                cleared += 1;
            }
            None => debug!("{} was already empty", well),
        }
    }
    save_session(&experiment, &args.session.path)?;
    println!("✓ Cleared {} of {} wells.", cleared, args.wells.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SessionArg;
    use crate::error::CliError;
    use tempfile::tempdir;
    use wellplate::core::models::error::StateError;
    use wellplate::core::models::experiment::Experiment;
    use wellplate::core::models::plate::PlateFormat;

    fn session_with_group(path: &std::path::Path) {
        let mut exp = Experiment::new(PlateFormat::Twelve);
        exp.add_group("Blank").unwrap();
        save_session(&exp, path).unwrap();
    }

    #[test]
    fn paint_then_erase_round_trips_through_the_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        session_with_group(&path);

        paint(PaintArgs {
            session: SessionArg { path: path.clone() },
            group: "Blank".to_string(),
            wells: vec!["a1".to_string(), "B2".to_string()],
        })
        .unwrap();
        let exp = load_session(&path).unwrap();
        assert_eq!(exp.layout.count_of("Blank"), 2);
        assert_eq!(exp.layout.get("B2").unwrap().replicate, 2);

        erase(EraseArgs {
            session: SessionArg { path: path.clone() },
            wells: vec!["A1".to_string(), "C4".to_string()],
        })
        .unwrap();
        let exp = load_session(&path).unwrap();
        assert_eq!(exp.layout.count_of("Blank"), 1);
        assert_eq!(exp.layout.get("B2").unwrap().replicate, 1);
    }

    #[test]
    fn paint_with_unknown_group_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        session_with_group(&path);

        let result = paint(PaintArgs {
            session: SessionArg { path },
            group: "Ghost".to_string(),
            wells: vec!["A1".to_string()],
        });
        assert!(matches!(
            result,
            Err(CliError::State(StateError::UnknownGroup(_)))
        ));
    }
}
