use crate::core::models::error::StateError;
use crate::core::models::experiment::Experiment;
use crate::core::models::layout::WellAssignment;
use crate::engine::config::LayoutConfig;
use crate::engine::error::AnalysisError;
use crate::engine::layout;
use rand::rngs::StdRng;
use rand::{SeedableRng, thread_rng};
use tracing::{info, instrument};

/// Generates a fresh layout for the experiment's groups and, when the config
/// asks for it, shuffles it.
///
/// The experiment's plate settings are updated to match `config`. A plate
/// format change clears the old layout and data first. On a capacity error the
/// experiment is left untouched.
#[instrument(skip_all, name = "design_workflow")]
pub fn run(experiment: &mut Experiment, config: &LayoutConfig) -> Result<(), AnalysisError> {
    let mut generated = layout::generate(
        config.plate_format,
        &experiment.groups,
        config.replicates,
        config.direction,
    )?;

    if let Some(randomization) = &config.randomization {
        generated = match randomization.seed {
            Some(seed) => {
                info!("Randomizing layout with seed {}", seed);
                layout::randomize(config.plate_format, &generated, &mut StdRng::seed_from_u64(seed))
            }
            None => {
                info!("Randomizing layout with an unseeded RNG");
                layout::randomize(config.plate_format, &generated, &mut thread_rng())
            }
        };
    }

    experiment.set_plate_format(config.plate_format);
    experiment.settings.replicates = config.replicates;
    experiment.settings.layout_direction = config.direction;
    experiment.layout = generated;

    info!(
        "Placed {} groups x {} replicates on a {} plate",
        experiment.groups.len(),
        config.replicates,
        config.plate_format
    );
    Ok(())
}

/// Paints `well` with `group` after checking both exist on this experiment.
pub fn paint(experiment: &mut Experiment, well: &str, group: &str) -> Result<(), StateError> {
    let plate = experiment.plate();
    if !plate.contains(well) {
        return Err(StateError::UnknownWell {
            well: well.to_string(),
            plate: plate.to_string(),
        });
    }
    if !experiment.has_group(group) {
        return Err(StateError::UnknownGroup(group.to_string()));
    }
    layout::paint_well(plate, &mut experiment.layout, well, group);
    Ok(())
}

/// Erases `well`, returning what it held.
pub fn erase(
    experiment: &mut Experiment,
    well: &str,
) -> Result<Option<WellAssignment>, StateError> {
    let plate = experiment.plate();
    if !plate.contains(well) {
        return Err(StateError::UnknownWell {
            well: well.to_string(),
            plate: plate.to_string(),
        });
    }
    Ok(layout::erase_well(plate, &mut experiment.layout, well))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::experiment::LayoutDirection;
    use crate::core::models::plate::PlateFormat;
    use crate::engine::config::{LayoutConfigBuilder, RandomizationConfig};

    fn experiment_with_groups(names: &[&str]) -> Experiment {
        let mut exp = Experiment::new(PlateFormat::NinetySix);
        for name in names {
            exp.add_group(name).unwrap();
        }
        exp
    }

    fn config(format: PlateFormat, replicates: usize, seed: Option<u64>) -> LayoutConfig {
        LayoutConfigBuilder::new()
            .plate_format(format)
            .replicates(replicates)
            .direction(LayoutDirection::ByRow)
            .randomization(seed.map(|s| RandomizationConfig { seed: Some(s) }))
            .build()
            .unwrap()
    }

    #[test]
    fn run_generates_layout_and_updates_settings() {
        let mut exp = experiment_with_groups(&["Blank", "Drug"]);
        run(&mut exp, &config(PlateFormat::TwentyFour, 4, None)).unwrap();
        assert_eq!(exp.plate(), PlateFormat::TwentyFour);
        assert_eq!(exp.settings.replicates, 4);
        assert_eq!(exp.layout.len(), 8);
        assert_eq!(exp.layout.count_of("Drug"), 4);
    }

    #[test]
    fn run_with_seed_is_reproducible() {
        let mut first = experiment_with_groups(&["A", "B", "C"]);
        let mut second = first.clone();
        run(&mut first, &config(PlateFormat::NinetySix, 3, Some(9))).unwrap();
        run(&mut second, &config(PlateFormat::NinetySix, 3, Some(9))).unwrap();
        assert_eq!(first.layout, second.layout);
    }

    #[test]
    fn capacity_error_leaves_experiment_untouched() {
        let mut exp = experiment_with_groups(&["A", "B", "C"]);
        exp.data.set_value("A1", "Default", 1.0).unwrap();
        let before = exp.clone();
        let result = run(&mut exp, &config(PlateFormat::Six, 3, None));
        assert!(matches!(result, Err(AnalysisError::Capacity { .. })));
        assert_eq!(exp, before);
    }

    #[test]
    fn paint_rejects_unknown_wells_and_groups() {
        let mut exp = experiment_with_groups(&["Blank"]);
        assert!(matches!(
            paint(&mut exp, "Z99", "Blank"),
            Err(StateError::UnknownWell { .. })
        ));
        assert_eq!(
            paint(&mut exp, "A1", "Ghost"),
            Err(StateError::UnknownGroup("Ghost".to_string()))
        );
        paint(&mut exp, "A1", "Blank").unwrap();
        assert_eq!(exp.layout.get("A1"), Some(&WellAssignment::new("Blank", 1)));
    }

    #[test]
    fn paint_rejects_zero_padded_well_names() {
        let mut exp = experiment_with_groups(&["Blank"]);
        paint(&mut exp, "A1", "Blank").unwrap();
        assert!(matches!(
            paint(&mut exp, "A01", "Blank"),
            Err(StateError::UnknownWell { .. })
        ));
        assert_eq!(exp.layout.len(), 1);
        assert_eq!(exp.layout.count_of("Blank"), 1);

        paint(&mut exp, "A2", "Blank").unwrap();
        assert_eq!(exp.layout.get("A2").unwrap().replicate, 2);
    }

    #[test]
    fn erase_returns_previous_assignment() {
        let mut exp = experiment_with_groups(&["Blank"]);
        paint(&mut exp, "A1", "Blank").unwrap();
        paint(&mut exp, "A2", "Blank").unwrap();
        assert_eq!(
            erase(&mut exp, "A1").unwrap(),
            Some(WellAssignment::new("Blank", 1))
        );
        assert_eq!(exp.layout.get("A2").unwrap().replicate, 1);
        assert_eq!(erase(&mut exp, "A1").unwrap(), None);
    }
}
