use super::{create_output, save_session};
use crate::cli::DesignArgs;
use crate::config::{DesignPlan, PartialDesignConfig};
use crate::error::Result;
use tracing::info;
use wellplate::core::io::export;
use wellplate::workflows;

pub fn run(args: DesignArgs) -> Result<()> {
    let partial_config = PartialDesignConfig::from_file(&args.config)?;
    info!("Merging design from file and CLI arguments...");
    let DesignPlan {
        mut experiment,
        layout,
    } = partial_config.merge_with_cli(&args)?;

    info!("Invoking the design workflow...");
    workflows::design::run(&mut experiment, &layout)?;
    save_session(&experiment, &args.output)?;

    println!(
        "✓ Placed {} groups x {} replicates ({} wells) on a {} plate{}.",
        experiment.groups.len(),
        layout.replicates,
        experiment.layout.len(),
        layout.plate_format,
        if layout.randomization.is_some() {
            ", randomized"
        } else {
            ""
        }
    );
    println!("  Session written to: {}", args.output.display());

    if let Some(path) = &args.layout_csv {
        let rows =
            export::write_layout_csv(experiment.plate(), &experiment.layout, create_output(path)?)?;
        println!("  Layout CSV ({} rows) written to: {}", rows, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::load_session;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_session_and_layout_csv() {
        let dir = tempdir().unwrap();
        let design = dir.path().join("design.toml");
        let session = dir.path().join("session.json");
        let csv = dir.path().join("layout.csv");
        fs::write(
            &design,
            "[plate]\nformat = \"6\"\nreplicates = 2\n\n[[groups]]\nname = \"Blank\"\n\n[[groups]]\nname = \"Drug\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "wellplate",
            "design",
            "-c",
            design.to_str().unwrap(),
            "-o",
            session.to_str().unwrap(),
            "--layout-csv",
            csv.to_str().unwrap(),
        ]);
        let Commands::Design(args) = cli.command else {
            panic!("Expected 'design' subcommand");
        };
        run(args).unwrap();

        let exp = load_session(&session).unwrap();
        assert_eq!(exp.layout.len(), 4);
        assert_eq!(exp.layout.group_of("A3"), Some("Drug"));
        assert_eq!(
            fs::read_to_string(&csv).unwrap(),
            "Well,Group,Replicate\nA1,Blank,1\nA2,Blank,2\nA3,Drug,1\nB1,Drug,2\n"
        );
    }
}
