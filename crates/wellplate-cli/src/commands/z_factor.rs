use super::load_session;
use crate::cli::ZFactorArgs;
use crate::error::Result;
use wellplate::workflows::quality;

pub fn run(args: ZFactorArgs) -> Result<()> {
    let experiment = load_session(&args.session.path)?;
    let z = quality::run(&experiment, &args.positive, &args.negative)?;
    println!(
        "Z'-factor ({} vs {}, target '{}'): {:.3} ({})",
        args.positive,
        args.negative,
        experiment.data.active_target(),
        z.value,
        z.classification
    );
    Ok(())
}
