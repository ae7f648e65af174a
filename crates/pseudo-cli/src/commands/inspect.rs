use super::describe_pseudo;
use crate::cli::InspectArgs;
use crate::config::ResolvedConfig;
use crate::error::Result;
use pseudofam::core::models::pseudo::PseudoPotential;
use tracing::{debug, info};

pub fn run(args: InspectArgs, config: &ResolvedConfig) -> Result<()> {
    let pseudo_type = config.pseudo_type_or_default(args.pseudo_type.as_deref())?;
    info!("Inspecting {:?} as {}", &args.path, pseudo_type.entry_point());

    let pseudo = PseudoPotential::from_path(pseudo_type, &args.path)?;
    debug!("Parsed {} bytes from {:?}", pseudo.content().len(), &args.path);

    println!("{}", args.path.display());
    print!("{}", describe_pseudo(&pseudo));
    Ok(())
}
