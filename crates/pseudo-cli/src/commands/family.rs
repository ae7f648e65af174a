use super::{describe_pseudo, join_lines};
use crate::cli::{FamilyArgs, FamilyCommands};
use crate::config::ResolvedConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use pseudofam::engine::config::{FamilyConfig, FamilyConfigBuilder};
use pseudofam::engine::family::PseudoFamily;
use pseudofam::engine::progress::ProgressReporter;
use pseudofam::engine::store::Store;
use pseudofam::workflows::create_from_folder::create_from_folder;
use std::path::Path;
use tracing::info;

pub fn run(args: FamilyArgs, config: &ResolvedConfig) -> Result<()> {
    info!("Opening store at {:?}", &config.store_path);
    let mut store = Store::open(&config.store_path)?;

    match args.command {
        FamilyCommands::CreateFromFolder {
            dirpath,
            label,
            description,
            pseudo_type,
        } => {
            let pseudo_type = config.pseudo_type_or_default(pseudo_type.as_deref())?;
            let family_config = FamilyConfigBuilder::new()
                .label(label)
                .description(description)
                .pseudo_type(pseudo_type)
                .build()?;
            let family = handle_create(&mut store, &dirpath, family_config)?;
            println!(
                "Created family '{}' with {} {} members: {}",
                family.label(),
                family.count(),
                family.pseudo_type().entry_point(),
                family.elements().join(" ")
            );
        }
        FamilyCommands::List => print!("{}", render_list(&store)),
        FamilyCommands::Show { label } => {
            let family = PseudoFamily::load(&store, &label)?;
            print!("{}", render_family(&family));
        }
        FamilyCommands::Get { label, element } => {
            let family = PseudoFamily::load(&store, &label)?;
            let pseudo = family.get_pseudo(&element)?;
            print!("{}", describe_pseudo(pseudo));
        }
    }
    Ok(())
}

fn handle_create(
    store: &mut Store,
    dirpath: &Path,
    config: FamilyConfig,
) -> Result<PseudoFamily> {
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let family = create_from_folder(store, dirpath, config, &reporter)?;
    store.save()?;
    info!("Store saved with {} records.", store.node_count());
    Ok(family)
}

fn render_list(store: &Store) -> String {
    let labels: Vec<String> = store.family_labels().into_iter().map(String::from).collect();
    if labels.is_empty() {
        return "No families stored.\n".to_string();
    }
    join_lines(&labels)
}

fn render_family(family: &PseudoFamily) -> String {
    let mut lines = vec![format!("Family:      {}", family.label())];
    if !family.description().is_empty() {
        lines.push(format!("Description: {}", family.description()));
    }
    lines.push(format!("Type:        {}", family.pseudo_type().entry_point()));
    lines.push(format!("Members:     {}", family.count()));
    lines.extend(family.pseudos().iter().map(|(element, pseudo)| {
        format!("  {:<3} {:<40} {}", element, pseudo.filename(), pseudo.md5())
    }));
    join_lines(&lines)
}
