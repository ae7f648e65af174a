use crate::core::models::pseudo::PseudoPotential;
use crate::engine::config::FamilyConfig;
use crate::engine::error::FamilyError;
use crate::engine::family::PseudoFamily;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::store::Store;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Creates and stores a family from every file in `dirpath`.
///
/// Each file becomes a record of the configured pseudo type. All files are
/// parsed before anything is stored, and storing happens in a single store
/// transaction, so on error the store is left exactly as it was.
///
/// # Arguments
///
/// * `store` - The store that receives the family and its records.
/// * `dirpath` - Directory containing only pseudopotential files.
/// * `config` - Label, description and pseudo type of the new family.
/// * `reporter` - Receives progress events.
///
/// # Errors
///
/// - [`FamilyError::LabelExists`] if the label is already used.
/// - [`FamilyError::NotADirectory`] if `dirpath` is not a directory.
/// - [`FamilyError::NotAFile`] if the directory contains anything but files.
/// - [`FamilyError::Pseudo`] if a file cannot be read or parsed.
/// - [`FamilyError::DuplicateElementsInFolder`] if two files share an element.
/// - [`FamilyError::NoPseudos`] if the directory is empty.
#[instrument(skip_all, name = "create_from_folder", fields(label = %config.label))]
pub fn create_from_folder(
    store: &mut Store,
    dirpath: &Path,
    config: FamilyConfig,
    reporter: &ProgressReporter,
) -> Result<PseudoFamily, FamilyError> {
    if store.has_family(&config.label) {
        return Err(FamilyError::LabelExists {
            label: config.label,
        });
    }

    let pseudos = parse_folder(dirpath, &config, reporter)?;
    info!(
        "Parsed {} pseudopotentials from {:?}; storing family.",
        pseudos.len(),
        dirpath
    );

    reporter.report(Progress::Storing {
        label: config.label.clone(),
    });
    let family = store_family(store, config, pseudos)?;

    reporter.report(Progress::Stored {
        members: family.count(),
    });
    info!(
        label = family.label(),
        members = family.count(),
        "Family created."
    );
    Ok(family)
}

/// Stores a new family together with `pseudos` in one transaction.
fn store_family(
    store: &mut Store,
    config: FamilyConfig,
    pseudos: Vec<PseudoPotential>,
) -> Result<PseudoFamily, FamilyError> {
    store.transaction(|store| {
        let mut family = PseudoFamily::new(config);
        family.store(store)?;

        let mut stored = Vec::with_capacity(pseudos.len());
        for mut pseudo in pseudos {
            store.store_pseudo(&mut pseudo)?;
            stored.push(pseudo);
        }
        family.add_nodes(store, &stored)?;
        Ok(family)
    })
}

fn parse_folder(
    dirpath: &Path,
    config: &FamilyConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<PseudoPotential>, FamilyError> {
    let display = dirpath.to_string_lossy().to_string();
    if !dirpath.is_dir() {
        return Err(FamilyError::NotADirectory { dirpath: display });
    }

    let read_dir = fs::read_dir(dirpath).map_err(|e| FamilyError::Io {
        path: display.clone(),
        source: e,
    })?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| FamilyError::Io {
            path: display.clone(),
            source: e,
        })?;
        entries.push(entry.path());
    }
    entries.sort();

    reporter.report(Progress::ScanStart {
        total_files: entries.len() as u64,
    });

    let mut pseudos = Vec::with_capacity(entries.len());
    let mut elements = HashSet::with_capacity(entries.len());
    for path in entries {
        if !path.is_file() {
            return Err(FamilyError::NotAFile {
                dirpath: display,
                entry: path.to_string_lossy().to_string(),
            });
        }

        let pseudo = PseudoPotential::from_path(config.pseudo_type, &path)?;
        debug!(
            filename = pseudo.filename(),
            element = pseudo.element(),
            "Parsed pseudopotential."
        );
        if !elements.insert(pseudo.element()) {
            return Err(FamilyError::DuplicateElementsInFolder {
                dirpath: display,
                element: pseudo.element().to_string(),
            });
        }

        reporter.report(Progress::FileParsed {
            filename: pseudo.filename().to_string(),
            element: pseudo.element(),
        });
        pseudos.push(pseudo);
    }
    reporter.report(Progress::ScanFinish);

    if pseudos.is_empty() {
        return Err(FamilyError::NoPseudos { dirpath: display });
    }
    Ok(pseudos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::error::ParsingError;
    use crate::core::models::pseudo::{PseudoError, PseudoType};
    use crate::engine::config::FamilyConfigBuilder;
    use crate::engine::store::StoreError;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    const ELEMENTS: [&str; 5] = ["Ar", "He", "Kr", "Ne", "Rn"];

    fn pseudo_folder(extension: &str, content: &str) -> TempDir {
        let dir = tempdir().unwrap();
        for element in ELEMENTS {
            fs::write(dir.path().join(format!("{element}.{extension}")), content).unwrap();
        }
        dir
    }

    fn create(
        store: &mut Store,
        dirpath: &Path,
        label: &str,
    ) -> Result<PseudoFamily, FamilyError> {
        create_from_folder(
            store,
            dirpath,
            FamilyConfig::new(label),
            &ProgressReporter::new(),
        )
    }

    #[test]
    fn creates_stored_family_with_one_member_per_file() {
        let dir = pseudo_folder("upf", "");
        let mut store = Store::new();

        let family = create(&mut store, dir.path(), "label").unwrap();
        assert!(family.is_stored());
        assert_eq!(family.label(), "label");
        assert_eq!(family.count(), ELEMENTS.len());
        assert_eq!(family.elements(), ELEMENTS.to_vec());
        assert_eq!(store.node_count(), ELEMENTS.len());
        assert!(family.pseudos().values().all(PseudoPotential::is_stored));
    }

    #[test]
    fn created_family_can_be_loaded_back() {
        let dir = pseudo_folder("upf", "");
        let mut store = Store::new();

        let family = create(&mut store, dir.path(), "label").unwrap();
        assert_eq!(PseudoFamily::load(&store, "label").unwrap(), family);
    }

    #[test]
    fn upf_family_parses_every_header() {
        let dir = pseudo_folder("UPF", r#"<PP_HEADER z_valence="8.0"/>"#);
        let mut store = Store::new();
        let config = FamilyConfigBuilder::new()
            .label("upf")
            .pseudo_type(PseudoType::Upf)
            .build()
            .unwrap();

        let family =
            create_from_folder(&mut store, dir.path(), config, &ProgressReporter::new()).unwrap();
        assert_eq!(family.pseudo_type(), PseudoType::Upf);
        assert!(family.pseudos().values().all(|p| p.z_valence() == Some(8.0)));
    }

    #[test]
    fn fails_for_folder_with_subdirectory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("pseudos")).unwrap();
        let mut store = Store::new();

        let err = create(&mut store, dir.path(), "label").unwrap_err();
        assert!(matches!(err, FamilyError::NotAFile { .. }));
        assert!(err.to_string().contains("contains at least one entry that is not a file"));
        assert!(!store.has_family("label"));
    }

    #[test]
    fn fails_for_unparsable_filename() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Arr.upf"), "").unwrap();
        let mut store = Store::new();

        let err = create(&mut store, dir.path(), "label").unwrap_err();
        assert!(matches!(
            err,
            FamilyError::Pseudo(PseudoError::Parsing(
                ParsingError::ElementNotDetermined { .. }
            ))
        ));
        assert!(err.to_string().contains("constructor did not define the element"));
    }

    #[test]
    fn fails_for_empty_folder() {
        let dir = tempdir().unwrap();
        let mut store = Store::new();

        let err = create(&mut store, dir.path(), "label").unwrap_err();
        assert!(matches!(err, FamilyError::NoPseudos { .. }));
        assert!(err.to_string().starts_with("no pseudo potentials were parsed from"));
    }

    #[test]
    fn fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let mut store = Store::new();

        let err = create(&mut store, &dir.path().join("missing"), "label").unwrap_err();
        assert!(matches!(err, FamilyError::NotADirectory { .. }));
    }

    #[test]
    fn fails_for_duplicate_elements_differing_in_case() {
        let dir = pseudo_folder("upf", "");
        fs::write(dir.path().join("Ar.UPF"), "").unwrap();
        let mut store = Store::new();

        let err = create(&mut store, dir.path(), "label").unwrap_err();
        assert!(matches!(
            err,
            FamilyError::DuplicateElementsInFolder { ref element, .. } if element == "Ar"
        ));
        assert!(err.to_string().contains("contains pseudo potentials with duplicate elements"));
        assert!(!store.has_family("label"));
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn fails_for_existing_label() {
        let dir = pseudo_folder("upf", "");
        let mut store = Store::new();
        PseudoFamily::new(FamilyConfig::new("label"))
            .store(&mut store)
            .unwrap();

        let err = create(&mut store, dir.path(), "label").unwrap_err();
        assert!(matches!(err, FamilyError::LabelExists { .. }));
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn failure_while_storing_leaves_no_partial_family() {
        let mut store = Store::new();
        let mut config = FamilyConfig::new("label");
        config.pseudo_type = PseudoType::Upf;
        let pseudos = vec![
            PseudoPotential::from_bytes(PseudoType::Upf, "Ar.upf", r#"z_valence="8""#).unwrap(),
            PseudoPotential::from_bytes(PseudoType::Pseudo, "He.upf", "").unwrap(),
        ];

        let err = store_family(&mut store, config, pseudos).unwrap_err();
        assert!(matches!(
            err,
            FamilyError::IncorrectType {
                expected: PseudoType::Upf
            }
        ));
        assert!(!store.has_family("label"));
        assert!(store.family_labels().is_empty());
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn failure_while_storing_keeps_existing_contents() {
        let dir = pseudo_folder("upf", "");
        let mut store = Store::new();
        create(&mut store, dir.path(), "existing").unwrap();
        let node_count = store.node_count();

        let mut other = Store::new();
        let mut foreign =
            PseudoPotential::from_bytes(PseudoType::Pseudo, "Ar.upf", "foreign").unwrap();
        other.store_pseudo(&mut foreign).unwrap();

        let err =
            store_family(&mut store, FamilyConfig::new("label"), vec![foreign]).unwrap_err();
        assert!(matches!(err, FamilyError::Store(StoreError::ForeignNode { .. })));
        assert!(!store.has_family("label"));
        assert_eq!(store.family_labels(), vec!["existing"]);
        assert_eq!(store.node_count(), node_count);
    }

    #[test]
    fn reports_progress_for_every_file() {
        let dir = pseudo_folder("upf", "");
        let mut store = Store::new();
        let parsed = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::FileParsed { element, .. } = event {
                parsed.lock().unwrap().push(element);
            }
        }));

        create_from_folder(&mut store, dir.path(), FamilyConfig::new("label"), &reporter)
            .unwrap();
        drop(reporter);

        assert_eq!(parsed.into_inner().unwrap(), ELEMENTS.to_vec());
    }
}
