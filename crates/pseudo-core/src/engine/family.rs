use super::config::FamilyConfig;
use super::error::FamilyError;
use super::store::{GroupEntry, Store};
use crate::core::models::ids::{GroupId, NodeId};
use crate::core::models::pseudo::{PseudoPotential, PseudoType};
use crate::core::utils::elements::canonical_element;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Type string under which families are registered.
pub const FAMILY_TYPE_STRING: &str = "pseudo.family";

/// A labelled collection of pseudopotentials holding at most one record per
/// element.
///
/// A family references stored records; it never owns or modifies them. All
/// members share the exact [`PseudoType`] the family was created with.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoFamily {
    label: String,
    description: String,
    pseudo_type: PseudoType,
    id: Option<GroupId>,
    pseudos: BTreeMap<&'static str, PseudoPotential>,
}

impl PseudoFamily {
    /// Creates an empty, unstored family.
    pub fn new(config: FamilyConfig) -> Self {
        Self {
            label: config.label,
            description: config.description,
            pseudo_type: config.pseudo_type,
            id: None,
            pseudos: BTreeMap::new(),
        }
    }

    /// Loads the stored family called `label`.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyError::FamilyNotFound`] if no family has that label.
    pub fn load(store: &Store, label: &str) -> Result<Self, FamilyError> {
        let id = store
            .group_id(label)
            .ok_or_else(|| FamilyError::FamilyNotFound {
                label: label.to_string(),
            })?;
        let entry = store
            .group(id)
            .ok_or_else(|| FamilyError::FamilyNotFound {
                label: label.to_string(),
            })?;

        let mut family = Self {
            label: entry.label.clone(),
            description: entry.description.clone(),
            pseudo_type: entry.pseudo_type,
            id: Some(id),
            pseudos: BTreeMap::new(),
        };
        family.sync_members(store, entry);
        Ok(family)
    }

    /// Stores the family, reserving its label.
    ///
    /// Storing an already stored family returns its existing id.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyError::LabelExists`] if another family uses the label.
    pub fn store(&mut self, store: &mut Store) -> Result<GroupId, FamilyError> {
        if let Some(id) = self.id {
            return Ok(id);
        }

        let entry = GroupEntry {
            label: self.label.clone(),
            description: self.description.clone(),
            pseudo_type: self.pseudo_type,
            members: BTreeMap::new(),
        };
        let id = store
            .insert_group(entry)
            .ok_or_else(|| FamilyError::LabelExists {
                label: self.label.clone(),
            })?;

        info!(label = %self.label, "Stored family.");
        self.id = Some(id);
        Ok(id)
    }

    /// Adds stored records to the family.
    ///
    /// Every check runs before anything is added, so on error neither the
    /// family nor the store changes.
    ///
    /// # Errors
    ///
    /// - [`FamilyError::ModificationNotAllowed`] if the family is not stored.
    /// - [`FamilyError::UnstoredNodes`] if any record is not stored in `store`.
    /// - [`FamilyError::IncorrectType`] if any record's type differs from the
    ///   family's pseudo type, even when it is a more specific format.
    /// - [`FamilyError::DuplicateElement`] if an element is already a member or
    ///   occurs twice among `nodes`.
    pub fn add_nodes<'a, I>(&mut self, store: &mut Store, nodes: I) -> Result<(), FamilyError>
    where
        I: IntoIterator<Item = &'a PseudoPotential>,
    {
        let id = self
            .id
            .filter(|id| store.group(*id).is_some())
            .ok_or_else(|| FamilyError::ModificationNotAllowed {
                label: self.label.clone(),
            })?;

        let mut members: Vec<(&'static str, NodeId)> = Vec::new();
        let mut types = Vec::new();
        for node in nodes {
            let (node_id, stored) = store.resolve(node).ok_or(FamilyError::UnstoredNodes)?;
            members.push((stored.element(), node_id));
            types.push(stored.pseudo_type());
        }

        if types.iter().any(|pseudo_type| *pseudo_type != self.pseudo_type) {
            return Err(FamilyError::IncorrectType {
                expected: self.pseudo_type,
            });
        }

        let existing = store.group(id).map(|entry| &entry.members);
        let mut seen = HashSet::with_capacity(members.len());
        for (element, _) in &members {
            let present = existing.is_some_and(|current| current.contains_key(element));
            if present || !seen.insert(*element) {
                return Err(FamilyError::DuplicateElement {
                    element: element.to_string(),
                });
            }
        }

        let entry = store
            .group_mut(id)
            .ok_or_else(|| FamilyError::ModificationNotAllowed {
                label: self.label.clone(),
            })?;
        for (element, node_id) in members {
            entry.members.insert(element, node_id);
            debug!(label = %self.label, element, "Added node to family.");
        }

        if let Some(entry) = store.group(id) {
            self.sync_members(store, entry);
        }
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The exact record type members must have.
    pub fn pseudo_type(&self) -> PseudoType {
        self.pseudo_type
    }

    pub fn type_string(&self) -> &'static str {
        FAMILY_TYPE_STRING
    }

    pub fn id(&self) -> Option<GroupId> {
        self.id
    }

    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }

    /// Number of members.
    pub fn count(&self) -> usize {
        self.pseudos.len()
    }

    /// Element symbols of all members, sorted.
    pub fn elements(&self) -> Vec<&'static str> {
        self.pseudos.keys().copied().collect()
    }

    /// Members keyed by element.
    pub fn pseudos(&self) -> &BTreeMap<&'static str, PseudoPotential> {
        &self.pseudos
    }

    /// Returns the member for `element`, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`FamilyError::ElementNotFound`] if the family has no record for
    /// `element`.
    pub fn get_pseudo(&self, element: &str) -> Result<&PseudoPotential, FamilyError> {
        canonical_element(element)
            .and_then(|symbol| self.pseudos.get(symbol))
            .ok_or_else(|| FamilyError::ElementNotFound {
                label: self.label.clone(),
                element: element.to_string(),
            })
    }

    fn sync_members(&mut self, store: &Store, entry: &GroupEntry) {
        self.pseudos = entry
            .members
            .iter()
            .filter_map(|(element, node_id)| {
                store.node(*node_id).map(|node| (*element, node.clone()))
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::FamilyConfigBuilder;

    fn stored_pseudo(
        store: &mut Store,
        pseudo_type: PseudoType,
        element: &str,
    ) -> PseudoPotential {
        let content = match pseudo_type {
            PseudoType::Pseudo => String::new(),
            PseudoType::Upf => r#"z_valence="1.0""#.to_string(),
            PseudoType::Vps => "valence.electron 1.0\nxc.type GGA".to_string(),
        };
        let filename = format!("{element}.{}", pseudo_type.entry_point());
        let mut pseudo = PseudoPotential::from_bytes(pseudo_type, &filename, content).unwrap();
        store.store_pseudo(&mut pseudo).unwrap();
        pseudo
    }

    fn unstored_pseudo(element: &str) -> PseudoPotential {
        PseudoPotential::from_bytes(PseudoType::Pseudo, &format!("{element}.upf"), "").unwrap()
    }

    fn stored_family(store: &mut Store, elements: &[&str]) -> PseudoFamily {
        let mut family = PseudoFamily::new(FamilyConfig::new("family"));
        family.store(store).unwrap();
        let pseudos: Vec<PseudoPotential> = elements
            .iter()
            .map(|element| stored_pseudo(store, PseudoType::Pseudo, element))
            .collect();
        family.add_nodes(store, &pseudos).unwrap();
        family
    }

    #[test]
    fn type_string_is_registered_name() {
        let family = PseudoFamily::new(FamilyConfig::new("label"));
        assert_eq!(family.type_string(), "pseudo.family");
    }

    #[test]
    fn new_family_is_unstored_and_empty() {
        let config = FamilyConfigBuilder::new()
            .label("family")
            .description("description")
            .build()
            .unwrap();
        let family = PseudoFamily::new(config);

        assert!(!family.is_stored());
        assert_eq!(family.label(), "family");
        assert_eq!(family.description(), "description");
        assert_eq!(family.pseudo_type(), PseudoType::Pseudo);
        assert_eq!(family.count(), 0);
        assert!(family.elements().is_empty());
    }

    #[test]
    fn store_rejects_duplicate_labels() {
        let mut store = Store::new();
        PseudoFamily::new(FamilyConfig::new("label"))
            .store(&mut store)
            .unwrap();

        let err = PseudoFamily::new(FamilyConfig::new("label"))
            .store(&mut store)
            .unwrap_err();
        assert!(matches!(err, FamilyError::LabelExists { .. }));
        assert_eq!(err.to_string(), "the PseudoPotentialFamily `label` already exists");
    }

    #[test]
    fn add_nodes_accepts_single_records_and_batches() {
        let mut store = Store::new();
        let mut family = stored_family(&mut store, &["Rn"]);
        assert_eq!(family.count(), 1);

        let ar = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");
        family.add_nodes(&mut store, [&ar]).unwrap();
        assert_eq!(family.count(), 2);

        let ne = stored_pseudo(&mut store, PseudoType::Pseudo, "Ne");
        family.add_nodes(&mut store, std::iter::once(&ne)).unwrap();
        assert_eq!(family.count(), 3);

        let batch = vec![
            stored_pseudo(&mut store, PseudoType::Pseudo, "He"),
            stored_pseudo(&mut store, PseudoType::Pseudo, "Kr"),
        ];
        family.add_nodes(&mut store, &batch).unwrap();
        assert_eq!(family.count(), 5);
    }

    #[test]
    fn add_nodes_fails_for_unstored_family() {
        let mut store = Store::new();
        let ar = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");
        let mut family = PseudoFamily::new(FamilyConfig::new("label"));

        let err = family.add_nodes(&mut store, [&ar]).unwrap_err();
        assert!(matches!(err, FamilyError::ModificationNotAllowed { .. }));
        assert_eq!(family.count(), 0);
    }

    #[test]
    fn add_nodes_fails_for_unstored_nodes() {
        let batches: Vec<Vec<PseudoPotential>> = vec![
            vec![unstored_pseudo("Ar")],
            vec![unstored_pseudo("Ar"), unstored_pseudo("Ne")],
        ];

        for batch in batches {
            let mut store = Store::new();
            let mut family = stored_family(&mut store, &["He"]);
            let count = family.count();

            let err = family.add_nodes(&mut store, &batch).unwrap_err();
            assert!(matches!(err, FamilyError::UnstoredNodes));
            assert_eq!(
                err.to_string(),
                "At least one of the provided nodes is unstored, stopping..."
            );
            assert_eq!(family.count(), count);
        }
    }

    #[test]
    fn add_nodes_fails_when_any_node_in_batch_is_unstored() {
        let mut store = Store::new();
        let mut family = stored_family(&mut store, &[]);
        let ar = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");
        let ne = unstored_pseudo("Ne");

        let err = family.add_nodes(&mut store, [&ar, &ne]).unwrap_err();
        assert!(matches!(err, FamilyError::UnstoredNodes));
        assert_eq!(family.count(), 0);
    }

    #[test]
    fn add_nodes_rejects_more_specific_types() {
        let mut store = Store::new();
        let mut family = stored_family(&mut store, &[]);

        let upf = stored_pseudo(&mut store, PseudoType::Upf, "Ar");
        let err = family.add_nodes(&mut store, [&upf]).unwrap_err();
        assert!(matches!(
            err,
            FamilyError::IncorrectType {
                expected: PseudoType::Pseudo
            }
        ));
        assert_eq!(
            err.to_string(),
            "only nodes of type `PseudoPotentialData` can be added"
        );

        let generic = stored_pseudo(&mut store, PseudoType::Pseudo, "He");
        let upf = stored_pseudo(&mut store, PseudoType::Upf, "Ne");
        let err = family.add_nodes(&mut store, [&generic, &upf]).unwrap_err();
        assert!(matches!(err, FamilyError::IncorrectType { .. }));
        assert_eq!(family.count(), 0);
    }

    #[test]
    fn add_nodes_rejects_elements_already_present() {
        let mut store = Store::new();
        let mut family = stored_family(&mut store, &["Ar"]);
        let ar = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");

        let err = family.add_nodes(&mut store, [&ar]).unwrap_err();
        assert_eq!(err.to_string(), "element `Ar` already present in this family");
        assert_eq!(family.count(), 1);
    }

    #[test]
    fn add_nodes_rejects_duplicate_elements_within_batch() {
        let mut store = Store::new();
        let mut family = stored_family(&mut store, &[]);
        let first = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");
        let second = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");

        let err = family.add_nodes(&mut store, [&first, &second]).unwrap_err();
        assert!(matches!(err, FamilyError::DuplicateElement { ref element } if element == "Ar"));
        assert_eq!(family.count(), 0);
    }

    #[test]
    fn pseudos_maps_each_element_to_its_record() {
        let mut store = Store::new();
        let ar = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");
        let he = stored_pseudo(&mut store, PseudoType::Pseudo, "He");
        let mut family = PseudoFamily::new(FamilyConfig::new("label"));
        family.store(&mut store).unwrap();
        family.add_nodes(&mut store, [&ar, &he]).unwrap();

        let expected = BTreeMap::from([("Ar", ar.clone()), ("He", he.clone())]);
        assert_eq!(family.pseudos(), &expected);
        assert_eq!(family.elements().len(), family.pseudos().len());
    }

    #[test]
    fn elements_are_sorted_and_empty_for_empty_family() {
        let mut store = Store::new();
        let family = stored_family(&mut store, &["He", "Ar"]);
        assert_eq!(family.elements(), vec!["Ar", "He"]);

        let mut empty = PseudoFamily::new(FamilyConfig::new("empty"));
        empty.store(&mut store).unwrap();
        assert!(empty.elements().is_empty());
    }

    #[test]
    fn get_pseudo_returns_member_or_fails() {
        let mut store = Store::new();
        let family = stored_family(&mut store, &["Ar"]);

        assert_eq!(family.get_pseudo("Ar").unwrap(), &family.pseudos()["Ar"]);
        assert_eq!(family.get_pseudo("ar").unwrap().element(), "Ar");

        let err = family.get_pseudo("He").unwrap_err();
        assert_eq!(
            err.to_string(),
            "family `family` does not contain pseudo for element `He`"
        );
    }

    #[test]
    fn load_reflects_stored_membership() {
        let mut store = Store::new();
        let family = stored_family(&mut store, &["Ar", "He"]);

        let loaded = PseudoFamily::load(&store, "family").unwrap();
        assert_eq!(loaded, family);

        let err = PseudoFamily::load(&store, "missing").unwrap_err();
        assert!(matches!(err, FamilyError::FamilyNotFound { .. }));
    }

    #[test]
    fn add_nodes_rejects_records_stored_in_another_store() {
        let mut other = Store::new();
        let ar = stored_pseudo(&mut other, PseudoType::Pseudo, "Ar");

        let mut store = Store::new();
        let he = stored_pseudo(&mut store, PseudoType::Pseudo, "He");
        assert_eq!(ar.id(), he.id());

        let mut family = PseudoFamily::new(FamilyConfig::new("label"));
        family.store(&mut store).unwrap();
        let err = family.add_nodes(&mut store, [&ar]).unwrap_err();
        assert!(matches!(err, FamilyError::UnstoredNodes));
        assert_eq!(family.count(), 0);

        family.add_nodes(&mut store, [&he]).unwrap();
        assert_eq!(family.pseudos()["He"], he);
        assert!(family.get_pseudo("Ar").is_err());
    }

    #[test]
    fn duplicate_check_uses_store_membership_across_handles() {
        let mut store = Store::new();
        let mut first = stored_family(&mut store, &[]);
        let mut second = PseudoFamily::load(&store, "family").unwrap();

        let ar = stored_pseudo(&mut store, PseudoType::Pseudo, "Ar");
        first.add_nodes(&mut store, [&ar]).unwrap();

        let err = second.add_nodes(&mut store, [&ar]).unwrap_err();
        assert!(matches!(err, FamilyError::DuplicateElement { .. }));
    }
}
