//! In-process node and group storage.
//!
//! The store plays the part of a persistence backend: it hands out ids,
//! freezes records once they are stored, keeps family labels unique and
//! answers lookups by element. It can optionally be backed by a directory,
//! laid out as an `index.toml` plus one content-addressed file per record
//! under `files/<md5>`.

use crate::core::io::error::ParsingError;
use crate::core::models::ids::{GroupId, NodeId};
use crate::core::models::pseudo::{PseudoPotential, PseudoType};
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const INDEX_FILENAME: &str = "index.toml";
const FILES_DIRNAME: &str = "files";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    TomlDe {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Corrupted store at '{path}': {reason}")]
    Corrupted { path: String, reason: String },
    #[error("Stored node `{filename}` could not be parsed: {source}")]
    Node {
        filename: String,
        source: ParsingError,
    },
    #[error("node `{filename}` is stored in a different store")]
    ForeignNode { filename: String },
}

/// A stored family: its settings plus the element-keyed member ids.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupEntry {
    pub label: String,
    pub description: String,
    pub pseudo_type: PseudoType,
    pub members: BTreeMap<&'static str, NodeId>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreIndex {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    families: Vec<FamilyRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct NodeRecord {
    pseudo_type: PseudoType,
    filename: String,
    md5: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FamilyRecord {
    label: String,
    #[serde(default)]
    description: String,
    pseudo_type: PseudoType,
    /// Element symbol to position in the `nodes` array.
    #[serde(default)]
    members: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    root: Option<PathBuf>,
    pub(crate) nodes: SlotMap<NodeId, PseudoPotential>,
    pub(crate) groups: SlotMap<GroupId, GroupEntry>,
    pub(crate) labels: HashMap<String, GroupId>,
}

impl Store {
    /// Creates an empty store that lives only in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the store backed by `root`, creating an empty one if the
    /// directory does not contain an index yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the index cannot be read, a content file is
    /// missing, a content file no longer matches its recorded checksum, or a
    /// family lists a member of another pseudo type.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let mut store = Self {
            root: Some(root.clone()),
            ..Self::default()
        };

        let index_path = root.join(INDEX_FILENAME);
        if !index_path.exists() {
            info!("No index found at {:?}; starting with an empty store.", &index_path);
            return Ok(store);
        }

        let content = fs::read_to_string(&index_path).map_err(|e| io_error(&index_path, e))?;
        let index: StoreIndex = toml::from_str(&content).map_err(|e| StoreError::TomlDe {
            path: index_path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut node_ids = Vec::with_capacity(index.nodes.len());
        for record in &index.nodes {
            let file_path = root.join(FILES_DIRNAME).join(&record.md5);
            let bytes = fs::read(&file_path).map_err(|e| io_error(&file_path, e))?;
            let mut pseudo =
                PseudoPotential::from_bytes(record.pseudo_type, &record.filename, bytes).map_err(
                    |e| StoreError::Node {
                        filename: record.filename.clone(),
                        source: e,
                    },
                )?;
            if pseudo.md5() != record.md5 {
                return Err(StoreError::Corrupted {
                    path: file_path.to_string_lossy().to_string(),
                    reason: format!("checksum mismatch for `{}`", record.filename),
                });
            }
            node_ids.push(store.store_pseudo(&mut pseudo)?);
        }

        for record in index.families {
            let mut members = BTreeMap::new();
            for (element, position) in &record.members {
                let node_id = node_ids.get(*position).copied().ok_or_else(|| {
                    corrupted(
                        &index_path,
                        format!("family `{}` refers to a missing node", record.label),
                    )
                })?;
                let node = &store.nodes[node_id];
                if node.pseudo_type() != record.pseudo_type {
                    return Err(corrupted(
                        &index_path,
                        format!(
                            "family `{}` of type `{}` lists `{}` of type `{}`",
                            record.label,
                            record.pseudo_type.entry_point(),
                            node.filename(),
                            node.pseudo_type().entry_point()
                        ),
                    ));
                }
                let node_element = node.element();
                if node_element != element.as_str() {
                    return Err(corrupted(
                        &index_path,
                        format!(
                            "family `{}` lists `{}` under element `{}`",
                            record.label, node_element, element
                        ),
                    ));
                }
                members.insert(node_element, node_id);
            }

            let label = record.label.clone();
            let entry = GroupEntry {
                label: record.label,
                description: record.description,
                pseudo_type: record.pseudo_type,
                members,
            };
            if store.insert_group(entry).is_none() {
                return Err(corrupted(
                    &index_path,
                    format!("label `{}` is used by more than one family", label),
                ));
            }
        }

        info!(
            "Opened store at {:?} with {} nodes and {} families.",
            &root,
            store.nodes.len(),
            store.groups.len()
        );
        Ok(store)
    }

    /// The backing directory, or `None` for an in-memory store.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Writes the store to its backing directory; a no-op in memory.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(root) = &self.root else {
            debug!("In-memory store; nothing to save.");
            return Ok(());
        };

        let files_dir = root.join(FILES_DIRNAME);
        fs::create_dir_all(&files_dir).map_err(|e| io_error(&files_dir, e))?;

        let mut positions = SecondaryMap::new();
        let mut index = StoreIndex::default();
        for (position, (id, pseudo)) in self.nodes.iter().enumerate() {
            let file_path = files_dir.join(pseudo.md5());
            if !file_path.exists() {
                fs::write(&file_path, pseudo.content()).map_err(|e| io_error(&file_path, e))?;
            }
            positions.insert(id, position);
            index.nodes.push(NodeRecord {
                pseudo_type: pseudo.pseudo_type(),
                filename: pseudo.filename().to_string(),
                md5: pseudo.md5().to_string(),
            });
        }

        let mut groups: Vec<&GroupEntry> = self.groups.values().collect();
        groups.sort_by(|a, b| a.label.cmp(&b.label));
        for group in groups {
            index.families.push(FamilyRecord {
                label: group.label.clone(),
                description: group.description.clone(),
                pseudo_type: group.pseudo_type,
                members: group
                    .members
                    .iter()
                    .map(|(element, id)| (element.to_string(), positions[*id]))
                    .collect(),
            });
        }

        let index_path = root.join(INDEX_FILENAME);
        let staging_path = root.join(format!("{INDEX_FILENAME}.tmp"));
        fs::write(&staging_path, toml::to_string(&index)?)
            .map_err(|e| io_error(&staging_path, e))?;
        fs::rename(&staging_path, &index_path).map_err(|e| io_error(&index_path, e))?;

        debug!(
            "Saved {} nodes and {} families to {:?}.",
            index.nodes.len(),
            index.families.len(),
            root
        );
        Ok(())
    }

    /// Stores `pseudo`, freezing it, and returns its id.
    ///
    /// Storing a record that is already stored here returns its existing id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ForeignNode`] if `pseudo` was stored in another
    /// store.
    pub fn store_pseudo(&mut self, pseudo: &mut PseudoPotential) -> Result<NodeId, StoreError> {
        if pseudo.is_stored() {
            return self
                .resolve(pseudo)
                .map(|(id, _)| id)
                .ok_or_else(|| StoreError::ForeignNode {
                    filename: pseudo.filename().to_string(),
                });
        }

        let id = self.nodes.insert_with_key(|id| {
            let mut stored = pseudo.clone();
            stored.mark_stored(id);
            stored
        });
        pseudo.mark_stored(id);
        debug!(element = pseudo.element(), filename = pseudo.filename(), "Stored node.");
        Ok(id)
    }

    /// Looks up the node `pseudo` was stored as, if it was stored in this store.
    ///
    /// Ids are only unique within one store, so the node behind the id must
    /// also be the same record.
    pub fn resolve(&self, pseudo: &PseudoPotential) -> Option<(NodeId, &PseudoPotential)> {
        let id = pseudo.id()?;
        self.nodes
            .get(id)
            .filter(|node| *node == pseudo)
            .map(|node| (id, node))
    }

    pub fn node(&self, id: NodeId) -> Option<&PseudoPotential> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn has_family(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    /// Labels of every stored family, sorted.
    pub fn family_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub(crate) fn group(&self, id: GroupId) -> Option<&GroupEntry> {
        self.groups.get(id)
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> Option<&mut GroupEntry> {
        self.groups.get_mut(id)
    }

    pub(crate) fn group_id(&self, label: &str) -> Option<GroupId> {
        self.labels.get(label).copied()
    }

    /// Inserts a new group, or returns `None` if its label is taken.
    pub(crate) fn insert_group(&mut self, entry: GroupEntry) -> Option<GroupId> {
        if self.labels.contains_key(&entry.label) {
            return None;
        }
        let label = entry.label.clone();
        let id = self.groups.insert(entry);
        self.labels.insert(label, id);
        Some(id)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

fn corrupted(path: &Path, reason: String) -> StoreError {
    StoreError::Corrupted {
        path: path.to_string_lossy().to_string(),
        reason,
    }
}
