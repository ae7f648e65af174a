use super::ids::NodeId;
use crate::core::io::error::ParsingError;
use crate::core::io::traits::{PseudoFormat, PseudoHeader};
use crate::core::io::upf::UpfFile;
use crate::core::io::vps::{VpsFile, XcType};
use crate::core::utils::elements::element_from_filename;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Identifies the concrete kind of a pseudopotential record.
///
/// Families compare this tag for strict equality: a `Upf` record is never
/// accepted where `Pseudo` records are expected, even though every UPF file is
/// also a valid generic pseudopotential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PseudoType {
    /// Generic record; only the filename is interpreted.
    #[default]
    #[serde(rename = "pseudo")]
    Pseudo,
    /// Unified Pseudopotential Format; the valence is read from the header.
    #[serde(rename = "pseudo.upf")]
    Upf,
    /// OpenMX VPS format; the valence and functional are read from the header.
    #[serde(rename = "pseudo.vps")]
    Vps,
}

impl PseudoType {
    /// Every known record kind.
    pub const ALL: [PseudoType; 3] = [Self::Pseudo, Self::Upf, Self::Vps];

    /// The registered type name, e.g. `pseudo.upf`.
    pub fn entry_point(&self) -> &'static str {
        match self {
            Self::Pseudo => "pseudo",
            Self::Upf => "pseudo.upf",
            Self::Vps => "pseudo.vps",
        }
    }

    /// The human-facing name of the record kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Pseudo => "PseudoPotentialData",
            Self::Upf => "UpfData",
            Self::Vps => "VpsData",
        }
    }

    /// Parses the format-specific header values of `content`.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw bytes of the file.
    /// * `source_name` - Name reported in error messages.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if the format requires a value that is absent.
    pub fn parse_header(
        &self,
        content: &[u8],
        source_name: &str,
    ) -> Result<PseudoHeader, ParsingError> {
        match self {
            Self::Pseudo => Ok(PseudoHeader::default()),
            Self::Upf => UpfFile::parse_bytes(content, source_name),
            Self::Vps => VpsFile::parse_bytes(content, source_name),
        }
    }
}

impl FromStr for PseudoType {
    type Err = ();

    /// Parses a registered type name such as `pseudo.upf`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.entry_point() == normalized)
            .ok_or(())
    }
}

impl fmt::Display for PseudoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Lifecycle of a record.
///
/// A record is freely modifiable until it is stored; storing assigns it an id
/// and makes it immutable for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum NodeState {
    #[default]
    Mutable,
    Stored(NodeId),
}

#[derive(Debug, Error)]
pub enum PseudoError {
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error("the file of stored node `{filename}` cannot be replaced")]
    ModificationNotAllowed { filename: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A pseudopotential file together with the values derived from it.
///
/// The element, checksum and header values are always derived from the file;
/// they cannot be set independently, so they stay consistent with the content
/// through every call to [`PseudoPotential::set_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoPotential {
    pseudo_type: PseudoType,
    filename: String,
    content: Arc<[u8]>,
    element: &'static str,
    md5: String,
    z_valence: Option<f64>,
    xc_type: Option<XcType>,
    state: NodeState,
}

/// Everything computed from a (filename, content) pair.
struct DerivedFields {
    element: &'static str,
    md5: String,
    header: PseudoHeader,
}

impl DerivedFields {
    fn derive(
        pseudo_type: PseudoType,
        filename: &str,
        content: &[u8],
    ) -> Result<Self, ParsingError> {
        let element =
            element_from_filename(filename).ok_or_else(|| ParsingError::ElementNotDetermined {
                pseudo_type: pseudo_type.type_name(),
                filename: filename.to_string(),
            })?;
        let header = pseudo_type.parse_header(content, filename)?;

        Ok(Self {
            element,
            md5: md5_hex(content),
            header,
        })
    }
}

/// Computes the lowercase hexadecimal MD5 digest of `content`.
pub fn md5_hex(content: &[u8]) -> String {
    format!("{:x}", Md5::digest(content))
}

impl PseudoPotential {
    /// Creates an unstored record from in-memory content.
    ///
    /// # Arguments
    ///
    /// * `pseudo_type` - The kind of record, which decides how content is parsed.
    /// * `filename` - The filename, from which the element is derived.
    /// * `content` - The file content.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if the element cannot be derived from
    /// `filename` or the format-specific header is invalid.
    pub fn from_bytes(
        pseudo_type: PseudoType,
        filename: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<Self, ParsingError> {
        let content: Arc<[u8]> = Arc::from(content.into());
        let derived = DerivedFields::derive(pseudo_type, filename, &content)?;

        Ok(Self {
            pseudo_type,
            filename: filename.to_string(),
            content,
            element: derived.element,
            md5: derived.md5,
            z_valence: derived.header.z_valence,
            xc_type: derived.header.xc_type,
            state: NodeState::Mutable,
        })
    }

    /// Creates an unstored record by reading `reader` to the end.
    pub fn from_reader(
        pseudo_type: PseudoType,
        mut reader: impl Read,
        filename: &str,
    ) -> Result<Self, PseudoError> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content).map_err(|e| PseudoError::Io {
            path: filename.to_string(),
            source: e,
        })?;
        Ok(Self::from_bytes(pseudo_type, filename, content)?)
    }

    /// Creates an unstored record from a file on disk, named after the file.
    pub fn from_path<P: AsRef<Path>>(
        pseudo_type: PseudoType,
        path: P,
    ) -> Result<Self, PseudoError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PseudoError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_reader(pseudo_type, file, &filename)
    }

    /// Replaces the file of an unstored record and re-derives every value.
    ///
    /// The new file is fully parsed before anything is replaced, so on error the
    /// record keeps its previous file and values.
    ///
    /// # Errors
    ///
    /// Returns [`PseudoError::ModificationNotAllowed`] if the record is stored
    /// and [`PseudoError::Parsing`] if the new file cannot be parsed.
    pub fn set_file(
        &mut self,
        filename: &str,
        content: impl Into<Vec<u8>>,
    ) -> Result<(), PseudoError> {
        if self.is_stored() {
            return Err(PseudoError::ModificationNotAllowed {
                filename: self.filename.clone(),
            });
        }

        let content: Arc<[u8]> = Arc::from(content.into());
        let derived = DerivedFields::derive(self.pseudo_type, filename, &content)?;

        self.filename = filename.to_string();
        self.content = content;
        self.element = derived.element;
        self.md5 = derived.md5;
        self.z_valence = derived.header.z_valence;
        self.xc_type = derived.header.xc_type;
        Ok(())
    }

    /// Replaces the file of an unstored record with a file read from disk.
    pub fn set_file_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PseudoError> {
        if self.is_stored() {
            return Err(PseudoError::ModificationNotAllowed {
                filename: self.filename.clone(),
            });
        }
        let replacement = Self::from_path(self.pseudo_type, path)?;
        self.set_file(&replacement.filename, replacement.content.to_vec())
    }

    pub fn pseudo_type(&self) -> PseudoType {
        self.pseudo_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The canonical element symbol, e.g. `Ar`.
    pub fn element(&self) -> &'static str {
        self.element
    }

    /// Hexadecimal MD5 digest of the content.
    pub fn md5(&self) -> &str {
        &self.md5
    }

    /// Number of valence electrons; only set for formats that define it.
    pub fn z_valence(&self) -> Option<f64> {
        self.z_valence
    }

    pub fn xc_type(&self) -> Option<XcType> {
        self.xc_type
    }

    pub fn is_stored(&self) -> bool {
        matches!(self.state, NodeState::Stored(_))
    }

    /// The storage id, if the record has been stored.
    pub fn id(&self) -> Option<NodeId> {
        match self.state {
            NodeState::Stored(id) => Some(id),
            NodeState::Mutable => None,
        }
    }

    pub(crate) fn mark_stored(&mut self, id: NodeId) {
        self.state = NodeState::Stored(id);
    }
}
