use crate::core::models::pseudo::PseudoType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(
        "`{0}` is not a subclass of `PseudoPotentialData`; expected one of `pseudo`, `pseudo.upf`, `pseudo.vps`"
    )]
    InvalidPseudoType(String),
}

/// Settings a family is created with.
///
/// The pseudo type is fixed for the lifetime of the family: only records of
/// exactly this type can become members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyConfig {
    pub label: String,
    pub description: String,
    pub pseudo_type: PseudoType,
}

impl FamilyConfig {
    /// A family of generic records with an empty description.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            pseudo_type: PseudoType::default(),
        }
    }
}

#[derive(Default)]
pub struct FamilyConfigBuilder {
    label: Option<String>,
    description: Option<String>,
    pseudo_type: Option<PseudoType>,
    pseudo_type_name: Option<String>,
}

impl FamilyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
    pub fn pseudo_type(mut self, pseudo_type: PseudoType) -> Self {
        self.pseudo_type = Some(pseudo_type);
        self.pseudo_type_name = None;
        self
    }
    /// Sets the pseudo type by its registered name, e.g. `pseudo.upf`.
    ///
    /// The name is validated in [`FamilyConfigBuilder::build`].
    pub fn pseudo_type_name(mut self, name: impl Into<String>) -> Self {
        self.pseudo_type_name = Some(name.into());
        self.pseudo_type = None;
        self
    }

    pub fn build(self) -> Result<FamilyConfig, ConfigError> {
        let label = self
            .label
            .filter(|label| !label.trim().is_empty())
            .ok_or(ConfigError::MissingParameter("label"))?;

        let pseudo_type = match self.pseudo_type_name {
            Some(name) => name
                .parse::<PseudoType>()
                .map_err(|_| ConfigError::InvalidPseudoType(name))?,
            None => self.pseudo_type.unwrap_or_default(),
        };

        Ok(FamilyConfig {
            label,
            description: self.description.unwrap_or_default(),
            pseudo_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_defaults() {
        let config = FamilyConfigBuilder::new().label("SSSP").build().unwrap();
        assert_eq!(config, FamilyConfig::new("SSSP"));
        assert_eq!(config.pseudo_type, PseudoType::Pseudo);
        assert!(config.description.is_empty());
    }

    #[test]
    fn build_keeps_every_explicit_value() {
        let config = FamilyConfigBuilder::new()
            .label("family")
            .description("description")
            .pseudo_type(PseudoType::Vps)
            .build()
            .unwrap();
        assert_eq!(config.label, "family");
        assert_eq!(config.description, "description");
        assert_eq!(config.pseudo_type, PseudoType::Vps);
    }

    #[test]
    fn build_fails_without_label() {
        let result = FamilyConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("label")));

        let result = FamilyConfigBuilder::new().label("   ").build();
        assert_eq!(result, Err(ConfigError::MissingParameter("label")));
    }

    #[test]
    fn pseudo_type_name_is_resolved_to_a_known_type() {
        let config = FamilyConfigBuilder::new()
            .label("upf")
            .pseudo_type_name("pseudo.upf")
            .build()
            .unwrap();
        assert_eq!(config.pseudo_type, PseudoType::Upf);
    }

    #[test]
    fn unknown_pseudo_type_name_fails_fast() {
        let err = FamilyConfigBuilder::new()
            .label("custom")
            .pseudo_type_name("int")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPseudoType("int".to_string()));
        assert!(err.to_string().starts_with("`int` is not a subclass of `PseudoPotentialData`"));
    }

    #[test]
    fn last_pseudo_type_setter_wins() {
        let config = FamilyConfigBuilder::new()
            .label("l")
            .pseudo_type_name("int")
            .pseudo_type(PseudoType::Upf)
            .build()
            .unwrap();
        assert_eq!(config.pseudo_type, PseudoType::Upf);
    }
}
