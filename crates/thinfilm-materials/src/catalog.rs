//! Immutable name-to-index catalogue.

use thinfilm_core::{OpticalMedium, ReflectanceError};
use thiserror::Error;

/// Errors from catalogue construction and lookup.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Material not found: {0}")]
    NotFound(String),

    #[error("Duplicate material identifier: {0}")]
    DuplicateName(String),

    #[error("Material '{name}' has an invalid index: {source}")]
    InvalidIndex {
        name: String,
        #[source]
        source: ReflectanceError,
    },
}

/// How a material is normally used in a coating design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialRole {
    /// Deposited as a thin film.
    Coating,
    /// Bulk substrate the film sits on.
    Substrate,
}

/// A named material with a single refractive index.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// ASCII identifier used in job files (e.g. `MgF2`).
    pub id: String,
    /// Display name with subscripts (e.g. `MgF₂`).
    pub display_name: String,
    pub medium: OpticalMedium,
    pub role: MaterialRole,
}

/// (identifier, display name, refractive index, role)
pub type MaterialEntry<'a> = (&'a str, &'a str, f64, MaterialRole);

const STANDARD: &[MaterialEntry<'static>] = &[
    ("Cryolite", "Cryolite", 1.32, MaterialRole::Coating),
    ("MgF2", "MgF₂", 1.38, MaterialRole::Coating),
    ("SiO2", "SiO₂", 1.46, MaterialRole::Coating),
    ("SiO3", "SiO₃", 1.78, MaterialRole::Coating),
    ("Al2O3", "Al₂O₃", 1.60, MaterialRole::Coating),
    ("CeF3", "CeF₃", 1.65, MaterialRole::Coating),
    ("ThO2", "ThO₂", 1.80, MaterialRole::Coating),
    ("Nd2O3", "Nd₂O₃", 2.0, MaterialRole::Coating),
    ("ZrO2", "ZrO₂", 2.1, MaterialRole::Coating),
    ("CeO2", "CeO₂", 2.35, MaterialRole::Coating),
    ("ZnS", "ZnS", 2.35, MaterialRole::Coating),
    ("TiO2", "TiO₂", 2.4, MaterialRole::Coating),
    ("CrownGlass", "Crown glass", 1.52, MaterialRole::Substrate),
];

/// Ordered, immutable material table.
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    materials: Vec<Material>,
}

impl MaterialCatalog {
    /// The coating materials listed in the crate docs plus crown glass.
    pub fn standard() -> Self {
        Self::from_entries(STANDARD.iter().copied())
            .expect("standard catalogue entries are valid and unique")
    }

    /// Build a catalogue, keeping entry order.
    ///
    /// Identifiers and display names must be unique (case-insensitive).
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = MaterialEntry<'a>>,
    ) -> Result<Self, MaterialError> {
        let mut materials: Vec<Material> = Vec::new();
        for (id, display_name, n, role) in entries {
            let taken = materials
                .iter()
                .any(|m| matches_name(m, id) || matches_name(m, display_name));
            if taken {
                return Err(MaterialError::DuplicateName(id.to_string()));
            }
            let medium = OpticalMedium::new(n).map_err(|source| MaterialError::InvalidIndex {
                name: id.to_string(),
                source,
            })?;
            materials.push(Material {
                id: id.to_string(),
                display_name: display_name.to_string(),
                medium,
                role,
            });
        }
        Ok(Self { materials })
    }

    /// Look up by identifier or display name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&Material, MaterialError> {
        let name = name.trim();
        self.materials
            .iter()
            .find(|m| matches_name(m, name))
            .ok_or_else(|| MaterialError::NotFound(name.to_string()))
    }

    /// Refractive index for `name`.
    pub fn index_of(&self, name: &str) -> Result<OpticalMedium, MaterialError> {
        self.get(name).map(|m| m.medium)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Coating materials in catalogue order.
    pub fn coatings(&self) -> impl Iterator<Item = &Material> {
        self.materials
            .iter()
            .filter(|m| m.role == MaterialRole::Coating)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Comma-separated identifiers, for error messages.
    pub fn identifiers(&self) -> String {
        self.materials
            .iter()
            .map(|m| m.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn matches_name(material: &Material, name: &str) -> bool {
    material.id.eq_ignore_ascii_case(name)
        || material.display_name.to_lowercase() == name.to_lowercase()
}
