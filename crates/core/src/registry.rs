//! YAML registry file describing properties and identifier metadata.
//!
//! A registry file seeds the in-memory collaborators so the generator can run outside the host
//! platform:
//!
//! ```text
//! properties:
//!   registrationcore.identifierSourceId: "1"
//!   registrationcore.identifierSourceId.ECID: "2"
//! default_location: 1
//! locations:
//!   - id: 1
//!     name: Unknown Location
//! identifier_types:
//!   - id: 3
//!     name: OpenMRS ID
//! identifier_sources:
//!   - id: 1
//!     name: OpenMRS ID Generator
//!     identifier_type: 3
//!     prefix: "100"
//!     suffix: NF
//!     first_value: 12
//! ```
//!
//! Parsing is strict: unknown keys are rejected and the error names the offending path.
//! Ids must be unique per kind and every reference must resolve.

use crate::config::RegistrationConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::generator::IdentifierGenerator;
use crate::memory::{
    InMemoryIdentifierTypeRegistry, InMemoryLocationDirectory, InMemoryPropertyStore,
    SequenceFormat, SequentialIdentifierSourceService,
};
use crate::model::{IdentifierSource, Location, PatientIdentifierType};
use registration_types::{IdentifierSourceId, IdentifierTypeId, LocationId, NonEmptyText};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryWire {
    #[serde(default)]
    properties: HashMap<String, String>,
    #[serde(default)]
    default_location: Option<LocationId>,
    #[serde(default)]
    locations: Vec<LocationWire>,
    #[serde(default)]
    identifier_types: Vec<IdentifierTypeWire>,
    #[serde(default)]
    identifier_sources: Vec<IdentifierSourceWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationWire {
    id: LocationId,
    name: NonEmptyText,
    #[serde(default)]
    uuid: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IdentifierTypeWire {
    id: IdentifierTypeId,
    name: NonEmptyText,
    #[serde(default)]
    uuid: Option<Uuid>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IdentifierSourceWire {
    id: IdentifierSourceId,
    name: NonEmptyText,
    identifier_type: IdentifierTypeId,
    #[serde(default)]
    uuid: Option<Uuid>,
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    suffix: String,
    #[serde(default = "default_first_value")]
    first_value: u64,
    #[serde(default)]
    min_length: usize,
}

fn default_first_value() -> u64 {
    1
}

/// The four in-memory collaborators built from a registry file.
#[derive(Clone, Debug)]
pub struct Registry {
    pub properties: Arc<InMemoryPropertyStore>,
    pub locations: Arc<InMemoryLocationDirectory>,
    pub identifier_types: Arc<InMemoryIdentifierTypeRegistry>,
    pub sources: Arc<SequentialIdentifierSourceService>,
}

impl Registry {
    /// Parse a registry from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::YamlDeserialization`] for malformed YAML or unknown keys, and
    /// an integrity variant for duplicate ids or dangling references.
    pub fn parse(input: &str) -> RegistryResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(input);
        let wire: RegistryWire = serde_path_to_error::deserialize(deserializer)?;
        Self::from_wire(wire)
    }

    /// Read and parse a registry file.
    pub fn load(path: &Path) -> RegistryResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(RegistryError::FileRead)?;
        let registry = Self::parse(&contents)?;
        tracing::info!(path = %path.display(), "loaded identifier registry");
        Ok(registry)
    }

    /// Build an [`IdentifierGenerator`] over this registry's collaborators.
    pub fn generator(&self, cfg: Arc<RegistrationConfig>) -> IdentifierGenerator {
        IdentifierGenerator::new(
            cfg,
            self.properties.clone(),
            self.locations.clone(),
            self.sources.clone(),
            self.identifier_types.clone(),
        )
    }

    fn from_wire(wire: RegistryWire) -> RegistryResult<Self> {
        check_unique("location", wire.locations.iter().map(|l| l.id.get()))?;
        check_unique("identifier type", wire.identifier_types.iter().map(|t| t.id.get()))?;
        check_unique(
            "identifier source",
            wire.identifier_sources.iter().map(|s| s.id.get()),
        )?;

        let locations: Vec<Location> = wire
            .locations
            .into_iter()
            .map(|l| Location {
                id: l.id,
                uuid: l.uuid.unwrap_or_else(Uuid::new_v4),
                name: l.name,
            })
            .collect();

        if let Some(default_id) = wire.default_location {
            if !locations.iter().any(|l| l.id == default_id) {
                return Err(RegistryError::DanglingDefaultLocation(default_id));
            }
        }

        let types: HashMap<IdentifierTypeId, PatientIdentifierType> = wire
            .identifier_types
            .into_iter()
            .map(|t| {
                (
                    t.id,
                    PatientIdentifierType {
                        id: t.id,
                        uuid: t.uuid.unwrap_or_else(Uuid::new_v4),
                        name: t.name,
                        description: t.description,
                    },
                )
            })
            .collect();

        let mut sources = Vec::with_capacity(wire.identifier_sources.len());
        for s in wire.identifier_sources {
            let identifier_type = types.get(&s.identifier_type).cloned().ok_or(
                RegistryError::DanglingIdentifierType {
                    source_id: s.id,
                    type_id: s.identifier_type,
                },
            )?;

            sources.push((
                IdentifierSource {
                    id: s.id,
                    uuid: s.uuid.unwrap_or_else(Uuid::new_v4),
                    name: s.name,
                    identifier_type,
                },
                SequenceFormat {
                    prefix: s.prefix,
                    suffix: s.suffix,
                    first_value: s.first_value,
                    min_length: s.min_length,
                },
            ));
        }

        Ok(Self {
            properties: Arc::new(InMemoryPropertyStore::new(wire.properties)),
            locations: Arc::new(InMemoryLocationDirectory::new(
                locations,
                wire.default_location,
            )),
            identifier_types: Arc::new(InMemoryIdentifierTypeRegistry::new(
                types.into_values().collect(),
            )),
            sources: Arc::new(SequentialIdentifierSourceService::new(sources)),
        })
    }
}

fn check_unique(kind: &'static str, ids: impl Iterator<Item = i32>) -> RegistryResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RegistryError::DuplicateId { kind, id });
        }
    }
    Ok(())
}
