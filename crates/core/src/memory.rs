//! In-memory implementations of the host platform collaborators.
//!
//! These back the `regcore` CLI and the registry-file tests. The sequential source is a plain
//! counter with optional prefix, suffix and zero padding; it does not compute check digits.

use crate::error::{ConfigurationError, ConfigurationResult};
use crate::model::{IdentifierSource, Location, PatientIdentifierType};
use crate::services::{
    GlobalPropertyStore, IdentifierSourceService, LocationDirectory,
    PatientIdentifierTypeRegistry,
};
use registration_types::{IdentifierSourceId, IdentifierTypeId, LocationId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Clone, Debug, Default)]
pub struct InMemoryPropertyStore {
    properties: HashMap<String, String>,
}

impl InMemoryPropertyStore {
    pub fn new(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }
}

impl GlobalPropertyStore for InMemoryPropertyStore {
    fn get_global_property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryLocationDirectory {
    locations: HashMap<LocationId, Location>,
    default_location: Option<LocationId>,
}

impl InMemoryLocationDirectory {
    pub fn new(locations: Vec<Location>, default_location: Option<LocationId>) -> Self {
        Self {
            locations: locations.into_iter().map(|l| (l.id, l)).collect(),
            default_location,
        }
    }
}

impl LocationDirectory for InMemoryLocationDirectory {
    /// A default id that names no known location is reported as no default.
    fn get_default_location(&self) -> Option<Location> {
        self.default_location
            .and_then(|id| self.locations.get(&id))
            .cloned()
    }

    fn get_location(&self, id: LocationId) -> Option<Location> {
        self.locations.get(&id).cloned()
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryIdentifierTypeRegistry {
    types: HashMap<IdentifierTypeId, PatientIdentifierType>,
}

impl InMemoryIdentifierTypeRegistry {
    pub fn new(types: Vec<PatientIdentifierType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id, t)).collect(),
        }
    }
}

impl PatientIdentifierTypeRegistry for InMemoryIdentifierTypeRegistry {
    fn get_patient_identifier_type(&self, id: IdentifierTypeId) -> Option<PatientIdentifierType> {
        self.types.get(&id).cloned()
    }
}

/// Formatting rules and counter state for one sequential source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceFormat {
    pub prefix: String,
    pub suffix: String,
    pub first_value: u64,
    pub min_length: usize,
}

impl Default for SequenceFormat {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            first_value: 1,
            min_length: 0,
        }
    }
}

#[derive(Debug)]
struct Sequence {
    source: IdentifierSource,
    format: SequenceFormat,
    /// `None` once the counter has issued `u64::MAX`.
    next_value: Option<u64>,
}

/// Identifier sources backed by in-process counters.
#[derive(Debug, Default)]
pub struct SequentialIdentifierSourceService {
    sequences: Mutex<HashMap<IdentifierSourceId, Sequence>>,
}

impl SequentialIdentifierSourceService {
    pub fn new(sources: Vec<(IdentifierSource, SequenceFormat)>) -> Self {
        let sequences = sources
            .into_iter()
            .map(|(source, format)| {
                let next_value = Some(format.first_value);
                (
                    source.id,
                    Sequence {
                        source,
                        format,
                        next_value,
                    },
                )
            })
            .collect();

        Self {
            sequences: Mutex::new(sequences),
        }
    }
}

impl IdentifierSourceService for SequentialIdentifierSourceService {
    fn get_identifier_source(&self, id: IdentifierSourceId) -> Option<IdentifierSource> {
        // Lookups only read immutable source metadata, so a poisoned lock is still usable.
        let sequences = self
            .sequences
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        sequences.get(&id).map(|s| s.source.clone())
    }

    fn generate_identifier(
        &self,
        source: &IdentifierSource,
        comment: Option<&str>,
    ) -> ConfigurationResult<String> {
        let mut sequences = self
            .sequences
            .lock()
            .map_err(|_| ConfigurationError::Generation {
                source_id: source.id,
                reason: "sequence lock poisoned".into(),
            })?;

        let sequence = sequences
            .get_mut(&source.id)
            .ok_or(ConfigurationError::UnknownIdentifierSource(source.id))?;

        let value = sequence
            .next_value
            .ok_or_else(|| ConfigurationError::Generation {
                source_id: source.id,
                reason: "sequence exhausted".into(),
            })?;
        sequence.next_value = value.checked_add(1);

        let format = &sequence.format;
        let identifier = format!(
            "{}{:0width$}{}",
            format.prefix,
            value,
            format.suffix,
            width = format.min_length
        );

        tracing::debug!(
            source_id = %source.id,
            identifier = %identifier,
            comment = comment.unwrap_or_default(),
            "allocated identifier from sequence"
        );

        Ok(identifier)
    }
}
