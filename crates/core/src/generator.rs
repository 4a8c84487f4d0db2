//! Patient identifier resolution and generation.
//!
//! [`IdentifierGenerator`] is the glue used by the registration workflow to:
//!
//! - resolve which identifier source to use from global properties,
//! - generate a new identifier from a source,
//! - wrap an externally supplied identifier value (for example an MPI id) in a record.
//!
//! ## Location fallback
//!
//! Both record-producing operations accept an optional location. When it is `None`, the
//! directory's default location is used; when it is `Some`, the directory is never consulted.
//!
//! ## Pure orchestration
//!
//! The generator owns no mutable state. Any missing dependency aborts the call with a
//! [`ConfigurationError`] before further collaborators are queried.

use crate::config::RegistrationConfig;
use crate::error::{ConfigurationError, ConfigurationResult};
use crate::model::{Location, PatientIdentifier};
use crate::services::{
    GlobalPropertyStore, IdentifierSourceService, LocationDirectory,
    PatientIdentifierTypeRegistry,
};
use registration_types::{IdentifierSourceId, IdentifierTypeId};
use std::sync::Arc;

/// Resolves identifier sources and assembles patient identifiers.
#[derive(Clone)]
pub struct IdentifierGenerator {
    cfg: Arc<RegistrationConfig>,
    properties: Arc<dyn GlobalPropertyStore>,
    locations: Arc<dyn LocationDirectory>,
    sources: Arc<dyn IdentifierSourceService>,
    identifier_types: Arc<dyn PatientIdentifierTypeRegistry>,
}

impl IdentifierGenerator {
    /// Creates a generator over the given collaborators.
    ///
    /// # Arguments
    ///
    /// * `cfg` - Property key names, resolved at startup
    /// * `properties` - Global property store
    /// * `locations` - Location directory used for the default location
    /// * `sources` - Identifier sources and the generation algorithm
    /// * `identifier_types` - Registry used by [`Self::create_identifier`]
    pub fn new(
        cfg: Arc<RegistrationConfig>,
        properties: Arc<dyn GlobalPropertyStore>,
        locations: Arc<dyn LocationDirectory>,
        sources: Arc<dyn IdentifierSourceService>,
        identifier_types: Arc<dyn PatientIdentifierTypeRegistry>,
    ) -> Self {
        Self {
            cfg,
            properties,
            locations,
            sources,
            identifier_types,
        }
    }

    /// Returns the id of the default identifier source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingProperty`] if the property is not set, or
    /// [`ConfigurationError::InvalidProperty`] if it is not a base-10 integer.
    pub fn default_identifier_source_id(&self) -> ConfigurationResult<IdentifierSourceId> {
        self.source_id_from_property(self.cfg.default_source_key())
    }

    /// Returns the id of the identifier source registered under `name`.
    ///
    /// The property key is the configured prefix followed by `name`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::default_identifier_source_id`].
    pub fn identifier_source_id_by_name(
        &self,
        name: &str,
    ) -> ConfigurationResult<IdentifierSourceId> {
        self.source_id_from_property(&self.cfg.source_key_for(name))
    }

    /// Generates a new identifier from source `source_id`.
    ///
    /// The returned identifier carries the source's identifier type and either `location` or,
    /// when `None`, the default location.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if:
    /// - `location` is `None` and no default location is configured,
    /// - no identifier source with `source_id` exists,
    /// - the source fails to generate a value.
    pub fn generate_identifier(
        &self,
        source_id: IdentifierSourceId,
        location: Option<&Location>,
    ) -> ConfigurationResult<PatientIdentifier> {
        let location = self.resolve_location(location)?;

        let Some(source) = self.sources.get_identifier_source(source_id) else {
            tracing::warn!(%source_id, "identifier source does not exist");
            return Err(ConfigurationError::UnknownIdentifierSource(source_id));
        };

        let identifier = self
            .sources
            .generate_identifier(&source, None)
            .map_err(|e| {
                tracing::warn!(%source_id, error = %e, "identifier generation failed");
                e
            })?;
        tracing::debug!(
            %source_id,
            source = %source.name,
            location = %location.name,
            "generated patient identifier"
        );

        Ok(PatientIdentifier::new(
            identifier,
            source.identifier_type,
            location,
        ))
    }

    /// Wraps an externally supplied identifier `value` of type `type_id`.
    ///
    /// `value` is used verbatim. Location handling matches [`Self::generate_identifier`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if:
    /// - `location` is `None` and no default location is configured,
    /// - no identifier type with `type_id` exists.
    pub fn create_identifier(
        &self,
        type_id: IdentifierTypeId,
        value: &str,
        location: Option<&Location>,
    ) -> ConfigurationResult<PatientIdentifier> {
        let location = self.resolve_location(location)?;

        let Some(identifier_type) = self.identifier_types.get_patient_identifier_type(type_id)
        else {
            tracing::warn!(%type_id, "patient identifier type does not exist");
            return Err(ConfigurationError::UnknownIdentifierType(type_id));
        };

        tracing::debug!(
            %type_id,
            location = %location.name,
            "created patient identifier from supplied value"
        );

        Ok(PatientIdentifier::new(
            value.to_string(),
            identifier_type,
            location,
        ))
    }

    fn resolve_location(&self, location: Option<&Location>) -> ConfigurationResult<Location> {
        if let Some(location) = location {
            return Ok(location.clone());
        }

        match self.locations.get_default_location() {
            Some(default) => Ok(default),
            None => {
                tracing::warn!("no default location is configured");
                Err(ConfigurationError::MissingDefaultLocation)
            }
        }
    }

    fn source_id_from_property(&self, key: &str) -> ConfigurationResult<IdentifierSourceId> {
        let Some(value) = self.properties.get_global_property(key) else {
            tracing::warn!(key, "identifier source property is not set");
            return Err(ConfigurationError::MissingProperty {
                key: key.to_string(),
            });
        };

        match value.parse::<IdentifierSourceId>() {
            Ok(id) => {
                tracing::debug!(key, %id, "resolved identifier source id");
                Ok(id)
            }
            Err(source) => {
                tracing::warn!(key, value = %value, "identifier source property is not numeric");
                Err(ConfigurationError::InvalidProperty {
                    key: key.to_string(),
                    value,
                    source,
                })
            }
        }
    }
}
