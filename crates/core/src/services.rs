//! Collaborator abstractions supplied by the host platform.
//!
//! The generator holds each of these as an `Arc<dyn Trait>` and issues at most one call to
//! each per operation. Implementations are expected to do their own synchronisation.

use crate::error::ConfigurationResult;
use crate::model::{IdentifierSource, Location, PatientIdentifierType};
use registration_types::{IdentifierSourceId, IdentifierTypeId, LocationId};

/// Key/value store of global properties.
pub trait GlobalPropertyStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` if the property is not set.
    fn get_global_property(&self, key: &str) -> Option<String>;
}

/// Directory of facility locations.
pub trait LocationDirectory: Send + Sync {
    fn get_default_location(&self) -> Option<Location>;

    fn get_location(&self, id: LocationId) -> Option<Location>;
}

/// Registry of patient identifier types.
pub trait PatientIdentifierTypeRegistry: Send + Sync {
    fn get_patient_identifier_type(&self, id: IdentifierTypeId) -> Option<PatientIdentifierType>;
}

/// Identifier sources and the generation algorithm behind them.
pub trait IdentifierSourceService: Send + Sync {
    fn get_identifier_source(&self, id: IdentifierSourceId) -> Option<IdentifierSource>;

    /// Produces the next identifier from `source`.
    ///
    /// `comment` is free text the platform records alongside the generation event.
    fn generate_identifier(
        &self,
        source: &IdentifierSource,
        comment: Option<&str>,
    ) -> ConfigurationResult<String>;
}
