//! Identifier metadata and the identifier record handed back to callers.
//!
//! [`Location`], [`PatientIdentifierType`] and [`IdentifierSource`] are owned by the host
//! platform. The generator only reads them and clones them into the records it returns.

use registration_types::{IdentifierSourceId, IdentifierTypeId, LocationId, NonEmptyText};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A facility location at which identifiers are assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub uuid: Uuid,
    pub name: NonEmptyText,
}

impl Location {
    /// Creates a location with a freshly generated UUID.
    pub fn new(id: LocationId, name: NonEmptyText) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name,
        }
    }
}

/// Classification attached to a patient identifier (national id, MPI id, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIdentifierType {
    pub id: IdentifierTypeId,
    pub uuid: Uuid,
    pub name: NonEmptyText,
    pub description: Option<String>,
}

impl PatientIdentifierType {
    /// Creates an identifier type with a freshly generated UUID and no description.
    pub fn new(id: IdentifierTypeId, name: NonEmptyText) -> Self {
        Self {
            id,
            uuid: Uuid::new_v4(),
            name,
            description: None,
        }
    }
}

/// A configured generator producing identifiers of one type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierSource {
    pub id: IdentifierSourceId,
    pub uuid: Uuid,
    pub name: NonEmptyText,
    pub identifier_type: PatientIdentifierType,
}

/// An identifier value bound to its type and the location it was assigned at.
///
/// Built fresh by every generation or creation call; ownership passes to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIdentifier {
    identifier: String,
    identifier_type: PatientIdentifierType,
    location: Location,
}

impl PatientIdentifier {
    pub fn new(
        identifier: String,
        identifier_type: PatientIdentifierType,
        location: Location,
    ) -> Self {
        Self {
            identifier,
            identifier_type,
            location,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn identifier_type(&self) -> &PatientIdentifierType {
        &self.identifier_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}
