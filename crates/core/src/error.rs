use registration_types::{IdentifierSourceId, IdentifierTypeId, LocationId};
use std::num::ParseIntError;

/// Failure of an identifier resolution call.
///
/// Every variant is a configuration problem on the host platform: a property that is not set
/// or not numeric, metadata that does not exist, or a generator that cannot produce a value.
/// None of them are recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("global property '{key}' is not set")]
    MissingProperty { key: String },
    #[error("global property '{key}' has non-numeric value '{value}': {source}")]
    InvalidProperty {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("no default location is configured")]
    MissingDefaultLocation,
    #[error("identifier source {0} does not exist")]
    UnknownIdentifierSource(IdentifierSourceId),
    #[error("patient identifier type {0} does not exist")]
    UnknownIdentifierType(IdentifierTypeId),
    #[error("identifier source {source_id} failed to generate an identifier: {reason}")]
    Generation {
        source_id: IdentifierSourceId,
        reason: String,
    },
}

pub type ConfigurationResult<T> = std::result::Result<T, ConfigurationError>;

/// Failure while building configuration or loading a registry file.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read registry file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(#[from] serde_path_to_error::Error<serde_yaml::Error>),
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i32 },
    #[error("identifier source {source_id} references unknown identifier type {type_id}")]
    DanglingIdentifierType {
        source_id: IdentifierSourceId,
        type_id: IdentifierTypeId,
    },
    #[error("default location {0} is not a known location")]
    DanglingDefaultLocation(LocationId),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
