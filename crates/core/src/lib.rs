//! # Registration Core
//!
//! Patient identifier resolution for the registration workflow.
//!
//! This crate resolves which identifier source to use from global properties, generates
//! identifiers through an injected identifier-source service, and assembles
//! [`PatientIdentifier`] records bound to a type and a location.
//!
//! **No platform concerns**: the property store, location directory, identifier-type registry
//! and generation algorithm are collaborator traits in [`services`]. The [`memory`] and
//! [`registry`] modules provide in-process implementations for the CLI and tests.

pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod memory;
pub mod model;
pub mod registry;
pub mod services;

pub use config::RegistrationConfig;
pub use error::{ConfigurationError, ConfigurationResult, RegistryError, RegistryResult};
pub use generator::IdentifierGenerator;
pub use model::{IdentifierSource, Location, PatientIdentifier, PatientIdentifierType};
pub use registry::Registry;
pub use services::{
    GlobalPropertyStore, IdentifierSourceService, LocationDirectory,
    PatientIdentifierTypeRegistry,
};

// Re-export shared value types so callers need only one dependency.
pub use registration_types::{
    IdentifierSourceId, IdentifierTypeId, LocationId, NonEmptyText, TextError,
};
