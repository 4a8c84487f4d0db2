//! Constants used throughout the registration core crate.

/// Global property holding the id of the default identifier source.
pub const GP_IDENTIFIER_SOURCE_ID: &str = "registrationcore.identifierSourceId";

/// Prefix for global properties naming additional identifier sources.
///
/// The source named `ECID` is read from `registrationcore.identifierSourceId.ECID`.
pub const GP_IDENTIFIER_SOURCE_ID_PREFIX: &str = "registrationcore.identifierSourceId.";

/// Environment variable overriding [`GP_IDENTIFIER_SOURCE_ID`].
pub const DEFAULT_SOURCE_KEY_ENV: &str = "REGCORE_DEFAULT_SOURCE_KEY";

/// Environment variable overriding [`GP_IDENTIFIER_SOURCE_ID_PREFIX`].
pub const SOURCE_KEY_PREFIX_ENV: &str = "REGCORE_SOURCE_KEY_PREFIX";

/// Registry file used when none is configured.
pub const DEFAULT_REGISTRY_FILENAME: &str = "registry.yaml";
