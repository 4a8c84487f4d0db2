use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use registration_core::constants::DEFAULT_REGISTRY_FILENAME;
use registration_core::{
    IdentifierSourceId, IdentifierTypeId, Location, LocationDirectory, LocationId,
    PatientIdentifier, Registry, RegistrationConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter used when `RUST_LOG` is unset or blank.
const DEFAULT_LOG_FILTER: &str = "regcore=info,registration_core=info";

#[derive(Parser)]
#[command(name = "regcore")]
#[command(about = "Patient identifier resolution for registration")]
struct Cli {
    /// Registry file with properties, locations, identifier types and sources
    #[arg(long, global = true, env = "REGCORE_REGISTRY", default_value = DEFAULT_REGISTRY_FILENAME)]
    registry: PathBuf,

    /// Print identifiers as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default identifier source id, or the one registered under a name
    SourceId {
        /// Identifier source name (e.g. ECID)
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate a new identifier from an identifier source
    Generate {
        /// Identifier source id
        #[arg(long)]
        source_id: i32,
        /// Location id (defaults to the registry's default location)
        #[arg(long)]
        location: Option<i32>,
    },
    /// Wrap an externally supplied identifier value
    Create {
        /// Patient identifier type id
        #[arg(long)]
        type_id: i32,
        /// Identifier value, used verbatim
        #[arg(long)]
        value: String,
        /// Location id (defaults to the registry's default location)
        #[arg(long)]
        location: Option<i32>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok())?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'regcore --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(RegistrationConfig::from_env()?);
    let registry = Registry::load(&cli.registry)
        .with_context(|| format!("loading registry {}", cli.registry.display()))?;
    let generator = registry.generator(cfg);

    match command {
        Commands::SourceId { name } => {
            let id = match name.as_deref() {
                Some(name) => generator.identifier_source_id_by_name(name)?,
                None => generator.default_identifier_source_id()?,
            };
            println!("{id}");
        }
        Commands::Generate {
            source_id,
            location,
        } => {
            let location = lookup_location(registry.locations.as_ref(), location)?;
            let identifier = generator
                .generate_identifier(IdentifierSourceId::new(source_id), location.as_ref())?;
            print_identifier(&identifier, cli.json)?;
        }
        Commands::Create {
            type_id,
            value,
            location,
        } => {
            let location = lookup_location(registry.locations.as_ref(), location)?;
            let identifier = generator.create_identifier(
                IdentifierTypeId::new(type_id),
                &value,
                location.as_ref(),
            )?;
            print_identifier(&identifier, cli.json)?;
        }
    }

    Ok(())
}

/// Builds the log filter; an explicit `RUST_LOG` replaces the defaults entirely.
fn log_filter(rust_log: Option<String>) -> anyhow::Result<EnvFilter> {
    match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid RUST_LOG '{directives}'")),
        None => Ok(EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

/// Resolves a `--location` argument; an unknown id is a usage error.
fn lookup_location(
    directory: &dyn LocationDirectory,
    id: Option<i32>,
) -> anyhow::Result<Option<Location>> {
    id.map(|id| {
        directory
            .get_location(LocationId::new(id))
            .ok_or_else(|| anyhow!("location {id} is not in the registry"))
    })
    .transpose()
}

fn print_identifier(identifier: &PatientIdentifier, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(identifier)?);
    } else {
        println!("{}", render_identifier(identifier));
    }
    Ok(())
}

fn render_identifier(identifier: &PatientIdentifier) -> String {
    format!(
        "Identifier: {}, Type: {} ({}), Location: {} ({})",
        identifier.identifier(),
        identifier.identifier_type().name,
        identifier.identifier_type().id,
        identifier.location().name,
        identifier.location().id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use registration_core::memory::InMemoryLocationDirectory;
    use registration_core::{NonEmptyText, PatientIdentifierType};

    fn clinic() -> Location {
        Location::new(LocationId::new(7), NonEmptyText::new("Outpatient Clinic").unwrap())
    }

    #[test]
    fn log_filter_keeps_rust_log_directives() {
        let filter = log_filter(Some("registration_core=debug".into())).unwrap();
        let filter = filter.to_string();
        assert!(filter.contains("registration_core=debug"), "got {filter}");
        assert!(!filter.contains("registration_core=info"), "got {filter}");
    }

    #[test]
    fn log_filter_defaults_when_rust_log_unset_or_blank() {
        for rust_log in [None, Some("  ".to_string())] {
            let filter = log_filter(rust_log).unwrap().to_string();
            assert!(filter.contains("regcore=info"), "got {filter}");
            assert!(filter.contains("registration_core=info"), "got {filter}");
        }
    }

    #[test]
    fn lookup_location_passes_through_absent_argument() {
        let directory = InMemoryLocationDirectory::default();
        assert!(lookup_location(&directory, None).unwrap().is_none());
    }

    #[test]
    fn lookup_location_rejects_unknown_id() {
        let clinic = clinic();
        let directory = InMemoryLocationDirectory::new(vec![clinic.clone()], None);

        assert_eq!(lookup_location(&directory, Some(7)).unwrap(), Some(clinic));
        assert!(lookup_location(&directory, Some(8)).is_err());
    }

    #[test]
    fn render_identifier_names_type_and_location() {
        let identifier = PatientIdentifier::new(
            "10012NF".into(),
            PatientIdentifierType::new(
                IdentifierTypeId::new(3),
                NonEmptyText::new("OpenMRS ID").unwrap(),
            ),
            clinic(),
        );

        assert_eq!(
            render_identifier(&identifier),
            "Identifier: 10012NF, Type: OpenMRS ID (3), Location: Outpatient Clinic (7)"
        );
    }
}
