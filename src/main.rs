use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::Parser;
use orgmap::{
    InMemoryOrgDirectory, OrgMapConfig, OrgRole, OrgRoleMapper, config::ConfigError,
    observability,
};

/// Exit code when the decision denies the login.
const EXIT_DENIED: u8 = 2;

/// CLI arguments for the org role mapper
#[derive(Parser, Debug)]
#[command(version, about = "Map identity-provider groups to organization roles", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file
    #[arg(short, long, global = true, default_value = "orgmap.toml")]
    config: PathBuf,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Evaluate a connector's org mapping for one user and print the decision
    Map {
        /// Connector whose org mapping settings are used
        #[arg(long)]
        connector: String,
        /// External group or organization the user belongs to (repeatable)
        #[arg(short, long = "group")]
        groups: Vec<String>,
        /// Role taken directly from the identity provider's role claim
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Report every problem in a connector's org mapping settings
    Check {
        /// Connector whose org mapping settings are checked
        #[arg(long)]
        connector: String,
    },
    /// Export the JSON schema for the configuration file
    #[cfg(feature = "json-schema")]
    Schema,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Command::Map {
            connector,
            groups,
            role,
        } => load_config(&args.config)
            .and_then(|config| run_map(&config, &connector, &groups, role.as_deref())),
        Command::Check { connector } => {
            load_config(&args.config).and_then(|config| run_check(&config, &connector))
        }
        #[cfg(feature = "json-schema")]
        Command::Schema => return run_schema_export(),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    })
}

/// Load the config file and initialize logging from it.
fn load_config(path: &Path) -> Result<OrgMapConfig, ConfigError> {
    let config = OrgMapConfig::from_file(path)?;
    if let Err(e) = observability::init_tracing(&config.observability.logging) {
        eprintln!("Warning: {e}");
    }
    Ok(config)
}

fn build_mapper(config: &OrgMapConfig) -> OrgRoleMapper {
    let directory = InMemoryOrgDirectory::from_config(&config.organizations);
    OrgRoleMapper::new(Arc::new(directory), config.auto_assign.default_assignment())
}

fn run_map(
    config: &OrgMapConfig,
    connector: &str,
    groups: &[String],
    role: Option<&str>,
) -> Result<ExitCode, ConfigError> {
    let settings = config.connector(connector)?;
    let mapper = build_mapper(config);
    let mapping = mapper.parse_org_mapping_settings(settings.entries()?, settings.strict);

    let direct_role = role.and_then(|raw| {
        let parsed = OrgRole::parse_claim(raw);
        if parsed.is_none() {
            tracing::warn!(role = %raw, "Ignoring unrecognized role claim");
        }
        parsed
    });

    let decision = mapper.map_org_roles(&mapping, groups, direct_role);
    let json = serde_json::to_string_pretty(&decision)
        .map_err(|e| ConfigError::Validation(format!("Failed to serialize decision: {e}")))?;
    println!("{json}");

    Ok(if decision.is_deny() {
        ExitCode::from(EXIT_DENIED)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_check(config: &OrgMapConfig, connector: &str) -> Result<ExitCode, ConfigError> {
    let settings = config.connector(connector)?;
    let mapper = build_mapper(config);
    let problems = mapper.check_org_mapping_settings(settings.entries()?, settings.strict);

    if problems.is_empty() {
        println!("{connector}: org mapping OK");
        return Ok(ExitCode::SUCCESS);
    }

    for problem in &problems {
        println!("{connector}: {problem}");
    }
    if settings.strict {
        println!("{connector}: strict role mapping is enabled, so no org mapping will be applied");
    }
    Ok(ExitCode::FAILURE)
}

/// Export config JSON schema to stdout
#[cfg(feature = "json-schema")]
fn run_schema_export() -> ExitCode {
    match OrgMapConfig::json_schema_string() {
        Ok(content) => {
            println!("{content}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: Failed to serialize config schema: {e}");
            ExitCode::FAILURE
        }
    }
}
