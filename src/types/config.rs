//! Configuration structures for the guarded facility
//!
//! This module contains the facility configuration, its command line and file
//! representations, and the validation logic applied before a run starts.

use super::{IdentityId, OutputFormat, RunMode};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Capacity constants
pub mod capacity {
    /// Reference capacity of the facility
    pub const DEFAULT: usize = 3;

    /// Smallest usable capacity: both guards plus one handover candidate
    pub const MINIMUM: usize = 3;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "guarded-facility",
    version = "0.1.0",
    about = "Guarded Facility - dual-authorization access control with guard shift changes",
    long_about = "Runs the dual-authorization access-control state machine of a capacity-limited facility guarded by exactly two guards. Staff enter and exit only after both guards approve; guards are replaced one seat at a time through a supervised shift change.

EXAMPLES:
    # Run the scripted full guard handover
    guarded-facility

    # Run a reproducible randomized drill with invariant checks
    guarded-facility --mode drill --steps 2000 --seed 42

    # Use a configuration file
    guarded-facility --config facility.json

    # Generate configuration template
    guarded-facility --print-config > facility.json

    # Validate configuration without running
    guarded-facility --config facility.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Facility capacity
    #[arg(
        long,
        help = "Maximum number of people inside",
        long_help = "Maximum number of identities inside the facility, guards included. Must be at least 3. Default: 3"
    )]
    pub capacity: Option<usize>,

    /// First founding guard
    #[arg(long, help = "Identity of the first founding guard")]
    pub first_guard: Option<IdentityId>,

    /// Second founding guard
    #[arg(long, help = "Identity of the second founding guard")]
    pub second_guard: Option<IdentityId>,

    /// Number of staff identities used by runs
    #[arg(
        long,
        help = "Number of staff identities",
        long_help = "Number of ordinary staff identities available to the drill. Must be at least 2. Default: 6"
    )]
    pub staff_count: Option<usize>,

    /// Number of drill steps
    #[arg(long, help = "Number of randomized drill steps")]
    pub steps: Option<usize>,

    /// Random seed for reproducible drills
    #[arg(long, help = "Random seed for reproducible drills")]
    pub seed: Option<u64>,

    /// Output format for the audit report
    #[arg(
        long,
        help = "Output format (text or json)",
        long_help = "Output format for the audit log report. Supported formats: text, json. Default: text"
    )]
    pub output_format: Option<String>,

    /// Output path for the audit log
    #[arg(long, help = "Write the audit log to this JSONL file")]
    pub audit_output: Option<String>,

    /// Run mode
    #[arg(long, help = "Run mode (handover or drill)")]
    pub mode: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running
    #[arg(long, help = "Validate configuration without running")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Facility capacity
    pub capacity: Option<usize>,

    /// The two founding guards
    pub founding_guards: Option<[IdentityId; 2]>,

    /// Number of staff identities
    pub staff_count: Option<usize>,

    /// Number of drill steps
    pub steps: Option<usize>,

    /// Random seed for reproducible drills
    pub seed: Option<u64>,

    /// Output format for the audit report
    pub output_format: Option<String>,

    /// Output path for the audit log
    pub audit_output: Option<String>,

    /// Run mode
    pub mode: Option<String>,
}

/// Configuration for a facility run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityConfig {
    /// Maximum number of identities inside, guards included
    pub capacity: usize,

    /// The two founding guards; generated when absent
    pub founding_guards: Option<[IdentityId; 2]>,

    /// Number of ordinary staff identities
    pub staff_count: usize,

    /// Number of randomized drill steps
    pub steps: usize,

    /// Random seed for reproducible drills
    pub seed: Option<u64>,

    /// Output format for the audit report
    pub output_format: String,

    /// Output path for the audit log (JSONL)
    pub audit_output: Option<String>,

    /// Run mode
    pub mode: String,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for facility configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Capacity cannot hold both guards and a handover candidate
    #[error("Capacity must be at least {minimum}, got {value}")]
    InvalidCapacity {
        /// The configured capacity
        value: usize,
        /// The smallest accepted capacity
        minimum: usize,
    },

    /// Both founding guards are the same identity
    #[error("Founding guards must be distinct, got {0} twice")]
    DuplicateFoundingGuards(IdentityId),

    /// Not enough staff for a full handover
    #[error("Staff count must be at least 2, got {0}")]
    InvalidStaffCount(usize),

    /// Drill length is invalid
    #[error("Steps count must be greater than 0, got {0}")]
    InvalidStepCount(usize),

    /// Output format is not recognized
    #[error("Unknown output format: {0}")]
    InvalidOutputFormat(String),

    /// Run mode is not recognized
    #[error("Unknown run mode: {0}")]
    InvalidRunMode(String),
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            capacity: capacity::DEFAULT,
            founding_guards: None,
            staff_count: 6,
            steps: 500,
            seed: None,
            output_format: "text".to_string(),
            audit_output: None,
            mode: "handover".to_string(),
        }
    }
}

impl FacilityConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            capacity: config_file.capacity.unwrap_or(defaults.capacity),
            founding_guards: config_file.founding_guards.or(defaults.founding_guards),
            staff_count: config_file.staff_count.unwrap_or(defaults.staff_count),
            steps: config_file.steps.unwrap_or(defaults.steps),
            seed: config_file.seed.or(defaults.seed),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            audit_output: config_file.audit_output.or(defaults.audit_output),
            mode: config_file.mode.unwrap_or(defaults.mode),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.capacity {
            config.capacity = value;
        }
        if let Some(value) = args.staff_count {
            config.staff_count = value;
        }
        if let Some(value) = args.steps {
            config.steps = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.audit_output {
            config.audit_output = Some(value);
        }
        if let Some(value) = args.mode {
            config.mode = value;
        }

        // A guard given on the command line replaces only its own seat
        match (args.first_guard, args.second_guard, config.founding_guards) {
            (None, None, _) => {}
            (Some(first), Some(second), _) => config.founding_guards = Some([first, second]),
            (Some(first), None, Some([_, second])) | (None, Some(second), Some([first, _])) => {
                config.founding_guards = Some([first, second]);
            }
            (Some(first), None, None) => config.founding_guards = Some([first, IdentityId::new()]),
            (None, Some(second), None) => config.founding_guards = Some([IdentityId::new(), second]),
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.capacity < capacity::MINIMUM {
            return Err(ConfigValidationError::InvalidCapacity {
                value: self.capacity,
                minimum: capacity::MINIMUM,
            });
        }

        if let Some([first, second]) = self.founding_guards {
            if first == second {
                return Err(ConfigValidationError::DuplicateFoundingGuards(first));
            }
        }

        if self.staff_count < 2 {
            return Err(ConfigValidationError::InvalidStaffCount(self.staff_count));
        }

        if self.steps == 0 {
            return Err(ConfigValidationError::InvalidStepCount(self.steps));
        }

        self.get_output_format()?;
        self.get_run_mode()?;

        Ok(())
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, ConfigValidationError> {
        self.output_format
            .parse()
            .map_err(|_| ConfigValidationError::InvalidOutputFormat(self.output_format.clone()))
    }

    /// Get the run mode as an enum value
    pub fn get_run_mode(&self) -> Result<RunMode, ConfigValidationError> {
        self.mode.parse().map_err(|_| ConfigValidationError::InvalidRunMode(self.mode.clone()))
    }

    /// The founding guards, generating fresh identities when none are configured
    pub fn resolve_founding_guards(&self) -> [IdentityId; 2] {
        self.founding_guards.unwrap_or_else(|| [IdentityId::new(), IdentityId::new()])
    }
}
