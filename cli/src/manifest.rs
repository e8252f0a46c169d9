//! YAML command manifest.
//!
//! Declares the commands `contract-run` knows about and how each one's
//! contract is built.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! commands:
//!   - name: account-show
//!     description: Show a storage account
//!     resource_group: required
//!     shared_options: [subscription]
//!     options:
//!       - name: account
//!         description: Storage account name
//!         required: true
//!   - name: account-delete
//!     description: Always fails
//!     fault:
//!       kind: not_found
//!       message: account does not exist
//! ```

use std::collections::HashSet;
use std::path::Path;

use command_contract_core::option::{self, RESOURCE_GROUP_OPTION, SUBSCRIPTION_OPTION};
use command_contract_core::{CommandContract, OptionDescriptor, OptionRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

/// How a command treats `--resource-group`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceGroupUsage {
    #[default]
    None,
    Optional,
    Required,
}

/// Kind of a scripted fault, mapped to a status by the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    InvalidInput,
    NotFound,
    Internal,
}

/// Fault a manifest command raises instead of succeeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultSpec {
    pub kind: FaultKind,
    pub message: String,
}

/// One declared option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// One declared command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Names of shared descriptors to register (`subscription`).
    #[serde(default)]
    pub shared_options: Vec<String>,
    #[serde(default)]
    pub resource_group: ResourceGroupUsage,
    #[serde(default)]
    pub fault: Option<FaultSpec>,
}

impl CommandSpec {
    /// Builds the command's contract: own options first, then shared ones,
    /// then the resource group.
    pub fn to_contract(&self) -> Result<CommandContract> {
        let mut contract = CommandContract::new(&self.name, &self.description);
        for spec in &self.options {
            let mut descriptor = OptionDescriptor::new(&spec.name);
            if let Some(description) = &spec.description {
                descriptor = descriptor.with_description(description);
            }
            if spec.required {
                descriptor = descriptor.required();
            }
            contract.add_option(descriptor.into_ref());
        }
        for name in &self.shared_options {
            contract.add_option(shared_option(name).ok_or_else(|| {
                CliError::InvalidManifest(format!(
                    "command '{}' references unknown shared option '{name}'",
                    self.name
                ))
            })?);
        }
        match self.resource_group {
            ResourceGroupUsage::None => {}
            ResourceGroupUsage::Optional => contract.use_resource_group(),
            ResourceGroupUsage::Required => contract.require_resource_group(),
        }
        Ok(contract)
    }
}

fn shared_option(name: &str) -> Option<OptionRef> {
    match name {
        SUBSCRIPTION_OPTION => Some(option::subscription().clone()),
        _ => None,
    }
}

/// Top-level manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandManifest {
    pub version: String,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

impl CommandManifest {
    /// Loads and validates a manifest from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::IoError`] if the file cannot be read,
    /// [`CliError::YamlError`] if parsing fails, or
    /// [`CliError::InvalidManifest`] if [`validate`](Self::validate) rejects it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let manifest = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), commands = manifest.commands.len(), "Loaded manifest");
        Ok(manifest)
    }

    /// Parses and validates a manifest from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Checks names and uniqueness. Stops at the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(invalid("manifest version cannot be empty"));
        }

        let mut seen_commands = HashSet::new();
        for command in &self.commands {
            let name = command.name.trim();
            if name.is_empty() {
                return Err(invalid("command name cannot be empty"));
            }
            if !seen_commands.insert(name) {
                return Err(invalid(format!("duplicate command: {name}")));
            }

            let mut seen_options = HashSet::new();
            for option in &command.options {
                validate_option_name(name, &option.name)?;
                if !seen_options.insert(option.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate option in command '{name}': {}",
                        option.name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }
}

fn validate_option_name(command: &str, option: &str) -> Result<()> {
    if option.trim().is_empty() {
        return Err(invalid(format!("empty option name in command '{command}'")));
    }
    if option.starts_with('-') {
        return Err(invalid(format!(
            "option '{option}' in command '{command}' must be declared without dashes"
        )));
    }
    if option.chars().any(char::is_whitespace) {
        return Err(invalid(format!(
            "option '{option}' in command '{command}' contains whitespace"
        )));
    }
    if matches!(option, RESOURCE_GROUP_OPTION | SUBSCRIPTION_OPTION | "help") {
        return Err(invalid(format!(
            "option '{option}' in command '{command}' is reserved"
        )));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> CliError {
    CliError::InvalidManifest(message.into())
}
