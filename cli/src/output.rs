//! Rendering of responses and contract descriptions.

use command_contract_core::{CommandContract, Response};
use serde::Serialize;

use crate::error::Result;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Serializable description of one declared option.
#[derive(Debug, Serialize)]
pub struct OptionView<'a> {
    pub flag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub required: bool,
    pub shared: bool,
}

/// Serializable description of a contract.
#[derive(Debug, Serialize)]
pub struct ContractView<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub uses_resource_group: bool,
    pub requires_resource_group: bool,
    pub options: Vec<OptionView<'a>>,
}

impl<'a> From<&'a CommandContract> for ContractView<'a> {
    fn from(contract: &'a CommandContract) -> Self {
        Self {
            name: contract.name(),
            description: contract.description(),
            uses_resource_group: contract.uses_resource_group(),
            requires_resource_group: contract.requires_resource_group(),
            options: contract
                .options()
                .iter()
                .map(|option| OptionView {
                    flag: option.flag(),
                    description: option.description(),
                    required: option.is_required(),
                    shared: option.is_shared(),
                })
                .collect(),
        }
    }
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Formats a response in the requested output format.
pub fn format_response(response: &Response, format: OutputFormat) -> Result<String> {
    render(response, format)
}

/// Formats a contract description in the requested output format.
pub fn format_contract(contract: &CommandContract, format: OutputFormat) -> Result<String> {
    render(&ContractView::from(contract), format)
}
