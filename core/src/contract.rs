//! The option set and resource-group requirements of one command.

use crate::option::{self, OptionRef};
use crate::parse::ParseResult;
use crate::response::Response;
use crate::validate::{ValidationOutcome, validate_invocation};

/// Declared configuration of a command.
///
/// Built once when the command is constructed and read-only afterwards, so a
/// single contract can back any number of concurrent invocations.
///
/// # Examples
///
/// ```
/// use command_contract_core::{CommandContract, OptionDescriptor};
///
/// let mut contract = CommandContract::new("list", "List storage accounts");
/// contract.add_option(OptionDescriptor::new("filter").into_ref());
/// contract.use_resource_group();
/// contract.use_resource_group();
///
/// assert!(contract.uses_resource_group());
/// assert!(!contract.requires_resource_group());
/// assert_eq!(contract.options().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CommandContract {
    name: String,
    description: String,
    options: Vec<OptionRef>,
    uses_resource_group: bool,
    requires_resource_group: bool,
}

impl CommandContract {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            uses_resource_group: false,
            requires_resource_group: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared options in registration order.
    pub fn options(&self) -> &[OptionRef] {
        &self.options
    }

    pub fn uses_resource_group(&self) -> bool {
        self.uses_resource_group
    }

    pub fn requires_resource_group(&self) -> bool {
        self.requires_resource_group
    }

    /// Registers `option` unless the same descriptor is already declared.
    ///
    /// Returns `false` when it was already present.
    pub fn add_option(&mut self, option: OptionRef) -> bool {
        if self.declares(&option) {
            return false;
        }
        self.options.push(option);
        true
    }

    /// Builder form of [`add_option`](Self::add_option).
    pub fn with_option(mut self, option: OptionRef) -> Self {
        self.add_option(option);
        self
    }

    /// Returns `true` if this exact descriptor is declared.
    pub fn declares(&self, option: &OptionRef) -> bool {
        self.options.iter().any(|declared| declared.same_as(option))
    }

    /// Accepts `--resource-group`. Calling it again has no effect.
    pub fn use_resource_group(&mut self) {
        self.add_option(option::resource_group().clone());
        self.uses_resource_group = true;
    }

    /// Accepts `--resource-group` and requires it to be bound.
    pub fn require_resource_group(&mut self) {
        self.use_resource_group();
        self.requires_resource_group = true;
    }

    /// See [`validate_invocation`].
    pub fn validate(
        &self,
        parse_result: &dyn ParseResult,
        response: Option<&mut Response>,
    ) -> ValidationOutcome {
        validate_invocation(self, parse_result, response)
    }
}
