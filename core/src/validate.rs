//! Pre-execution validation of a parsed invocation.
//!
//! Validation never raises. It reports the first failure through a
//! [`ValidationOutcome`] and, when the caller hands over a [`Response`],
//! writes status 400 and the same message into it.
//!
//! # Examples
//!
//! ```
//! use command_contract_core::*;
//!
//! let mut contract = CommandContract::new("show", "Show an account");
//! contract.add_option(OptionDescriptor::new("name").required().into_ref());
//! contract.require_resource_group();
//!
//! let parsed = ParsedInvocation::for_options(contract.options());
//! let mut response = Response::default();
//! let outcome = contract.validate(&parsed, Some(&mut response));
//!
//! assert!(!outcome.is_valid());
//! assert_eq!(response.status, 400);
//! assert_eq!(response.message, "Missing Required options: --name");
//! ```

use thiserror::Error;
use tracing::debug;

use crate::contract::CommandContract;
use crate::option::{self, OptionRef};
use crate::parse::ParseResult;
use crate::response::{Response, VALIDATION_ERROR_STATUS};

/// Prefix shared by every validation message.
pub const MISSING_REQUIRED_PREFIX: &str = "Missing Required options: ";

/// Reason a parsed invocation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required options were not bound. Holds the flag forms in
    /// declaration order.
    #[error("{}{}", MISSING_REQUIRED_PREFIX, .0.join(", "))]
    MissingRequiredOptions(Vec<String>),
}

impl ValidationError {
    /// Flags reported as missing.
    pub fn missing_flags(&self) -> &[String] {
        match self {
            Self::MissingRequiredOptions(flags) => flags,
        }
    }
}

/// Outcome of validating one invocation. At most one error is ever held.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationOutcome {
    error: Option<ValidationError>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self { error: None }
    }

    pub fn invalid(error: ValidationError) -> Self {
        Self { error: Some(error) }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Human-readable message for a failed outcome.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Converts into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Validates `parse_result` against `contract`.
///
/// Required options are checked first; the resource-group requirement is
/// only looked at when all of them are bound.
pub fn validate_invocation(
    contract: &CommandContract,
    parse_result: &dyn ParseResult,
    response: Option<&mut Response>,
) -> ValidationOutcome {
    let missing = missing_required(contract.options(), parse_result);
    if !missing.is_empty() {
        return reject(contract, missing, response);
    }

    if contract.requires_resource_group() && !parse_result.is_bound(option::resource_group()) {
        return reject(contract, vec![option::resource_group().flag()], response);
    }

    ValidationOutcome::valid()
}

fn missing_required(declared: &[OptionRef], parse_result: &dyn ParseResult) -> Vec<String> {
    declared
        .iter()
        .filter(|option| option.is_required() && !parse_result.is_bound(option))
        .map(|option| option.flag())
        .collect()
}

fn reject(
    contract: &CommandContract,
    missing: Vec<String>,
    response: Option<&mut Response>,
) -> ValidationOutcome {
    let error = ValidationError::MissingRequiredOptions(missing);
    debug!(command = contract.name(), missing = ?error.missing_flags(), "Validation failed");
    if let Some(response) = response {
        response.fail(VALIDATION_ERROR_STATUS, error.to_string());
    }
    ValidationOutcome::invalid(error)
}
