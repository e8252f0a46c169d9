//! Command contracts: option declaration, validation and fault mapping.
//!
//! This crate defines the base every command of a CLI framework builds on:
//!
//! - [`OptionDescriptor`] — declared identity of one accepted option. Shared
//!   descriptors such as [`option::resource_group`] are singletons compared
//!   by identity.
//! - [`CommandContract`] — the ordered option set of a command plus its
//!   resource-group requirements.
//! - [`validate_invocation`] — checks a [`ParseResult`] before execution and
//!   writes status 400 into the [`Response`] on failure.
//! - [`Command`] — async execution with overridable fault-mapping hooks;
//!   [`run_command`] drives validate → execute → fault mapping.
//!
//! Parsing raw tokens is left to whatever argument parser the caller uses.
//!
//! # Example
//!
//! ```
//! use command_contract_core::*;
//!
//! let name = OptionDescriptor::new("name").required().into_ref();
//! let mut contract = CommandContract::new("show", "Show a storage account");
//! contract.add_option(name.clone());
//! contract.require_resource_group();
//!
//! let parsed = ParsedInvocation::for_options(contract.options())
//!     .with(&name, "acct");
//! let outcome = contract.validate(&parsed, None);
//! assert_eq!(
//!     outcome.error_message().as_deref(),
//!     Some("Missing Required options: --resource-group")
//! );
//!
//! let parsed = parsed.with(option::resource_group(), "rg");
//! assert!(contract.validate(&parsed, None).is_valid());
//! ```

mod activity;
mod command;
mod contract;
mod fault;
pub mod option;
mod parse;
mod response;
mod validate;

pub use activity::{
    Activity, ActivityStatus, ERROR_DETAILS_TAG, NoopActivity, RecordingActivity, TracingActivity,
};
pub use command::{Command, CommandContext, run_command};
pub use contract::CommandContract;
pub use fault::{BuildMode, Fault, MessageFault, TROUBLESHOOTING_URL, troubleshooting_guidance};
pub use option::{OptionDescriptor, OptionId, OptionRef};
pub use parse::{OptionResult, ParseResult, ParsedInvocation};
pub use response::{
    ExceptionResult, INTERNAL_ERROR_STATUS, Response, SUCCESS_STATUS, VALIDATION_ERROR_STATUS,
};
pub use validate::{
    MISSING_REQUIRED_PREFIX, ValidationError, ValidationOutcome, validate_invocation,
};
