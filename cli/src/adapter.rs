//! Bridges clap and command contracts.
//!
//! Clap only tokenizes here. Required-ness is deliberately not passed on, so
//! missing options reach contract validation and come back as a 400 response
//! instead of a clap usage error.

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use command_contract_core::{CommandContract, ParsedInvocation};

use crate::error::Result;

/// Builds a clap command accepting every declared option as `--name <VALUE>`.
pub fn to_clap_command(contract: &CommandContract) -> clap::Command {
    let mut command = clap::Command::new(contract.name().to_string())
        .about(contract.description().to_string())
        .no_binary_name(true);

    for option in contract.options() {
        let mut arg = Arg::new(option.name().to_string())
            .long(option.name().to_string())
            .value_name("VALUE")
            .action(ArgAction::Append);
        if let Some(description) = option.description() {
            arg = arg.help(description.to_string());
        }
        command = command.arg(arg);
    }

    command
}

/// Maps matches back onto the contract's descriptors.
///
/// Only values typed on the command line count as bound.
pub fn to_parsed_invocation(contract: &CommandContract, matches: &ArgMatches) -> ParsedInvocation {
    let mut parsed = ParsedInvocation::for_options(contract.options());
    for option in contract.options() {
        if matches.value_source(option.name()) != Some(ValueSource::CommandLine) {
            continue;
        }
        let values: Vec<String> = matches
            .get_many::<String>(option.name())
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        parsed.bind_all(option, values);
    }
    parsed
}

/// Parses `args` (without a binary name) for `contract`.
pub fn parse_args<I, T>(contract: &CommandContract, args: I) -> Result<ParsedInvocation>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = to_clap_command(contract).try_get_matches_from(args)?;
    Ok(to_parsed_invocation(contract, &matches))
}

/// Returns `true` when clap stopped to show help or version text rather
/// than because the arguments were wrong.
pub fn is_display_request(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
