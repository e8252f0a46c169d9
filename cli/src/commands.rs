//! Commands declared by a manifest.

use async_trait::async_trait;
use command_contract_core::{
    Command, CommandContext, CommandContract, Fault, INTERNAL_ERROR_STATUS, ParseResult, Response,
    VALIDATION_ERROR_STATUS,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::error::Result;
use crate::manifest::{CommandSpec, FaultKind, FaultSpec};

/// Status written for faults of kind `not_found`.
pub const NOT_FOUND_STATUS: u16 = 404;

/// Fault raised by a command whose manifest entry declares one.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ScriptedFault {
    pub kind: FaultKind,
    pub message: String,
}

impl From<&FaultSpec> for ScriptedFault {
    fn from(spec: &FaultSpec) -> Self {
        Self {
            kind: spec.kind,
            message: spec.message.clone(),
        }
    }
}

/// A command built from a manifest entry.
///
/// Succeeds by echoing the bound option values, keyed by option name, or
/// fails with the manifest's scripted fault.
#[derive(Debug)]
pub struct ManifestCommand {
    contract: CommandContract,
    fault: Option<FaultSpec>,
}

impl ManifestCommand {
    pub fn from_spec(spec: &CommandSpec) -> Result<Self> {
        Ok(Self {
            contract: spec.to_contract()?,
            fault: spec.fault.clone(),
        })
    }
}

#[async_trait]
impl Command for ManifestCommand {
    fn contract(&self) -> &CommandContract {
        &self.contract
    }

    async fn execute(
        &self,
        _context: &mut CommandContext,
        parse_result: &dyn ParseResult,
    ) -> std::result::Result<Response, Fault> {
        if let Some(fault) = &self.fault {
            return Err(ScriptedFault::from(fault).into());
        }

        let mut bound = Map::new();
        for result in parse_result.bound_options() {
            let value = match result.values() {
                [single] => Value::String(single.clone()),
                values => Value::from(values.to_vec()),
            };
            bound.insert(result.option().name().to_string(), value);
        }
        debug!(command = self.contract.name(), bound = bound.len(), "Echoing options");

        Ok(Response::ok(Value::Object(bound)))
    }

    fn status_code_for(&self, fault: &Fault) -> u16 {
        match fault.downcast_ref::<ScriptedFault>().map(|f| f.kind) {
            Some(FaultKind::InvalidInput) => VALIDATION_ERROR_STATUS,
            Some(FaultKind::NotFound) => NOT_FOUND_STATUS,
            Some(FaultKind::Internal) | None => INTERNAL_ERROR_STATUS,
        }
    }
}
