//! The command trait and the invocation sequence around it.
//!
//! A concrete command supplies its [`CommandContract`] and an async
//! [`execute`](Command::execute). Validation and fault mapping come from the
//! trait's default methods; commands customise fault presentation through
//! [`status_code_for`](Command::status_code_for) and
//! [`error_message_for`](Command::error_message_for) instead of replacing
//! [`handle_fault`](Command::handle_fault).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, debug, info_span, warn};

use crate::activity::{Activity, ActivityStatus, ERROR_DETAILS_TAG};
use crate::contract::CommandContract;
use crate::fault::{BuildMode, Fault, troubleshooting_guidance};
use crate::parse::ParseResult;
use crate::response::{INTERNAL_ERROR_STATUS, Response};
use crate::validate::ValidationOutcome;

/// Per-invocation state handed to a command.
///
/// Holds the response being built and the optional activity handle. One
/// context per invocation; never shared between concurrent calls.
pub struct CommandContext {
    pub response: Response,
    activity: Option<Arc<dyn Activity>>,
    build_mode: BuildMode,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandContext {
    pub fn new() -> Self {
        Self {
            response: Response::default(),
            activity: None,
            build_mode: BuildMode::CURRENT,
        }
    }

    pub fn with_activity(mut self, activity: Arc<dyn Activity>) -> Self {
        self.activity = Some(activity);
        self
    }

    pub fn activity(&self) -> Option<&dyn Activity> {
        self.activity.as_deref()
    }

    pub fn build_mode(&self) -> BuildMode {
        self.build_mode
    }

    #[cfg(test)]
    pub(crate) fn with_build_mode(mut self, build_mode: BuildMode) -> Self {
        self.build_mode = build_mode;
        self
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

/// A command that can be validated, executed and fault-mapped.
#[async_trait]
pub trait Command: Send + Sync {
    /// Declared options and resource-group requirements.
    fn contract(&self) -> &CommandContract;

    /// Runs the command. Only called after validation succeeded.
    async fn execute(
        &self,
        context: &mut CommandContext,
        parse_result: &dyn ParseResult,
    ) -> Result<Response, Fault>;

    fn validate(
        &self,
        parse_result: &dyn ParseResult,
        response: Option<&mut Response>,
    ) -> ValidationOutcome {
        self.contract().validate(parse_result, response)
    }

    /// Status written for `fault`.
    fn status_code_for(&self, _fault: &Fault) -> u16 {
        INTERNAL_ERROR_STATUS
    }

    /// Message written for `fault`, before the troubleshooting guidance.
    fn error_message_for(&self, fault: &Fault) -> String {
        fault.message()
    }

    /// Converts `fault` into the context's response.
    fn handle_fault(&self, context: &mut CommandContext, fault: &Fault) {
        if let Some(activity) = context.activity() {
            activity.set_status(ActivityStatus::Error);
            activity.add_tag(ERROR_DETAILS_TAG, &fault.message());
        }

        let exception = fault.to_exception_result(context.build_mode());
        let status = self.status_code_for(fault);
        let message = format!(
            "{}. {}",
            self.error_message_for(fault),
            troubleshooting_guidance()
        );

        let response = &mut context.response;
        response.status = status;
        response.message = message;
        response.results = match serde_json::to_value(&exception) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Failed to serialize exception result");
                None
            }
        };
    }
}

/// Runs one invocation: validate, execute, and map any fault.
///
/// Returns the response of the invocation. When validation fails the
/// command is never executed and the validation response is returned.
pub async fn run_command(
    command: &dyn Command,
    mut context: CommandContext,
    parse_result: &dyn ParseResult,
) -> Response {
    let span = info_span!("command", name = command.contract().name());

    async move {
        let outcome = command.validate(parse_result, Some(&mut context.response));
        if !outcome.is_valid() {
            return context.into_response();
        }

        match command.execute(&mut context, parse_result).await {
            Ok(response) => {
                debug!(status = response.status, "Command completed");
                response
            }
            Err(fault) => {
                warn!(error = %fault, kind = fault.type_name(), "Command faulted");
                command.handle_fault(&mut context, &fault);
                context.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use crate::activity::RecordingActivity;
    use crate::option::{self, OptionDescriptor, OptionRef};
    use crate::parse::ParsedInvocation;
    use crate::response::ExceptionResult;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("bad input {0}")]
    struct BadInput(String);

    struct ShowCommand {
        contract: CommandContract,
        name: OptionRef,
        calls: AtomicUsize,
    }

    impl ShowCommand {
        fn new() -> Self {
            let name = OptionDescriptor::new("name").required().into_ref();
            let mut contract = CommandContract::new("show", "Show a thing");
            contract.add_option(name.clone());
            contract.require_resource_group();
            Self {
                contract,
                name,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Command for ShowCommand {
        fn contract(&self) -> &CommandContract {
            &self.contract
        }

        async fn execute(
            &self,
            _context: &mut CommandContext,
            parse_result: &dyn ParseResult,
        ) -> Result<Response, Fault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = parse_result
                .find(&self.name)
                .and_then(|r| r.value())
                .unwrap_or_default();
            if name == "bad" {
                return Err(BadInput(name.to_string()).into());
            }
            if name == "plain" {
                return Err(Fault::msg("backend unavailable"));
            }
            Ok(Response::ok(json!({ "name": name })))
        }

        fn status_code_for(&self, fault: &Fault) -> u16 {
            if fault.is::<BadInput>() {
                400
            } else {
                INTERNAL_ERROR_STATUS
            }
        }
    }

    fn parsed(command: &ShowCommand, name: &str) -> ParsedInvocation {
        ParsedInvocation::for_options(command.contract().options())
            .with(&command.name, name)
            .with(option::resource_group(), "rg")
    }

    #[tokio::test]
    async fn test_success_returns_execute_response() {
        let command = ShowCommand::new();
        let response = run_command(&command, CommandContext::new(), &parsed(&command, "acct")).await;
        assert_eq!(response.status, 200);
        assert_eq!(response.results, Some(json!({"name": "acct"})));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_execute() {
        let command = ShowCommand::new();
        let parse = ParsedInvocation::for_options(command.contract().options())
            .with(&command.name, "acct");

        let response = run_command(&command, CommandContext::new(), &parse).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "Missing Required options: --resource-group");
        assert_eq!(response.results, None);
        assert_eq!(command.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fault_uses_status_hook_and_appends_guidance() {
        let command = ShowCommand::new();
        let response = run_command(&command, CommandContext::new(), &parsed(&command, "bad")).await;

        assert_eq!(response.status, 400);
        assert_eq!(
            response.message,
            format!("bad input bad. {}", troubleshooting_guidance())
        );
        let exception: ExceptionResult =
            serde_json::from_value(response.results.unwrap()).unwrap();
        assert_eq!(exception.message, "bad input bad");
        assert!(exception.type_name.ends_with("BadInput"));
    }

    #[tokio::test]
    async fn test_default_status_is_internal_error() {
        let command = ShowCommand::new();
        let response = run_command(&command, CommandContext::new(), &parsed(&command, "plain")).await;
        assert_eq!(response.status, 500);
        assert!(response.message.starts_with("backend unavailable. "));
        assert!(response.message.ends_with(&troubleshooting_guidance()));
    }

    #[test]
    fn test_handle_fault_records_on_activity() {
        let command = ShowCommand::new();
        let activity = Arc::new(RecordingActivity::new());
        let mut context = CommandContext::new().with_activity(activity.clone());

        command.handle_fault(&mut context, &Fault::msg("boom"));

        assert_eq!(activity.status(), Some(ActivityStatus::Error));
        assert_eq!(activity.tag(ERROR_DETAILS_TAG).as_deref(), Some("boom"));
    }

    #[test]
    fn test_handle_fault_without_activity_still_maps() {
        let command = ShowCommand::new();
        let mut context = CommandContext::new();
        command.handle_fault(&mut context, &Fault::msg("boom"));
        assert_eq!(context.response.status, 500);
    }

    #[test]
    fn test_release_build_mode_omits_stack_trace() {
        let command = ShowCommand::new();
        let mut context = CommandContext::new().with_build_mode(BuildMode::Release);
        command.handle_fault(&mut context, &Fault::msg("boom"));

        let results = context.response.results.unwrap();
        assert!(results.get("stackTrace").is_none());
        assert_eq!(results["type"], json!(std::any::type_name::<crate::fault::MessageFault>()));
    }

    #[test]
    fn test_debug_build_mode_includes_stack_trace() {
        let command = ShowCommand::new();
        let mut context = CommandContext::new().with_build_mode(BuildMode::Debug);
        command.handle_fault(&mut context, &Fault::msg("boom"));

        let results = context.response.results.unwrap();
        assert!(results["stackTrace"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(results["message"], "boom");
    }
}
