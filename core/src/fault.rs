//! Execution faults and their conversion into responses.

use std::any::type_name;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;

use crate::response::ExceptionResult;

/// Support link appended to every fault-mapped message.
pub const TROUBLESHOOTING_URL: &str = "https://aka.ms/azmcp/troubleshooting";

/// Returns the guidance sentence appended after every fault message.
pub fn troubleshooting_guidance() -> String {
    format!(
        "To mitigate this issue, please refer to the troubleshooting guidelines here at {TROUBLESHOOTING_URL}."
    )
}

/// Build profile the crate was compiled with.
///
/// Only [`BuildMode::CURRENT`] is used outside tests; nothing reads it from
/// the environment or from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    pub const CURRENT: BuildMode = if cfg!(debug_assertions) {
        BuildMode::Debug
    } else {
        BuildMode::Release
    };

    pub fn includes_stack_traces(self) -> bool {
        matches!(self, BuildMode::Debug)
    }
}

/// An error raised by a command's execution.
///
/// Any `std::error::Error` converts into a `Fault` through `?`. The concrete
/// type name and a backtrace are captured at conversion time; the original
/// error stays reachable through [`downcast_ref`](Fault::downcast_ref) so
/// status hooks can match on it.
pub struct Fault {
    inner: Box<dyn StdError + Send + Sync + 'static>,
    type_name: &'static str,
    backtrace: Backtrace,
}

impl Fault {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(error),
            type_name: type_name::<E>(),
            backtrace: capture_backtrace(BuildMode::CURRENT),
        }
    }

    /// Fault carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(MessageFault(message.into()))
    }

    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// Fully qualified type name of the wrapped error.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Captured trace rendered as text, if one was captured.
    pub fn stack_trace(&self) -> Option<String> {
        match self.backtrace.status() {
            BacktraceStatus::Captured => Some(self.backtrace.to_string()),
            _ => None,
        }
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }

    /// Builds the payload attached to the response.
    ///
    /// Debug mode always carries a trace: the one captured at conversion
    /// time, or one taken here if none was. Release mode never does.
    pub fn to_exception_result(&self, mode: BuildMode) -> ExceptionResult {
        ExceptionResult {
            message: self.message(),
            stack_trace: if mode.includes_stack_traces() {
                Some(
                    self.stack_trace()
                        .unwrap_or_else(|| Backtrace::force_capture().to_string()),
                )
            } else {
                None
            },
            type_name: self.type_name.to_string(),
        }
    }
}

/// Debug builds capture unconditionally. Release builds capture only when
/// `RUST_BACKTRACE` asks for it.
fn capture_backtrace(mode: BuildMode) -> Backtrace {
    if mode.includes_stack_traces() {
        Backtrace::force_capture()
    } else {
        Backtrace::capture()
    }
}

impl<E> From<E> for Fault
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Fault::new(error)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("type_name", &self.type_name)
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Error type behind [`Fault::msg`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MessageFault(pub String);
