//! Parse-result boundary.
//!
//! The argument parser itself lives outside this crate. Whatever parser is
//! used only has to expose the options the active command declares and the
//! subset that were bound to a value, each tied back to its descriptor.

use crate::option::{OptionDescriptor, OptionRef};

/// One option bound in an invocation.
#[derive(Debug, Clone)]
pub struct OptionResult {
    option: OptionRef,
    values: Vec<String>,
}

impl OptionResult {
    pub fn new(option: OptionRef, values: Vec<String>) -> Self {
        Self { option, values }
    }

    /// The descriptor this result originated from.
    pub fn option(&self) -> &OptionRef {
        &self.option
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// First bound value, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Read-only view of a parsed invocation.
pub trait ParseResult: Send + Sync {
    /// Options declared by the active command.
    fn declared_options(&self) -> &[OptionRef];

    /// Options actually bound in this invocation.
    fn bound_options(&self) -> &[OptionResult];

    /// Returns `true` if `option` (by identity) was bound.
    fn is_bound(&self, option: &OptionDescriptor) -> bool {
        self.bound_options()
            .iter()
            .any(|result| result.option().same_as(option))
    }

    /// Returns the bound result for `option`, if any.
    fn find(&self, option: &OptionDescriptor) -> Option<&OptionResult> {
        self.bound_options()
            .iter()
            .find(|result| result.option().same_as(option))
    }
}

/// In-memory [`ParseResult`] built by a parser adapter or a test.
///
/// # Examples
///
/// ```
/// use command_contract_core::{OptionDescriptor, ParseResult, ParsedInvocation};
///
/// let name = OptionDescriptor::new("name").required().into_ref();
/// let mut parsed = ParsedInvocation::new();
/// parsed.declare(name.clone());
/// parsed.bind(&name, "demo");
///
/// assert!(parsed.is_bound(&name));
/// assert_eq!(parsed.find(&name).and_then(|r| r.value()), Some("demo"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParsedInvocation {
    declared: Vec<OptionRef>,
    bound: Vec<OptionResult>,
}

impl ParsedInvocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the options declared by a command.
    pub fn for_options<'a>(options: impl IntoIterator<Item = &'a OptionRef>) -> Self {
        Self {
            declared: options.into_iter().cloned().collect(),
            bound: Vec::new(),
        }
    }

    /// Adds `option` to the declared set.
    pub fn declare(&mut self, option: OptionRef) {
        if !self.declared.iter().any(|o| o.same_as(&option)) {
            self.declared.push(option);
        }
    }

    /// Binds a single value to `option`.
    pub fn bind(&mut self, option: &OptionRef, value: impl Into<String>) {
        self.bind_all(option, vec![value.into()]);
    }

    /// Binds `values` to `option`, appending if it is already bound.
    pub fn bind_all(&mut self, option: &OptionRef, values: Vec<String>) {
        match self
            .bound
            .iter_mut()
            .find(|result| result.option.same_as(option))
        {
            Some(existing) => existing.values.extend(values),
            None => self.bound.push(OptionResult::new(option.clone(), values)),
        }
    }

    /// Builder form of [`bind`](Self::bind).
    pub fn with(mut self, option: &OptionRef, value: impl Into<String>) -> Self {
        self.bind(option, value);
        self
    }
}

impl ParseResult for ParsedInvocation {
    fn declared_options(&self) -> &[OptionRef] {
        &self.declared
    }

    fn bound_options(&self) -> &[OptionResult] {
        &self.bound
    }
}
