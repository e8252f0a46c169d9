//! Option descriptors and the shared descriptors reused across commands.
//!
//! A descriptor is the declared identity of one accepted argument. Commands
//! hold descriptors behind an [`OptionRef`] so the same instance can be
//! registered by many commands; equality is decided by [`OptionId`], never by
//! the textual name.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Name of the shared resource-group option.
pub const RESOURCE_GROUP_OPTION: &str = "resource-group";

/// Name of the shared subscription option.
pub const SUBSCRIPTION_OPTION: &str = "subscription";

static NEXT_OPTION_ID: AtomicU64 = AtomicU64::new(1);

static RESOURCE_GROUP: LazyLock<OptionRef> = LazyLock::new(|| {
    OptionDescriptor::new(RESOURCE_GROUP_OPTION)
        .with_description("The name of the resource group.")
        .shared()
        .into_ref()
});

static SUBSCRIPTION: LazyLock<OptionRef> = LazyLock::new(|| {
    OptionDescriptor::new(SUBSCRIPTION_OPTION)
        .with_description("The subscription ID or name.")
        .shared()
        .required()
        .into_ref()
});

/// Process-unique identity of an [`OptionDescriptor`].
///
/// Allocated once when the descriptor is created. Two descriptors with the
/// same name still carry distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(u64);

impl OptionId {
    fn next() -> Self {
        Self(NEXT_OPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a declared option.
pub type OptionRef = Arc<OptionDescriptor>;

/// Declared identity of one accepted command argument.
///
/// Immutable once converted into an [`OptionRef`].
///
/// # Examples
///
/// ```
/// use command_contract_core::OptionDescriptor;
///
/// let name = OptionDescriptor::new("name")
///     .with_description("Account name")
///     .required();
/// assert_eq!(name.flag(), "--name");
/// assert!(name.is_required());
/// assert!(!name.is_shared());
///
/// // Same text, different identity.
/// let other = OptionDescriptor::new("name");
/// assert!(!name.same_as(&other));
/// ```
#[derive(Debug)]
pub struct OptionDescriptor {
    id: OptionId,
    name: String,
    description: Option<String>,
    required: bool,
    shared: bool,
}

impl OptionDescriptor {
    /// Creates an optional, non-shared descriptor with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: OptionId::next(),
            name: name.into(),
            description: None,
            required: false,
            shared: false,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as a shared descriptor.
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Freezes the descriptor into a shareable handle.
    pub fn into_ref(self) -> OptionRef {
        Arc::new(self)
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Returns the external flag form (`--name`).
    pub fn flag(&self) -> String {
        format!("--{}", self.name)
    }

    /// Returns `true` if both values are the same declared descriptor.
    pub fn same_as(&self, other: &OptionDescriptor) -> bool {
        self.id == other.id
    }
}

/// Returns the shared `--resource-group` descriptor.
///
/// Every call returns the same instance.
pub fn resource_group() -> &'static OptionRef {
    &RESOURCE_GROUP
}

/// Returns the shared `--subscription` descriptor.
pub fn subscription() -> &'static OptionRef {
    &SUBSCRIPTION
}
