//! Qualifier value objects
//!
//! A qualifier is an instance of a [`QualifierType`] carrying member values.
//! The type descriptor is built once, at registration time, and records
//! which members are non-binding. Equality and hashing only look at the
//! type name and the binding members, so two instances that differ only in
//! a non-binding member are the same qualifier.
//!
//! # Example
//!
//! ```
//! use beanwire_domain::value_objects::{MemberValue, Qualifier, QualifierType};
//! use std::sync::Arc;
//!
//! let priority = Arc::new(QualifierType::new("Priority").with_non_binding("comment"));
//! let a = Qualifier::of(&priority)
//!     .with("level", MemberValue::Int(1))
//!     .with("comment", MemberValue::from("first"));
//! let b = Qualifier::of(&priority)
//!     .with("level", MemberValue::Int(1))
//!     .with("comment", MemberValue::from("second"));
//! assert_eq!(a, b);
//! ```

use super::scope::ScopeKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

// ============================================================================
// Well-known qualifier type names
// ============================================================================

/// Name of the universal qualifier present on every event
pub const ANY: &str = "Any";
/// Name of the qualifier implied when none is declared
pub const DEFAULT: &str = "Default";
/// Name of the `Named` qualifier
pub const NAMED: &str = "Named";
/// Name of the qualifier on scope activation notifications
pub const INITIALIZED: &str = "Initialized";
/// Name of the qualifier on notifications fired just before scope teardown
pub const BEFORE_DESTROYED: &str = "BeforeDestroyed";
/// Name of the qualifier on notifications fired after scope teardown
pub const DESTROYED: &str = "Destroyed";

static ANY_TYPE: LazyLock<Arc<QualifierType>> = LazyLock::new(|| Arc::new(QualifierType::new(ANY)));
static DEFAULT_TYPE: LazyLock<Arc<QualifierType>> =
    LazyLock::new(|| Arc::new(QualifierType::new(DEFAULT)));
static NAMED_TYPE: LazyLock<Arc<QualifierType>> =
    LazyLock::new(|| Arc::new(QualifierType::new(NAMED)));
static INITIALIZED_TYPE: LazyLock<Arc<QualifierType>> =
    LazyLock::new(|| Arc::new(QualifierType::new(INITIALIZED)));
static BEFORE_DESTROYED_TYPE: LazyLock<Arc<QualifierType>> =
    LazyLock::new(|| Arc::new(QualifierType::new(BEFORE_DESTROYED)));
static DESTROYED_TYPE: LazyLock<Arc<QualifierType>> =
    LazyLock::new(|| Arc::new(QualifierType::new(DESTROYED)));

// ============================================================================
// Member values
// ============================================================================

/// Value of an annotation member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberValue {
    /// Boolean member
    Bool(bool),
    /// Integral member
    Int(i64),
    /// String member
    Str(Arc<str>),
    /// Enum constant, rendered as its constant name
    Enum(Arc<str>),
    /// Class literal, rendered as the type name
    Type(Arc<str>),
    /// Array member
    List(Vec<MemberValue>),
}

impl From<&str> for MemberValue {
    fn from(value: &str) -> Self {
        MemberValue::Str(value.into())
    }
}

impl From<bool> for MemberValue {
    fn from(value: bool) -> Self {
        MemberValue::Bool(value)
    }
}

impl From<i64> for MemberValue {
    fn from(value: i64) -> Self {
        MemberValue::Int(value)
    }
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberValue::Bool(v) => write!(f, "{v}"),
            MemberValue::Int(v) => write!(f, "{v}"),
            MemberValue::Str(v) => write!(f, "\"{v}\""),
            MemberValue::Enum(v) | MemberValue::Type(v) => f.write_str(v),
            MemberValue::List(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ============================================================================
// Qualifier type descriptor
// ============================================================================

/// Descriptor of an annotation type usable as a qualifier
///
/// Built once per annotation type. `is_qualifier` is false for plain
/// annotation types, which are rejected wherever qualifiers are expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifierType {
    name: Arc<str>,
    non_binding: BTreeSet<Arc<str>>,
    repeatable: bool,
    is_qualifier: bool,
}

impl QualifierType {
    /// Describe a qualifier type with no non-binding members
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            non_binding: BTreeSet::new(),
            repeatable: false,
            is_qualifier: true,
        }
    }

    /// Describe an annotation type that is not a qualifier
    pub fn plain_annotation(name: impl Into<Arc<str>>) -> Self {
        Self {
            is_qualifier: false,
            ..Self::new(name)
        }
    }

    /// Mark a member as non-binding
    pub fn with_non_binding(mut self, member: impl Into<Arc<str>>) -> Self {
        self.non_binding.insert(member.into());
        self
    }

    /// Allow several instances of this type on one injection point or event
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when `member` is ignored by qualifier equality
    pub fn is_non_binding(&self, member: &str) -> bool {
        self.non_binding.contains(member)
    }

    /// True when several instances may appear together
    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// False for plain annotation types
    pub fn is_qualifier(&self) -> bool {
        self.is_qualifier
    }
}

// ============================================================================
// Qualifier instances
// ============================================================================

/// An instance of a qualifier type with concrete member values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qualifier {
    ty: Arc<QualifierType>,
    members: BTreeMap<Arc<str>, MemberValue>,
}

impl Qualifier {
    /// Start a qualifier instance of the given type
    pub fn of(ty: &Arc<QualifierType>) -> Self {
        Self {
            ty: Arc::clone(ty),
            members: BTreeMap::new(),
        }
    }

    /// Set a member value
    pub fn with(mut self, member: impl Into<Arc<str>>, value: impl Into<MemberValue>) -> Self {
        self.members.insert(member.into(), value.into());
        self
    }

    /// The universal qualifier
    pub fn any() -> Self {
        Self::of(&ANY_TYPE)
    }

    /// The qualifier implied when none is declared
    pub fn default_qualifier() -> Self {
        Self::of(&DEFAULT_TYPE)
    }

    /// `@Named(value)`
    pub fn named(value: &str) -> Self {
        Self::of(&NAMED_TYPE).with("value", value)
    }

    /// `@Initialized(scope)`
    pub fn initialized(scope: &ScopeKind) -> Self {
        Self::of(&INITIALIZED_TYPE).with("value", MemberValue::Type(scope.name().into()))
    }

    /// `@BeforeDestroyed(scope)`
    pub fn before_destroyed(scope: &ScopeKind) -> Self {
        Self::of(&BEFORE_DESTROYED_TYPE).with("value", MemberValue::Type(scope.name().into()))
    }

    /// `@Destroyed(scope)`
    pub fn destroyed(scope: &ScopeKind) -> Self {
        Self::of(&DESTROYED_TYPE).with("value", MemberValue::Type(scope.name().into()))
    }

    /// Type descriptor of this instance
    pub fn qualifier_type(&self) -> &QualifierType {
        &self.ty
    }

    /// Type name of this instance
    pub fn kind(&self) -> &str {
        self.ty.name()
    }

    /// Value of a member, binding or not
    pub fn member(&self, name: &str) -> Option<&MemberValue> {
        self.members.get(name)
    }

    /// True for the universal qualifier
    pub fn is_any(&self) -> bool {
        self.kind() == ANY
    }

    fn binding_members(&self) -> impl Iterator<Item = (&Arc<str>, &MemberValue)> {
        self.members
            .iter()
            .filter(|(name, _)| !self.ty.is_non_binding(name))
    }
}

impl PartialEq for Qualifier {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.binding_members().eq(other.binding_members())
    }
}

impl Eq for Qualifier {}

impl Hash for Qualifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        for (name, value) in self.binding_members() {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.kind())?;
        if self.members.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (name, value)) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
