//! Type descriptors
//!
//! Runtime stand-ins for the declared types of events and observed
//! parameters: a raw class, a parameterized class, a wildcard with optional
//! bounds, or a type variable with an optional upper bound.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the root class every class extends
pub const OBJECT: &str = "Object";

/// Identity of a class or interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(Arc<str>);

impl ClassId {
    /// Create a class identity
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The root class
    pub fn object() -> Self {
        Self::new(OBJECT)
    }

    /// Class name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the root class
    pub fn is_object(&self) -> bool {
        &*self.0 == OBJECT
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Descriptor of a (possibly generic) type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// A raw class
    Class(ClassId),
    /// A generic class with actual type arguments
    Parameterized {
        /// Raw class
        raw: ClassId,
        /// Type arguments, in declaration order
        args: Vec<TypeDescriptor>,
    },
    /// `?`, `? extends U` or `? super L`
    Wildcard {
        /// Upper bound
        upper: Option<Box<TypeDescriptor>>,
        /// Lower bound
        lower: Option<Box<TypeDescriptor>>,
    },
    /// A type variable, optionally bounded
    Variable {
        /// Variable name
        name: Arc<str>,
        /// Upper bound
        bound: Option<Box<TypeDescriptor>>,
    },
}

impl TypeDescriptor {
    /// A raw class
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::Class(ClassId::new(name))
    }

    /// The root class
    pub fn object() -> Self {
        Self::Class(ClassId::object())
    }

    /// A parameterized class
    pub fn parameterized(
        raw: impl Into<Arc<str>>,
        args: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self::Parameterized {
            raw: ClassId::new(raw),
            args: args.into_iter().collect(),
        }
    }

    /// Unbounded wildcard `?`
    pub fn wildcard() -> Self {
        Self::Wildcard {
            upper: None,
            lower: None,
        }
    }

    /// `? extends upper`
    pub fn wildcard_extends(upper: TypeDescriptor) -> Self {
        Self::Wildcard {
            upper: Some(Box::new(upper)),
            lower: None,
        }
    }

    /// `? super lower`
    pub fn wildcard_super(lower: TypeDescriptor) -> Self {
        Self::Wildcard {
            upper: None,
            lower: Some(Box::new(lower)),
        }
    }

    /// Unbounded type variable
    pub fn variable(name: impl Into<Arc<str>>) -> Self {
        Self::Variable {
            name: name.into(),
            bound: None,
        }
    }

    /// Type variable with an upper bound
    pub fn bounded_variable(name: impl Into<Arc<str>>, bound: TypeDescriptor) -> Self {
        Self::Variable {
            name: name.into(),
            bound: Some(Box::new(bound)),
        }
    }

    /// Raw class of a class or parameterized type
    pub fn raw_class(&self) -> Option<&ClassId> {
        match self {
            TypeDescriptor::Class(id) | TypeDescriptor::Parameterized { raw: id, .. } => Some(id),
            _ => None,
        }
    }

    /// True when this type or any nested argument is a type variable
    pub fn contains_type_variable(&self) -> bool {
        match self {
            TypeDescriptor::Class(_) => false,
            TypeDescriptor::Parameterized { args, .. } => {
                args.iter().any(TypeDescriptor::contains_type_variable)
            }
            TypeDescriptor::Wildcard { upper, lower } => {
                upper.as_deref().is_some_and(TypeDescriptor::contains_type_variable)
                    || lower.as_deref().is_some_and(TypeDescriptor::contains_type_variable)
            }
            TypeDescriptor::Variable { .. } => true,
        }
    }

    /// True for a raw class or a parameterized type
    pub fn is_concrete(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Class(_) | TypeDescriptor::Parameterized { .. }
        )
    }

    /// Replace type variables by the bindings given
    ///
    /// Variables without a binding are left untouched.
    pub fn substitute(&self, bindings: &HashMap<Arc<str>, TypeDescriptor>) -> TypeDescriptor {
        match self {
            TypeDescriptor::Class(_) => self.clone(),
            TypeDescriptor::Parameterized { raw, args } => TypeDescriptor::Parameterized {
                raw: raw.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeDescriptor::Wildcard { upper, lower } => TypeDescriptor::Wildcard {
                upper: upper.as_ref().map(|u| Box::new(u.substitute(bindings))),
                lower: lower.as_ref().map(|l| Box::new(l.substitute(bindings))),
            },
            TypeDescriptor::Variable { name, .. } => bindings
                .get(name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
        }
    }

    /// Drop type arguments
    pub fn erasure(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Parameterized { raw, .. } => TypeDescriptor::Class(raw.clone()),
            TypeDescriptor::Variable { bound, .. } => bound
                .as_deref()
                .map_or_else(TypeDescriptor::object, TypeDescriptor::erasure),
            TypeDescriptor::Wildcard { upper, .. } => upper
                .as_deref()
                .map_or_else(TypeDescriptor::object, TypeDescriptor::erasure),
            TypeDescriptor::Class(_) => self.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Class(id) => write!(f, "{id}"),
            TypeDescriptor::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeDescriptor::Wildcard { upper, lower } => {
                f.write_str("?")?;
                if let Some(upper) = upper {
                    write!(f, " extends {upper}")?;
                }
                if let Some(lower) = lower {
                    write!(f, " super {lower}")?;
                }
                Ok(())
            }
            TypeDescriptor::Variable { name, bound } => {
                f.write_str(name)?;
                if let Some(bound) = bound {
                    write!(f, " extends {bound}")?;
                }
                Ok(())
            }
        }
    }
}
