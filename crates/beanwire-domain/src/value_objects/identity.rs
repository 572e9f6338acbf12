//! Identities of contextual types and observer methods

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of a contextual type (a bean)
///
/// # Example
///
/// ```
/// use beanwire_domain::value_objects::BeanId;
///
/// let id = BeanId::new("com.acme.Cart");
/// assert_eq!(id.as_str(), "com.acme.Cart");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeanId(Arc<str>);

impl BeanId {
    /// Create a bean identity
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BeanId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of an observer method: declaring bean plus method name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId {
    /// Declaring bean
    pub bean: BeanId,
    /// Method name
    pub method: Arc<str>,
}

impl ObserverId {
    /// Create an observer identity
    pub fn new(bean: impl Into<BeanId>, method: impl Into<Arc<str>>) -> Self {
        Self {
            bean: bean.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.bean, self.method)
    }
}
