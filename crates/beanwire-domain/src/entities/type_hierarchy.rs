//! Class hierarchy metadata
//!
//! Records, per class, its type parameters and direct supertypes so the
//! container can answer raw subtyping questions and compute the type
//! closure of an event type.
//!
//! ```text
//! ArrayList<String>
//!   ├─► List<String>          (E := String substituted into List<E>)
//!   │     └─► Collection<String>
//!   └─► Object                (implicit root)
//! ```

use crate::value_objects::{ClassId, TypeDescriptor};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Declaration of a single class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class identity
    pub id: ClassId,
    /// Declared type parameter names
    pub type_parameters: Vec<Arc<str>>,
    /// Direct supertypes, expressed in terms of `type_parameters`
    pub supertypes: Vec<TypeDescriptor>,
}

impl ClassInfo {
    /// Declare a non-generic class without supertypes
    pub fn new(id: impl Into<ClassId>) -> Self {
        Self {
            id: id.into(),
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    /// Declare type parameters
    pub fn with_type_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.type_parameters = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add a direct supertype (superclass or interface)
    pub fn extends(mut self, supertype: TypeDescriptor) -> Self {
        self.supertypes.push(supertype);
        self
    }
}

impl From<&str> for ClassInfo {
    fn from(value: &str) -> Self {
        ClassInfo::new(value)
    }
}

/// Registry of class declarations
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    classes: HashMap<ClassId, ClassInfo>,
}

impl TypeHierarchy {
    /// Create an empty hierarchy
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class declaration (builder form)
    pub fn with_class(mut self, info: impl Into<ClassInfo>) -> Self {
        self.declare(info);
        self
    }

    /// Add or replace a class declaration
    pub fn declare(&mut self, info: impl Into<ClassInfo>) {
        let info = info.into();
        self.classes.insert(info.id.clone(), info);
    }

    /// Declaration of a class, if known
    pub fn class_info(&self, id: &ClassId) -> Option<&ClassInfo> {
        self.classes.get(id)
    }

    /// Raw supertype/interface assignability between two classes
    pub fn is_subclass(&self, sub: &ClassId, sup: &ClassId) -> bool {
        if sub == sup || sup.is_object() {
            return true;
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(info) = self.classes.get(&current) else {
                continue;
            };
            for parent in info.supertypes.iter().filter_map(TypeDescriptor::raw_class) {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent.clone());
            }
        }
        false
    }

    /// The type itself followed by every supertype, arguments substituted
    ///
    /// A raw generic class yields raw supertypes. `Object` always closes the
    /// list. Type variables and wildcards yield only themselves.
    pub fn type_closure(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        if !ty.is_concrete() {
            return vec![ty.clone()];
        }
        let mut closure = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for supertype in self.direct_supertypes(&current) {
                queue.push_back(supertype);
            }
            closure.push(current);
        }
        let object = TypeDescriptor::object();
        if !seen.contains(&object) {
            closure.push(object);
        }
        closure
    }

    fn direct_supertypes(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        let Some(info) = ty.raw_class().and_then(|raw| self.classes.get(raw)) else {
            return Vec::new();
        };
        match ty {
            TypeDescriptor::Parameterized { args, .. }
                if args.len() == info.type_parameters.len() =>
            {
                let bindings: HashMap<Arc<str>, TypeDescriptor> = info
                    .type_parameters
                    .iter()
                    .cloned()
                    .zip(args.iter().cloned())
                    .collect();
                info.supertypes
                    .iter()
                    .map(|s| s.substitute(&bindings))
                    .collect()
            }
            _ if info.type_parameters.is_empty() => info.supertypes.clone(),
            _ => info.supertypes.iter().map(TypeDescriptor::erasure).collect(),
        }
    }
}
