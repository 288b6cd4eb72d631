//! The class model the index is built against
//!
//! The index only needs nominal information: which methods a class declares, and its
//! superclass and interfaces. Hosts supply it through [`ClassModel`]; [`ClassPath`] is the
//! in-memory implementation used by tests and by hosts that collect classes up front.

use std::collections::HashMap;
use std::fmt;

/// A method, identified by its declaring class, name and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
    pub class: String,
    pub name: String,
    pub descriptor: String,
}

impl MethodKey {
    pub fn new(
        class: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// The same method signature looked up in another class.
    pub fn in_class(&self, class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..self.clone()
        }
    }

    /// Constructors and static initializers are never inherited.
    pub fn is_initializer(&self) -> bool {
        self.name == "<init>" || self.name == "<clinit>"
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.class, self.name, self.descriptor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Binary name, `com.example.Outer$Inner`
    pub name: String,
    pub superclass: Option<String>,
    /// Implemented interfaces, in declaration order
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.methods.push(MethodInfo {
            name: name.into(),
            descriptor: descriptor.into(),
        });
        self
    }

    pub fn declares(&self, name: &str, descriptor: &str) -> bool {
        self.methods
            .iter()
            .any(|method| method.name == name && method.descriptor == descriptor)
    }
}

/// Read access to the classes of the program being rewritten.
pub trait ClassModel {
    fn class(&self, name: &str) -> Option<&ClassInfo>;
}

/// An in-memory [`ClassModel`].
#[derive(Debug, Clone, Default)]
pub struct ClassPath {
    classes: HashMap<String, ClassInfo>,
}

impl ClassPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ClassInfo) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn with_class(mut self, class: ClassInfo) -> Self {
        self.insert(class);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassInfo> for ClassPath {
    fn from_iter<I: IntoIterator<Item = ClassInfo>>(iter: I) -> Self {
        let mut path = ClassPath::new();
        for class in iter {
            path.insert(class);
        }
        path
    }
}

impl ClassModel for ClassPath {
    fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }
}

impl<M: ClassModel + ?Sized> ClassModel for &M {
    fn class(&self, name: &str) -> Option<&ClassInfo> {
        (**self).class(name)
    }
}

/// Package part of a binary class name; empty for the default package.
pub fn package_name(class: &str) -> &str {
    class.rsplit_once('.').map_or("", |(package, _)| package)
}
