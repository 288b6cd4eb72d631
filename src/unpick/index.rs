//! Constant index
//!
//! Resolves a [`Tree`] against the real program's [`ClassModel`] into the lookup
//! structures the rewriter queries for every literal:
//!
//! - groups by id, for target declarations (several groups may share an id, since an id is
//!   only unique within one `(dataType, scope)` pair)
//! - ambient groups by scope: global (unnamed only), per package, per class, per method
//! - target methods, with inheritance: a method without a direct binding inherits the
//!   binding of the first implemented interface that has one (in declaration order), then
//!   of its superclass. Resolutions are memoized per method.
//!
//! The index is read-only once built, apart from the resolution memo, so it can be shared
//! across threads rewriting different files.

pub mod class_model;

pub use class_model::{package_name, ClassInfo, ClassModel, ClassPath, MethodInfo, MethodKey};

use crate::unpick::ast::{
    ConstantKey, GroupConstant, GroupDefinition, GroupScope, TargetMethod, Tree,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// A group definition with a hash lookup over its constants.
#[derive(Debug, Clone)]
pub struct IndexedGroup {
    pub definition: GroupDefinition,
    lookup: HashMap<ConstantKey, usize>,
}

impl IndexedGroup {
    pub fn new(definition: GroupDefinition) -> Self {
        let mut lookup = HashMap::new();
        for (position, constant) in definition.constants.iter().enumerate() {
            // first definition of a key wins
            lookup.entry(constant.lookup_key()).or_insert(position);
        }
        Self { definition, lookup }
    }

    pub fn constant(&self, key: &ConstantKey) -> Option<&GroupConstant> {
        self.lookup
            .get(key)
            .and_then(|&position| self.definition.constants.get(position))
    }
}

pub struct ConstantIndex<M: ClassModel> {
    model: M,
    groups: Vec<IndexedGroup>,
    by_id: HashMap<String, Vec<usize>>,
    global: Vec<usize>,
    by_package: HashMap<String, Vec<usize>>,
    by_class: HashMap<String, Vec<usize>>,
    by_method: HashMap<MethodKey, Vec<usize>>,
    possible_target_names: HashSet<String>,
    target_methods: HashMap<MethodKey, Arc<TargetMethod>>,
    target_fields: HashMap<(String, String), String>,
    resolved: RwLock<HashMap<MethodKey, Option<Arc<TargetMethod>>>>,
}

impl<M: ClassModel> ConstantIndex<M> {
    pub fn new(tree: &Tree, model: M) -> Self {
        let mut index = Self {
            model,
            groups: Vec::new(),
            by_id: HashMap::new(),
            global: Vec::new(),
            by_package: HashMap::new(),
            by_class: HashMap::new(),
            by_method: HashMap::new(),
            possible_target_names: HashSet::new(),
            target_methods: HashMap::new(),
            target_fields: HashMap::new(),
            resolved: RwLock::new(HashMap::new()),
        };

        // one tree may still declare the same identity twice
        let merged = Tree::merge_all([tree.clone()]);
        for group in merged.groups() {
            index.add_group(group.clone());
        }
        for target in tree.target_methods() {
            index.add_target_method(target);
        }
        for target in tree.target_fields() {
            index
                .target_fields
                .entry((target.class.clone(), target.field.clone()))
                .or_insert_with(|| target.group.clone());
        }

        debug!(
            groups = index.groups.len(),
            target_methods = index.target_methods.len(),
            target_fields = index.target_fields.len(),
            "built constant index"
        );
        index
    }

    fn add_group(&mut self, group: GroupDefinition) {
        let position = self.groups.len();
        if let Some(name) = &group.name {
            self.by_id.entry(name.clone()).or_default().push(position);
        }

        match &group.scope {
            GroupScope::Global => {
                if group.name.is_none() {
                    self.global.push(position);
                }
            }
            GroupScope::Package(package) => {
                self.by_package
                    .entry(package.clone())
                    .or_default()
                    .push(position);
            }
            GroupScope::Class(class) => {
                self.by_class.entry(class.clone()).or_default().push(position);
            }
            GroupScope::Method {
                class,
                name,
                descriptor,
            } => {
                let declared = self
                    .model
                    .class(class)
                    .is_some_and(|info| info.declares(name, descriptor));
                if declared {
                    self.by_method
                        .entry(MethodKey::new(class, name, descriptor))
                        .or_default()
                        .push(position);
                } else {
                    debug!(
                        class = %class,
                        method = %name,
                        descriptor = %descriptor,
                        "dropping method-scoped group: no such method"
                    );
                }
            }
        }

        self.groups.push(IndexedGroup::new(group));
    }

    fn add_target_method(&mut self, target: &TargetMethod) {
        let bound = target.param_groups.iter().map(|(_, group)| group);
        for group in bound.chain(target.return_group.iter()) {
            if !self.by_id.contains_key(group) {
                debug!(group = %group, method = %target.method, "target references unknown group id");
            }
        }
        if self.model.class(&target.class).is_none() {
            debug!(class = %target.class, "target method on unknown class");
        }

        self.possible_target_names.insert(target.method.clone());
        let key = MethodKey::new(&target.class, &target.method, &target.descriptor);
        match self.target_methods.get_mut(&key) {
            Some(existing) => Arc::make_mut(existing).absorb(target),
            None => {
                self.target_methods.insert(key, Arc::new(target.clone()));
            }
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn groups(&self) -> impl Iterator<Item = &IndexedGroup> {
        self.groups.iter()
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&IndexedGroup> {
        positions
            .map(|positions| positions.iter().map(|&p| &self.groups[p]).collect())
            .unwrap_or_default()
    }

    /// All groups named `id`, in declaration order.
    pub fn groups_by_id(&self, id: &str) -> Vec<&IndexedGroup> {
        self.resolve(self.by_id.get(id))
    }

    /// Unnamed global groups.
    pub fn global_groups(&self) -> Vec<&IndexedGroup> {
        self.global.iter().map(|&p| &self.groups[p]).collect()
    }

    pub fn package_groups(&self, package: &str) -> Vec<&IndexedGroup> {
        self.resolve(self.by_package.get(package))
    }

    pub fn class_groups(&self, class: &str) -> Vec<&IndexedGroup> {
        self.resolve(self.by_class.get(class))
    }

    pub fn method_groups(&self, method: &MethodKey) -> Vec<&IndexedGroup> {
        self.resolve(self.by_method.get(method))
    }

    /// Fast negative filter: no method of this name is bound by any target declaration.
    pub fn is_possible_target(&self, method_name: &str) -> bool {
        self.possible_target_names.contains(method_name)
    }

    /// The group id a `target_field` declaration binds to `class.field`.
    pub fn field_target(&self, class: &str, field: &str) -> Option<&str> {
        self.target_fields
            .get(&(class.to_string(), field.to_string()))
            .map(String::as_str)
    }

    /// The target declaration governing `method`, directly or through inheritance.
    pub fn target_method(&self, method: &MethodKey) -> Option<Arc<TargetMethod>> {
        if !self.is_possible_target(&method.name) {
            return None;
        }

        if let Some(cached) = self
            .resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(method)
        {
            return cached.clone();
        }

        let resolved = self.resolve_target_method(method);
        self.resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.clone(), resolved.clone());
        resolved
    }

    fn resolve_target_method(&self, method: &MethodKey) -> Option<Arc<TargetMethod>> {
        if let Some(direct) = self.target_methods.get(method) {
            return Some(direct.clone());
        }
        if method.is_initializer() {
            return None;
        }

        let class = self.model.class(&method.class)?;
        class
            .interfaces
            .iter()
            .find_map(|interface| self.target_method(&method.in_class(interface)))
            .or_else(|| {
                class
                    .superclass
                    .as_ref()
                    .and_then(|superclass| self.target_method(&method.in_class(superclass)))
            })
    }
}
