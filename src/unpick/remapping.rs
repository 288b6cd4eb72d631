//! Tree-to-tree identifier remapping
//!
//! [`Remapper`] rebuilds a [`Tree`] with class, field and method names substituted from a set
//! of [`Mappings`]. Names without a mapping entry are kept. Member lookups are keyed by the
//! names and descriptors as they appear in the input tree.
//!
//! Package-scoped groups cannot survive a remap unchanged, since remapping may move classes
//! between packages. They are expanded into one class-scoped group per class the package
//! index lists for that package.

pub mod mappings;

pub use mappings::{Mappings, MemberKey, RemapError};

use crate::unpick::ast::{
    Expression, FieldRef, GroupDefinition, GroupScope, Item, TargetField, TargetMethod, Tree,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static OBJECT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"L([^;]+);").expect("valid object type regex"));

pub struct Remapper<'a> {
    mappings: &'a Mappings,
}

impl<'a> Remapper<'a> {
    pub fn new(mappings: &'a Mappings) -> Self {
        Self { mappings }
    }

    pub fn remap_tree(&self, tree: &Tree) -> Tree {
        let mut items = Vec::with_capacity(tree.items.len());
        for item in &tree.items {
            match item {
                Item::Group(group) => {
                    items.extend(self.remap_group(group).into_iter().map(Item::Group))
                }
                Item::TargetField(target) => {
                    items.push(Item::TargetField(self.remap_target_field(target)))
                }
                Item::TargetMethod(target) => {
                    items.push(Item::TargetMethod(self.remap_target_method(target)))
                }
            }
        }
        Tree::new(items)
    }

    /// Remap one group. Package-scoped groups may expand into several class-scoped groups.
    pub fn remap_group(&self, group: &GroupDefinition) -> Vec<GroupDefinition> {
        let scopes = match &group.scope {
            GroupScope::Global => vec![GroupScope::Global],
            GroupScope::Package(package) => match self.mappings.packages.get(package) {
                Some(classes) => {
                    debug!(
                        package = %package,
                        classes = classes.len(),
                        "expanding package-scoped group"
                    );
                    classes
                        .iter()
                        .map(|simple| {
                            GroupScope::Class(self.class_name(&format!("{}.{}", package, simple)))
                        })
                        .collect()
                }
                None => vec![group.scope.clone()],
            },
            GroupScope::Class(class) => vec![GroupScope::Class(self.class_name(class))],
            GroupScope::Method {
                class,
                name,
                descriptor,
            } => vec![GroupScope::Method {
                class: self.class_name(class),
                name: self.method_name(class, name, descriptor),
                descriptor: self.descriptor(descriptor),
            }],
        };

        let constants: Vec<_> = group
            .constants
            .iter()
            .map(|constant| {
                let mut constant = constant.clone();
                constant.value = self.remap_expression(&constant.value, group);
                constant
            })
            .collect();

        scopes
            .into_iter()
            .map(|scope| GroupDefinition {
                scope,
                constants: constants.clone(),
                ..group.clone()
            })
            .collect()
    }

    fn remap_expression(&self, expression: &Expression, group: &GroupDefinition) -> Expression {
        expression.map_fields(&|field: &FieldRef| {
            let descriptor = field.effective_type(group.data_type).descriptor();
            FieldRef {
                class: self.class_name(&field.class),
                name: self.field_name(&field.class, &field.name, descriptor),
                ..field.clone()
            }
        })
    }

    pub fn remap_target_field(&self, target: &TargetField) -> TargetField {
        TargetField {
            class: self.class_name(&target.class),
            field: self.field_name(&target.class, &target.field, &target.descriptor),
            descriptor: self.descriptor(&target.descriptor),
            group: target.group.clone(),
        }
    }

    pub fn remap_target_method(&self, target: &TargetMethod) -> TargetMethod {
        TargetMethod {
            class: self.class_name(&target.class),
            method: self.method_name(&target.class, &target.method, &target.descriptor),
            descriptor: self.descriptor(&target.descriptor),
            ..target.clone()
        }
    }

    pub fn class_name(&self, class: &str) -> String {
        self.mappings
            .classes
            .get(class)
            .cloned()
            .unwrap_or_else(|| class.to_string())
    }

    pub fn field_name(&self, class: &str, field: &str, descriptor: &str) -> String {
        self.mappings
            .fields
            .get(&MemberKey::new(class, field, descriptor))
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    pub fn method_name(&self, class: &str, method: &str, descriptor: &str) -> String {
        self.mappings
            .methods
            .get(&MemberKey::new(class, method, descriptor))
            .cloned()
            .unwrap_or_else(|| method.to_string())
    }

    /// Remap every `L<internal/name>;` segment of a field or method descriptor.
    pub fn descriptor(&self, descriptor: &str) -> String {
        OBJECT_TYPE
            .replace_all(descriptor, |captures: &Captures| {
                let binary = captures[1].replace('/', ".");
                format!("L{};", self.class_name(&binary).replace('.', "/"))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpick::ast::{DataType, GroupKind, Literal};

    fn mappings() -> Mappings {
        Mappings::new()
            .with_class("a.Old", "b.New")
            .with_class("a.Old$Inner", "b.New$Nested")
            .with_field(MemberKey::new("a.Old", "X", "I"), "RENAMED_X")
            .with_field(MemberKey::new("a.Old", "W", "J"), "RENAMED_W")
            .with_method(MemberKey::new("a.Old", "run", "(La/Old;)V"), "execute")
            .with_package("a", ["Old", "Other"])
    }

    #[test]
    fn test_descriptor_segments() {
        let mappings = mappings();
        let remapper = Remapper::new(&mappings);
        assert_eq!(
            remapper.descriptor("(ILa/Old;[La/Old$Inner;Ljava/lang/String;)La/Old;"),
            "(ILb/New;[Lb/New$Nested;Ljava/lang/String;)Lb/New;"
        );
        assert_eq!(remapper.descriptor("J"), "J");
    }

    #[test]
    fn test_fields_use_their_effective_type() {
        let mappings = mappings();
        let remapper = Remapper::new(&mappings);
        let group = GroupDefinition::new(GroupKind::Const, DataType::Int)
            .with_constant(Literal::int(1), Expression::field("a.Old", "X"))
            .with_constant(
                Literal::int(2),
                Expression::Field(FieldRef::new("a.Old", "W").with_type(DataType::Long)),
            );
        let remapped = remapper.remap_group(&group);
        assert_eq!(
            remapped[0].constants[0].value,
            Expression::field("b.New", "RENAMED_X")
        );
        assert_eq!(
            remapped[0].constants[1].value,
            Expression::Field(FieldRef::new("b.New", "RENAMED_W").with_type(DataType::Long))
        );
    }

    #[test]
    fn test_package_scope_expands_per_class() {
        let mappings = mappings();
        let remapper = Remapper::new(&mappings);
        let group = GroupDefinition::new(GroupKind::Const, DataType::Int)
            .scoped(GroupScope::Package("a".to_string()));
        let scopes: Vec<_> = remapper
            .remap_group(&group)
            .into_iter()
            .map(|group| group.scope)
            .collect();
        assert_eq!(
            scopes,
            vec![
                GroupScope::Class("b.New".to_string()),
                GroupScope::Class("a.Other".to_string()),
            ]
        );

        let unknown = group.scoped(GroupScope::Package("zzz".to_string()));
        assert_eq!(remapper.remap_group(&unknown)[0].scope, unknown.scope);
    }

    #[test]
    fn test_method_scope_and_targets() {
        let mappings = mappings();
        let remapper = Remapper::new(&mappings);
        let group =
            GroupDefinition::new(GroupKind::Const, DataType::Int).scoped(GroupScope::Method {
                class: "a.Old".to_string(),
                name: "run".to_string(),
                descriptor: "(La/Old;)V".to_string(),
            });
        assert_eq!(
            remapper.remap_group(&group)[0].scope,
            GroupScope::Method {
                class: "b.New".to_string(),
                name: "execute".to_string(),
                descriptor: "(Lb/New;)V".to_string(),
            }
        );

        let target = TargetMethod::new("a.Old", "run", "(La/Old;)V").with_param(0, "g");
        let remapped = remapper.remap_target_method(&target);
        assert_eq!(remapped.method, "execute");
        assert_eq!(remapped.param_group(0), Some("g"));

        let field = TargetField {
            class: "a.Old".to_string(),
            field: "X".to_string(),
            descriptor: "I".to_string(),
            group: "g".to_string(),
        };
        assert_eq!(remapper.remap_target_field(&field).field, "RENAMED_X");
    }

    #[test]
    fn test_misses_are_identity() {
        let mappings = Mappings::new();
        let remapper = Remapper::new(&mappings);
        let tree = Tree::new(vec![Item::TargetMethod(TargetMethod::new(
            "x.Y",
            "z",
            "(Lx/Y;)V",
        ))]);
        assert_eq!(remapper.remap_tree(&tree), tree);
    }
}
