//! The parsed form of one or more unpick definition files

use super::group::{GroupDefinition, GroupIdentity};
use super::target::{TargetField, TargetMethod};
use std::collections::HashMap;
use tracing::debug;

/// One top-level declaration, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Group(GroupDefinition),
    TargetField(TargetField),
    TargetMethod(TargetMethod),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub items: Vec<Item>,
}

impl Tree {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupDefinition> {
        self.items.iter().filter_map(|item| match item {
            Item::Group(group) => Some(group),
            _ => None,
        })
    }

    pub fn target_fields(&self) -> impl Iterator<Item = &TargetField> {
        self.items.iter().filter_map(|item| match item {
            Item::TargetField(target) => Some(target),
            _ => None,
        })
    }

    pub fn target_methods(&self) -> impl Iterator<Item = &TargetMethod> {
        self.items.iter().filter_map(|item| match item {
            Item::TargetMethod(target) => Some(target),
            _ => None,
        })
    }

    /// Fold `other` into this tree.
    ///
    /// Group definitions sharing a `(dataType, scope, name)` identity are merged by appending
    /// constants in source order; the kind, strictness and format of the first definition are
    /// kept. Targets are appended as they are.
    pub fn merge(&mut self, other: Tree) {
        let mut positions: HashMap<GroupIdentity, usize> = HashMap::new();
        for (position, item) in self.items.iter().enumerate() {
            if let Item::Group(group) = item {
                positions.entry(group.identity()).or_insert(position);
            }
        }

        for item in other.items {
            match item {
                Item::Group(group) => match positions.get(&group.identity()) {
                    Some(&position) => {
                        if let Item::Group(existing) = &mut self.items[position] {
                            absorb_group(existing, group);
                        }
                    }
                    None => {
                        positions.insert(group.identity(), self.items.len());
                        self.items.push(Item::Group(group));
                    }
                },
                other => self.items.push(other),
            }
        }
    }

    /// Merge several trees into one, in order.
    pub fn merge_all(trees: impl IntoIterator<Item = Tree>) -> Tree {
        let mut merged = Tree::default();
        for tree in trees {
            merged.merge(tree);
        }
        merged
    }
}

fn absorb_group(existing: &mut GroupDefinition, incoming: GroupDefinition) {
    if existing.kind != incoming.kind
        || existing.strict != incoming.strict
        || existing.format != incoming.format
    {
        debug!(
            group = ?existing.name,
            data_type = %existing.data_type,
            "merged group definitions disagree on kind, strictness or format; keeping the first"
        );
    }
    existing.constants.extend(incoming.constants);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpick::ast::{DataType, Expression, GroupKind, GroupScope, Literal};

    fn colors(keys: &[i32]) -> GroupDefinition {
        keys.iter().fold(
            GroupDefinition::new(GroupKind::Const, DataType::Int).named("Colors"),
            |group, key| group.with_constant(Literal::int(*key), Expression::field("a.C", "K")),
        )
    }

    #[test]
    fn test_merge_appends_constants_of_same_identity() {
        let mut first = Tree::new(vec![Item::Group(colors(&[1, 2]))]);
        let second = Tree::new(vec![
            Item::Group(colors(&[3])),
            Item::TargetMethod(TargetMethod::new("a.B", "m", "(I)V").with_param(0, "Colors")),
        ]);
        first.merge(second);

        let groups: Vec<_> = first.groups().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].constants.len(), 3);
        assert_eq!(first.target_methods().count(), 1);
    }

    #[test]
    fn test_merge_keeps_distinct_scopes_apart() {
        let scoped = colors(&[1]).scoped(GroupScope::Class("a.B".to_string()));
        let merged = Tree::merge_all([
            Tree::new(vec![Item::Group(colors(&[1]))]),
            Tree::new(vec![Item::Group(scoped)]),
        ]);
        assert_eq!(merged.groups().count(), 2);
    }

    #[test]
    fn test_merge_keeps_first_kind() {
        let mut flag = colors(&[4]);
        flag.kind = GroupKind::Flag;
        let mut tree = Tree::new(vec![Item::Group(colors(&[1]))]);
        tree.merge(Tree::new(vec![Item::Group(flag)]));
        let group = tree.groups().next().expect("merged group");
        assert_eq!(group.kind, GroupKind::Const);
        assert_eq!(group.constants.len(), 2);
    }
}
