//! Target declarations binding program elements to group ids

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetField {
    pub class: String,
    pub field: String,
    pub descriptor: String,
    pub group: String,
}

/// Binds the parameters and return value of one method to group ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetMethod {
    pub class: String,
    pub method: String,
    pub descriptor: String,
    /// Parameter index → group id, in declaration order
    pub param_groups: Vec<(usize, String)>,
    pub return_group: Option<String>,
}

impl TargetMethod {
    pub fn new(
        class: impl Into<String>,
        method: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            descriptor: descriptor.into(),
            param_groups: Vec::new(),
            return_group: None,
        }
    }

    pub fn with_param(mut self, index: usize, group: impl Into<String>) -> Self {
        self.param_groups.push((index, group.into()));
        self
    }

    pub fn with_return(mut self, group: impl Into<String>) -> Self {
        self.return_group = Some(group.into());
        self
    }

    pub fn param_group(&self, index: usize) -> Option<&str> {
        self.param_groups
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, group)| group.as_str())
    }

    /// Fill in slots bound by `other` that this declaration leaves open.
    pub fn absorb(&mut self, other: &TargetMethod) {
        for (index, group) in &other.param_groups {
            if self.param_group(*index).is_none() {
                self.param_groups.push((*index, group.clone()));
            }
        }
        if self.return_group.is_none() {
            self.return_group = other.return_group.clone();
        }
    }
}
