//! What the host tells the rewriter about one literal, and what it gets back

use crate::unpick::ast::Literal;
use crate::unpick::index::MethodKey;
use std::ops::Range;

/// The slot of a target method a literal flows into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSlot {
    Parameter(usize),
    Return,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallTarget {
    pub method: MethodKey,
    pub slot: TargetSlot,
}

/// Lexical surroundings of a literal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LiteralContext {
    /// Binary name of the enclosing class
    pub class: String,
    pub method: Option<MethodKey>,
    /// Field whose initializer contains the literal
    pub field: Option<String>,
    pub call_target: Option<CallTarget>,
}

impl LiteralContext {
    pub fn in_class(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    pub fn in_method(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.method = Some(MethodKey::new(self.class.clone(), name, descriptor));
        self
    }

    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// The literal is argument `index` of a call to `method`.
    pub fn argument_of(mut self, method: MethodKey, index: usize) -> Self {
        self.call_target = Some(CallTarget {
            method,
            slot: TargetSlot::Parameter(index),
        });
        self
    }

    /// The literal is returned from the enclosing method.
    pub fn returned(mut self) -> Self {
        self.call_target = self.method.clone().map(|method| CallTarget {
            method,
            slot: TargetSlot::Return,
        });
        self
    }
}

/// One literal token in a host source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub literal: Literal,
    /// Byte span of the literal token
    pub span: Range<usize>,
    /// Span of a unary minus directly applied to the literal
    pub minus_span: Option<Range<usize>>,
}

impl Occurrence {
    pub fn new(literal: Literal, span: Range<usize>) -> Self {
        Self {
            literal,
            span,
            minus_span: None,
        }
    }

    pub fn negated_by(mut self, minus_span: Range<usize>) -> Self {
        self.minus_span = Some(minus_span);
        self
    }

    pub fn is_negated(&self) -> bool {
        self.minus_span.is_some()
    }
}

/// Replacement text for one literal.
///
/// When `remove_minus` is set the text already accounts for the preceding unary minus, which
/// the host must delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    pub remove_minus: bool,
}

/// A concrete text patch, as produced for provenance sources the host did not query itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub text: String,
    pub remove: Option<Range<usize>>,
}

impl Edit {
    pub fn new(occurrence: &Occurrence, replacement: Replacement) -> Self {
        let remove = if replacement.remove_minus {
            occurrence.minus_span.clone()
        } else {
            None
        };
        Self {
            span: occurrence.span.clone(),
            text: replacement.text,
            remove,
        }
    }
}

/// Apply non-overlapping edits to `source`.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut patches: Vec<(Range<usize>, &str)> = Vec::new();
    for edit in edits {
        patches.push((edit.span.clone(), edit.text.as_str()));
        if let Some(remove) = &edit.remove {
            patches.push((remove.clone(), ""));
        }
    }
    // back to front so earlier offsets stay valid
    patches.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut patched = source.to_string();
    for (span, text) in patches {
        patched.replace_range(span, text);
    }
    patched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returned_uses_enclosing_method() {
        let context = LiteralContext::in_class("a.B")
            .in_method("color", "()I")
            .returned();
        assert_eq!(
            context.call_target,
            Some(CallTarget {
                method: MethodKey::new("a.B", "color", "()I"),
                slot: TargetSlot::Return,
            })
        );
        assert_eq!(LiteralContext::in_class("a.B").returned().call_target, None);
    }

    #[test]
    fn test_apply_edits_removes_minus() {
        let source = "f(-1, 2);";
        let first = Occurrence::new(Literal::int(1), 3..4).negated_by(2..3);
        let second = Occurrence::new(Literal::int(2), 6..7);
        let edits = vec![
            Edit::new(
                &first,
                Replacement {
                    text: "A.NEG".to_string(),
                    remove_minus: true,
                },
            ),
            Edit::new(
                &second,
                Replacement {
                    text: "A.TWO".to_string(),
                    remove_minus: false,
                },
            ),
        ];
        assert_eq!(apply_edits(source, &edits), "f(A.NEG, A.TWO);");
    }
}
