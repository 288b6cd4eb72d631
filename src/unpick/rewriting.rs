//! Literal rewriting
//!
//! [`LiteralRewriter`] answers one question per literal the host finds: should this literal be
//! written differently, and if so how? Candidate groups are tried in a fixed order and the
//! first group that produces text wins:
//!
//! 1. groups named by the target slot the literal flows into (a parameter or the return value
//!    of a target method, possibly inherited)
//! 2. ambient groups of the enclosing method, class, package, then unnamed global groups
//!
//! Within one group the strategies are: exact constant match, flag decomposition (flag groups
//! only), format-only rewrite (groups with a display format), and finally a retry at each
//! narrower type the literal could have been widened from. Strict groups only match literals
//! of their own declared type and never take part in a retry.

pub mod context;
mod flags;
mod format;
pub mod provenance;
mod value;

pub use context::{
    apply_edits, CallTarget, Edit, LiteralContext, Occurrence, Replacement, TargetSlot,
};
pub use provenance::{Argument, LocalProvenance};

use crate::unpick::ast::{ConstantKey, DataType, Expression, GroupDefinition, Literal};
use crate::unpick::formats::{render_expression, render_literal};
use crate::unpick::index::{package_name, ClassModel, ConstantIndex, IndexedGroup};
use serde::Deserialize;
use tracing::{debug, trace};
use value::TypedValue;

/// Order in which a flag group's constants are offered to the decomposition walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagOrder {
    /// Constants in declaration order
    #[default]
    Declaration,
    /// Largest unsigned value first
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriterOptions {
    pub flag_order: FlagOrder,
    /// Retry at narrower types the literal may have been widened from
    pub widening: bool,
    /// Digit case of format-only hex rewrites
    pub hex_uppercase: bool,
}

impl Default for RewriterOptions {
    fn default() -> Self {
        Self {
            flag_order: FlagOrder::Declaration,
            widening: true,
            hex_uppercase: true,
        }
    }
}

pub struct LiteralRewriter<'a, M: ClassModel> {
    index: &'a ConstantIndex<M>,
    options: RewriterOptions,
}

impl<'a, M: ClassModel> LiteralRewriter<'a, M> {
    pub fn new(index: &'a ConstantIndex<M>) -> Self {
        Self {
            index,
            options: RewriterOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RewriterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RewriterOptions {
        &self.options
    }

    /// Decide the replacement for one literal occurrence, if any.
    pub fn rewrite(&self, occurrence: &Occurrence, context: &LiteralContext) -> Option<Replacement> {
        let value = TypedValue::of(&occurrence.literal, occurrence.is_negated())?;

        let text = self
            .targeted_groups(context)
            .into_iter()
            .chain(self.ambient_groups(context))
            .find_map(|group| self.decide_group(group, &value, context, false))?;

        Some(Replacement {
            text,
            remove_minus: occurrence.is_negated(),
        })
    }

    fn targeted_groups(&self, context: &LiteralContext) -> Vec<&'a IndexedGroup> {
        let Some(call) = &context.call_target else {
            return Vec::new();
        };
        let Some(target) = self.index.target_method(&call.method) else {
            return Vec::new();
        };
        let id = match call.slot {
            TargetSlot::Parameter(index) => target.param_group(index),
            TargetSlot::Return => target.return_group.as_deref(),
        };
        let Some(id) = id else {
            return Vec::new();
        };

        let groups = self.index.groups_by_id(id);
        if groups.is_empty() {
            debug!(group = %id, method = %call.method, "target slot names no known group");
        }
        groups
    }

    fn ambient_groups(&self, context: &LiteralContext) -> Vec<&'a IndexedGroup> {
        let mut groups = Vec::new();
        if let Some(method) = &context.method {
            groups.extend(self.index.method_groups(method));
        }
        groups.extend(self.index.class_groups(&context.class));
        groups.extend(self.index.package_groups(package_name(&context.class)));
        groups.extend(self.index.global_groups());
        groups
    }

    fn decide_group(
        &self,
        group: &IndexedGroup,
        value: &TypedValue,
        context: &LiteralContext,
        narrowed: bool,
    ) -> Option<String> {
        let definition = &group.definition;
        if definition.strict && narrowed {
            return None;
        }

        if accepts(definition, value.ty) {
            if let Some(text) = self.exact_match(group, value, context) {
                trace!(group = ?definition.name, ty = %value.ty, %text, "exact match");
                return Some(text);
            }
            if definition.is_flag() {
                if let Some(text) = self.decompose_flags(definition, value, context) {
                    trace!(group = ?definition.name, ty = %value.ty, %text, "flag decomposition");
                    return Some(text);
                }
            }
            // a narrowed value would lose the literal's long or floating suffix
            if let Some(display_format) = definition.format.filter(|_| !narrowed) {
                if let Some(text) = format::reformat(value, display_format, self.options.hex_uppercase) {
                    trace!(
                        group = ?definition.name,
                        format = display_format.keyword(),
                        %text,
                        "format rewrite"
                    );
                    return Some(text);
                }
            }
        }

        if !self.options.widening {
            return None;
        }
        value
            .ty
            .widened_from()
            .iter()
            .filter_map(|narrower| value.narrow_to(*narrower))
            .find_map(|smaller| self.decide_group(group, &smaller, context, true))
    }

    fn exact_match(
        &self,
        group: &IndexedGroup,
        value: &TypedValue,
        context: &LiteralContext,
    ) -> Option<String> {
        let constant = group.constant(&value.key())?;
        if refers_to_own_field(&constant.value, context) {
            trace!(field = ?context.field, "skipping self-referencing constant");
            return None;
        }
        Some(render_expression(&constant.value))
    }

    fn decompose_flags(
        &self,
        definition: &GroupDefinition,
        value: &TypedValue,
        context: &LiteralContext,
    ) -> Option<String> {
        let (bits, mask) = value.flag_bits()?;

        let mut candidates: Vec<(u64, &Expression)> = definition
            .constants
            .iter()
            .filter(|constant| !refers_to_own_field(&constant.value, context))
            .filter_map(|constant| match constant.lookup_key() {
                ConstantKey::Integral(key) => Some((key as u64 & mask, &constant.value)),
                _ => None,
            })
            .collect();
        if self.options.flag_order == FlagOrder::Descending {
            candidates.sort_by(|a, b| b.0.cmp(&a.0));
        }

        let cover = flags::decompose(&candidates, bits, mask)?;
        let mut terms: Vec<String> = cover
            .terms
            .iter()
            .map(|term| render_expression(term))
            .collect();
        if cover.residual != 0 {
            terms.push(residual_literal(cover.residual, value.ty));
        }

        let joined = terms.join(" | ");
        Some(if cover.negated {
            format!("~({})", joined)
        } else {
            joined
        })
    }
}

/// A group matches literals of its own type and, unless strict, literals that widen to it.
fn accepts(group: &GroupDefinition, ty: DataType) -> bool {
    group.data_type == ty || (!group.strict && ty.widens_to(group.data_type))
}

/// True when `expression` names the field whose initializer is being rewritten.
fn refers_to_own_field(expression: &Expression, context: &LiteralContext) -> bool {
    context.field.as_deref().is_some_and(|own| {
        expression.references_field(&|field| field.name == own && field.class == context.class)
    })
}

fn residual_literal(residual: u64, ty: DataType) -> String {
    let literal = if ty == DataType::Long {
        Literal::long(residual as i64)
    } else {
        Literal::int(residual as u32 as i32)
    };
    render_literal(&literal)
}
