//! One-hop provenance for local variables passed as call arguments
//!
//! `foo(color)` where `color` is a local: the literals the variable was initialized or
//! assigned with are rewritten as if they had been passed to `foo` directly. Only one hop is
//! followed; a source that is itself a local variable is ignored.

use super::context::{Edit, LiteralContext, Occurrence};
use super::LiteralRewriter;
use crate::unpick::index::{ClassModel, MethodKey};

/// A call argument, as classified by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(Occurrence),
    /// Bare reference to a local variable
    Local { name: String },
    Other,
}

/// Host access to the definitions of local variables.
pub trait LocalProvenance {
    /// The initializer of `variable` and every direct assignment to it in `method`, excluding
    /// assignments nested inside other calls.
    fn sources(&self, method: &MethodKey, variable: &str) -> Vec<Argument>;
}

impl<'a, M: ClassModel> LiteralRewriter<'a, M> {
    /// Edits for one call argument, following a local variable back to its sources.
    pub fn rewrite_argument(
        &self,
        argument: &Argument,
        context: &LiteralContext,
        provenance: &dyn LocalProvenance,
    ) -> Vec<Edit> {
        match argument {
            Argument::Literal(occurrence) => self.edit(occurrence, context).into_iter().collect(),
            Argument::Local { name } => {
                let Some(method) = &context.method else {
                    return Vec::new();
                };
                provenance
                    .sources(method, name)
                    .iter()
                    .filter_map(|source| match source {
                        Argument::Literal(occurrence) => self.edit(occurrence, context),
                        _ => None,
                    })
                    .collect()
            }
            Argument::Other => Vec::new(),
        }
    }

    fn edit(&self, occurrence: &Occurrence, context: &LiteralContext) -> Option<Edit> {
        self.rewrite(occurrence, context)
            .map(|replacement| Edit::new(occurrence, replacement))
    }
}
