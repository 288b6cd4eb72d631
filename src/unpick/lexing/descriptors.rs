//! On-demand scanning of JVM descriptors

use once_cell::sync::Lazy;
use regex::Regex;

const FIELD: &str = r"\[*(?:[BCDFIJSZ]|L[^;\s]+;)";

static FIELD_DESCRIPTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{FIELD}")).expect("valid field descriptor regex"));

static METHOD_DESCRIPTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\((?:{FIELD})*\)(?:V|{FIELD})")).expect("valid method descriptor regex")
});

/// Which descriptor grammar the parser expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Field,
    Method,
}

/// Length in bytes of the descriptor at the start of `text`, if there is a well formed one
/// that ends at a token boundary.
pub(crate) fn scan(text: &str, kind: DescriptorKind) -> Option<usize> {
    let pattern = match kind {
        DescriptorKind::Field => &FIELD_DESCRIPTOR,
        DescriptorKind::Method => &METHOD_DESCRIPTOR,
    };
    let len = pattern.find(text)?.end();
    match text[len..].chars().next() {
        None | Some(' ' | '\t' | '\r' | '\n' | '#') => Some(len),
        Some(_) => None,
    }
}
