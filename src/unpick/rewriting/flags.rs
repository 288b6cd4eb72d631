//! Bitmask decomposition of flag values
//!
//! A value is covered greedily by the group's flags, walking them in the order given. Two
//! covers are computed: one of the value itself and one of its complement. The complement
//! cover is only chosen when it is exact and either the direct cover leaves a residual or the
//! complement needs strictly fewer terms.

/// The chosen cover of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cover<T> {
    pub terms: Vec<T>,
    /// Bits no flag accounts for; always zero for a negated cover
    pub residual: u64,
    /// The terms cover the complement, so the result must be wrapped in `~(...)`
    pub negated: bool,
}

/// Decompose `value` (already masked to `mask`) over `(bits, term)` pairs.
///
/// Returns `None` when the chosen cover has no terms.
pub(crate) fn decompose<T: Copy>(flags: &[(u64, T)], value: u64, mask: u64) -> Option<Cover<T>> {
    let value = value & mask;
    let (positive, positive_residual) = walk(flags, value, mask);
    let (negative, negative_residual) = walk(flags, !value & mask, mask);

    let use_negated = negative_residual == 0
        && (positive_residual != 0 || negative.len() < positive.len());
    let cover = if use_negated {
        Cover {
            terms: negative,
            residual: 0,
            negated: true,
        }
    } else {
        Cover {
            terms: positive,
            residual: positive_residual,
            negated: false,
        }
    };

    (!cover.terms.is_empty()).then_some(cover)
}

fn walk<T: Copy>(flags: &[(u64, T)], target: u64, mask: u64) -> (Vec<T>, u64) {
    let mut residual = target;
    let mut terms = Vec::new();
    for &(bits, term) in flags {
        if residual == 0 {
            break;
        }
        let bits = bits & mask;
        if bits & residual != 0 && bits & !residual == 0 {
            residual &= !bits;
            terms.push(term);
        }
    }
    (terms, residual)
}
