//! Resolution of raw model names into unique, format-legal identifiers.
use std::collections::HashSet;

use crate::model::{Constraint, Variable};

/// Characters that may not start a name in the target formats.
const FORBIDDEN_FIRST_CHARS: &str = "$.0123456789";
/// Characters that may not appear anywhere in a name.
const FORBIDDEN_CHARS: &str = " +-*/<>=:\\";

/// Longest accepted sanitized name. Neither format pins a limit for
/// free-layout names, so this is a deliberate constant; anything longer
/// falls back to the obfuscated name instead of being truncated, since
/// truncation risks silent collisions.
pub const MAX_NAME_LENGTH: usize = 255;

/// Longest name the fixed MPS layout can carry.
pub const FIXED_MPS_NAME_LENGTH: usize = 8;

/// An entity carrying an optional raw name. Variables and constraints are
/// resolved by the same code; only the prefix of their synthetic names
/// differs.
pub trait Named {
    /// The raw name, if the model builder supplied one.
    fn given_name(&self) -> Option<&str>;
}

impl Named for Variable {
    fn given_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Named for Constraint {
    fn given_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The synthetic name of the entity at `index`: the kind prefix followed by
/// the 1-based index.
pub fn obfuscated_name(prefix: char, index: usize) -> String {
    format!("{}{}", prefix, index + 1)
}

/// Produces one resolved name per entity, index-aligned with `items`.
///
/// With `obfuscate` set, every entity gets its [obfuscated_name]. Otherwise
/// each raw name is kept as far as possible: an illegal leading character
/// gets a `_` prepended, every other illegal character becomes `_`, names
/// longer than [MAX_NAME_LENGTH] (and missing names) fall back to the
/// obfuscated form, and collisions with earlier resolved names are settled
/// by appending `_` and the smallest integer restoring uniqueness.
///
/// ```
/// use lp_export::model::Variable;
/// use lp_export::names::resolve_names;
///
/// let var = |name: &str| Variable {
///     name: Some(name.to_string()),
///     lower_bound: 0.0,
///     upper_bound: f64::INFINITY,
///     is_integer: false,
/// };
/// let vars = vec![var("x"), var("$20<=40"), var("x")];
/// assert_eq!(
///     resolve_names(&vars, 'V', false),
///     vec!["x", "_$20__40", "x_1"],
/// );
/// assert_eq!(resolve_names(&vars, 'V', true), vec!["V1", "V2", "V3"]);
/// ```
pub fn resolve_names<T: Named>(items: &[T], prefix: char, obfuscate: bool) -> Vec<String> {
    if obfuscate {
        return (0..items.len()).map(|i| obfuscated_name(prefix, i)).collect();
    }
    let mut seen = HashSet::with_capacity(items.len());
    let mut resolved = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let base = match item.given_name() {
            Some(raw) if !raw.is_empty() => {
                let sanitized = sanitize(raw);
                if sanitized.len() > MAX_NAME_LENGTH {
                    obfuscated_name(prefix, index)
                } else {
                    sanitized
                }
            }
            _ => obfuscated_name(prefix, index),
        };
        let name = deduplicate(base, &seen);
        seen.insert(name.clone());
        resolved.push(name);
    }
    resolved
}

fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    if raw.starts_with(|c: char| FORBIDDEN_FIRST_CHARS.contains(c)) {
        out.push('_');
    }
    for c in raw.chars() {
        out.push(if FORBIDDEN_CHARS.contains(c) { '_' } else { c });
    }
    out
}

fn deduplicate(base: String, seen: &HashSet<String>) -> String {
    if !seen.contains(&base) {
        return base;
    }
    // The check runs against the full accumulated set, not just `base`:
    // "x", "x_1", "x" must resolve to "x", "x_1", "x_2".
    let mut k = 1usize;
    loop {
        let candidate = format!("{}_{}", base, k);
        if !seen.contains(&candidate) {
            return candidate;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(raw: Option<&str>) -> Variable {
        Variable {
            name: raw.map(str::to_string),
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
            is_integer: false,
        }
    }

    #[test]
    fn leading_and_inner_illegal_characters() {
        let vars = vec![named(Some("$20<=40"))];
        assert_eq!(resolve_names(&vars, 'V', false), vec!["_$20__40"]);
    }

    #[test]
    fn missing_names_fall_back_to_obfuscated() {
        let vars = vec![named(None), named(Some("")), named(Some("x"))];
        assert_eq!(resolve_names(&vars, 'V', false), vec!["V1", "V2", "x"]);
    }

    #[test]
    fn collision_chain_appends_smallest_free_suffix() {
        let vars = vec![
            named(Some("x")),
            named(Some("x_1")),
            named(Some("x")),
            named(Some("x")),
        ];
        assert_eq!(
            resolve_names(&vars, 'V', false),
            vec!["x", "x_1", "x_2", "x_3"],
        );
    }

    #[test]
    fn sanitization_can_collide_with_a_given_name() {
        // "a+b" sanitizes to "a_b", which the next entity already claimed.
        let vars = vec![named(Some("a_b")), named(Some("a+b"))];
        assert_eq!(resolve_names(&vars, 'V', false), vec!["a_b", "a_b_1"]);
    }

    #[test]
    fn oversized_names_are_replaced_not_truncated() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let vars = vec![named(Some(long.as_str()))];
        assert_eq!(resolve_names(&vars, 'V', false), vec!["V1"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let vars = vec![named(Some("a b")), named(None), named(Some("a_b"))];
        assert_eq!(
            resolve_names(&vars, 'V', false),
            resolve_names(&vars, 'V', false),
        );
    }
}
