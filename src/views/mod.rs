//! Built-in views.
//!
//! Content, not architecture: each module is a small data transform
//! plus a paint routine, declared as a `ViewSpec`. One view per render
//! strategy keeps the whole contract exercised; site-specific walls
//! register their own specs next to these.

use crate::view::ViewSpec;

pub mod cells;
pub mod crafting;
pub mod energy;
pub mod idle;
pub mod items;
pub mod machines;

/// Factories for every built-in view, in registry order.
pub fn builtin() -> Vec<(&'static str, fn() -> ViewSpec)> {
    vec![
        ("items", items::spec as fn() -> ViewSpec),
        ("cells", cells::spec),
        ("crafting", crafting::spec),
        ("machines", machines::spec),
        ("energy", energy::spec),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_specs_validate() {
        for (name, build) in builtin() {
            let spec = build();
            assert_eq!(spec.name, name);
            spec.validate().unwrap_or_else(|e| panic!("{}: {}", name, e));
        }
    }

    #[test]
    fn test_builtin_names_unique() {
        let mut names: Vec<_> = builtin().into_iter().map(|(n, _)| n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), builtin().len());
    }
}
