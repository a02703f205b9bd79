//! The catalogue of phases every project has without creating them.

/// A phase that implicitly exists for every project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinPhase {
    /// Machine name (scope key).
    pub name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Position in the phase list.
    pub order: i32,
}

/// Built-in construction phases in schedule order.
pub const BUILTIN_PHASES: &[BuiltinPhase] = &[
    BuiltinPhase { name: "pre_construction", display_name: "Pre-Construction", order: 0 },
    BuiltinPhase { name: "site_work", display_name: "Site Work", order: 1 },
    BuiltinPhase { name: "foundation", display_name: "Foundation", order: 2 },
    BuiltinPhase { name: "framing", display_name: "Framing", order: 3 },
    BuiltinPhase { name: "mep_rough_in", display_name: "MEP Rough-In", order: 4 },
    BuiltinPhase { name: "enclosure", display_name: "Enclosure", order: 5 },
    BuiltinPhase { name: "interior_finishes", display_name: "Interior Finishes", order: 6 },
    BuiltinPhase { name: "closeout", display_name: "Closeout", order: 7 },
];

/// Look up a built-in phase by machine name.
pub fn find(name: &str) -> Option<&'static BuiltinPhase> {
    BUILTIN_PHASES.iter().find(|p| p.name == name)
}

/// Check if `name` is a built-in phase.
pub fn is_builtin(name: &str) -> bool {
    find(name).is_some()
}
