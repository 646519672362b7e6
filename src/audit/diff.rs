use crate::core::{DiffResult, ModuleSnapshot};

/// Compare two snapshots by qualified name.
///
/// `missing` holds names present only in `original`, `added` names present
/// only in `refactored`. Both lists are sorted; line numbers and complexity
/// play no part in the comparison.
pub fn diff(original: &ModuleSnapshot, refactored: &ModuleSnapshot) -> DiffResult {
    let before = original.qualified_names();
    let after = refactored.qualified_names();

    DiffResult {
        missing: before.difference(&after).map(|s| s.to_string()).collect(),
        added: after.difference(&before).map(|s| s.to_string()).collect(),
    }
}
