use std::path::Path;

/// Split a path on either separator, dropping empty and `.` components
pub(crate) fn path_components(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

/// Number of equal trailing components
pub(crate) fn common_suffix_len(a: &[&str], b: &[&str]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Relative report paths are taken as relative to the repository root;
/// absolute ones must start with it.
pub(crate) fn is_under_root(candidate: &str, repo_root: Option<&Path>) -> bool {
    let Some(root) = repo_root else {
        return false;
    };
    if !is_absolute(candidate) {
        return true;
    }
    let root = root.to_string_lossy();
    let root_components = path_components(&root);
    let candidate_components = path_components(candidate);
    candidate_components.starts_with(&root_components)
}

/// Pick the candidate sharing the longest tail with `requested`.
///
/// At least the file name must match. Ties go to candidates under the
/// repository root, then to the lexicographically smallest path, so the
/// result never depends on iteration order.
pub fn best_match<'a>(
    requested: &Path,
    candidates: impl Iterator<Item = &'a str>,
    repo_root: Option<&Path>,
) -> Option<&'a str> {
    let requested = requested.to_string_lossy();
    let wanted = path_components(&requested);

    candidates
        .filter_map(|candidate| {
            let suffix = common_suffix_len(&wanted, &path_components(candidate));
            (suffix > 0).then(|| (suffix, is_under_root(candidate, repo_root), candidate))
        })
        .max_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.cmp(&b.1))
                // Reverse so the smaller path wins the max
                .then_with(|| b.2.cmp(a.2))
        })
        .map(|(_, _, candidate)| candidate)
}
