//! Hierarchical path grammar: `root-name ( "/" segment )*`.
//!
//! Paths are derived from the live parent chain and never stored on atoms.
//! Segments are atom names verbatim, so names must not contain the separator.

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Error returned when a name cannot be used as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Empty names would produce empty path segments.
    #[error("Atom name must not be empty")]
    Empty,
    /// The separator inside a name would corrupt path resolution.
    #[error("Atom name {name:?} contains the path separator '/'")]
    ContainsSeparator {
        /// The rejected name.
        name: String,
    },
}

/// Check that `name` is usable as a single path segment.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(NameError::ContainsSeparator {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Join a root name and child segments into a path string.
pub fn join_path<S: AsRef<str>>(root: &str, segments: &[S]) -> String {
    let mut path = String::from(root);
    for segment in segments {
        path.push(PATH_SEPARATOR);
        path.push_str(segment.as_ref());
    }
    path
}

/// Split a path into its segments, root first.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR)
}

/// Number of segments in a path (the root counts as one).
pub fn depth(path: &str) -> usize {
    split_path(path).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("acme-corp").is_ok());
        assert!(validate_name("web server 01").is_ok());
        assert_eq!(validate_name(""), Err(NameError::Empty));
        assert!(matches!(
            validate_name("a/b"),
            Err(NameError::ContainsSeparator { .. })
        ));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path::<&str>("global", &[]), "global");
        assert_eq!(join_path("global", &["acme-corp"]), "global/acme-corp");
        assert_eq!(
            join_path("global", &["acme-corp", "web-services", "web-server-01"]),
            "global/acme-corp/web-services/web-server-01"
        );
    }

    #[test]
    fn test_split_and_depth() {
        let path = "global/acme-corp/web-services";
        let segments: Vec<_> = split_path(path).collect();
        assert_eq!(segments, vec!["global", "acme-corp", "web-services"]);
        assert_eq!(depth(path), 3);
        assert_eq!(depth("global"), 1);
    }
}
