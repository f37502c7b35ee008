use std::{fmt, path::Path};

/// How a resolved link target relates to the module being crawled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    /// The target lies inside the module root (or is the root itself).
    Internal,
    /// The target lies inside the root's parent, but outside the root.
    Sibling,
    /// The target lies outside the root's parent.
    External,
}

impl Relationship {
    /// Classify `candidate` against `target_root`.
    ///
    /// Both paths are expected to be absolute and normalised. Containment is
    /// checked component-wise, so `/repo/module-extra` is not inside
    /// `/repo/module`.
    ///
    /// A root without a parent (the filesystem root) has no siblings.
    #[must_use]
    pub fn classify(target_root: &Path, candidate: &Path) -> Self {
        if candidate.starts_with(target_root) {
            return Self::Internal;
        }

        match target_root.parent() {
            Some(parent) if candidate.starts_with(parent) => Self::Sibling,
            _ => Self::External,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Internal => "internal",
            Self::Sibling => "sibling",
            Self::External => "external",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use test_case::test_case;

    use super::Relationship;

    #[test_case("/repo/moduleA", Relationship::Internal; "equal to root")]
    #[test_case("/repo/moduleA/docs/x.md", Relationship::Internal; "nested under root")]
    #[test_case("/repo/moduleB/readme.md", Relationship::Sibling; "neighbouring module")]
    #[test_case("/repo/readme.md", Relationship::Sibling; "direct child of parent")]
    #[test_case("/repo", Relationship::Sibling; "equal to parent")]
    #[test_case("/repo/moduleA-extra/x.md", Relationship::Sibling; "shared string prefix")]
    #[test_case("/outside/readme.md", Relationship::External; "outside parent")]
    #[test_case("/repository/x.md", Relationship::External; "parent string prefix only")]
    fn classify(candidate: &str, expected: Relationship) {
        let actual = Relationship::classify(Path::new("/repo/moduleA"), Path::new(candidate));
        assert_eq!(actual, expected);
    }

    #[test]
    fn filesystem_root_has_no_siblings() {
        assert_eq!(
            Relationship::classify(Path::new("/"), Path::new("/anything")),
            Relationship::Internal
        );
    }

    #[test]
    fn display() {
        assert_eq!(Relationship::Sibling.to_string(), "sibling");
    }
}
