use std::{
    collections::BTreeMap,
    path::{Component, Path},
};

use serde::{Deserialize, Serialize};

/// The name of the implicit module that owns every document not claimed by a
/// declared submodule.
///
/// A declared submodule must never use this name.
pub const ROOT_MODULE: &str = "root";

/// A named subtree of the crawl root whose outward references are tracked
/// separately from the root module's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submodule {
    /// The submodule name, used as its key in the calculated requirements.
    pub name: String,

    /// Folder prefixes, relative to the crawl root, owned by this submodule.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Any other keys authored alongside the declaration.
    ///
    /// These are not interpreted, only carried through to the manifest.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Submodule {
    /// Declare a submodule owning the given folder prefixes.
    pub fn new<I, S>(name: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            paths: paths.into_iter().map(Into::into).collect(),
            extra: BTreeMap::new(),
        }
    }

    fn owns(&self, relative: &str) -> bool {
        self.paths.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            relative
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Find the module that owns a document.
///
/// `relative` is the document's path relative to the crawl root. The first
/// declaration with a matching folder prefix wins, regardless of how long the
/// prefix is. Documents matching no declaration belong to [`ROOT_MODULE`].
#[must_use]
pub fn attribute<'a>(submodules: &'a [Submodule], relative: &Path) -> &'a str {
    let relative = slash_separated(relative);
    submodules
        .iter()
        .find(|submodule| submodule.owns(&relative))
        .map_or(ROOT_MODULE, |submodule| submodule.name.as_str())
}

/// Render a relative path with `/` separators regardless of platform.
fn slash_separated(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn declarations() -> Vec<Submodule> {
        vec![
            Submodule::new("lib-x", ["vendor/libX"]),
            Submodule::new("tools", ["tools/", "scripts"]),
        ]
    }

    #[test]
    fn document_under_prefix_belongs_to_submodule() {
        let submodules = declarations();
        assert_eq!(
            attribute(&submodules, Path::new("vendor/libX/docs/x.md")),
            "lib-x"
        );
    }

    #[test]
    fn any_declared_prefix_matches() {
        let submodules = declarations();
        assert_eq!(attribute(&submodules, Path::new("scripts/run.md")), "tools");
        assert_eq!(attribute(&submodules, Path::new("tools/a/b.md")), "tools");
    }

    #[test]
    fn unmatched_document_belongs_to_root() {
        let submodules = declarations();
        assert_eq!(attribute(&submodules, Path::new("docs/x.md")), ROOT_MODULE);
        assert_eq!(attribute(&[], Path::new("x.md")), ROOT_MODULE);
    }

    #[test]
    fn prefix_must_end_at_a_folder_boundary() {
        let submodules = declarations();
        assert_eq!(
            attribute(&submodules, Path::new("vendor/libXY/x.md")),
            ROOT_MODULE
        );
        // the prefix folder itself is not a document inside it
        assert_eq!(attribute(&submodules, Path::new("scripts")), ROOT_MODULE);
    }

    #[test]
    fn first_declaration_wins_over_longer_prefix() {
        let submodules = vec![
            Submodule::new("outer", ["vendor"]),
            Submodule::new("inner", ["vendor/libX"]),
        ];
        assert_eq!(
            attribute(&submodules, Path::new("vendor/libX/x.md")),
            "outer"
        );
    }

    #[test]
    fn deserialize_keeps_extra_keys() {
        let submodule: Submodule = serde_yaml::from_str(
            "name: lib-x\npaths:\n- vendor/libX\ndescription: The X library\n",
        )
        .unwrap();

        assert_eq!(submodule.name, "lib-x");
        assert_eq!(submodule.paths, vec!["vendor/libX".to_string()]);
        assert_eq!(
            submodule.extra.get("description"),
            Some(&serde_json::Value::String("The X library".to_string()))
        );
    }
}
