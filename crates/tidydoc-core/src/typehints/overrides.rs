//! Qualified-name override table.
//!
//! Reflection reports classes under their defining module, which is often a
//! private submodule of where users import them from. The table maps such
//! reflected names to the documented ones. Keys may pin a cross-reference
//! role; a role-agnostic entry answers for any role.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use tidydoc_host::{Config, SetupError};

/// A table key: a reflected qualified name, optionally pinned to a role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OverrideKey {
    /// Role hint; `None` answers lookups for any role.
    pub role: Option<String>,
    /// The reflected dotted name.
    pub name: String,
}

impl OverrideKey {
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            role: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            name: name.into(),
        }
    }
}

/// Replacement entry for one reflected qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideTarget {
    /// The documented qualified name to link to.
    pub name: String,
    /// Cross-reference role override; `None` means infer from the class.
    pub role: Option<String>,
}

impl OverrideTarget {
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    #[must_use]
    pub fn with_role(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Some(role.into()),
        }
    }
}

/// A key or value as it appears in user configuration: either a bare name
/// or a `[role, name]` pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EntrySpec {
    Name(String),
    Pair(Option<String>, String),
}

impl From<EntrySpec> for OverrideKey {
    fn from(spec: EntrySpec) -> Self {
        match spec {
            EntrySpec::Name(name) => Self { role: None, name },
            EntrySpec::Pair(role, name) => Self { role, name },
        }
    }
}

impl From<EntrySpec> for OverrideTarget {
    fn from(spec: EntrySpec) -> Self {
        match spec {
            EntrySpec::Name(name) => Self { name, role: None },
            EntrySpec::Pair(role, name) => Self { name, role },
        }
    }
}

/// The user's override entries: a name-keyed mapping, or a sequence of
/// key/value pairs when a key needs a role pin.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum EntriesRepr {
    Map(BTreeMap<String, EntrySpec>),
    Seq(Vec<(EntrySpec, EntrySpec)>),
}

/// Layered override table: user entries shadow the built-in defaults
/// entry by entry.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    user: BTreeMap<OverrideKey, OverrideTarget>,
    defaults: BTreeMap<OverrideKey, OverrideTarget>,
}

impl OverrideTable {
    /// An empty table with the stock default entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: BTreeMap::new(),
            defaults: default_entries(),
        }
    }

    /// Build the table from the `qualname_overrides` config value.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let mut table = Self::new();
        let entries: EntriesRepr = config.get("qualname_overrides")?;
        match entries {
            EntriesRepr::Map(map) => {
                for (name, value) in map {
                    table.insert(OverrideKey::name(name), value.into());
                }
            }
            EntriesRepr::Seq(seq) => {
                for (key, value) in seq {
                    table.insert(key.into(), value.into());
                }
            }
        }
        Ok(table)
    }

    /// Insert a user-layer entry.
    pub fn insert(&mut self, key: OverrideKey, target: OverrideTarget) {
        self.user.insert(key, target);
    }

    fn get_exact(&self, role: Option<&str>, name: &str) -> Option<&OverrideTarget> {
        let key = OverrideKey {
            role: role.map(str::to_owned),
            name: name.to_owned(),
        };
        self.user.get(&key).or_else(|| self.defaults.get(&key))
    }

    /// Every distinct pinned role in either layer, in stable order.
    fn roles(&self) -> BTreeSet<&str> {
        self.user
            .keys()
            .chain(self.defaults.keys())
            .filter_map(|key| key.role.as_deref())
            .collect()
    }

    /// Look up a reflected name, user layer first.
    ///
    /// With a role hint, the pinned entry answers before the role-agnostic
    /// one. Without a hint, the role-agnostic entry answers before any
    /// pinned entry for the same name.
    #[must_use]
    pub fn get(&self, role_hint: Option<&str>, name: &str) -> Option<&OverrideTarget> {
        match role_hint {
            Some(role) => self
                .get_exact(Some(role), name)
                .or_else(|| self.get_exact(None, name)),
            None => self.get_exact(None, name).or_else(|| {
                self.roles()
                    .into_iter()
                    .find_map(|role| self.get_exact(Some(role), name))
            }),
        }
    }

    /// Whether [`get`](Self::get) would find an entry.
    #[must_use]
    pub fn contains(&self, role_hint: Option<&str>, name: &str) -> bool {
        self.get(role_hint, name).is_some()
    }

    /// All visible entries: user entries plus unshadowed defaults.
    pub fn entries(&self) -> impl Iterator<Item = (&OverrideKey, &OverrideTarget)> {
        self.user.iter().chain(
            self.defaults
                .iter()
                .filter(|(key, _)| !self.user.contains_key(*key)),
        )
    }
}

/// Classes commonly documented under a different module than reflection
/// reports them in. Recorded role-agnostically.
fn default_entries() -> BTreeMap<OverrideKey, OverrideTarget> {
    [
        ("anndata.base.AnnData", "anndata.AnnData"),
        ("anndata.core.anndata.AnnData", "anndata.AnnData"),
        ("anndata._core.anndata.AnnData", "anndata.AnnData"),
        ("matplotlib.axes._axes.Axes", "matplotlib.axes.Axes"),
        ("pandas.core.frame.DataFrame", "pandas.DataFrame"),
        ("pandas.core.indexes.base.Index", "pandas.Index"),
        ("scipy.sparse.base.spmatrix", "scipy.sparse.spmatrix"),
        ("scipy.sparse.csr.csr_matrix", "scipy.sparse.csr_matrix"),
        ("scipy.sparse.csc.csc_matrix", "scipy.sparse.csc_matrix"),
    ]
    .into_iter()
    .map(|(source, name)| (OverrideKey::name(source), OverrideTarget::name(name)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tidydoc_host::Rebuild;

    fn config_with(value: serde_json::Value) -> Config {
        let mut config = Config::new();
        config.add_value("qualname_overrides", json!({}), Rebuild::Html);
        config.set("qualname_overrides", value);
        config
    }

    #[test]
    fn test_defaults_present() {
        let table = OverrideTable::new();
        let target = table.get(None, "pandas.core.frame.DataFrame").unwrap();
        assert_eq!(target.name, "pandas.DataFrame");
        assert!(target.role.is_none());
    }

    #[test]
    fn test_user_entry_shadows_default() {
        let config = config_with(json!({"pandas.core.frame.DataFrame": "pd.DataFrame"}));
        let table = OverrideTable::from_config(&config).unwrap();
        assert_eq!(
            table.get(None, "pandas.core.frame.DataFrame").unwrap().name,
            "pd.DataFrame"
        );
        // Other defaults remain visible through the user layer.
        assert_eq!(
            table.get(None, "pandas.core.indexes.base.Index").unwrap().name,
            "pandas.Index"
        );
    }

    #[test]
    fn test_role_hint_prefers_pinned_entry() {
        let mut table = OverrideTable::new();
        table.insert(OverrideKey::name("a.B"), OverrideTarget::name("plain.B"));
        table.insert(
            OverrideKey::with_role("py:obj", "a.B"),
            OverrideTarget::name("obj.B"),
        );
        assert_eq!(table.get(Some("py:obj"), "a.B").unwrap().name, "obj.B");
        // A hint without a pinned entry falls back to the agnostic one.
        assert_eq!(table.get(Some("py:exc"), "a.B").unwrap().name, "plain.B");
    }

    #[test]
    fn test_no_hint_prefers_agnostic_then_scans_roles() {
        let mut table = OverrideTable::new();
        table.insert(
            OverrideKey::with_role("py:obj", "a.B"),
            OverrideTarget::name("obj.B"),
        );
        assert_eq!(table.get(None, "a.B").unwrap().name, "obj.B");

        table.insert(OverrideKey::name("a.B"), OverrideTarget::name("plain.B"));
        assert_eq!(table.get(None, "a.B").unwrap().name, "plain.B");
    }

    #[test]
    fn test_pair_value_carries_role() {
        let config = config_with(json!({"a.b.C": ["py:obj", "a.C"]}));
        let table = OverrideTable::from_config(&config).unwrap();
        let target = table.get(None, "a.b.C").unwrap();
        assert_eq!(target.name, "a.C");
        assert_eq!(target.role.as_deref(), Some("py:obj"));
    }

    #[test]
    fn test_pair_value_with_null_role() {
        let config = config_with(json!({"a.b.C": [null, "a.C"]}));
        let table = OverrideTable::from_config(&config).unwrap();
        assert!(table.get(None, "a.b.C").unwrap().role.is_none());
    }

    #[test]
    fn test_sequence_form_allows_pinned_keys() {
        let config = config_with(json!([
            ["a.b.C", "a.C"],
            [["py:exc", "d.e.F"], ["py:exc", "d.F"]],
        ]));
        let table = OverrideTable::from_config(&config).unwrap();
        assert_eq!(table.get(None, "a.b.C").unwrap().name, "a.C");
        assert_eq!(table.get(Some("py:exc"), "d.e.F").unwrap().name, "d.F");
        assert!(table.contains(None, "d.e.F"));
    }

    #[test]
    fn test_malformed_entry_rejected() {
        let config = config_with(json!({"a.b.C": 3}));
        assert!(OverrideTable::from_config(&config).is_err());
    }

    #[test]
    fn test_miss_returns_none() {
        let table = OverrideTable::new();
        assert!(table.get(None, "nothing.Here").is_none());
        assert!(!table.contains(Some("py:class"), "nothing.Here"));
    }
}
