//! Lookup sources the loader resolves variable names against.

use std::{
    collections::{BTreeMap, HashMap},
    env,
};

/// Something that maps variable names to values.
///
/// The loader treats `None` and `Some("")` the same way: both fall back to
/// the field's default.
pub trait Source {
    fn get(&self, key: &str) -> Option<String>;
}

/// The live process environment. Every lookup reads the current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                tracing::warn!(env = key, "ignoring environment variable with non-unicode value");
                None
            }
        }
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl Source for [(&str, &str)] {
    fn get(&self, key: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

impl<const N: usize> Source for [(&str, &str); N] {
    fn get(&self, key: &str) -> Option<String> {
        Source::get(self.as_slice(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_env_reads_live_value() {
        env::set_var("ENVCONF_SOURCE_TEST_LIVE", "first");
        assert_eq!(ProcessEnv.get("ENVCONF_SOURCE_TEST_LIVE").as_deref(), Some("first"));

        env::set_var("ENVCONF_SOURCE_TEST_LIVE", "second");
        assert_eq!(ProcessEnv.get("ENVCONF_SOURCE_TEST_LIVE").as_deref(), Some("second"));

        env::remove_var("ENVCONF_SOURCE_TEST_LIVE");
        assert_eq!(ProcessEnv.get("ENVCONF_SOURCE_TEST_LIVE"), None);
    }

    #[test]
    fn test_process_env_missing() {
        assert_eq!(ProcessEnv.get("ENVCONF_SOURCE_TEST_NEVER_SET"), None);
    }

    #[test]
    fn test_hash_map_source() {
        let mut vars = HashMap::new();
        vars.insert("PORT".to_string(), "9090".to_string());

        assert_eq!(Source::get(&vars, "PORT").as_deref(), Some("9090"));
        assert_eq!(Source::get(&vars, "HOST"), None);
    }

    #[test]
    fn test_btree_map_source() {
        let mut vars = BTreeMap::new();
        vars.insert("HOST".to_string(), String::new());

        assert_eq!(Source::get(&vars, "HOST").as_deref(), Some(""));
    }

    #[test]
    fn test_pair_array_source() {
        let vars = [("A", "1"), ("B", "2")];

        assert_eq!(Source::get(&vars, "B").as_deref(), Some("2"));
        assert_eq!(Source::get(&vars, "C"), None);
    }

    #[test]
    fn test_reference_source() {
        let vars = [("A", "1")];
        let by_ref = &vars;

        assert_eq!(Source::get(&by_ref, "A").as_deref(), Some("1"));
    }
}
