use anyhow::Context;

use super::types::{StoreConfig, UnsupportedPolicy};

pub const ENV_STORE_NAME: &str = "FUSESTATE_STORE_NAME";
pub const ENV_LOG_LEVEL: &str = "FUSESTATE_LOG_LEVEL";
pub const ENV_ON_UNSUPPORTED: &str = "FUSESTATE_ON_UNSUPPORTED";

impl StoreConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str::<StoreConfig>(s).context("Failed to parse store config")
    }

    /// Applies `FUSESTATE_*` environment variables on top of `self`.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::apply_env_overrides`] with an explicit lookup.
    /// Blank values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_STORE_NAME) {
            self.name = v.trim().to_string();
        }
        if let Some(v) = get(ENV_LOG_LEVEL) {
            self.logging.level = v.trim().to_string();
        }
        if let Some(v) = get(ENV_ON_UNSUPPORTED) {
            self.clone.on_unsupported = v
                .parse::<UnsupportedPolicy>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid {ENV_ON_UNSUPPORTED}"))?;
        }

        Ok(())
    }
}

/// Defaults plus environment overrides.
pub fn load_default() -> anyhow::Result<StoreConfig> {
    let mut cfg = StoreConfig::default();
    cfg.apply_env_overrides()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.name, "store");
        assert_eq!(cfg.clone.on_unsupported, UnsupportedPolicy::Error);
        assert!(cfg.logging.enabled);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn parses_nested_sections() {
        let cfg = StoreConfig::from_toml_str(
            r#"
name = "cart"

[clone]
on_unsupported = "null"

[logging]
enabled = false
level = "fusestate=debug"
"#,
        )
        .unwrap();

        assert_eq!(cfg.name, "cart");
        assert_eq!(cfg.clone.on_unsupported, UnsupportedPolicy::Null);
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.logging.level, "fusestate=debug");
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = StoreConfig::from_toml_str("[clone]\non_unsupported = \"maybe\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse store config"));
    }

    #[test]
    fn overrides_apply_and_blank_is_ignored() {
        let vars = HashMap::from([
            (ENV_STORE_NAME, " profile "),
            (ENV_LOG_LEVEL, "  "),
            (ENV_ON_UNSUPPORTED, "NULL"),
        ]);
        let mut cfg = StoreConfig::default();
        cfg.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(cfg.name, "profile");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.clone.on_unsupported, UnsupportedPolicy::Null);
    }

    #[test]
    fn bad_policy_override_is_an_error() {
        let mut cfg = StoreConfig::default();
        let err = cfg
            .apply_overrides_from(|k| (k == ENV_ON_UNSUPPORTED).then(|| "sometimes".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_ON_UNSUPPORTED));
    }
}
