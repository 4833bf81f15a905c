// src/config/env.rs
// EMNO_* environment variables

use tracing::warn;

/// Values read from the environment; `None` means "not set"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    /// EMNO_TOKEN
    pub token: Option<String>,
    /// EMNO_BASE_URL
    pub base_url: Option<String>,
    /// EMNO_SHOULD_THROW
    pub should_throw: Option<bool>,
    /// EMNO_LOG_ERRORS
    pub log_errors: Option<bool>,
    /// EMNO_MAX_RETRIES
    pub max_retries: Option<u32>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            token: read("EMNO_TOKEN"),
            base_url: read("EMNO_BASE_URL"),
            should_throw: read("EMNO_SHOULD_THROW").and_then(|v| parse_bool("EMNO_SHOULD_THROW", &v)),
            log_errors: read("EMNO_LOG_ERRORS").and_then(|v| parse_bool("EMNO_LOG_ERRORS", &v)),
            max_retries: read("EMNO_MAX_RETRIES").and_then(|v| match v.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(value = %v, "Ignoring non-numeric EMNO_MAX_RETRIES");
                    None
                }
            }),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(name, value, "Ignoring unrecognized boolean");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let env = EnvOverrides::from_lookup(lookup(&[]));
        assert_eq!(env, EnvOverrides::default());
    }

    #[test]
    fn test_reads_all_values() {
        let env = EnvOverrides::from_lookup(lookup(&[
            ("EMNO_TOKEN", "abc"),
            ("EMNO_BASE_URL", "http://localhost:3000"),
            ("EMNO_SHOULD_THROW", "yes"),
            ("EMNO_LOG_ERRORS", "0"),
            ("EMNO_MAX_RETRIES", "2"),
        ]));
        assert_eq!(env.token.as_deref(), Some("abc"));
        assert_eq!(env.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(env.should_throw, Some(true));
        assert_eq!(env.log_errors, Some(false));
        assert_eq!(env.max_retries, Some(2));
    }

    #[test]
    fn test_blank_and_garbage_values_ignored() {
        let env = EnvOverrides::from_lookup(lookup(&[
            ("EMNO_TOKEN", "   "),
            ("EMNO_SHOULD_THROW", "maybe"),
            ("EMNO_MAX_RETRIES", "lots"),
        ]));
        assert!(env.token.is_none());
        assert!(env.should_throw.is_none());
        assert!(env.max_retries.is_none());
    }
}
