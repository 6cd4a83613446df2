//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the configuration key and is used only for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_is_unchanged() {
        assert_eq!(expand_env("html", "data.dir").unwrap(), "html");
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_env("${NAVTREE_TEST_SURELY_UNSET:-out/html}", "data.dir").unwrap();
        assert_eq!(value, "out/html");
    }

    #[test]
    fn test_unset_without_default_is_error() {
        let err = expand_env("${NAVTREE_TEST_SURELY_UNSET}", "data.dir").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("data.dir"), "{msg}");
        assert!(msg.contains("NAVTREE_TEST_SURELY_UNSET"), "{msg}");
    }
}
