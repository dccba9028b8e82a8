//! `${VAR}` and `${VAR:-default}` expansion for path-like config values.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Values without a `${` sequence are returned as-is.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(UnsetVar(var.to_owned())),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: each test uses a unique variable name
        unsafe {
            std::env::set_var("TOCGEN_TEST_DOCS_ROOT", "/srv/site");
        }
        let result = expand_env("${TOCGEN_TEST_DOCS_ROOT}/docs", "docs.source_dir").unwrap();
        assert_eq!(result, "/srv/site/docs");
        unsafe {
            std::env::remove_var("TOCGEN_TEST_DOCS_ROOT");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: each test uses a unique variable name
        unsafe {
            std::env::remove_var("TOCGEN_TEST_UNSET_ROOT");
        }
        let result = expand_env("${TOCGEN_TEST_UNSET_ROOT:-content}", "docs.source_dir").unwrap();
        assert_eq!(result, "content");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: each test uses a unique variable name
        unsafe {
            std::env::remove_var("TOCGEN_TEST_MISSING");
        }
        let err = expand_env("${TOCGEN_TEST_MISSING}", "docs.source_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("TOCGEN_TEST_MISSING"));
        assert!(message.contains("docs.source_dir"));
    }

    #[test]
    fn test_plain_value_unchanged() {
        assert_eq!(expand_env("docs", "docs.source_dir").unwrap(), "docs");
    }
}
