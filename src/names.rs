use crate::error::{QuickenvError, QuickenvResult};
use once_cell::sync::Lazy;
use regex::Regex;

// Safe both as a single path component and as a bare shell word.
static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

const MAX_LEN: usize = 64;

pub fn validate_env_name(name: &str) -> QuickenvResult<()> {
    validate("environment name", name)
}

pub fn validate_alias(alias: &str) -> QuickenvResult<()> {
    validate("alias", alias)
}

fn validate(kind: &'static str, value: &str) -> QuickenvResult<()> {
    if value.is_empty() {
        return Err(invalid(kind, value, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid(kind, value, "cannot contain spaces"));
    }
    if value.contains(['/', '\\']) {
        return Err(invalid(kind, value, "cannot contain path separators"));
    }
    if value.len() > MAX_LEN {
        return Err(invalid(kind, value, "is longer than 64 characters"));
    }
    if !IDENT.is_match(value) {
        return Err(invalid(
            kind,
            value,
            "must start with a letter or digit and contain only letters, digits, '.', '_' or '-'",
        ));
    }
    Ok(())
}

fn invalid(kind: &'static str, value: &str, reason: &'static str) -> QuickenvError {
    QuickenvError::InvalidName {
        kind,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_names() {
        for ok in ["web", "data-science", "py3.11", "a", "ml_2024", "0day"] {
            assert!(validate_env_name(ok).is_ok(), "{ok} should be valid");
        }
    }

    #[test]
    fn rejects_unsafe_names() {
        for bad in ["", "my env", "../up", "a/b", "a\\b", "..", ".hidden", "-flag", "a;rm", "$(x)"] {
            assert!(
                matches!(validate_env_name(bad), Err(QuickenvError::InvalidName { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_env_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn space_error_mentions_spaces() {
        let err = validate_alias("my alias").unwrap_err();
        assert!(err.to_string().contains("cannot contain spaces"));
    }
}
