use chrono::{DateTime, Utc};

const PREFIX: &str = "decisionlog_";
const EXTENSION: &str = ".json";

/// Canonical name for a new document file:
/// `decisionlog_<normalized-username>_<YYYYMMDDTHHMMSSZ>.json`.
pub fn new_file_name(username: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}{}_{}{}",
        PREFIX,
        normalize_username(username),
        now.format("%Y%m%dT%H%M%SZ"),
        EXTENSION
    )
}

/// Whether a remote file name follows the naming convention.
pub fn is_candidate(name: &str) -> bool {
    name.len() > PREFIX.len() + EXTENSION.len()
        && name.starts_with(PREFIX)
        && name.ends_with(EXTENSION)
}

/// Lowercased and stripped to ASCII alphanumerics; `"user"` when nothing
/// survives.
fn normalize_username(username: &str) -> String {
    let normalized: String = username
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if normalized.is_empty() {
        "user".into()
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn builds_canonical_name() {
        assert_eq!(
            new_file_name("jdoe", fixed_now()),
            "decisionlog_jdoe_20240101T000000Z.json"
        );
    }

    #[test]
    fn username_is_normalized() {
        assert_eq!(
            new_file_name("J. Doe-42", fixed_now()),
            "decisionlog_jdoe42_20240101T000000Z.json"
        );
        assert_eq!(
            new_file_name("öäü", fixed_now()),
            "decisionlog_user_20240101T000000Z.json"
        );
    }

    #[test]
    fn generated_names_are_candidates() {
        assert!(is_candidate(&new_file_name("jdoe", Utc::now())));
        assert!(is_candidate("decisionlog_jdoe_20240101T000000Z.json"));
    }

    #[test]
    fn foreign_names_are_not_candidates() {
        for name in [
            "notes.txt",
            "decisionlog_",
            "decisionlog_.json",
            "other_jdoe_20240101T000000Z.json",
            "decisionlog_jdoe_20240101T000000Z.json.bak",
        ] {
            assert!(!is_candidate(name), "'{name}' should not be a candidate");
        }
    }
}
