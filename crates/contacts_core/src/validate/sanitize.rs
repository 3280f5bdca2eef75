//! Free-text sanitization and email shape checks.
//!
//! # Invariants
//! - HTML cleaning removes every tag and attribute but keeps text content,
//!   including the body of `<script>` and `<style>`; `<`, `>`, `&` left in
//!   text come back escaped.
//! - The SQL denylist runs on the cleaned text, so escaped entities (which
//!   end in `;`) are rejected too.

use super::ValidationError;
use crate::config::SanitizePolicy;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static SQL_DENYLIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(;|--|\b(drop|select|insert|delete|update|alter|create|truncate)\b)")
        .expect("valid sql denylist regex")
});
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex"));

/// Cleans HTML markup from `value` and applies the SQL denylist.
///
/// # Errors
/// - `ValidationError::UnsafeInput` when the cleaned text matches the
///   denylist and `policy.denylist` is enabled.
pub fn sanitize_text(value: &str, policy: SanitizePolicy) -> Result<String, ValidationError> {
    let cleaned = strip_html(value);
    if policy.denylist && matches_sql_denylist(&cleaned) {
        return Err(ValidationError::UnsafeInput);
    }
    Ok(cleaned)
}

/// Removes all HTML tags while keeping their text content.
pub fn strip_html(value: &str) -> String {
    ammonia::Builder::empty()
        .clean_content_tags(HashSet::new())
        .clean(value)
        .to_string()
}

/// Returns whether `value` contains `;`, `--` or a whole-word SQL keyword.
pub fn matches_sql_denylist(value: &str) -> bool {
    SQL_DENYLIST_RE.is_match(value)
}

/// Permissive `local@domain.tld` shape check.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, matches_sql_denylist, sanitize_text, strip_html};
    use crate::config::SanitizePolicy;
    use crate::validate::ValidationError;

    #[test]
    fn strip_html_removes_script_tags_but_keeps_text() {
        let cleaned = strip_html("<script>alert('XSS')</script>");
        assert!(!cleaned.contains("<script>"));
        assert!(cleaned.contains("alert"));
    }

    #[test]
    fn strip_html_removes_every_tag_and_attribute() {
        assert_eq!(strip_html("<img src=x onerror=alert(1)>Eve"), "Eve");
        assert_eq!(strip_html("<div><table>X</table></div>"), "X");
        assert_eq!(strip_html("<b>Ada</b> <a href=\"https://x.test\">Byron</a>"), "Ada Byron");
        assert!(!strip_html("<p onclick=\"x()\">Hi</p>").contains('<'));
    }

    #[test]
    fn strip_html_leaves_plain_text_untouched() {
        assert_eq!(strip_html("Jane"), "Jane");
        assert_eq!(strip_html("测试😊{}\"'"), "测试😊{}\"'");
    }

    #[test]
    fn denylist_matches_keywords_case_insensitively() {
        assert!(matches_sql_denylist("Robert'); DROP TABLE contact"));
        assert!(matches_sql_denylist("drop table"));
        assert!(matches_sql_denylist("SeLeCt"));
        assert!(matches_sql_denylist("name -- comment"));
        assert!(matches_sql_denylist("a;b"));
    }

    #[test]
    fn denylist_only_matches_whole_words() {
        assert!(!matches_sql_denylist("Dropbox"));
        assert!(!matches_sql_denylist("Selection"));
        assert!(!matches_sql_denylist("recreated"));
        assert!(!matches_sql_denylist("created"));
        assert!(matches_sql_denylist("please create one"));
    }

    #[test]
    fn sanitize_text_rejects_escaped_entities_with_denylist() {
        let err = sanitize_text("Tom & Jerry", SanitizePolicy::default()).unwrap_err();
        assert_eq!(err, ValidationError::UnsafeInput);
    }

    #[test]
    fn sanitize_text_without_denylist_only_cleans_html() {
        let policy = SanitizePolicy { denylist: false };
        let cleaned = sanitize_text("DROP <i>TABLE</i><iframe></iframe>", policy).unwrap();
        assert_eq!(cleaned, "DROP TABLE");
    }

    #[test]
    fn is_valid_email_accepts_permissive_shape() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("a b@c.d"));
        assert!(is_valid_email("x@y.z.w"));
    }

    #[test]
    fn is_valid_email_rejects_malformed_values() {
        assert!(!is_valid_email("invalidemail"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("@b.c"));
        assert!(!is_valid_email("a@b."));
    }
}
