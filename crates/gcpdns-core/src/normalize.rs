//! Record and zone normalization.
//!
//! Pure functions, no I/O: every value is canonicalized here before it
//! reaches the gateway. Covers trailing-dot termination for name-like
//! fields, `|`-delimited data splitting, and long-TXT-value chunking.

use crate::error::CoreError;
use crate::model::RecordType;

/// Maximum length of a single TXT string segment on the wire.
pub const TXT_CHUNK_LEN: usize = 255;

// ── Names ───────────────────────────────────────────────────────────

/// Canonicalize a DNS name: lowercase and dot-terminated. Idempotent.
pub fn fqdn(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    ensure_trailing_dot(&lower)
}

/// Append a trailing dot if the value lacks one. Idempotent.
///
/// Used for record data that reference domain names (CNAME targets,
/// MX exchanges); the value is not lowercased or otherwise altered.
pub fn ensure_trailing_dot(value: &str) -> String {
    if value.ends_with('.') {
        value.to_owned()
    } else {
        format!("{value}.")
    }
}

// ── Data fields ─────────────────────────────────────────────────────

/// Split a `|`-delimited CSV data field into ordered values.
///
/// Empty segments (including a fully empty field) are a validation
/// error: they would otherwise submit blank record data to the API.
pub fn split_data(raw: &str) -> Result<Vec<String>, CoreError> {
    let values: Vec<String> = raw.split('|').map(ToOwned::to_owned).collect();
    if values.iter().any(String::is_empty) {
        return Err(CoreError::validation(format!(
            "empty segment in data field: {raw:?}"
        )));
    }
    Ok(values)
}

/// Normalize record data values for their record type.
///
/// Domain-valued types get dot-terminated targets; TXT values are
/// cleaned and chunked. Everything else passes through untouched.
pub fn normalize_rrdata(record_type: RecordType, values: Vec<String>) -> Vec<String> {
    match record_type {
        RecordType::TXT => values.into_iter().map(|v| normalize_txt_value(&v)).collect(),
        t if t.has_domain_data() => values
            .into_iter()
            .map(|v| ensure_trailing_dot(&v))
            .collect(),
        _ => values,
    }
}

// ── TXT values ──────────────────────────────────────────────────────

/// Normalize a single TXT value. Idempotent.
///
/// Values already in chunked-quoted wire form pass through unchanged.
/// Otherwise stray quoting noise is stripped, and values longer than
/// [`TXT_CHUNK_LEN`] are split into consecutive quoted chunks whose
/// concatenation (quotes removed) reproduces the input exactly.
pub fn normalize_txt_value(raw: &str) -> String {
    if parse_txt_chunks(raw).is_some() {
        return raw.to_owned();
    }

    let cleaned = strip_quote_noise(raw);
    if cleaned.chars().count() <= TXT_CHUNK_LEN {
        return cleaned;
    }

    let mut out = String::with_capacity(cleaned.len() + 8);
    let mut chunk = String::with_capacity(TXT_CHUNK_LEN);
    for c in cleaned.chars() {
        chunk.push(c);
        if chunk.chars().count() == TXT_CHUNK_LEN {
            out.push('"');
            out.push_str(&chunk);
            out.push('"');
            chunk.clear();
        }
    }
    if !chunk.is_empty() {
        out.push('"');
        out.push_str(&chunk);
        out.push('"');
    }
    out
}

/// Parse a value of the wire form `"chunk""chunk"...` into its chunks.
///
/// Returns `None` unless the whole value is a sequence of quoted
/// segments each within the wire limit.
pub fn parse_txt_chunks(value: &str) -> Option<Vec<&str>> {
    let mut chunks = Vec::new();
    let mut rest = value.strip_prefix('"')?;
    loop {
        let end = rest.find('"')?;
        let chunk = &rest[..end];
        if chunk.chars().count() > TXT_CHUNK_LEN {
            return None;
        }
        chunks.push(chunk);
        rest = &rest[end + 1..];
        if rest.is_empty() {
            return Some(chunks);
        }
        rest = rest.strip_prefix('"')?;
    }
}

/// Remove quote characters and any whitespace immediately following
/// them, mirroring how quoted TXT input arrives from spreadsheets.
fn strip_quote_noise(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut skipping_space = false;
    for c in value.chars() {
        match c {
            '"' | '\'' | '`' => skipping_space = true,
            _ if skipping_space && c.is_whitespace() => {}
            _ => {
                skipping_space = false;
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fqdn_appends_dot_and_lowercases() {
        assert_eq!(fqdn("A.Example.COM"), "a.example.com.");
        assert_eq!(fqdn("example.com."), "example.com.");
    }

    #[test]
    fn fqdn_is_idempotent() {
        let once = fqdn("www.Example.com");
        assert_eq!(fqdn(&once), once);
    }

    #[test]
    fn trailing_dot_is_idempotent() {
        assert_eq!(ensure_trailing_dot("mail.example.com"), "mail.example.com.");
        assert_eq!(ensure_trailing_dot("mail.example.com."), "mail.example.com.");
    }

    #[test]
    fn split_data_preserves_order() {
        let values = split_data("ns1.example.com|ns2.example.com").unwrap();
        assert_eq!(values, vec!["ns1.example.com", "ns2.example.com"]);
    }

    #[test]
    fn split_data_rejects_empty_segments() {
        assert!(split_data("").is_err());
        assert!(split_data("a||b").is_err());
        assert!(split_data("a|").is_err());
    }

    #[test]
    fn mx_data_gets_dot_terminated() {
        let values = normalize_rrdata(
            RecordType::MX,
            vec!["10 mail.example.com".into(), "20 backup.example.com.".into()],
        );
        assert_eq!(values, vec!["10 mail.example.com.", "20 backup.example.com."]);
    }

    #[test]
    fn a_record_data_passes_through() {
        let values = normalize_rrdata(RecordType::A, vec!["192.0.2.1".into()]);
        assert_eq!(values, vec!["192.0.2.1"]);
    }

    #[test]
    fn short_txt_value_is_unchanged() {
        assert_eq!(normalize_txt_value("v=spf1 -all"), "v=spf1 -all");
    }

    #[test]
    fn long_txt_value_round_trips_through_chunks() {
        let original: String = "abcdefghij".repeat(70); // 700 chars
        let chunked = normalize_txt_value(&original);

        let chunks = parse_txt_chunks(&chunked).expect("chunked form should parse");
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= TXT_CHUNK_LEN));
        assert_eq!(chunks.concat(), original);
    }

    #[test]
    fn txt_normalization_is_idempotent() {
        let original: String = "x".repeat(600);
        let once = normalize_txt_value(&original);
        let twice = normalize_txt_value(&once);
        assert_eq!(once, twice);

        let short = normalize_txt_value("hello world");
        assert_eq!(normalize_txt_value(&short), short);
    }

    #[test]
    fn txt_quote_noise_is_stripped() {
        assert_eq!(
            normalize_txt_value("' v=DKIM1; k=rsa; p=MIGf"),
            "v=DKIM1; k=rsa; p=MIGf"
        );
    }

    #[test]
    fn exact_boundary_txt_value_is_unchanged() {
        let value: String = "y".repeat(TXT_CHUNK_LEN);
        assert_eq!(normalize_txt_value(&value), value);
    }
}
