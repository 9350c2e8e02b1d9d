//! URL-safe slug generation for organizations.

/// Lowercases and collapses a name into a URL-safe slug. Returns
/// "business" when nothing survives.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "business".to_string()
    } else {
        slug
    }
}

/// Appends a base36 timestamp suffix so concurrent signups never collide
/// on the unique slug column.
#[must_use]
pub fn unique_slug(name: &str, timestamp_millis: i64) -> String {
    format!("{}-{}", slugify(name), to_base36(timestamp_millis))
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = value.unsigned_abs();
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Ada's Business", "ada-s-business")]
    #[case("  ACME  Inc.  ", "acme-inc")]
    #[case("My Business", "my-business")]
    #[case("!!!", "business")]
    #[case("", "business")]
    fn test_slugify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn test_unique_slug_suffix() {
        assert_eq!(unique_slug("Acme", 36), "acme-10");
        assert_eq!(unique_slug("Acme", 0), "acme-0");
    }

    #[test]
    fn test_distinct_timestamps_distinct_slugs() {
        assert_ne!(unique_slug("Acme", 1_700_000_000_000), unique_slug("Acme", 1_700_000_000_001));
    }
}
