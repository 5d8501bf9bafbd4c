// src/domain/link.rs
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in a query component: everything except
/// alphanumerics and `- _ . ! ~ * ' ( )`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strip trailing slashes from a base URL.
pub fn normalize_base_url(base: &str) -> &str {
    base.trim().trim_end_matches('/')
}

/// Build the default link for `tag` below `base`: `<base>?q=<encoded tag>`.
///
/// ```
/// use tagsmith::domain::link::build_default_url;
///
/// let url = build_default_url("https://s.example/search/", "::Topic/AI");
/// assert_eq!(url, "https://s.example/search?q=%3A%3ATopic%2FAI");
/// ```
pub fn build_default_url(base: &str, tag: &str) -> String {
    let clean = normalize_base_url(base);
    let query = utf8_percent_encode(tag, QUERY_COMPONENT);
    format!("{clean}?q={query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("::Topic/AI", "https://s.example/search?q=%3A%3ATopic%2FAI")]
    #[case("::Company/Foo", "https://s.example/search?q=%3A%3ACompany%2FFoo")]
    #[case("//Location/New York", "https://s.example/search?q=%2F%2FLocation%2FNew%20York")]
    #[case("it's (ok)!", "https://s.example/search?q=it's%20(ok)!")]
    #[case("café", "https://s.example/search?q=caf%C3%A9")]
    fn given_tag_when_building_default_url_then_encodes_query(
        #[case] tag: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(build_default_url("https://s.example/search", tag), expected);
    }

    #[test]
    fn given_trailing_slashes_when_normalizing_then_strips_all() {
        assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
    }
}
