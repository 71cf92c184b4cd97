use url::Url;

// Relative page references are resolved against this before parsing.
const PAGE_BASE: &str = "http://localhost/";

/// First non-empty value of query parameter `name` in `href`.
///
/// `href` may be absolute (`http://host/Editar.html?id=3`) or relative to the
/// page (`Editar.html?id=3`, `?id=3`).
pub fn query_param(href: &str, name: &str) -> Option<String> {
    let base = Url::parse(PAGE_BASE).ok()?;
    let url = Url::options().base_url(Some(&base)).parse(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_from_absolute_url() {
        assert_eq!(query_param("http://shop.test/Editar.html?id=42", "id").as_deref(), Some("42"));
    }

    #[test]
    fn reads_from_relative_reference() {
        assert_eq!(query_param("Editar.html?id=abc&x=1", "id").as_deref(), Some("abc"));
        assert_eq!(query_param("?id=7", "id").as_deref(), Some("7"));
    }

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(query_param("Editar.html?id=a%20b", "id").as_deref(), Some("a b"));
    }

    #[test]
    fn first_value_wins() {
        assert_eq!(query_param("Editar.html?id=1&id=2", "id").as_deref(), Some("1"));
    }

    #[test]
    fn missing_or_empty_is_none() {
        assert_eq!(query_param("Editar.html", "id"), None);
        assert_eq!(query_param("Editar.html?other=1", "id"), None);
        assert_eq!(query_param("Editar.html?id=", "id"), None);
    }
}
