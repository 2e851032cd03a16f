use serde_json::Value;

/// Fragments older uploads were stored with; removed wherever they appear.
const LEGACY_FRAGMENTS: &[&str] = &["../frontend/public/", "frontend/public/"];

/// Leading segments stripped before the base URL is applied.
const LEADING_PREFIXES: &[&str] = &["./", "/", "public/"];

/// Segments that some uploads duplicated.
const DUPLICATED_SEGMENTS: &[(&str, &str)] = &[
    ("events/events/", "events/"),
    ("uploads/uploads/", "uploads/"),
];

/// Turn a stored image path into a servable URL.
///
/// Absolute `http...` input is returned unchanged. Relative paths have legacy
/// fragments stripped and are prefixed with `base_url`. Blank input gives `None`.
pub fn normalize_media_url(base_url: &str, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http") {
        return Some(trimmed.to_string());
    }

    let mut path = trimmed.replace('\\', "/");
    for fragment in LEGACY_FRAGMENTS {
        path = path.replace(fragment, "");
    }

    loop {
        let before = path.len();
        for prefix in LEADING_PREFIXES {
            if let Some(rest) = path.strip_prefix(prefix) {
                path = rest.to_string();
            }
        }
        if path.len() == before {
            break;
        }
    }

    for (duplicated, single) in DUPLICATED_SEGMENTS {
        while path.contains(duplicated) {
            path = path.replace(duplicated, single);
        }
    }

    if path.is_empty() {
        return None;
    }

    Some(format!("{}/{}", base_url.trim_end_matches('/'), path))
}

/// Undo the base URL prefix so stored paths stay relative.
///
/// URLs on other hosts and already-relative paths are returned trimmed.
pub fn strip_media_base(base_url: &str, url: &str) -> String {
    let trimmed = url.trim();
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return trimmed.to_string();
    }
    match trimmed.strip_prefix(base).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => trimmed.to_string(),
    }
}

pub fn strip_media_bases(base_url: &str, urls: &[String]) -> Vec<String> {
    urls.iter().map(|u| strip_media_base(base_url, u)).collect()
}

pub fn normalize_media_urls(base_url: &str, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| normalize_media_url(base_url, p))
        .collect()
}

/// Decode a gallery column.
///
/// Accepts a JSON array, a string holding a JSON array, a comma-joined string
/// or null. Blank entries are dropped.
pub fn decode_gallery(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let s = s.trim();
            if s.starts_with('[') {
                if let Ok(inner) = serde_json::from_str::<Value>(s) {
                    return decode_gallery(&inner);
                }
            }
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Galleries are always written back as a JSON array.
pub fn encode_gallery(paths: &[String]) -> Value {
    Value::Array(paths.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "http://localhost:8080";

    #[test]
    fn test_absolute_urls_pass_through() {
        let url = "https://cdn.example.com/a.png";
        assert_eq!(normalize_media_url(BASE, url).as_deref(), Some(url));
        assert_eq!(
            normalize_media_url(BASE, "http://x/y.jpg").as_deref(),
            Some("http://x/y.jpg")
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "uploads/venues/a.png",
            "../frontend/public/uploads/b.png",
            "/events/events/c.png",
        ] {
            let once = normalize_media_url(BASE, raw).unwrap();
            let twice = normalize_media_url(BASE, &once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_relative_paths_get_base() {
        assert_eq!(
            normalize_media_url(BASE, "uploads/venues/a.png").as_deref(),
            Some("http://localhost:8080/uploads/venues/a.png")
        );
        assert_eq!(
            normalize_media_url("http://api.test/", "/uploads/a.png").as_deref(),
            Some("http://api.test/uploads/a.png")
        );
    }

    #[test]
    fn test_legacy_prefixes_are_stripped() {
        assert_eq!(
            normalize_media_url(BASE, "../frontend/public/uploads/a.png").as_deref(),
            Some("http://localhost:8080/uploads/a.png")
        );
        assert_eq!(
            normalize_media_url(BASE, "./public/images/x.jpg").as_deref(),
            Some("http://localhost:8080/images/x.jpg")
        );
        assert_eq!(
            normalize_media_url(BASE, "uploads\\artists\\y.jpg").as_deref(),
            Some("http://localhost:8080/uploads/artists/y.jpg")
        );
    }

    #[test]
    fn test_duplicated_segments_collapse() {
        assert_eq!(
            normalize_media_url(BASE, "uploads/events/events/poster.png").as_deref(),
            Some("http://localhost:8080/uploads/events/poster.png")
        );
        assert_eq!(
            normalize_media_url(BASE, "uploads/uploads/uploads/a.png").as_deref(),
            Some("http://localhost:8080/uploads/a.png")
        );
    }

    #[test]
    fn test_blank_paths_are_dropped() {
        assert_eq!(normalize_media_url(BASE, ""), None);
        assert_eq!(normalize_media_url(BASE, "   "), None);
        assert_eq!(normalize_media_url(BASE, "/"), None);
        let urls = normalize_media_urls(BASE, &["".into(), "a.png".into()]);
        assert_eq!(urls, vec!["http://localhost:8080/a.png".to_string()]);
    }

    #[test]
    fn test_strip_media_base_keeps_paths_relative() {
        assert_eq!(
            strip_media_base(BASE, "http://localhost:8080/uploads/venues/a.png"),
            "uploads/venues/a.png"
        );
        assert_eq!(
            strip_media_base("http://localhost:8080/", "http://localhost:8080/uploads/a.png"),
            "uploads/a.png"
        );
        assert_eq!(strip_media_base(BASE, "uploads/a.png"), "uploads/a.png");
        assert_eq!(
            strip_media_base(BASE, "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        // a different port is a different host
        assert_eq!(
            strip_media_base(BASE, "http://localhost:80801/a.png"),
            "http://localhost:80801/a.png"
        );
    }

    #[test]
    fn test_returned_gallery_survives_base_url_change() {
        let stored = vec!["uploads/artists/a.png".to_string()];
        let returned = normalize_media_urls(BASE, &stored);
        // client sends the reordered gallery straight back
        let written = strip_media_bases(BASE, &returned);
        assert_eq!(written, stored);
        assert_eq!(
            normalize_media_urls("https://media.example.com", &written),
            vec!["https://media.example.com/uploads/artists/a.png".to_string()]
        );
    }

    #[test]
    fn test_gallery_round_trip() {
        let paths = vec![
            "uploads/a.png".to_string(),
            "uploads/b, c.png".to_string(),
            "https://x/y.png".to_string(),
        ];
        assert_eq!(decode_gallery(&encode_gallery(&paths)), paths);
        assert_eq!(decode_gallery(&encode_gallery(&[])), Vec::<String>::new());
    }

    #[test]
    fn test_decode_legacy_encodings() {
        assert_eq!(
            decode_gallery(&json!("[\"a.png\",\"b.png\"]")),
            vec!["a.png", "b.png"]
        );
        assert_eq!(decode_gallery(&json!("a.png, b.png,,")), vec!["a.png", "b.png"]);
        assert_eq!(decode_gallery(&json!(null)), Vec::<String>::new());
        assert_eq!(decode_gallery(&json!(["a.png", 3, " "])), vec!["a.png"]);
    }
}
