//! Path normalization helpers shared by registration and dispatch.

/// Collapses a path into its canonical stored form: a leading `/`, no
/// trailing `/` (except the root), and no empty segments.
///
/// ```rust
/// use portico::path::normalize;
///
/// assert_eq!(normalize("users//42/"), "/users/42");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Joins a group prefix and a declared path, then normalizes the result.
pub fn join(prefix: &str, path: &str) -> String {
    normalize(&format!("{prefix}/{path}"))
}

/// Returns the path component of a raw request target, dropping any query
/// string or fragment. Absolute-form targets (`http://host/p`) lose their
/// scheme and authority.
pub fn extract_path(raw: &str) -> &str {
    let rest = match raw.find("://") {
        Some(i) => {
            let after = &raw[i + 3..];
            match after.find(['/', '?', '#']) {
                Some(j) => &after[j..],
                None => "",
            }
        }
        None => raw,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    match &rest[..end] {
        "" => "/",
        path => path,
    }
}

/// Strips `base` from the front of `path` when it ends on a segment
/// boundary.
///
/// `/api` under base `/api` becomes the root. `/apiv2/users` is outside the
/// base and comes back unchanged.
pub fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }
    match path.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_slashes() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("///"), "/");
        assert_eq!(normalize("/a/"), "/a");
        assert_eq!(normalize("a//b///c"), "/a/b/c");
    }

    #[test]
    fn join_merges_prefix_and_path() {
        assert_eq!(join("/api", "/widgets"), "/api/widgets");
        assert_eq!(join("/api/", "widgets/"), "/api/widgets");
        assert_eq!(join("api", ""), "/api");
        assert_eq!(join("", "/"), "/");
        assert_eq!(join("/v1/users", "{id}"), "/v1/users/{id}");
    }

    #[test]
    fn extract_path_drops_query_and_fragment() {
        assert_eq!(extract_path("/users/42?verbose=1"), "/users/42");
        assert_eq!(extract_path("/users/42#top"), "/users/42");
        assert_eq!(extract_path("?q=1"), "/");
        assert_eq!(extract_path("https://a.example/users?x"), "/users");
        assert_eq!(extract_path("https://a.example"), "/");
    }

    #[test]
    fn strip_base_stops_at_segment_boundaries() {
        assert_eq!(strip_base("/api/users", "/api"), "/users");
        assert_eq!(strip_base("/api", "/api"), "/");
        assert_eq!(strip_base("/api/", "/api/"), "/");
        assert_eq!(strip_base("/apiv2/users", "/api"), "/apiv2/users");
        assert_eq!(strip_base("/other/users", "/api"), "/other/users");
        assert_eq!(strip_base("/users", ""), "/users");
    }
}
