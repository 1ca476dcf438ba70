use std::sync::LazyLock;

use regex::Regex;

static ABSOLUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[/\\]|[a-z]:[/\\]|[a-z][a-z0-9+.-]*://)").expect("absolute path regex is valid")
});

/// Unix root, Windows drive or backslash root, or a URL scheme.
pub fn is_absolute(path: &str) -> bool {
    ABSOLUTE_RE.is_match(path)
}

/// `/path/to/repo.git` -> `repo`, `host.xz:foo/.git` -> `foo`
pub fn extract_repository_name_from_url(url: &str) -> String {
    let mut dir = url.trim_end_matches('/');
    if let Some(stripped) = dir.strip_suffix("/.git") {
        dir = stripped;
    }

    let base = dir.rsplit('/').next().unwrap_or(dir);
    let base = match base.strip_suffix(".git") {
        Some(s) if !s.is_empty() => s,
        _ => base,
    };

    match base.rfind(':') {
        Some(pos) => base[pos + 1..].to_string(),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/path/to/repo.git", "repo")]
    #[case("/path/to/repo/.git", "repo")]
    #[case("/path/to/repo/", "repo")]
    #[case("host.xz:foo/.git", "foo")]
    #[case("host.xz:foo.git", "foo")]
    #[case("git@github.com:acme/widget-tools.git", "widget-tools")]
    #[case("https://github.com/acme/widget-tools.git", "widget-tools")]
    #[case("file:///srv/repos/project", "project")]
    fn repository_names(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extract_repository_name_from_url(url), expected);
    }

    #[rstest]
    #[case("/tmp/repo", true)]
    #[case("\\\\server\\share", true)]
    #[case("C:\\work", true)]
    #[case("c:/work", true)]
    #[case("https://example.com/repo.git", true)]
    #[case("relative/dir", false)]
    #[case("repo", false)]
    #[case("./repo", false)]
    fn absolute_paths(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_absolute(path), expected);
    }
}
