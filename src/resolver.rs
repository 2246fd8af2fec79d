//! Path resolution for the static asset server
//!
//! Maps an untrusted request path to an on-disk path with SPA fallback:
//! the cleaned path is joined onto the asset root and stat'ed; a missing
//! file resolves to the index document so client-side routing can take
//! over.

use std::io;
use std::path::{Path, PathBuf};

/// Resolution failure, mapped to an HTTP status class by the handler.
#[derive(Debug)]
pub enum ResolveError {
    /// Malformed request path (null bytes, invalid encoding) -> 400.
    BadRequest(String),
    /// Filesystem stat failure other than not-found -> 500.
    Internal(String),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad request path: {msg}"),
            Self::Internal(msg) => write!(f, "path resolution failed: {msg}"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Outcome of resolving a request path against the asset root.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The candidate path exists on disk; serve it.
    Asset(PathBuf),
    /// The candidate does not exist; serve the index document instead.
    Fallback(PathBuf),
}

impl Resolution {
    pub fn path(&self) -> &Path {
        match self {
            Self::Asset(p) | Self::Fallback(p) => p,
        }
    }
}

/// Resolves request paths within one asset root. Read-only after startup.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    index: PathBuf,
}

impl PathResolver {
    pub fn new(static_dir: impl Into<PathBuf>, index_file: impl Into<PathBuf>) -> Self {
        Self {
            root: static_dir.into(),
            index: index_file.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute-within-root path of the SPA index document.
    pub fn fallback_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }

    /// Resolve a raw request path to a filesystem path to serve.
    ///
    /// The cleaned path is joined onto the root and stat'ed: not-found
    /// selects the index fallback, any other stat failure is surfaced as an
    /// internal error without falling back.
    pub async fn resolve(&self, raw_path: &str) -> Result<Resolution, ResolveError> {
        let normalized = normalize_request_path(raw_path)?;
        let relative = normalized.trim_start_matches('/');
        let candidate = if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        };

        match tokio::fs::metadata(&candidate).await {
            Ok(_) => Ok(Resolution::Asset(candidate)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Resolution::Fallback(self.fallback_path()))
            }
            Err(e) => Err(ResolveError::Internal(format!(
                "stat '{}': {e}",
                candidate.display()
            ))),
        }
    }
}

/// Normalize an untrusted URL path into a rooted, lexically cleaned form.
///
/// The cleaning is computed without reference to the asset root: `.` and
/// empty segments are dropped and `..` pops the previous segment, with `..`
/// at the root ignored. An empty path is treated as `/`.
///
/// Known gaps, deliberately left as-is and probed by tests rather than
/// silently fixed:
/// - Percent-escapes are not decoded, so encoded traversal variants such as
///   `..%2f..%2fetc/passwd` and `%2e%2e/%2e%2e/etc/passwd` survive cleaning
///   as literal file names. On Unix they cannot match a real file inside
///   the root and fall back to the index, which keeps out-of-root bytes
///   unreachable but differs from a strict-confinement reading.
/// - Backslashes are ordinary name characters here; on a platform where
///   `\` separates path components, `..\..\` sequences would not be
///   cleaned and joining them onto the root could escape it.
pub fn normalize_request_path(raw: &str) -> Result<String, ResolveError> {
    if raw.contains('\0') {
        return Err(ResolveError::BadRequest(
            "path contains a null byte".to_string(),
        ));
    }
    if raw.bytes().any(|b| b.is_ascii_control()) {
        return Err(ResolveError::BadRequest(
            "path contains control characters".to_string(),
        ));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    Ok(format!("/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn assets() -> (tempfile::TempDir, PathResolver) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html>spa</html>").unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static").join("app.js"), "console.log(1)").unwrap();
        let resolver = PathResolver::new(dir.path(), "index.html");
        (dir, resolver)
    }

    #[test]
    fn normalize_cleans_dot_segments() {
        assert_eq!(normalize_request_path("/a/./b/../c").unwrap(), "/a/c");
        assert_eq!(normalize_request_path("/a//b/").unwrap(), "/a/b");
        assert_eq!(normalize_request_path("").unwrap(), "/");
        assert_eq!(normalize_request_path("/").unwrap(), "/");
    }

    #[test]
    fn normalize_drops_leading_traversal() {
        assert_eq!(normalize_request_path("/../../etc/passwd").unwrap(), "/etc/passwd");
        assert_eq!(normalize_request_path("/..").unwrap(), "/");
        assert_eq!(normalize_request_path("/../..").unwrap(), "/");
    }

    #[test]
    fn normalize_keeps_encoded_traversal_literal() {
        // Encoded variants are not decoded; they stay literal file names.
        assert_eq!(
            normalize_request_path("/..%2f..%2fetc/passwd").unwrap(),
            "/..%2f..%2fetc/passwd"
        );
        assert_eq!(
            normalize_request_path("/%2e%2e/%2e%2e/etc/passwd").unwrap(),
            "/%2e%2e/%2e%2e/etc/passwd"
        );
    }

    #[test]
    fn normalize_rejects_null_bytes() {
        assert!(matches!(
            normalize_request_path("/a\0b"),
            Err(ResolveError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn existing_file_resolves_to_asset() {
        let (_dir, resolver) = assets();
        let res = resolver.resolve("/static/app.js").await.unwrap();
        assert_eq!(res, Resolution::Asset(resolver.root().join("static/app.js")));
    }

    #[tokio::test]
    async fn missing_file_resolves_to_fallback() {
        let (_dir, resolver) = assets();
        let res = resolver.resolve("/dashboard/settings").await.unwrap();
        assert_eq!(res, Resolution::Fallback(resolver.fallback_path()));
    }

    #[tokio::test]
    async fn fallback_is_total_for_deep_paths() {
        let (_dir, resolver) = assets();
        for path in ["/x", "/x/y/z", "/static/missing.js", "/a/b/c/d/e"] {
            let res = resolver.resolve(path).await.unwrap();
            assert_eq!(res, Resolution::Fallback(resolver.fallback_path()), "{path}");
        }
    }

    #[tokio::test]
    async fn empty_path_resolves_to_root() {
        let (_dir, resolver) = assets();
        let res = resolver.resolve("").await.unwrap();
        assert_eq!(res, Resolution::Asset(resolver.root().to_path_buf()));
    }

    #[tokio::test]
    async fn stat_failure_other_than_not_found_is_internal() {
        let (_dir, resolver) = assets();
        // A regular file used as a directory component makes the stat fail
        // with a non-NotFound error; that must not fall back to the index.
        let res = resolver.resolve("/static/app.js/nested").await;
        assert!(matches!(res, Err(ResolveError::Internal(_))));
    }

    #[tokio::test]
    async fn traversal_stays_inside_root() {
        let (_dir, resolver) = assets();
        for path in [
            "/../../etc/passwd",
            "/../../../etc/passwd",
            "/static/../../etc/passwd",
            "/..%2f..%2fetc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
        ] {
            let res = resolver.resolve(path).await.unwrap();
            // Either an in-root candidate or the index fallback; never a
            // path outside the asset root.
            assert!(res.path().starts_with(resolver.root()), "{path} escaped");
        }
    }
}
