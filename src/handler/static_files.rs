//! Static file serving module
//!
//! Serves the mounted media directories and the public site: path
//! resolution confined to the mount, MIME type detection, and single
//! byte-range reads so uploaded videos and tracks can be streamed.

use crate::http::{self, mime, response, ByteRange};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

const INDEX_FILE: &str = "index.html";

/// Per-request inputs for a file lookup
pub struct FileRequest<'a> {
    pub is_head: bool,
    pub range_header: Option<&'a str>,
}

/// Serve `relative` (the URL path below the mount prefix) out of `dir`
pub async fn serve_from_dir(
    req: &FileRequest<'_>,
    dir: &Path,
    relative: &str,
) -> Response<Full<Bytes>> {
    match resolve(dir, relative).await {
        Some(path) => serve_file(req, &path).await,
        None => http::build_404_response(),
    }
}

/// Serve a single known file
pub async fn serve_file(req: &FileRequest<'_>, path: &Path) -> Response<Full<Bytes>> {
    let mut file = match fs::File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to open file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let len = match file.metadata().await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to stat file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };
    let content_type = mime::content_type_for(path);

    match ByteRange::parse(req.range_header, len) {
        ByteRange::Unsatisfiable => http::build_416_response(len),
        ByteRange::Partial { start, end } => {
            let data = if req.is_head {
                Bytes::new()
            } else {
                match read_range(&mut file, start, end).await {
                    Ok(d) => d,
                    Err(e) => return read_failed(path, &e),
                }
            };
            response::build_partial_response(data, content_type, start, end, len, req.is_head)
        }
        ByteRange::Whole => {
            let data = if req.is_head {
                Bytes::new()
            } else {
                let mut buf = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
                if let Err(e) = file.read_to_end(&mut buf).await {
                    return read_failed(path, &e);
                }
                Bytes::from(buf)
            };
            response::build_file_response(data, content_type, len, req.is_head)
        }
    }
}

async fn read_range(file: &mut fs::File, start: u64, end: u64) -> std::io::Result<Bytes> {
    let count = usize::try_from(end - start + 1)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "range too large"))?;
    file.seek(SeekFrom::Start(start)).await?;
    let mut buf = vec![0u8; count];
    file.read_exact(&mut buf).await?;
    Ok(Bytes::from(buf))
}

fn read_failed(path: &Path, e: &std::io::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
    http::build_404_response()
}

/// Map a URL path below a mount onto a file inside `dir`.
///
/// Segments are percent-decoded; `..`, dotfiles and backslashes are refused
/// outright, and the canonical result must still sit under `dir` so
/// symlinks cannot escape it. Directories resolve to their `index.html`.
pub async fn resolve(dir: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = dir.to_path_buf();
    for raw in relative.split('/').filter(|s| !s.is_empty()) {
        let segment = percent_decode(raw)?;
        if segment.starts_with('.') || segment.contains(['\\', '/', '\0']) {
            logger::log_warning(&format!("Rejected static path segment: {raw:?}"));
            return None;
        }
        path.push(segment);
    }

    let dir_canonical = match fs::canonicalize(dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{}': {e}",
                dir.display()
            ));
            return None;
        }
    };

    // Missing files are a plain 404
    let mut canonical = fs::canonicalize(&path).await.ok()?;
    if !canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            canonical.display()
        ));
        return None;
    }

    if fs::metadata(&canonical).await.ok()?.is_dir() {
        canonical.push(INDEX_FILE);
    }
    Some(canonical)
}

/// Decode `%XX` escapes; `None` if an escape is malformed or the result is not UTF-8
fn percent_decode(segment: &str) -> Option<String> {
    if !segment.contains('%') {
        return Some(segment.to_string());
    }

    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
