//! Upload helpers: safe on-disk names and plain-text extraction.

use std::path::Path;

use bytes::Bytes;
use tracing::warn;

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, with whitespace turned
/// into underscores and leading dots/underscores stripped, so it cannot escape the
/// upload directory.
pub fn sanitize_filename(name: &str) -> String {
    // Keep only the final path component; browsers on Windows send full paths.
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "resume".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extracts text from PDF and plain-text uploads. Anything else, or a file that
/// yields no text, returns `None`; extraction problems are logged, not raised.
pub async fn extract_text(file_name: &str, data: Bytes) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let text = match extension.as_deref() {
        Some("pdf") => {
            // pdf-extract is CPU-bound and may panic on malformed input.
            let extracted = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&data).map_err(|e| format!("{e:?}"))
            })
            .await;
            match extracted {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("Could not extract text from {file_name}: {e}");
                    return None;
                }
                Err(e) => {
                    warn!("PDF extraction for {file_name} aborted: {e}");
                    return None;
                }
            }
        }
        Some("txt") | Some("md") => String::from_utf8_lossy(&data).into_owned(),
        _ => return None,
    };

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
