use std::path::{Path, PathBuf};

use pdf_extract::{extract_text_from_mem, extract_text_from_mem_by_pages};
use tracing::debug;

use crate::error::{Error, Result};
use crate::generation::InputPayload;

/// Plain text extracted from a user-supplied document.
#[derive(Debug, Clone, Default)]
pub struct ProcessedInput {
    pub text: String,
    pub source: Option<PathBuf>,
}

pub struct InputProcessor;

impl InputProcessor {
    /// Extracts plain text from the payload. PDF files are parsed with
    /// pdf-extract, optionally limited to the first `max_pages` pages;
    /// anything else is decoded as UTF-8 (lossily if needed).
    pub async fn prepare(
        payload: &InputPayload,
        max_pages: Option<usize>,
    ) -> Result<ProcessedInput> {
        let mut processed = match payload {
            InputPayload::Text(text) => ProcessedInput {
                text: text.clone(),
                source: None,
            },
            InputPayload::File(path) => Self::process_file(path, max_pages).await?,
        };

        if processed.text.trim().is_empty() {
            return Err(Error::source_document(
                "input did not contain any readable text",
            ));
        }

        processed.text = normalize_whitespace(&processed.text);
        Ok(processed)
    }

    async fn process_file(path: &Path, max_pages: Option<usize>) -> Result<ProcessedInput> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|err| Error::source_document(format!("{}: {err}", path.display())))?;

        let text = if is_pdf(path, &data) {
            extract_pdf_text(&data, max_pages)?
        } else {
            decode_text(&data)
        };

        Ok(ProcessedInput {
            text,
            source: Some(path.to_path_buf()),
        })
    }
}

fn is_pdf(path: &Path, data: &[u8]) -> bool {
    if data.starts_with(b"%PDF") {
        return true;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn extract_pdf_text(data: &[u8], max_pages: Option<usize>) -> Result<String> {
    let text = match max_pages {
        Some(limit) => {
            let pages = extract_text_from_mem_by_pages(data)
                .map_err(|err| Error::source_document(format!("unable to read PDF input: {err}")))?;
            debug!("document has {} pages, reading up to {limit}", pages.len());
            pages
                .into_iter()
                .take(limit)
                .collect::<Vec<_>>()
                .join("\n")
        }
        None => extract_text_from_mem(data)
            .map_err(|err| Error::source_document(format!("unable to read PDF input: {err}")))?,
    };

    Ok(text)
}

fn decode_text(data: &[u8]) -> String {
    match String::from_utf8(data.to_vec()) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).to_string(),
    }
}

/// Collapses runs of blank lines and strips per-line padding, which
/// PDF extraction produces in quantity.
fn normalize_whitespace(text: &str) -> String {
    let mut normalized = String::new();
    let mut previous_blank = true;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !previous_blank && !normalized.is_empty() {
                normalized.push_str("\n\n");
            }
            previous_blank = true;
        } else {
            if !normalized.is_empty() && !previous_blank {
                normalized.push('\n');
            }
            normalized.push_str(trimmed);
            previous_blank = false;
        }
    }

    if normalized.is_empty() {
        text.trim().to_string()
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn inline_text_passes_through_normalized() {
        let payload = InputPayload::Text("  line one  \n\n\n  line two  ".to_string());
        let processed = InputProcessor::prepare(&payload, None).await.unwrap();
        assert_eq!(processed.text, "line one\n\nline two");
        assert!(processed.source.is_none());
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let payload = InputPayload::Text("  \n\t ".to_string());
        assert!(InputProcessor::prepare(&payload, None).await.is_err());
    }

    #[tokio::test]
    async fn reads_plain_text_files() {
        let mut file = tempfile::NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(file, "Photosynthesis converts light into energy.").unwrap();

        let payload = InputPayload::File(file.path().to_path_buf());
        let processed = InputProcessor::prepare(&payload, None).await.unwrap();
        assert!(processed.text.contains("Photosynthesis"));
        assert_eq!(processed.source.as_deref(), Some(file.path()));
    }

    #[tokio::test]
    async fn missing_files_are_reported_with_their_path() {
        let payload = InputPayload::File(PathBuf::from("/no/such/file.pdf"));
        let err = InputProcessor::prepare(&payload, None).await.unwrap_err();
        assert!(err.to_string().contains("/no/such/file.pdf"));
    }

    #[test]
    fn pdf_detection_uses_magic_bytes_and_extension() {
        assert!(is_pdf(Path::new("doc.bin"), b"%PDF-1.7 rest"));
        assert!(is_pdf(Path::new("doc.PDF"), b"garbage"));
        assert!(!is_pdf(Path::new("doc.txt"), b"plain text"));
    }

    #[test]
    fn lossy_decoding_keeps_the_readable_parts() {
        let decoded = decode_text(b"caf\xff consumption");
        assert!(decoded.contains("consumption"));
    }

    #[test]
    fn normalization_keeps_single_blank_line_separators() {
        assert_eq!(normalize_whitespace("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
