//! Book loading utilities.
//!
//! EPUB containers are opened with the `epub` crate and their spine is read
//! section by section as raw XHTML; the rendition parses each section on
//! demand. Plain text and standalone HTML files are accepted too and become
//! single-section books.

use crate::render::html::paragraphs_to_markup;
use crate::render::{SectionSource, StaticSections};
use anyhow::{Context, Result};
use epub::doc::EpubDoc;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// EPUB spine sections, in reading order.
#[derive(Debug, Clone)]
pub struct EpubBook {
    title: String,
    sections: Vec<String>,
}

impl EpubBook {
    pub fn open(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "Loading EPUB content");
        let mut doc = EpubDoc::new(path)
            .with_context(|| format!("Failed to open EPUB at {}", path.display()))?;

        let mut sections = Vec::new();
        loop {
            match doc.get_current_str() {
                Some((section, _mime)) => {
                    debug!(
                        section = sections.len() + 1,
                        chars = section.len(),
                        "Read spine section"
                    );
                    sections.push(section);
                }
                None => warn!(section = sections.len() + 1, "Unreadable spine section"),
            }

            if !doc.go_next() {
                break;
            }
        }

        if sections.is_empty() {
            sections.push(paragraphs_to_markup(&[
                "No textual content found in this EPUB.".to_string(),
            ]));
        }

        info!(sections = sections.len(), "Finished loading EPUB content");
        Ok(Self {
            title: file_title(path),
            sections,
        })
    }
}

impl SectionSource for EpubBook {
    fn title(&self) -> &str {
        &self.title
    }

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_markup(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(String::as_str)
    }
}

/// Open any supported book format.
pub fn load_book(path: &Path) -> Result<Box<dyn SectionSource>> {
    if is_epub(path) {
        return Ok(Box::new(EpubBook::open(path)?));
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let markup = if is_html(path) {
        info!(path = %path.display(), "Loading HTML content");
        data
    } else {
        info!(path = %path.display(), "Loading plain text content");
        let mut paragraphs = split_paragraphs(&data);
        if paragraphs.is_empty() {
            paragraphs.push("No textual content found in this file.".to_string());
        }
        paragraphs_to_markup(&paragraphs)
    };

    Ok(Box::new(StaticSections {
        title: file_title(path),
        sections: vec![markup],
    }))
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn is_epub(path: &Path) -> bool {
    matches!(extension(path), Some(ext) if ext == "epub")
}

fn is_html(path: &Path) -> bool {
    matches!(extension(path), Some(ext) if ext == "html" || ext == "htm" || ext == "xhtml")
}

/// Split text into paragraphs separated by blank lines.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut buffer = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !buffer.is_empty() {
                paragraphs.push(buffer.join("\n"));
                buffer.clear();
            }
        } else {
            buffer.push(line);
        }
    }

    if !buffer.is_empty() {
        paragraphs.push(buffer.join("\n"));
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("ebup-gloss-{nonce}-{name}"));
        fs::write(&path, contents).expect("temp file should be writable");
        path
    }

    #[test]
    fn plain_text_becomes_one_section_of_paragraphs() {
        let path = temp_file("book.txt", "First line\nstill first.\n\n\nSecond.\n");
        let book = load_book(&path).expect("text book should load");
        assert_eq!(book.section_count(), 1);
        let markup = book.section_markup(0).unwrap();
        assert_eq!(
            markup,
            "<html><body><p>First line\nstill first.</p><p>Second.</p></body></html>"
        );
        assert!(book.title().ends_with("book"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn html_is_passed_through() {
        let path = temp_file("page.XHTML", "<p>Hello.</p>");
        let book = load_book(&path).expect("html book should load");
        assert_eq!(book.section_markup(0), Some("<p>Hello.</p>"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_path() {
        let Err(err) = load_book(Path::new("/definitely/not/here.txt")) else {
            panic!("missing file should not load");
        };
        assert!(format!("{err:#}").contains("/definitely/not/here.txt"));
    }
}
