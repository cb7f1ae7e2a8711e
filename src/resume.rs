use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::IntakeError;

pub const DEFAULT_MAX_RESUME_BYTES: u64 = 10 * 1024 * 1024;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_RE: Regex =
        Regex::new(r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}").unwrap();
    static ref NAME_WORD_RE: Regex = Regex::new(r"^[A-Z][a-z]").unwrap();
    static ref DOCX_RUN_RE: Regex =
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:(?:br|cr)\b[^>]*/>|<w:tab\s*/>").unwrap();
}

/// Text pulled out of a resume plus whatever contact fields could be spotted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub text: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ParsedResume {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            name: extract_name(&text),
            email: extract_email(&text),
            phone: extract_phone(&text),
            text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResumeFormat {
    Pdf,
    Docx,
    PlainText,
}

fn detect_format(path: &Path) -> Result<ResumeFormat, IntakeError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(ResumeFormat::Pdf),
        "docx" => Ok(ResumeFormat::Docx),
        "txt" | "md" => Ok(ResumeFormat::PlainText),
        _ => Err(IntakeError::UnsupportedFileType { extension }),
    }
}

/// Reads a resume from disk, enforcing the type and size limits.
pub fn parse_resume(path: &Path, max_bytes: u64) -> Result<ParsedResume, IntakeError> {
    let format = detect_format(path)?;

    let size = fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(IntakeError::FileTooLarge {
            size,
            limit: max_bytes,
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    let bytes = fs::read(path)?;
    let text = match format {
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| IntakeError::Extraction(format!("{e:?}")))?,
        ResumeFormat::Docx => extract_docx_text(&bytes)?,
        ResumeFormat::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
    };

    tracing::debug!(
        path = %path.display(),
        bytes = size,
        chars = text.chars().count(),
        "resume text extracted"
    );

    Ok(ParsedResume::from_text(text))
}

/// Paragraph text from `word/document.xml`, one line per paragraph
fn extract_docx_text(bytes: &[u8]) -> Result<String, IntakeError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IntakeError::Extraction(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| IntakeError::Extraction(e.to_string()))?
        .read_to_string(&mut xml)?;

    let mut text = String::new();
    for caps in DOCX_RUN_RE.captures_iter(&xml) {
        match caps.get(1) {
            Some(run) => text.push_str(&unescape_xml(run.as_str())),
            None if caps[0].starts_with("<w:tab") => text.push('\t'),
            None => text.push('\n'),
        }
    }
    Ok(text)
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

/// Looks for a "Firstname Lastname" style line among the first three non-empty lines
pub fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(3)
        .find(|line| looks_like_name(line))
        .map(str::to_string)
}

fn looks_like_name(line: &str) -> bool {
    let lowered = line.to_lowercase();
    let chars = line.chars().count();
    if chars <= 3
        || chars >= 50
        || line.contains('@')
        || PHONE_RE.is_match(line)
        || line.starts_with(|c: char| c.is_ascii_digit())
        || lowered.contains("resume")
        || lowered.contains("cv")
    {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len()) && words.iter().all(|w| NAME_WORD_RE.is_match(w))
}
