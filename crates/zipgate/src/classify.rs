//! Content classification against an extension → mime allow-list.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Bytes read from the head of a file for sniffing.
const SNIFF_LEN: u64 = 8192;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const PLAIN_TEXT: &str = "text/plain";

/// Application types whose content is plain text, so a text sniff cannot tell them apart.
const TEXT_BASED: &[&str] = &[
    "application/json",
    "application/xml",
    "application/toml",
    "application/x-yaml",
    "application/yaml",
    "application/javascript",
    "image/svg+xml",
];

/// Verdict for one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub is_valid: bool,
    pub mime_type: String,
}

/// Decides whether a staged file may be relocated.
pub trait Classifier {
    /// Extensions eligible for selection, with the mime type each is expected to carry.
    fn allow_list(&self) -> &AllowList;

    fn classify(&self, path: &Path) -> Result<Classification>;
}

/// Accepted extensions mapped to mime types. Extensions are stored lowercase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct AllowList {
    entries: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for AllowList {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter()
            .fold(Self::new(), |list, (ext, mime)| list.allow(ext, mime))
    }
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, extension: impl AsRef<str>, mime_type: impl Into<String>) -> Self {
        self.entries
            .insert(normalize_extension(extension.as_ref()), mime_type.into());
        self
    }

    /// Allow `extension` with the mime type `mime_guess` knows it by.
    pub fn allow_guessed(self, extension: impl AsRef<str>) -> Result<Self> {
        let extension = extension.as_ref();
        let mime = mime_guess::from_ext(normalize_extension(extension).as_str())
            .first()
            .ok_or_else(|| Error::UnknownExtension(extension.to_string()))?;
        Ok(self.allow(extension, mime.essence_str()))
    }

    /// Build a list from bare extensions, taking each mime type from `mime_guess`.
    pub fn from_extensions<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extensions
            .into_iter()
            .try_fold(Self::new(), |list, ext| list.allow_guessed(ext))
    }

    pub fn contains_extension(&self, extension: &str) -> bool {
        self.entries.contains_key(&normalize_extension(extension))
    }

    pub fn mime_for(&self, extension: &str) -> Option<&str> {
        self.entries
            .get(&normalize_extension(extension))
            .map(String::as_str)
    }

    pub fn allows_mime(&self, mime_type: &str) -> bool {
        self.entries
            .values()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(e, m)| (e.as_str(), m.as_str()))
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

/// Sniffs file content and accepts it when the detected mime type is allow-listed.
///
/// Binary formats are identified by magic bytes. Content without a signature that
/// decodes as text takes the type its extension claims when that type is text-based,
/// `text/plain` otherwise. Anything else is `application/octet-stream`.
#[derive(Clone, Debug, Default)]
pub struct MimeClassifier {
    allow: AllowList,
}

impl MimeClassifier {
    pub fn new(allow: AllowList) -> Self {
        Self { allow }
    }

    /// Detect the mime type of a file from its content.
    pub fn sniff(&self, path: &Path) -> Result<String> {
        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(path)
            .and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head))
            .map_err(|e| Error::Classify {
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Some(kind) = infer::get(&head) {
            return Ok(kind.mime_type().to_string());
        }

        if !looks_textual(&head) {
            return Ok(OCTET_STREAM.to_string());
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let claimed = self
            .allow
            .mime_for(extension)
            .map(str::to_string)
            .or_else(|| {
                mime_guess::from_ext(extension)
                    .first()
                    .map(|m| m.essence_str().to_string())
            });

        Ok(match claimed {
            Some(mime) if is_text_based(&mime) => mime,
            _ => PLAIN_TEXT.to_string(),
        })
    }
}

impl Classifier for MimeClassifier {
    fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    fn classify(&self, path: &Path) -> Result<Classification> {
        let mime_type = self.sniff(path)?;
        let is_valid = self.allow.allows_mime(&mime_type);
        tracing::debug!(path = %path.display(), mime = %mime_type, is_valid, "classified");

        Ok(Classification {
            is_valid,
            mime_type,
        })
    }
}

fn is_text_based(mime: &str) -> bool {
    mime.starts_with("text/") || TEXT_BASED.iter().any(|t| t.eq_ignore_ascii_case(mime))
}

/// UTF-8 without NUL bytes. A multi-byte sequence cut off by the sniff window is fine.
fn looks_textual(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
