//! Local document sources
//!
//! [`MemorySource`] serves prepared documents (tests, embedding callers).
//! [`DirectorySource`] reads `.txt` files as raw text and `.html`/`.htm`
//! files through the article parser, in file-name order.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::DocumentSource;
use crate::crawler::fetcher::decode_bytes;
use crate::error::Error;
use crate::models::Document;
use crate::parser::ArticleParser;
use crate::utils::error::ParseError;

/// In-memory document queue
#[derive(Debug, Default)]
pub struct MemorySource {
    items: VecDeque<Result<Document, Error>>,
}

impl MemorySource {
    /// Serve the given results in order
    #[must_use]
    pub fn new(items: Vec<Result<Document, Error>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Serve prepared documents in order
    #[must_use]
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            items: documents.into_iter().map(Ok).collect(),
        }
    }

    /// Serve plain texts in order, tagged `memory:<index>`
    #[must_use]
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_documents(
            texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| Document::new(format!("memory:{i}"), text)),
        )
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn next_document(&mut self) -> Option<Result<Document, Error>> {
        self.items.pop_front()
    }

    fn has_more(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Kind of local file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Text,
    Html,
}

impl FileKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Documents read from a file or a directory of files
pub struct DirectorySource {
    files: VecDeque<PathBuf>,
    parser: ArticleParser,
}

impl DirectorySource {
    /// Collect supported files under `path`
    ///
    /// A single file is accepted as-is. A directory contributes its direct
    /// children with supported extensions, sorted by name. Subdirectories
    /// are not descended into.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `path` cannot be read.
    pub async fn open(path: impl AsRef<Path>, parser: ArticleParser) -> Result<Self, Error> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;

        let mut files = Vec::new();
        if metadata.is_file() {
            files.push(path.to_path_buf());
        } else {
            let mut entries = tokio::fs::read_dir(path).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file = entry.path();
                if entry.file_type().await?.is_file() && FileKind::from_path(&file).is_some() {
                    files.push(file);
                }
            }
            files.sort();
        }

        tracing::info!(path = %path.display(), files = files.len(), "Opened document directory");

        Ok(Self {
            files: files.into(),
            parser,
        })
    }

    /// Files still waiting to be read
    #[must_use]
    pub fn pending(&self) -> usize {
        self.files.len()
    }

    async fn read(&self, path: &Path) -> Result<Document, Error> {
        let source = path.display().to_string();
        let bytes = tokio::fs::read(path).await.map_err(|e| ParseError::Unreadable {
            path: source.clone(),
            reason: e.to_string(),
        })?;

        match FileKind::from_path(path) {
            Some(FileKind::Html) => {
                let html = decode_bytes(&bytes, "")?;
                Ok(self.parser.parse_document(&source, &html)?)
            }
            Some(FileKind::Text) => {
                let text = decode_bytes(&bytes, "text/plain")?;
                Ok(Document::new(source, text))
            }
            None => Err(ParseError::Unreadable {
                path: source,
                reason: "unsupported file type".to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn next_document(&mut self) -> Option<Result<Document, Error>> {
        let path = self.files.pop_front()?;
        Some(self.read(&path).await)
    }

    fn has_more(&self) -> bool {
        !self.files.is_empty()
    }
}
