use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Knowledge documents in the order their lines appear in the corpus.
pub const DEFAULT_DOCUMENTS: [&str; 4] = [
    "mortgage_rules.txt",
    "buy_vs_rent_heuristics.txt",
    "uae_ltv_rules.txt",
    "upfront_costs.txt",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    pub name: String,
    pub text: String,
}

/// Concatenated knowledge text. Every document contributes its text followed by
/// a single line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeCorpus {
    documents: Vec<String>,
    text: String,
}

impl KnowledgeCorpus {
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = KnowledgeDocument>,
    {
        let mut corpus = Self::default();
        for document in documents {
            corpus.text.push_str(&document.text);
            corpus.text.push('\n');
            corpus.documents.push(document.name);
        }
        corpus
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines in corpus order, including blank ones.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Names of the documents that were loaded.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads one document, normalizing line endings to `\n`.
pub fn load_document(directory: &Path, name: &str) -> Result<KnowledgeDocument, KnowledgeError> {
    let path = directory.join(name);
    let raw = fs::read_to_string(&path).map_err(|source| KnowledgeError::Read { path, source })?;

    let text = if raw.contains('\r') {
        raw.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        raw
    };

    Ok(KnowledgeDocument {
        name: name.to_string(),
        text,
    })
}

/// Loads the named documents in order. Unreadable documents are logged and
/// contribute nothing.
pub fn load_corpus<S: AsRef<str>>(directory: &Path, names: &[S]) -> KnowledgeCorpus {
    let documents = names
        .iter()
        .filter_map(|name| match load_document(directory, name.as_ref()) {
            Ok(document) => {
                debug!(document = %document.name, bytes = document.text.len(), "knowledge document loaded");
                Some(document)
            }
            Err(err) => {
                warn!(error = %err, "skipping knowledge document");
                None
            }
        });

    KnowledgeCorpus::from_documents(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str, text: &str) -> KnowledgeDocument {
        KnowledgeDocument {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn documents_are_joined_with_trailing_breaks() {
        let corpus = KnowledgeCorpus::from_documents(vec![
            document("a.txt", "first line\nsecond line"),
            document("b.txt", "third line\n"),
        ]);

        assert_eq!(corpus.text(), "first line\nsecond line\nthird line\n\n");
        assert_eq!(corpus.documents(), ["a.txt", "b.txt"]);
        assert_eq!(
            corpus.lines().collect::<Vec<_>>(),
            vec!["first line", "second line", "third line", "", ""]
        );
    }

    #[test]
    fn missing_documents_are_skipped() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("present.txt"), "LTV is capped at 80%").expect("write kb");

        let corpus = load_corpus(dir.path(), &["absent.txt", "present.txt"]);

        assert_eq!(corpus.text(), "LTV is capped at 80%\n");
        assert_eq!(corpus.documents(), ["present.txt"]);
    }

    #[test]
    fn empty_directory_yields_empty_corpus() {
        let dir = tempfile::tempdir().expect("temp dir");

        let corpus = load_corpus(dir.path(), &DEFAULT_DOCUMENTS);

        assert!(corpus.is_empty());
        assert_eq!(corpus.text(), "");
    }

    #[test]
    fn windows_line_endings_are_normalized() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("crlf.txt"), "one\r\ntwo\r\n").expect("write kb");

        let document = load_document(dir.path(), "crlf.txt").expect("document loads");

        assert_eq!(document.text, "one\ntwo\n");
    }

    #[test]
    fn unreadable_document_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");

        let err = load_document(dir.path(), "nope.txt").expect_err("document is missing");

        assert!(err.to_string().contains("nope.txt"));
    }
}
