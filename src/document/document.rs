//! Tweet records and corpora.

use serde::{Deserialize, Serialize};

/// A single tweet.
///
/// `target` is 1 for disaster-related tweets, 0 otherwise, and `None` for
/// tweets that still need a prediction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque, unique identifier.
    pub id: String,
    /// Raw tweet text, possibly empty.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u8>,
}

impl Document {
    /// Create an unlabeled document.
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Document {
            id: id.into(),
            text: text.into(),
            keyword: None,
            location: None,
            target: None,
        }
    }

    pub fn with_target(mut self, target: u8) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Check if the document carries a label.
    pub fn is_labeled(&self) -> bool {
        self.target.is_some()
    }
}

/// An ordered collection of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Documents with a target, in corpus order.
    pub fn labeled(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.is_labeled())
    }

    /// Documents without a target, in corpus order.
    pub fn unlabeled(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| !d.is_labeled())
    }

    /// All texts, in corpus order.
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }

    /// All ids, in corpus order.
    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.id.as_str()).collect()
    }

    /// Texts and targets of the labeled documents.
    pub fn labeled_examples(&self) -> (Vec<&str>, Vec<u8>) {
        self.documents
            .iter()
            .filter_map(|d| d.target.map(|t| (d.text.as_str(), t)))
            .unzip()
    }

    /// Split into `(labeled, unlabeled)` corpora.
    pub fn partition(self) -> (Corpus, Corpus) {
        let (labeled, unlabeled): (Vec<Document>, Vec<Document>) =
            self.documents.into_iter().partition(Document::is_labeled);
        (Corpus::from(labeled), Corpus::from(unlabeled))
    }
}

impl From<Vec<Document>> for Corpus {
    fn from(documents: Vec<Document>) -> Self {
        Corpus { documents }
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Corpus {
            documents: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Corpus {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
