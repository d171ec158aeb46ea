//! Knowledge base used to ground advisory answers.
//!
//! Documents are plain text files read in a fixed order. Retrieval is a naive
//! case-insensitive substring scan over corpus lines that falls back to the
//! whole corpus when nothing matches.

mod corpus;
mod retriever;
mod store;

pub use corpus::{
    load_corpus, load_document, KnowledgeCorpus, KnowledgeDocument, KnowledgeError,
    DEFAULT_DOCUMENTS,
};
pub use retriever::{matching_lines, query_terms, retrieve};
pub use store::{CorpusMode, CorpusStatus, CorpusStore};
