//! # codetree-service
//!
//! JSON-lines service that renders code tree panes.
//!
//! Ontologies are loaded once into an [`OntologyStore`](codetree_engine::OntologyStore).
//! Each request line names an ontology, the codelists being compared, the
//! pane filters, the expanded nodes and an optional search; the reply line
//! holds the rendered node list produced by the `codetree-engine` filter.

#![warn(missing_docs)]

mod protocol;
mod server;

use thiserror::Error;

pub use protocol::{ErrorReply, FilterRequest, FilterResponse, ResponseStats, SelectionEntry};
pub use server::TreeService;

// Re-export engine types for convenience
pub use codetree_engine::{LoaderConfig, OntologyStore, TermSearch, TreeError};

/// Errors raised while answering a request.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Engine error: unknown ontology, invalid pattern or corrupt data.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The request line is not a valid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// The request line is not valid UTF-8.
    #[error("Request is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    /// I/O error on the request stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking filter task panicked or was cancelled.
    #[error("Filter task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ServiceError::from(TreeError::UnknownOntology {
            name: "OPCS4".to_string(),
        });
        assert_eq!(err.to_string(), "Unknown ontology: OPCS4");

        let json_err = serde_json::from_str::<FilterRequest>("{").unwrap_err();
        let err = ServiceError::from(json_err);
        assert!(err.to_string().starts_with("Invalid request: "));
    }
}
