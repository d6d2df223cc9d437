//! Tree filtering service over a loaded ontology store.

use std::sync::Arc;

use codetree_engine::{
    filter_with_stats, CodeStore, FilterOptions, MatchMode, OntologyStore, SearchProvider,
    SearchRestriction, TermSearch,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::protocol::{ErrorReply, FilterRequest, FilterResponse, ResponseStats};
use crate::ServiceError;

/// Answers filter requests against an [`OntologyStore`].
#[derive(Debug, Clone)]
pub struct TreeService {
    store: Arc<OntologyStore>,
    search: TermSearch,
}

impl TreeService {
    /// Creates a service over `store` with the default term search.
    pub fn new(store: OntologyStore) -> Self {
        Self {
            store: Arc::new(store),
            search: TermSearch::default(),
        }
    }

    /// Replaces the search provider settings.
    pub fn with_search(mut self, search: TermSearch) -> Self {
        self.search = search;
        self
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &OntologyStore {
        &self.store
    }

    /// Renders one tree pane.
    ///
    /// Search and filtering run on the blocking thread pool.
    pub async fn handle(&self, request: FilterRequest) -> Result<FilterResponse, ServiceError> {
        let codes = self.store.fetch(&request.ontology).await?;
        let sets = request.selection_sets();

        let mut provider = self.search.clone();
        if request.regex {
            provider.mode = MatchMode::Regex;
        }
        let query = request.query().map(str::to_string);
        let topmost_only = request.topmost_only;
        let options = FilterOptions::new(request.filters).open(request.open_nodes);

        let (nodes, stats, matches) = tokio::task::spawn_blocking(move || {
            let mut options = options;
            let mut matches = None;
            if let Some(query) = query {
                let found = provider.search(&codes, &query)?;
                matches = Some(found.len());
                let restriction = if topmost_only {
                    SearchRestriction::from_topmost(&found)
                } else {
                    SearchRestriction::from_matches(&found)
                };
                options = options.restrict(restriction);
            }
            let (nodes, stats) = filter_with_stats(&codes, &sets, &options);
            Ok::<_, ServiceError>((nodes, stats, matches))
        })
        .await??;

        debug!(
            ontology = %request.ontology,
            emitted = stats.emitted,
            scanned = stats.scanned,
            elapsed_us = stats.elapsed_us(),
            "filter request"
        );

        let mut stats = ResponseStats::from(&stats);
        stats.search_matches = matches;
        Ok(FilterResponse { nodes, stats })
    }

    /// Handles one JSON request line, returning one JSON reply line.
    ///
    /// Failures are reported as `{"error": "..."}`.
    pub async fn handle_line(&self, line: &str) -> String {
        let result = match serde_json::from_str::<FilterRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => Err(ServiceError::InvalidRequest(e)),
        };

        match result {
            Ok(response) => serde_json::to_string(&response)
                .unwrap_or_else(|e| error_line(&format!("failed to encode reply: {}", e))),
            Err(e) => {
                warn!(error = %e, "request failed");
                error_line(&e.to_string())
            }
        }
    }

    /// Serves newline-delimited requests from `reader` until end of input.
    ///
    /// Blank lines are ignored. A line that is not valid UTF-8 gets an error
    /// reply like any other bad request; only stream I/O errors end the loop.
    /// Returns the number of requests answered.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<usize, ServiceError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        let mut answered = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let mut reply = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line.trim_end_matches(['\n', '\r'])).await,
                Err(e) => {
                    let e = ServiceError::InvalidEncoding(e);
                    warn!(error = %e, "request failed");
                    error_line(&e.to_string())
                }
            };
            reply.push('\n');
            writer.write_all(reply.as_bytes()).await?;
            writer.flush().await?;
            answered += 1;
        }

        Ok(answered)
    }
}

fn error_line(message: &str) -> String {
    let reply = ErrorReply {
        error: message.to_string(),
    };
    serde_json::to_string(&reply).unwrap_or_else(|_| r#"{"error":"failed to encode reply"}"#.to_string())
}
