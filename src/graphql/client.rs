//! Minimal GraphQL-over-HTTP client

use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default = "Vec::new")]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

/// POSTs `{query, variables}` to a single endpoint
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: Arc<HttpClient>,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(http: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query and decode its `data` member.
    ///
    /// A response carrying any entry in `errors` fails as a whole.
    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        debug!(endpoint = %self.endpoint, "graphql query");

        let request = GraphQlRequest { query, variables };
        let response: GraphQlResponse<T> = self.http.post_query_json(&self.endpoint, &request).await?;

        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::graphql(messages.join("; ")));
        }

        response
            .data
            .ok_or_else(|| Error::graphql("response contained neither data nor errors"))
    }
}
