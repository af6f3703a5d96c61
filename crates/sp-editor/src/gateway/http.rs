//! REST gateway over ureq

use std::time::Duration;

use serde::Serialize;
use sp_core::{LayoutDocument, LayoutSummary};
use ureq::{Agent, RequestBuilder};

use super::{GatewayError, LayoutGateway};

/// Create request: the document plus the owner it is created for
#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(flatten)]
    document: &'a LayoutDocument,
    #[serde(rename = "ownerId", skip_serializing_if = "Option::is_none")]
    owner_id: Option<&'a str>,
}

#[derive(Serialize)]
struct AssignBody<'a> {
    #[serde(rename = "ownerId")]
    owner_id: &'a str,
}

/// Gateway talking to the layout REST API under `{base_url}/layouts`
pub struct HttpGateway {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn layouts_url(&self) -> String {
        format!("{}/layouts", self.base_url)
    }

    fn layout_url(&self, id: &str) -> String {
        format!("{}/layouts/{}", self.base_url, id)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request.header("Accept", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

fn map_error(error: ureq::Error) -> GatewayError {
    match error {
        ureq::Error::StatusCode(404) => GatewayError::NotFound,
        ureq::Error::StatusCode(code) => GatewayError::Status { code },
        ureq::Error::Json(e) => GatewayError::Decode(e.to_string()),
        other => GatewayError::Transport(other.to_string()),
    }
}

fn read_document(response: ureq::http::Response<ureq::Body>) -> Result<LayoutDocument, GatewayError> {
    let document: LayoutDocument = response
        .into_body()
        .read_json()
        .map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(document.normalized())
}

impl LayoutGateway for HttpGateway {
    fn list(&self) -> Result<Vec<LayoutSummary>, GatewayError> {
        let response = self
            .authorize(self.agent.get(self.layouts_url()))
            .call()
            .map_err(map_error)?;
        let documents: Vec<LayoutDocument> = response
            .into_body()
            .read_json()
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        tracing::debug!("Listed {} layouts", documents.len());
        Ok(documents.iter().map(LayoutDocument::summary).collect())
    }

    fn get(&self, id: &str) -> Result<LayoutDocument, GatewayError> {
        let response = self
            .authorize(self.agent.get(self.layout_url(id)))
            .call()
            .map_err(map_error)?;
        read_document(response)
    }

    fn create(&self, document: &LayoutDocument) -> Result<LayoutDocument, GatewayError> {
        let body = CreateBody {
            document,
            owner_id: document.owner.as_ref().map(|owner| owner.id()),
        };
        let body = serde_json::to_value(&body).map_err(|e| GatewayError::Encode(e.to_string()))?;
        let response = self
            .authorize(self.agent.post(self.layouts_url()))
            .send_json(&body)
            .map_err(map_error)?;
        read_document(response)
    }

    fn update(&self, id: &str, document: &LayoutDocument) -> Result<LayoutDocument, GatewayError> {
        let body = serde_json::to_value(document).map_err(|e| GatewayError::Encode(e.to_string()))?;
        let response = self
            .authorize(self.agent.put(self.layout_url(id)))
            .send_json(&body)
            .map_err(map_error)?;
        read_document(response)
    }

    fn remove(&self, id: &str) -> Result<(), GatewayError> {
        self.authorize(self.agent.delete(self.layout_url(id)))
            .call()
            .map_err(map_error)?;
        Ok(())
    }

    fn assign(&self, id: &str, owner_id: &str) -> Result<LayoutDocument, GatewayError> {
        let response = self
            .authorize(self.agent.patch(format!("{}/assign", self.layout_url(id))))
            .send_json(AssignBody { owner_id })
            .map_err(map_error)?;
        read_document(response)
    }
}
