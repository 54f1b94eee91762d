//! HTTP implementation of [`AdmissionApi`]
//!
//! Every request goes through [`HttpBackend::dispatch`], which attaches
//! the bearer credential and maps the response status to [`ApiError`].

use crate::api::{
    add_description_path, application_path, description_path, form_structure_path, AdmissionApi,
    ApiError, ApiMessage, SAVE_DRAFT_PATH, SAVE_STRUCTURE_PATH, SUBMIT_PATH,
};
use crate::config::ClientConfig;
use crate::session::SessionContext;
use async_trait::async_trait;
use ecampus_editor::{CourseDescription, DescriptionRequest, StructureRequest};
use ecampus_schema::FormStructure;
use ecampus_wizard::{ApplicationDraft, ApplicationPayload, PayloadKind};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Pull `message` or `error` out of an error body
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(String::from)
}

/// Backend client over reqwest
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
    session: Arc<SessionContext>,
}

impl HttpBackend {
    /// Build a client from configuration
    ///
    /// # Errors
    /// `ApiError::Transport` if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: ClientConfig, session: Arc<SessionContext>) -> Result<Self, ApiError> {
        config.endpoint(&[]).map_err(|e| ApiError::Transport(e.to_string()))?;
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Shared session
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Client configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send an authenticated request and map failure statuses
    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let credential = self.session.credential().ok_or(ApiError::NotAuthenticated)?;
        let response = request
            .bearer_auth(credential)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "backend rejected credential");
            self.session.clear_credential();
            return Err(ApiError::SessionExpired);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(message));
        }
        debug!(status = status.as_u16(), %message, "backend request failed");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn url(&self, path: &[&str]) -> Result<reqwest::Url, ApiError> {
        self.config
            .endpoint(path)
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn get(&self, path: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.get(self.url(path)?))
    }

    fn post(&self, path: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.post(self.url(path)?))
    }

    async fn post_multipart(
        &self,
        path: &[&str],
        payload: &ApplicationPayload,
    ) -> Result<ApiMessage, ApiError> {
        let form = multipart_form(payload)?;
        debug!(
            path = %path.join("/"),
            kind = ?payload.kind(),
            files = payload.files().len(),
            "sending application payload"
        );
        self.json(self.post(path)?.multipart(form)).await
    }
}

/// Multipart body: text parts in payload order, then one `documents` part per file
fn multipart_form(payload: &ApplicationPayload) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in payload.text_parts() {
        form = form.text(name, value);
    }
    for file in payload.files() {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.mime_type())
            .map_err(transport)?;
        form = form.part("documents", part);
    }
    Ok(form)
}

#[async_trait]
impl AdmissionApi for HttpBackend {
    async fn fetch_form_structure(&self, course_id: &str) -> Result<FormStructure, ApiError> {
        self.json(self.get(&form_structure_path(course_id))?).await
    }

    async fn fetch_application(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<ApplicationDraft, ApiError> {
        self.json(self.get(&application_path(student_id, course_id))?)
            .await
    }

    async fn save_draft(&self, payload: &ApplicationPayload) -> Result<ApiMessage, ApiError> {
        debug_assert_eq!(payload.kind(), PayloadKind::Draft);
        self.post_multipart(SAVE_DRAFT_PATH, payload).await
    }

    async fn submit_application(&self, payload: &ApplicationPayload) -> Result<ApiMessage, ApiError> {
        debug_assert_eq!(payload.kind(), PayloadKind::Submission);
        self.post_multipart(SUBMIT_PATH, payload).await
    }

    async fn fetch_description(&self, course_id: &str) -> Result<CourseDescription, ApiError> {
        self.json(self.get(&description_path(course_id))?).await
    }

    async fn save_description(
        &self,
        course_id: &str,
        request: &DescriptionRequest,
    ) -> Result<ApiMessage, ApiError> {
        self.json(self.post(&add_description_path(course_id))?.json(request))
            .await
    }

    async fn save_form_structure(&self, request: &StructureRequest) -> Result<ApiMessage, ApiError> {
        self.json(self.post(SAVE_STRUCTURE_PATH)?.json(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_then_error() {
        assert_eq!(error_message(r#"{"message":"bad"}"#).as_deref(), Some("bad"));
        assert_eq!(error_message(r#"{"error":"worse"}"#).as_deref(), Some("worse"));
        assert_eq!(error_message("<html>"), None);
    }

    #[tokio::test]
    async fn requests_need_a_credential() {
        let backend = HttpBackend::new(ClientConfig::default(), Arc::new(SessionContext::new())).unwrap();
        let err = backend.fetch_form_structure("c1").await.unwrap_err();
        assert_eq!(err, ApiError::NotAuthenticated);
    }
}
