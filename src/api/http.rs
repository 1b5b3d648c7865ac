//! HTTP implementation of the support API.
//!
//! # Security Note - Logging
//!
//! The session cookie is kept in a `SecretBox` and only exposed when the
//! `Cookie` header is built. Requests are logged at `debug` level by method
//! and path only; headers are never logged.

use std::time::Duration;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretBox};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::config::Config;
use crate::error::{Result, SupportError};
use crate::model::{
    Attachment, Comment, IssueDocument, IssueRow, Ticket, TicketEvent, TicketPayload,
};
use crate::types::{TicketId, TicketStatus};

use super::{ApiFailure, ApiResult, DuplicatedDocument, ListScope, SupportApi};

/// Support API over HTTP
pub struct HttpSupportApi {
    client: Client,
    base_url: Url,
    session: Option<SecretBox<String>>,
    locale: Option<String>,
}

impl HttpSupportApi {
    /// Create a client from configuration
    ///
    /// Only a connect timeout is configured: once a request is sent it runs
    /// to completion.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.base_url().ok_or_else(|| {
            SupportError::Config(
                "base URL not configured. Set SUPPORT_BASE_URL or run: ent-support config set base_url <url>"
                    .to_string(),
            )
        })?;

        let mut api = Self::new(&base_url, config.connect_timeout())?;
        api.session = config
            .session_cookie()
            .map(|cookie| SecretBox::new(Box::new(cookie)));
        api.locale = config.locale.clone();
        Ok(api)
    }

    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        // Url::join replaces the last segment unless the base ends with '/'
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            session: None,
            locale: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiFailure::transport(format!("invalid endpoint '{path}': {e}")))
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url.path());

        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            // The platform answers JSON errors only to XHR-looking requests
            .header("X-Requested-With", "XMLHttpRequest");

        if let Some(session) = &self.session {
            let value = HeaderValue::from_str(session.expose_secret())
                .map_err(|_| ApiFailure::transport("session cookie is not a valid header value"))?;
            builder = builder.header(header::COOKIE, value);
        }
        if let Some(locale) = &self.locale {
            builder = builder.header(header::ACCEPT_LANGUAGE, locale.as_str());
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            tracing::debug!("request failed with status {}", status);
            Err(ApiFailure::from_response(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.send(self.request(Method::GET, path)?).await?;
        decode(&body)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> ApiResult<T> {
        let mut builder = self.request(method, path)?;
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        let body = self.send(builder).await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiFailure {
        kind: super::FailureKind::Transport,
        status: Some(StatusCode::OK),
        message: Some(format!("unexpected response body: {e}")),
    })
}

impl SupportApi for HttpSupportApi {
    async fn list_tickets(&self, scope: ListScope) -> ApiResult<Vec<Ticket>> {
        match scope {
            ListScope::Visible => self.get_json("/support/tickets").await,
            ListScope::Mine => self.get_json("/support/tickets/mine").await,
        }
    }

    async fn create_ticket(&self, payload: &TicketPayload) -> ApiResult<Ticket> {
        self.send_json(Method::POST, "/support/ticket", Some(payload))
            .await
    }

    async fn update_ticket(&self, id: TicketId, payload: &TicketPayload) -> ApiResult<Ticket> {
        self.send_json(Method::PUT, &format!("/support/ticket/{id}"), Some(payload))
            .await
    }

    async fn ticket_comments(&self, id: TicketId) -> ApiResult<Vec<Comment>> {
        self.get_json(&format!("/support/ticket/{id}/comments"))
            .await
    }

    async fn ticket_attachments(&self, id: TicketId) -> ApiResult<Vec<Attachment>> {
        self.get_json(&format!("/support/ticket/{id}/attachments"))
            .await
    }

    async fn bug_tracker_issue(&self, id: TicketId) -> ApiResult<Vec<IssueRow>> {
        self.get_json(&format!("/support/ticket/{id}/bugtrackerissue"))
            .await
    }

    async fn escalate_ticket(&self, id: TicketId) -> ApiResult<IssueDocument> {
        self.send_json::<(), _>(Method::POST, &format!("/support/ticket/{id}/escalate"), None)
            .await
    }

    async fn comment_issue(&self, issue_id: i64, content: &str) -> ApiResult<IssueDocument> {
        let body = json!({ "content": content });
        self.send_json(
            Method::POST,
            &format!("/support/issue/{issue_id}/comment"),
            Some(&body),
        )
        .await
    }

    async fn update_status(&self, status: TicketStatus, ids: &[TicketId]) -> ApiResult<()> {
        let body = json!({ "ids": ids });
        let builder = self
            .request(
                Method::POST,
                &format!("/support/ticketstatus/{}", status.code()),
            )?
            .json(&body);
        self.send(builder).await?;
        Ok(())
    }

    async fn ticket_events(&self, id: TicketId) -> ApiResult<Vec<TicketEvent>> {
        self.get_json(&format!("/support/events/{id}")).await
    }

    async fn escalation_activated(&self) -> ApiResult<bool> {
        let value: serde_json::Value = self.get_json("/support/escalation").await?;
        Ok(value["isEscalationActivated"].as_bool().unwrap_or(false))
    }

    async fn bug_tracker_comm_direct(&self) -> ApiResult<bool> {
        let value: serde_json::Value = self.get_json("/support/isBugTrackerCommDirect").await?;
        Ok(value["isBugTrackerCommDirect"].as_bool().unwrap_or(false))
    }

    async fn duplicate_attachment(&self, document_id: &str) -> ApiResult<DuplicatedDocument> {
        self.send_json::<(), _>(
            Method::POST,
            &format!("/workspace/document/{document_id}/protected-copy"),
            None,
        )
        .await
    }
}
