//! Business Messages REST client.
//!
//! The client holds a shared `reqwest::Client` and a credential provider and
//! can be cloned freely across request handlers.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use crate::auth::CredentialProvider;
use crate::error::ClientError;

use super::types::{ConversationEvent, EventType, Message, Representative};

/// Outbound side of a conversation.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn send_message(&self, conversation_id: &str, message: &Message) -> Result<(), ClientError>;

    async fn send_event(
        &self,
        conversation_id: &str,
        event_type: EventType,
        representative: &Representative,
    ) -> Result<(), ClientError>;

    async fn send_survey(&self, conversation_id: &str) -> Result<(), ClientError>;
}

/// `MessagingClient` backed by the Business Messages API.
#[derive(Clone)]
pub struct BusinessMessagesClient {
    http: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl BusinessMessagesClient {
    /// `http` is shared with the credential provider; its timeout applies
    /// to every outbound call.
    pub fn new(
        http: Client,
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            credentials,
        })
    }

    /// `{base}conversations/{id}/{collection}`
    fn conversation_url(&self, conversation_id: &str, collection: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.join("conversations/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(conversation_id)
            .push(collection);
        Ok(url)
    }

    async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<(), ClientError> {
        let token = self.credentials.get_or_refresh().await?;

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(token.secret())
            .json(body)
            .send()
            .await?;

        check_status(url.path(), response).await
    }
}

async fn check_status(path: &str, response: Response) -> Result<(), ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    error!(
        path = %path,
        status_code = status.as_u16(),
        body = %body,
        "bm_api_error"
    );

    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl MessagingClient for BusinessMessagesClient {
    async fn send_message(&self, conversation_id: &str, message: &Message) -> Result<(), ClientError> {
        let mut url = self.conversation_url(conversation_id, "messages")?;
        url.query_pairs_mut().append_pair("forceFallback", "false");

        self.post(url, message).await?;

        info!(
            conversation_id = %conversation_id,
            message_id = %message.message_id,
            "bm_message_sent"
        );
        Ok(())
    }

    async fn send_event(
        &self,
        conversation_id: &str,
        event_type: EventType,
        representative: &Representative,
    ) -> Result<(), ClientError> {
        let event_id = uuid::Uuid::new_v4().to_string();
        let mut url = self.conversation_url(conversation_id, "events")?;
        url.query_pairs_mut().append_pair("eventId", &event_id);

        let body = ConversationEvent {
            event_type,
            representative,
        };
        self.post(url, &body).await?;

        info!(
            conversation_id = %conversation_id,
            event_id = %event_id,
            event_type = event_type.as_str(),
            "bm_event_sent"
        );
        Ok(())
    }

    async fn send_survey(&self, conversation_id: &str) -> Result<(), ClientError> {
        let survey_id = uuid::Uuid::new_v4().to_string();
        let mut url = self.conversation_url(conversation_id, "surveys")?;
        url.query_pairs_mut().append_pair("surveyId", &survey_id);

        self.post(url, &serde_json::json!({})).await?;

        info!(
            conversation_id = %conversation_id,
            survey_id = %survey_id,
            "bm_survey_sent"
        );
        Ok(())
    }
}
