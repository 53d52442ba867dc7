use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use quiz_core::model::{
    AttemptId, AttemptSummary, GeneratedQuiz, QuizRequest, QuizResult, SubmissionPayload,
    TopicSummary,
};

use super::QuizApi;
use crate::auth::CredentialProvider;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Generic `{success, message}` body returned by informational endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Maps a non-success response to `ApiError::Status`, keeping the backend's
/// `message` (or `error`) field when the body carries one.
pub(crate) fn error_from_body(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.trim().is_empty());
    ApiError::Status { status, message }
}

//
// ─── REST CLIENT ───────────────────────────────────────────────────────────────
//

/// JSON-over-HTTP transport shared by the quiz and auth clients.
///
/// Attaches the bearer credential from the injected provider to every request.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl RestClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            credentials,
        })
    }

    /// Resolves a path relative to the configured base url.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.client.request(method, url);
        Ok(match self.credentials.token() {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?;
        self.execute(path, builder).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.execute(path, builder).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        self.execute(path, builder).await
    }

    pub(crate) async fn post_with_query<B, T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self.request(Method::POST, path)?.query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(path, builder).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.execute(path, builder).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::DELETE, path)?;
        self.execute(path, builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "sending request");
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(path, "unauthorized request, sign in again");
            } else {
                tracing::debug!(path, %status, "request rejected");
            }
            let body = response.bytes().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| {
            tracing::warn!(path, error = %err, "response body did not match the expected shape");
            ApiError::Decode(err.to_string())
        })
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

//
// ─── QUIZ API OVER HTTP ────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct HttpQuizApi {
    rest: RestClient,
}

impl HttpQuizApi {
    #[must_use]
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn generate_quiz(&self, request: &QuizRequest) -> Result<GeneratedQuiz, ApiError> {
        self.rest.post("api/quiz/generate", request).await
    }

    async fn submit_quiz(&self, payload: &SubmissionPayload) -> Result<QuizResult, ApiError> {
        self.rest.post("api/quiz/submit", payload).await
    }

    async fn list_topics(&self) -> Result<Vec<TopicSummary>, ApiError> {
        self.rest.get("api/quiz/topics").await
    }

    async fn history(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        self.rest.get("api/quiz/history").await
    }

    async fn attempt_result(&self, attempt_id: AttemptId) -> Result<QuizResult, ApiError> {
        self.rest
            .get(&format!("api/quiz/result/{attempt_id}"))
            .await
    }

    async fn send_result_email(
        &self,
        email: &str,
        result: &QuizResult,
    ) -> Result<String, ApiError> {
        let reply: ApiMessage = self
            .rest
            .post_with_query("api/quiz/send-quiz-result", &[("email", email)], Some(result))
            .await?;
        Ok(reply
            .message
            .unwrap_or_else(|| format!("Quiz results sent to {email}")))
    }
}
