//! Topic and question maintenance for admin accounts.

use async_trait::async_trait;

use quiz_core::model::{
    AdminQuestion, AdminTopic, QuestionId, QuestionRequest, TopicId, TopicRequest,
};

use super::http::{ApiMessage, RestClient};
use crate::error::ApiError;

/// Admin CRUD endpoints under `api/admin`. The backend refuses them with
/// `403` unless the bearer credential belongs to an admin.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET api/admin/topics`
    async fn list_topics(&self) -> Result<Vec<AdminTopic>, ApiError>;

    /// `GET api/admin/topics/{id}`
    async fn topic(&self, id: TopicId) -> Result<AdminTopic, ApiError>;

    /// `POST api/admin/topics`
    async fn create_topic(&self, request: &TopicRequest) -> Result<AdminTopic, ApiError>;

    /// `PUT api/admin/topics/{id}`
    async fn update_topic(&self, id: TopicId, request: &TopicRequest)
    -> Result<AdminTopic, ApiError>;

    /// `DELETE api/admin/topics/{id}`, returning the backend's message.
    async fn delete_topic(&self, id: TopicId) -> Result<String, ApiError>;

    /// `GET api/admin/questions`
    async fn list_questions(&self) -> Result<Vec<AdminQuestion>, ApiError>;

    /// `GET api/admin/questions/topic/{topic_id}`
    async fn questions_for_topic(&self, topic_id: TopicId)
    -> Result<Vec<AdminQuestion>, ApiError>;

    /// `GET api/admin/questions/{id}`
    async fn question(&self, id: QuestionId) -> Result<AdminQuestion, ApiError>;

    /// `POST api/admin/questions`
    async fn create_question(&self, request: &QuestionRequest)
    -> Result<AdminQuestion, ApiError>;

    /// `PUT api/admin/questions/{id}`
    async fn update_question(
        &self,
        id: QuestionId,
        request: &QuestionRequest,
    ) -> Result<AdminQuestion, ApiError>;

    /// `DELETE api/admin/questions/{id}`, returning the backend's message.
    async fn delete_question(&self, id: QuestionId) -> Result<String, ApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpAdminApi {
    rest: RestClient,
}

impl HttpAdminApi {
    #[must_use]
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    async fn delete(&self, path: &str, fallback: &str) -> Result<String, ApiError> {
        let reply: ApiMessage = self.rest.delete(path).await?;
        Ok(reply.message.unwrap_or_else(|| fallback.to_owned()))
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_topics(&self) -> Result<Vec<AdminTopic>, ApiError> {
        self.rest.get("api/admin/topics").await
    }

    async fn topic(&self, id: TopicId) -> Result<AdminTopic, ApiError> {
        self.rest.get(&format!("api/admin/topics/{id}")).await
    }

    async fn create_topic(&self, request: &TopicRequest) -> Result<AdminTopic, ApiError> {
        let topic: AdminTopic = self.rest.post("api/admin/topics", request).await?;
        tracing::info!(topic_id = %topic.id, name = %topic.name, "topic created");
        Ok(topic)
    }

    async fn update_topic(
        &self,
        id: TopicId,
        request: &TopicRequest,
    ) -> Result<AdminTopic, ApiError> {
        self.rest.put(&format!("api/admin/topics/{id}"), request).await
    }

    async fn delete_topic(&self, id: TopicId) -> Result<String, ApiError> {
        let message = self
            .delete(&format!("api/admin/topics/{id}"), "Topic deleted successfully")
            .await?;
        tracing::info!(topic_id = %id, "topic deleted");
        Ok(message)
    }

    async fn list_questions(&self) -> Result<Vec<AdminQuestion>, ApiError> {
        self.rest.get("api/admin/questions").await
    }

    async fn questions_for_topic(
        &self,
        topic_id: TopicId,
    ) -> Result<Vec<AdminQuestion>, ApiError> {
        self.rest
            .get(&format!("api/admin/questions/topic/{topic_id}"))
            .await
    }

    async fn question(&self, id: QuestionId) -> Result<AdminQuestion, ApiError> {
        self.rest.get(&format!("api/admin/questions/{id}")).await
    }

    async fn create_question(
        &self,
        request: &QuestionRequest,
    ) -> Result<AdminQuestion, ApiError> {
        let question: AdminQuestion = self.rest.post("api/admin/questions", request).await?;
        tracing::info!(question_id = %question.id, "question created");
        Ok(question)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        request: &QuestionRequest,
    ) -> Result<AdminQuestion, ApiError> {
        self.rest
            .put(&format!("api/admin/questions/{id}"), request)
            .await
    }

    async fn delete_question(&self, id: QuestionId) -> Result<String, ApiError> {
        let message = self
            .delete(
                &format!("api/admin/questions/{id}"),
                "Question deleted successfully",
            )
            .await?;
        tracing::info!(question_id = %id, "question deleted");
        Ok(message)
    }
}
