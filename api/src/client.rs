//! Todo-lists API client implementation

use crate::{
    error::ApiError,
    types::{
        ApiResponse, AuthMeData, EmptyData, ItemData, TaskDto, TasksPage, TitleBody, TodoListDto,
        UpdateTaskModel,
    },
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "https://social-network.samuraijs.com/api/1.1";

/// Default number of tasks requested per page
pub const DEFAULT_TASK_PAGE_SIZE: u32 = 10;

/// Backend API call surface used by thunks
///
/// This trait abstracts over the concrete transport so thunks can run
/// against the HTTP client in production and a mock under test.
pub trait TodoListApi: Send + Sync {
    /// Fetch every list of the current user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn get_todo_lists(&self) -> impl Future<Output = Result<Vec<TodoListDto>, ApiError>> + Send;

    /// Create a list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn add_todo_list(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<ApiResponse<ItemData<TodoListDto>>, ApiError>> + Send;

    /// Delete a list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn delete_todo_list(
        &self,
        todo_list_id: &str,
    ) -> impl Future<Output = Result<ApiResponse<EmptyData>, ApiError>> + Send;

    /// Rename a list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn update_todo_list_title(
        &self,
        todo_list_id: &str,
        title: &str,
    ) -> impl Future<Output = Result<ApiResponse<EmptyData>, ApiError>> + Send;

    /// Fetch one page of a list's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] if the page carries an error
    /// message, otherwise as the other calls.
    fn get_tasks(
        &self,
        todo_list_id: &str,
        page_size: u32,
    ) -> impl Future<Output = Result<TasksPage, ApiError>> + Send;

    /// Create a task in a list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn add_task(
        &self,
        todo_list_id: &str,
        title: &str,
    ) -> impl Future<Output = Result<ApiResponse<ItemData<TaskDto>>, ApiError>> + Send;

    /// Replace a task's editable fields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn update_task(
        &self,
        todo_list_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> impl Future<Output = Result<ApiResponse<ItemData<TaskDto>>, ApiError>> + Send;

    /// Check the current session.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn auth_me(&self) -> impl Future<Output = Result<ApiResponse<AuthMeData>, ApiError>> + Send;
}

/// HTTP client for the todo-lists backend
#[derive(Clone)]
pub struct HttpTodoListApi {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl HttpTodoListApi {
    /// Create a client for `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client with a request timeout
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            ..Self::new(base_url)
        })
    }

    /// Send `API-KEY` with every request
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("content-type", "application/json");

        match &self.api_key {
            Some(key) => builder.header("API-KEY", key),
            None => builder,
        }
    }

    #[tracing::instrument(skip(self, builder), level = "debug")]
    async fn execute<T: DeserializeOwned>(
        &self,
        route: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(status = status.as_u16(), "Backend rejected request");
                Err(ApiError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

impl std::fmt::Debug for HttpTodoListApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTodoListApi")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl TodoListApi for HttpTodoListApi {
    async fn get_todo_lists(&self) -> Result<Vec<TodoListDto>, ApiError> {
        self.execute("get_todo_lists", self.request(Method::GET, "/todo-lists"))
            .await
    }

    async fn add_todo_list(&self, title: &str) -> Result<ApiResponse<ItemData<TodoListDto>>, ApiError> {
        let body = TitleBody {
            title: title.to_string(),
        };
        self.execute(
            "add_todo_list",
            self.request(Method::POST, "/todo-lists").json(&body),
        )
        .await
    }

    async fn delete_todo_list(&self, todo_list_id: &str) -> Result<ApiResponse<EmptyData>, ApiError> {
        self.execute(
            "delete_todo_list",
            self.request(Method::DELETE, &format!("/todo-lists/{todo_list_id}")),
        )
        .await
    }

    async fn update_todo_list_title(
        &self,
        todo_list_id: &str,
        title: &str,
    ) -> Result<ApiResponse<EmptyData>, ApiError> {
        let body = TitleBody {
            title: title.to_string(),
        };
        self.execute(
            "update_todo_list_title",
            self.request(Method::PUT, &format!("/todo-lists/{todo_list_id}"))
                .json(&body),
        )
        .await
    }

    async fn get_tasks(&self, todo_list_id: &str, page_size: u32) -> Result<TasksPage, ApiError> {
        let page: TasksPage = self
            .execute(
                "get_tasks",
                self.request(Method::GET, &format!("/todo-lists/{todo_list_id}/tasks"))
                    .query(&[("count", page_size)]),
            )
            .await?;

        match page.error {
            Some(message) => Err(ApiError::InvalidPayload(message)),
            None => Ok(page),
        }
    }

    async fn add_task(
        &self,
        todo_list_id: &str,
        title: &str,
    ) -> Result<ApiResponse<ItemData<TaskDto>>, ApiError> {
        let body = TitleBody {
            title: title.to_string(),
        };
        self.execute(
            "add_task",
            self.request(Method::POST, &format!("/todo-lists/{todo_list_id}/tasks"))
                .json(&body),
        )
        .await
    }

    async fn update_task(
        &self,
        todo_list_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> Result<ApiResponse<ItemData<TaskDto>>, ApiError> {
        self.execute(
            "update_task",
            self.request(
                Method::PUT,
                &format!("/todo-lists/{todo_list_id}/tasks/{task_id}"),
            )
            .json(model),
        )
        .await
    }

    async fn auth_me(&self) -> Result<ApiResponse<AuthMeData>, ApiError> {
        self.execute("auth_me", self.request(Method::GET, "/auth/me"))
            .await
    }
}

impl Default for HttpTodoListApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpTodoListApi::default();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HttpTodoListApi::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = HttpTodoListApi::default().with_api_key("secret-key");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
