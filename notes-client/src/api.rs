use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub const IDENTITY_HEADER: &str = "x-user-email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub user_email: String,
}

#[derive(Debug, Serialize)]
struct NoteBody<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Notes API bound to one signed-in user.
#[derive(Debug, Clone)]
pub struct NotesApi {
    http: Client,
    base_url: String,
    email: String,
}

impl NotesApi {
    pub fn new(base_url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email: email.into(),
        }
    }

    fn url(&self, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/api/notes/{id}", self.base_url),
            None => format!("{}/api/notes", self.base_url),
        }
    }

    pub async fn list(&self) -> Result<Vec<Note>, ClientError> {
        let response = self
            .http
            .get(self.url(None))
            .header(IDENTITY_HEADER, &self.email)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create(&self, title: &str, content: &str) -> Result<Note, ClientError> {
        let response = self
            .http
            .post(self.url(None))
            .header(IDENTITY_HEADER, &self.email)
            .json(&NoteBody { title, content })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<Note, ClientError> {
        let response = self
            .http
            .put(self.url(Some(id)))
            .header(IDENTITY_HEADER, &self.email)
            .json(&NoteBody { title, content })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(Some(id)))
            .header(IDENTITY_HEADER, &self.email)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, message })
}
