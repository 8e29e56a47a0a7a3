/*! LLM batch API client.

Talks to an OpenAI-compatible batch API:
- `POST /v1/files` to upload a JSONL query file,
- `POST /v1/batches` to create a batch from an uploaded file,
- `GET /v1/batches/{id}` to follow a batch,
- `GET /v1/files/{id}/content` to get results.
!*/
use std::path::Path;
use std::time::Duration;

use log::debug;
use reqwest::blocking::multipart::Form;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Error;

pub const CHAT_COMPLETIONS: &str = "/v1/chat/completions";

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatBody {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

/// A line of a batch input file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchQuery {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: ChatBody,
}

impl BatchQuery {
    pub fn chat(custom_id: String, body: ChatBody) -> Self {
        Self {
            custom_id,
            method: "POST".to_string(),
            url: CHAT_COMPLETIONS.to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Validating,
    InProgress,
    Finalizing,
    Completed,
    Failed,
    Expired,
    Cancelling,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Validating => "validating",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Finalizing => "finalizing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Expired => "expired",
            BatchStatus::Cancelling => "cancelling",
            BatchStatus::Cancelled => "cancelled",
            BatchStatus::Unknown => "unknown",
        }
    }

    /// A terminal batch won't change status anymore.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed
                | BatchStatus::Failed
                | BatchStatus::Expired
                | BatchStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestCounts {
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Remote batch object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Batch {
    pub id: String,
    pub status: BatchStatus,
    #[serde(default)]
    pub request_counts: Option<RequestCounts>,
    #[serde(default)]
    pub output_file_id: Option<String>,
    #[serde(default)]
    pub error_file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

/// A line of a batch output file.
#[derive(Debug, Deserialize)]
pub struct BatchOutput {
    pub custom_id: String,
    pub response: Option<BatchResponse>,
}

#[derive(Debug, Deserialize)]
pub struct BatchResponse {
    pub status_code: u16,
    pub body: CompletionBody,
}

#[derive(Debug, Deserialize)]
pub struct CompletionBody {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Message,
}

impl BatchOutput {
    /// Content of the first choice, if the request succeeded.
    pub fn translation(&self) -> Option<&str> {
        self.response
            .as_ref()
            .filter(|r| (200..300).contains(&r.status_code))
            .and_then(|r| r.body.choices.first())
            .map(|c| c.message.content.as_str())
    }
}

/// Parse the content of an output file. Invalid lines are errors.
pub fn parse_output(content: &str) -> Result<Vec<BatchOutput>, Error> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(Error::from))
        .collect()
}

/// Operations needed to run a batch job.
pub trait BatchService {
    /// Upload a batch input file, returning its id.
    fn upload_file(&self, path: &Path) -> Result<String, Error>;
    fn create_batch(&self, input_file_id: &str, description: &str) -> Result<Batch, Error>;
    fn retrieve_batch(&self, id: &str) -> Result<Batch, Error>;
    fn file_content(&self, id: &str) -> Result<String, Error>;
}

pub struct BatchClient {
    client: reqwest::blocking::Client,
    base_url: Url,
    api_key: String,
}

impl BatchClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self {
            client,
            base_url: super::base_url(base_url)?,
            api_key,
        })
    }

    /// `path` is relative to the configured base url.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }
}

impl BatchService for BatchClient {
    fn upload_file(&self, path: &Path) -> Result<String, Error> {
        let form = Form::new().text("purpose", "batch").file("file", path)?;
        let file: FileObject = self
            .client
            .post(self.url("v1/files")?)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()?
            .error_for_status()?
            .json()?;
        debug!("uploaded {:?} as {}", path, file.id);
        Ok(file.id)
    }

    fn create_batch(&self, input_file_id: &str, description: &str) -> Result<Batch, Error> {
        let body = json!({
            "input_file_id": input_file_id,
            "endpoint": CHAT_COMPLETIONS,
            "completion_window": "24h",
            "metadata": { "description": description },
        });
        let batch = self
            .client
            .post(self.url("v1/batches")?)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(batch)
    }

    fn retrieve_batch(&self, id: &str) -> Result<Batch, Error> {
        let batch = self
            .client
            .get(self.url(&format!("v1/batches/{id}"))?)
            .bearer_auth(&self.api_key)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(batch)
    }

    fn file_content(&self, id: &str) -> Result<String, Error> {
        let content = self
            .client
            .get(self.url(&format!("v1/files/{id}/content"))?)
            .bearer_auth(&self.api_key)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_below_base_path() {
        let client =
            BatchClient::new("https://proxy.example.org/openai", "key".to_string()).unwrap();
        assert_eq!(
            client.url("v1/files").unwrap().as_str(),
            "https://proxy.example.org/openai/v1/files"
        );
        assert_eq!(
            client.url(&format!("v1/batches/{}", "b_1")).unwrap().as_str(),
            "https://proxy.example.org/openai/v1/batches/b_1"
        );
    }

    #[test]
    fn query_shape() {
        let q = BatchQuery::chat(
            "fr_0".to_string(),
            ChatBody {
                model: "m".to_string(),
                messages: vec![Message {
                    role: "user".to_string(),
                    content: "Traduis".to_string(),
                }],
                max_tokens: 10,
            },
        );
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["method"], "POST");
        assert_eq!(v["url"], "/v1/chat/completions");
        assert_eq!(v["body"]["max_tokens"], 10);
        assert_eq!(v["body"]["messages"][0]["role"], "user");
    }

    #[test]
    fn batch_status() {
        let b: Batch = serde_json::from_str(
            r#"{"id": "batch_1", "status": "in_progress", "object": "batch",
                "request_counts": {"total": 10, "completed": 4, "failed": 0},
                "output_file_id": null}"#,
        )
        .unwrap();
        assert_eq!(b.status, BatchStatus::InProgress);
        assert!(!b.status.is_terminal());
        assert_eq!(b.request_counts.unwrap().completed, 4);

        let b: Batch =
            serde_json::from_str(r#"{"id": "batch_2", "status": "something_new"}"#).unwrap();
        assert_eq!(b.status, BatchStatus::Unknown);
        assert!(BatchStatus::Expired.is_terminal());
    }

    #[test]
    fn output_parsing() {
        let content = r#"{"id": "r1", "custom_id": "fr_1", "response": {"status_code": 200, "body": {"choices": [{"index": 0, "message": {"role": "assistant", "content": "Second."}}]}}, "error": null}
{"id": "r0", "custom_id": "fr_0", "response": {"status_code": 200, "body": {"choices": [{"index": 0, "message": {"role": "assistant", "content": "First."}}]}}, "error": null}
{"id": "r2", "custom_id": "fr_2", "response": {"status_code": 500, "body": {}}, "error": null}
"#;
        let outputs = parse_output(content).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].custom_id, "fr_1");
        assert_eq!(outputs[0].translation(), Some("Second."));
        assert_eq!(outputs[2].translation(), None);
    }

    #[test]
    fn endpoint_urls() {
        let c = BatchClient::new("https://api.openai.com", "key".to_string()).unwrap();
        assert_eq!(
            c.url("/v1/batches/b1").unwrap().as_str(),
            "https://api.openai.com/v1/batches/b1"
        );
    }
}
