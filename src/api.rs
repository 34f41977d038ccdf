//! Client for the note service's REST API.
//!
//! Covers what the graph pages read: the graph data and a single note.

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::force_graph::GraphData;

/// Backend used when `NOTE_API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Number of notes requested for the graph.
pub const DEFAULT_GRAPH_LIMIT: usize = 50;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
	#[error("network error: {0}")]
	Network(String),
	#[error("server returned {status}: {message}")]
	Status { status: u16, message: String },
	#[error("could not decode response: {0}")]
	Decode(String),
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(err.to_string())
	}
}

/// A stored note, as returned by `GET /api/notes/{id}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Note {
	pub id: i64,
	pub title: String,
	pub content: String,
	#[serde(default)]
	pub summary: Option<String>,
	#[serde(default)]
	pub tags: Option<Vec<String>>,
	pub created_at: String,
	pub updated_at: String,
}

impl Note {
	pub fn created_on(&self) -> &str {
		date_part(&self.created_at)
	}

	pub fn updated_on(&self) -> &str {
		date_part(&self.updated_at)
	}
}

/// `YYYY-MM-DD` of an ISO timestamp.
fn date_part(timestamp: &str) -> &str {
	timestamp.get(..10).unwrap_or(timestamp)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteApi {
	base_url: String,
}

impl NoteApi {
	pub fn new(base_url: impl Into<String>) -> Self {
		let mut base_url = base_url.into();
		while base_url.ends_with('/') {
			base_url.pop();
		}
		Self { base_url }
	}

	/// Uses the compile-time `NOTE_API_URL`, or the local default.
	pub fn from_env() -> Self {
		Self::new(option_env!("NOTE_API_URL").unwrap_or(DEFAULT_API_URL))
	}

	#[allow(dead_code)]
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn graph_data_url(&self, limit: usize) -> String {
		format!("{}/api/notes/graph/data?limit={}", self.base_url, limit)
	}

	pub fn note_url(&self, id: &str) -> String {
		format!("{}/api/notes/{}", self.base_url, id.trim())
	}

	/// `GET /api/notes/graph/data`.
	pub async fn fetch_graph_data(&self, limit: usize) -> Result<GraphData, ApiError> {
		let body = self.get(&self.graph_data_url(limit)).await?;
		Ok(GraphData::from_json(&body)?)
	}

	/// `GET /api/notes/{id}`. Graph node ids are the note ids.
	pub async fn fetch_note(&self, id: &str) -> Result<Note, ApiError> {
		let body = self.get(&self.note_url(id)).await?;
		Ok(serde_json::from_str(&body)?)
	}

	async fn get(&self, url: &str) -> Result<String, ApiError> {
		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);
		let request = Request::new_with_str_and_init(url, &opts).map_err(network)?;
		request
			.headers()
			.set("Accept", "application/json")
			.map_err(network)?;

		let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(network)?
			.dyn_into()
			.map_err(network)?;
		let body = JsFuture::from(response.text().map_err(network)?)
			.await
			.map_err(network)?
			.as_string()
			.unwrap_or_default();

		if !response.ok() {
			return Err(status_error(
				response.status(),
				&body,
				&response.status_text(),
			));
		}
		Ok(body)
	}
}

fn network(value: JsValue) -> ApiError {
	ApiError::Network(
		value
			.as_string()
			.unwrap_or_else(|| format!("{:?}", value)),
	)
}

/// Error for a non-2xx response.
pub fn status_error(status: u16, body: &str, status_text: &str) -> ApiError {
	ApiError::Status {
		status,
		message: error_message(body, status_text),
	}
}

/// The most useful message in an error body: `detail`, then `message`, then
/// the HTTP status text.
pub fn error_message(body: &str, status_text: &str) -> String {
	#[derive(Deserialize)]
	struct ErrorBody {
		detail: Option<serde_json::Value>,
		message: Option<String>,
	}

	let parsed = serde_json::from_str::<ErrorBody>(body).ok();
	let detail = parsed.as_ref().and_then(|b| match &b.detail {
		Some(serde_json::Value::String(s)) => Some(s.clone()),
		Some(serde_json::Value::Null) | None => None,
		Some(other) => Some(other.to_string()),
	});
	detail
		.or_else(|| parsed.and_then(|b| b.message))
		.unwrap_or_else(|| status_text.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_urls_without_double_slash() {
		let api = NoteApi::new("https://notes.example.com/");
		assert_eq!(api.base_url(), "https://notes.example.com");
		assert_eq!(
			api.graph_data_url(50),
			"https://notes.example.com/api/notes/graph/data?limit=50"
		);
		assert_eq!(api.note_url("42"), "https://notes.example.com/api/notes/42");
	}

	#[test]
	fn default_base_url_is_local() {
		if option_env!("NOTE_API_URL").is_none() {
			assert_eq!(NoteApi::from_env().base_url(), DEFAULT_API_URL);
		}
	}

	#[test]
	fn error_message_prefers_detail() {
		assert_eq!(error_message(r#"{"detail": "Note not found"}"#, "Not Found"), "Note not found");
		assert_eq!(
			error_message(r#"{"message": "slow down"}"#, "Too Many Requests"),
			"slow down"
		);
		assert_eq!(error_message("<html>oops</html>", "Bad Gateway"), "Bad Gateway");
		assert!(
			error_message(r#"{"detail": [{"loc": ["query", "limit"]}]}"#, "Unprocessable")
				.contains("limit")
		);
	}

	#[test]
	fn missing_note_maps_to_status_error() {
		let err = status_error(404, r#"{"detail": "Note not found"}"#, "Not Found");
		assert_eq!(
			err,
			ApiError::Status {
				status: 404,
				message: "Note not found".into(),
			}
		);
		assert_eq!(err.to_string(), "server returned 404: Note not found");
	}

	#[test]
	fn parses_note_with_optional_fields() {
		let note: Note = serde_json::from_str(
			r#"{
				"id": 7,
				"user_id": 1,
				"title": "Ownership",
				"content": "Borrowing rules",
				"summary": null,
				"created_at": "2024-03-01T10:00:00",
				"updated_at": "2024-03-02T08:30:00"
			}"#,
		)
		.unwrap();

		assert_eq!(note.id, 7);
		assert_eq!(note.summary, None);
		assert_eq!(note.tags, None);
		assert_eq!(note.created_on(), "2024-03-01");
		assert_eq!(note.updated_on(), "2024-03-02");
	}

	#[test]
	fn decode_errors_convert() {
		let err: ApiError = GraphData::from_json("{").unwrap_err().into();
		assert!(matches!(err, ApiError::Decode(_)));
		assert!(err.to_string().starts_with("could not decode response"));
	}
}
