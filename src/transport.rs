//! The network collaborator: request/response values and the async
//! transport seam.

use std::time::Duration;

use http::StatusCode;

use crate::error::{SubmitError, SubmitResult};

/// Fixed time budget for one asynchronous submission attempt.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_millis(2000);

/// An outgoing request built from a form's method, action, and field
/// snapshot at the moment of submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
	pub method: String,
	pub action: String,
	pub fields: Vec<(String, String)>,
	/// Time budget, set only when the transport reports timeout support.
	pub timeout: Option<Duration>,
}

impl FormRequest {
	/// Builds a request without a timeout; the interceptor attaches one
	/// when the transport supports it.
	///
	/// # Examples
	///
	/// ```
	/// use formrelay::FormRequest;
	///
	/// let request = FormRequest::new("post", "/screening/submit", vec![]);
	/// assert!(request.timeout.is_none());
	/// ```
	pub fn new(
		method: impl Into<String>,
		action: impl Into<String>,
		fields: Vec<(String, String)>,
	) -> Self {
		Self {
			method: method.into(),
			action: action.into(),
			fields,
			timeout: None,
		}
	}

	/// Whether the fields belong in the query string rather than the body.
	/// `fetch` rejects GET and HEAD requests that carry a body.
	pub fn carries_query(&self) -> bool {
		self.method.eq_ignore_ascii_case("get") || self.method.eq_ignore_ascii_case("head")
	}

	/// The field snapshot as an `application/x-www-form-urlencoded` string.
	pub fn encoded_fields(&self) -> SubmitResult<String> {
		serde_urlencoded::to_string(&self.fields).map_err(|err| SubmitError::Transport {
			message: err.to_string(),
		})
	}

	/// The effective URL: for query-carrying methods the encoded fields are
	/// appended to the action.
	pub fn url(&self) -> SubmitResult<String> {
		if !self.carries_query() || self.fields.is_empty() {
			return Ok(self.action.clone());
		}
		let encoded = self.encoded_fields()?;
		let separator = if self.action.contains('?') { '&' } else { '?' };
		Ok(format!("{}{}{}", self.action, separator, encoded))
	}

	/// The request body, or `None` for query-carrying methods.
	pub fn body(&self) -> SubmitResult<Option<String>> {
		if self.carries_query() {
			Ok(None)
		} else {
			self.encoded_fields().map(Some)
		}
	}
}

/// A received response: status plus body text.
#[derive(Debug, Clone)]
pub struct FormResponse {
	pub status: StatusCode,
	pub body: String,
}

impl FormResponse {
	pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// Builds a response from a raw status code straight off the wire.
	///
	/// # Examples
	///
	/// ```
	/// use formrelay::FormResponse;
	///
	/// let response = FormResponse::from_raw(204, "").unwrap();
	/// assert!(response.is_success());
	/// ```
	pub fn from_raw(status: u16, body: impl Into<String>) -> SubmitResult<Self> {
		let status = StatusCode::from_u16(status).map_err(|err| SubmitError::Transport {
			message: err.to_string(),
		})?;
		Ok(Self::new(status, body))
	}

	/// Whether the status signals success (2xx).
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}
}

/// The request/response collaborator.
///
/// Implementations resolve with a [`FormResponse`] for *any* received
/// response, whatever its status; the interceptor decides what a failure
/// status means. A transport only errors when no response was received at
/// all.
#[cfg_attr(browser, async_trait::async_trait(?Send))]
#[cfg_attr(not(browser), async_trait::async_trait)]
pub trait Transport {
	/// Whether the transport can enforce a time budget on a request.
	/// Absence degrades gracefully: the request is issued without a
	/// timeout, never refused.
	fn supports_timeout(&self) -> bool;

	/// Issue the request and resolve with the response.
	async fn send(&self, request: FormRequest) -> SubmitResult<FormResponse>;
}

/// reqwest-backed transport for the server-side test profile.
///
/// The browser profile uses `dom::FetchTransport` instead; this one exists
/// so the full flow can run against a real HTTP server in native tests.
#[cfg(not(browser))]
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
	client: reqwest::Client,
}

#[cfg(not(browser))]
impl HttpTransport {
	pub fn new() -> Self {
		Self::default()
	}
}

#[cfg(not(browser))]
#[async_trait::async_trait]
impl Transport for HttpTransport {
	fn supports_timeout(&self) -> bool {
		true
	}

	async fn send(&self, request: FormRequest) -> SubmitResult<FormResponse> {
		let method = reqwest::Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
			.map_err(|err| SubmitError::Transport {
				message: err.to_string(),
			})?;
		let mut builder = self.client.request(method, request.url()?);
		if let Some(body) = request.body()? {
			builder = builder
				.header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
				.body(body);
		}
		if let Some(timeout) = request.timeout {
			builder = builder.timeout(timeout);
		}
		let response = builder.send().await.map_err(|err| {
			if err.is_timeout() {
				SubmitError::Timeout(request.timeout.unwrap_or(SUBMIT_TIMEOUT).as_millis() as u64)
			} else {
				SubmitError::Transport {
					message: err.to_string(),
				}
			}
		})?;
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		Ok(FormResponse::new(status, body))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fields() -> Vec<(String, String)> {
		vec![
			("name".to_string(), "Janet Williams".to_string()),
			("screened".to_string(), "yes&no".to_string()),
		]
	}

	#[test]
	fn test_encoded_fields_escapes_values() {
		let request = FormRequest::new("post", "/submit", fields());
		assert_eq!(
			request.encoded_fields().unwrap(),
			"name=Janet+Williams&screened=yes%26no"
		);
	}

	#[test]
	fn test_post_carries_body_not_query() {
		let request = FormRequest::new("post", "/submit", fields());
		assert_eq!(request.url().unwrap(), "/submit");
		assert_eq!(
			request.body().unwrap().as_deref(),
			Some("name=Janet+Williams&screened=yes%26no")
		);
	}

	#[test]
	fn test_get_carries_query_not_body() {
		let request = FormRequest::new("get", "/search", fields());
		assert_eq!(
			request.url().unwrap(),
			"/search?name=Janet+Williams&screened=yes%26no"
		);
		assert_eq!(request.body().unwrap(), None);
	}

	#[test]
	fn test_get_appends_to_existing_query() {
		let request = FormRequest::new(
			"GET",
			"/search?page=2",
			vec![("q".to_string(), "clinic".to_string())],
		);
		assert_eq!(request.url().unwrap(), "/search?page=2&q=clinic");
	}

	#[test]
	fn test_get_without_fields_keeps_action() {
		let request = FormRequest::new("get", "/search", vec![]);
		assert_eq!(request.url().unwrap(), "/search");
	}

	#[test]
	fn test_response_success_statuses() {
		assert!(FormResponse::from_raw(200, "ok").unwrap().is_success());
		assert!(FormResponse::from_raw(201, "").unwrap().is_success());
		assert!(!FormResponse::from_raw(302, "").unwrap().is_success());
		assert!(!FormResponse::from_raw(500, "").unwrap().is_success());
	}

	#[test]
	fn test_response_rejects_invalid_status() {
		assert!(FormResponse::from_raw(1000, "").is_err());
	}
}
