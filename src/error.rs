//! Error types for the submit interception flow.

/// Boxed error type carried by a failing success callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong between `attach` and the fallback.
///
/// Configuration errors ([`NotAForm`](SubmitError::NotAForm),
/// [`MissingMethodOrAction`](SubmitError::MissingMethodOrAction)) are raised
/// synchronously at attach time; every other variant belongs to one
/// asynchronous submission attempt and resolves into the native fallback.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
	/// `attach` was called with something that is not a form element.
	#[error("attach must be called with a form element")]
	NotAForm,
	/// The form does not declare both `method` and `action`.
	#[error("form method and action must be defined")]
	MissingMethodOrAction,
	/// The network layer rejected the request with a recognized error.
	#[error("network error: {message}")]
	Transport { message: String },
	/// The request did not settle within the time budget.
	#[error("request timed out after {0}ms")]
	Timeout(u64),
	/// A response arrived, but its status signals failure.
	#[error("response status: {0}")]
	Status(u16),
	/// The submission was delivered, but the `on_success` callback failed.
	#[error("success callback failed")]
	SuccessCallback(#[source] BoxError),
	/// The attempt failed with a value that is not a recognized error.
	#[error("unrecognized failure: {0}")]
	Unrecognized(String),
}

impl SubmitError {
	/// Whether this failure carries a recognized error value.
	///
	/// Only recognized errors are delivered to `on_error`. Unrecognized
	/// failures still trigger the native fallback, but the caller's
	/// callback never sees them.
	///
	/// # Examples
	///
	/// ```
	/// use formrelay::SubmitError;
	///
	/// assert!(SubmitError::Status(502).is_recognized());
	/// assert!(!SubmitError::Unrecognized("thrown string".into()).is_recognized());
	/// ```
	pub fn is_recognized(&self) -> bool {
		!matches!(self, Self::Unrecognized(_))
	}

	/// Whether this is an attach-time configuration error.
	pub fn is_config(&self) -> bool {
		matches!(self, Self::NotAForm | Self::MissingMethodOrAction)
	}
}

pub type SubmitResult<T> = Result<T, SubmitError>;
