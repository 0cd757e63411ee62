//! The submit interceptor: event-handling algorithm and native fallback.
//!
//! [`SubmitInterceptor`] is the target-independent core. It talks to two
//! collaborators, a [`FormTarget`] and a [`Transport`], and owns the
//! ordering guarantees: `on_before_submit` strictly before the request is
//! sent, `on_success`/`on_error` at most once per submit event and mutually
//! exclusive, and the native fallback only after all callbacks for the
//! attempt have settled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::callback::{Callback, ErrorHandler};
use crate::diagnostics::{ConsoleDiagnostics, DiagnosticSink};
use crate::error::{BoxError, SubmitError, SubmitResult};
use crate::form::FormTarget;
use crate::transport::{FormRequest, FormResponse, SUBMIT_TIMEOUT, Transport};

/// Configuration for an attached form: three optional callback slots and
/// the diagnostic sink.
///
/// # Examples
///
/// ```
/// use formrelay::SubmitOptions;
///
/// let options = SubmitOptions::new()
/// 	.on_before_submit(|| { /* disable the submit button */ })
/// 	.on_success(|_response| Ok(()))
/// 	.on_error(|_error| { /* a full navigation is about to happen */ });
/// ```
#[derive(Clone)]
pub struct SubmitOptions {
	pub(crate) on_before_submit: Option<Callback<(), ()>>,
	pub(crate) on_success: Option<Callback<FormResponse, Result<(), BoxError>>>,
	pub(crate) on_error: Option<ErrorHandler>,
	pub(crate) diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for SubmitOptions {
	fn default() -> Self {
		Self {
			on_before_submit: None,
			on_success: None,
			on_error: None,
			diagnostics: Arc::new(ConsoleDiagnostics),
		}
	}
}

impl SubmitOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the diagnostic sink (defaults to the console).
	pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
		self.diagnostics = sink;
		self
	}

	/// A shared handle to the configured sink.
	pub fn diagnostics_handle(&self) -> Arc<dyn DiagnosticSink> {
		Arc::clone(&self.diagnostics)
	}
}

// Callback registration. The bounds differ per target because wasm
// callbacks close over JS values that are not `Send`; see `Callback` for
// the same split.
#[cfg(browser)]
impl SubmitOptions {
	/// Invoked with no arguments before the request is built.
	pub fn on_before_submit(mut self, f: impl Fn() + 'static) -> Self {
		self.on_before_submit = Some(Callback::new(move |_: ()| f()));
		self
	}

	/// Invoked with the successful response. Returning an error routes the
	/// attempt into the fallback path even though the submission was
	/// delivered.
	pub fn on_success(
		mut self,
		f: impl Fn(FormResponse) -> Result<(), BoxError> + 'static,
	) -> Self {
		self.on_success = Some(Callback::new(f));
		self
	}

	/// Invoked with the failure reason, only when the failure carries a
	/// recognized error value.
	pub fn on_error(mut self, f: impl Fn(&SubmitError) + 'static) -> Self {
		self.on_error = Some(Arc::new(f));
		self
	}
}

#[cfg(not(browser))]
impl SubmitOptions {
	/// Invoked with no arguments before the request is built.
	pub fn on_before_submit(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
		self.on_before_submit = Some(Callback::new(move |_: ()| f()));
		self
	}

	/// Invoked with the successful response. Returning an error routes the
	/// attempt into the fallback path even though the submission was
	/// delivered.
	pub fn on_success(
		mut self,
		f: impl Fn(FormResponse) -> Result<(), BoxError> + Send + Sync + 'static,
	) -> Self {
		self.on_success = Some(Callback::new(f));
		self
	}

	/// Invoked with the failure reason, only when the failure carries a
	/// recognized error value.
	pub fn on_error(mut self, f: impl Fn(&SubmitError) + Send + Sync + 'static) -> Self {
		self.on_error = Some(Arc::new(f));
		self
	}
}

impl std::fmt::Debug for SubmitOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SubmitOptions")
			.field("on_before_submit", &self.on_before_submit.is_some())
			.field("on_success", &self.on_success.is_some())
			.field("on_error", &self.on_error.is_some())
			.finish()
	}
}

/// How one submit event was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// The asynchronous attempt succeeded; no navigation happened.
	Delivered,
	/// The attempt failed; the listener disarmed itself permanently and
	/// the native submission ran.
	FellBack,
	/// The listener had already disarmed; only the native submission ran,
	/// with no asynchronous attempt.
	Bypassed,
}

/// The submit-handling core.
///
/// One interceptor serves one form. It stays armed until a single fallback
/// occurs, after which every further submit event goes straight to the
/// native path. Exactly one attempt is in flight per submit event; nothing
/// is queued or coalesced, and no state beyond the armed flag outlives one
/// submit cycle.
pub struct SubmitInterceptor<F, T> {
	form: F,
	transport: T,
	options: SubmitOptions,
	armed: AtomicBool,
}

impl<F: FormTarget, T: Transport> SubmitInterceptor<F, T> {
	/// Validates the form's configuration and arms the interceptor.
	///
	/// # Errors
	///
	/// [`SubmitError::MissingMethodOrAction`] if the form does not declare
	/// both a method and an action. Nothing is armed on failure.
	pub fn new(form: F, transport: T, options: SubmitOptions) -> SubmitResult<Self> {
		if form.method().trim().is_empty() || form.action().trim().is_empty() {
			return Err(SubmitError::MissingMethodOrAction);
		}
		Ok(Self {
			form,
			transport,
			options,
			armed: AtomicBool::new(true),
		})
	}

	/// Whether the submit listener is still armed.
	pub fn is_armed(&self) -> bool {
		self.armed.load(Ordering::SeqCst)
	}

	pub fn form(&self) -> &F {
		&self.form
	}

	/// Handles one submit event whose default submission the caller has
	/// already suppressed.
	///
	/// On any failure of the asynchronous attempt the interceptor disarms
	/// permanently and invokes the form's native submission, the same
	/// outcome the user would have gotten without the enhancement. The
	/// fallback assumes the form action is idempotent, since a failed
	/// attempt may have partially succeeded server-side before the native
	/// re-submission.
	pub async fn handle_submit(&self) -> SubmitOutcome {
		if !self.is_armed() {
			// One fallback already ran; only the native path remains.
			self.form.submit_native();
			return SubmitOutcome::Bypassed;
		}
		match self.attempt().await {
			Ok(_) => SubmitOutcome::Delivered,
			Err(_) => {
				self.armed.store(false, Ordering::SeqCst);
				self.form.submit_native();
				SubmitOutcome::FellBack
			}
		}
	}

	/// One asynchronous attempt. Errors are logged and filtered to
	/// `on_error` here; the fallback itself belongs to
	/// [`handle_submit`](Self::handle_submit).
	async fn attempt(&self) -> SubmitResult<FormResponse> {
		let outcome = self.send_and_deliver().await;
		if let Err(err) = &outcome {
			self.options.diagnostics.error(&err.to_string());
			if err.is_recognized()
				&& let Some(on_error) = &self.options.on_error
			{
				on_error.as_ref()(err);
			}
		}
		outcome
	}

	async fn send_and_deliver(&self) -> SubmitResult<FormResponse> {
		if let Some(before) = &self.options.on_before_submit {
			before.call(());
		}

		// The field snapshot is taken now, not at attach time.
		let mut request =
			FormRequest::new(self.form.method(), self.form.action(), self.form.fields());
		if self.transport.supports_timeout() {
			request.timeout = Some(SUBMIT_TIMEOUT);
		}

		let response = self.transport.send(request).await?;
		if !response.is_success() {
			return Err(SubmitError::Status(response.status.as_u16()));
		}

		if let Some(on_success) = &self.options.on_success
			&& let Err(source) = on_success.call(response.clone())
		{
			self.options.diagnostics.warn(
				"the form was submitted successfully, but the on_success handler failed",
			);
			return Err(SubmitError::SuccessCallback(source));
		}

		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_options_default_has_no_callbacks() {
		let options = SubmitOptions::default();
		assert!(options.on_before_submit.is_none());
		assert!(options.on_success.is_none());
		assert!(options.on_error.is_none());
	}

	#[test]
	fn test_options_builder_fills_slots() {
		let options = SubmitOptions::new()
			.on_before_submit(|| {})
			.on_success(|_| Ok(()))
			.on_error(|_| {});
		assert!(options.on_before_submit.is_some());
		assert!(options.on_success.is_some());
		assert!(options.on_error.is_some());
	}

	#[test]
	fn test_options_debug_reports_slot_presence() {
		let options = SubmitOptions::new().on_error(|_| {});
		let debug = format!("{:?}", options);
		assert!(debug.contains("on_error: true"));
		assert!(debug.contains("on_success: false"));
	}
}
