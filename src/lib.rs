//! Background form submission with native fallback.
//!
//! A progressive enhancement for HTML forms: intercept the submit event,
//! deliver the form data asynchronously via `fetch`, and fall back to the
//! browser's native submission if the attempt fails or times out. The worst
//! outcome of any failure is the submission the user would have gotten
//! without the enhancement at all.
//!
//! ## Architecture
//!
//! ```text
//! Browser (wasm32):                target-independent core:
//! ┌────────────────┐   submit     ┌───────────────────┐
//! │ dom::attach    │ ───────────▶ │ SubmitInterceptor │
//! │ DomForm        │              │  before ▶ send    │
//! │ FetchTransport │ ◀─────────── │  ▶ success/error  │
//! └────────────────┘  FormRequest │  ▶ fallback       │
//!                                 └───────────────────┘
//! ```
//!
//! The core flow ([`SubmitInterceptor`]) talks to two collaborators: a
//! [`FormTarget`] (the form element) and a [`Transport`] (the network). The
//! browser profile wires both to web-sys; the server-side profile keeps the
//! flow testable with stubs and provides a reqwest transport.
//!
//! ## Example
//!
//! ```ignore
//! use formrelay::{attach, SubmitOptions};
//!
//! let options = SubmitOptions::new()
//! 	.on_before_submit(|| { /* disable the submit button */ })
//! 	.on_success(|_response| {
//! 		// update the page in place
//! 		Ok(())
//! 	})
//! 	.on_error(|_error| {
//! 		// a full-page navigation is about to happen
//! 	});
//!
//! attach(&form_element, options)?;
//! ```

pub mod callback;
pub mod diagnostics;
#[cfg(browser)]
pub mod dom;
pub mod error;
pub mod form;
pub mod interceptor;
pub mod transport;

pub use callback::{Callback, ErrorHandler};
pub use diagnostics::{ConsoleDiagnostics, DiagnosticSink};
#[cfg(browser)]
pub use dom::{DomForm, FetchTransport, attach, attach_form};
pub use error::{BoxError, SubmitError, SubmitResult};
pub use form::FormTarget;
pub use interceptor::{SubmitInterceptor, SubmitOptions, SubmitOutcome};
#[cfg(not(browser))]
pub use transport::HttpTransport;
pub use transport::{FormRequest, FormResponse, SUBMIT_TIMEOUT, Transport};
