//! The form collaborator: what the interceptor needs from a form element.

/// A submit target.
///
/// The interceptor only ever observes a form through this trait: its
/// declared method and action, a field snapshot taken at submit time, and
/// the environment's native synchronous submission. On the browser profile
/// this is implemented by `dom::DomForm` over `web_sys::HtmlFormElement`;
/// tests supply in-memory stubs.
pub trait FormTarget {
	/// The HTTP verb the form declares. Must be non-empty at attach time.
	fn method(&self) -> String;

	/// The destination URI the form declares. Must be non-empty at attach
	/// time.
	fn action(&self) -> String;

	/// The current field set as key/value pairs, gathered at call time.
	/// Values may change between attachment and submission, so
	/// implementations must not cache the snapshot.
	fn fields(&self) -> Vec<(String, String)>;

	/// Perform the native, synchronous submission, a full-page navigation
	/// in a browser. This is the fallback path's final step and must never
	/// re-enter the interceptor.
	fn submit_native(&self);
}
