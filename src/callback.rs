//! Cloneable callback wrappers for submission hooks.
//!
//! The three `SubmitOptions` slots (`on_before_submit`, `on_success`,
//! `on_error`) are stored as `Arc`-backed wrappers so one registration can
//! be shared between the interceptor and the submit listener without the
//! caller managing lifetimes.

use std::sync::Arc;

use crate::error::SubmitError;

/// A type-safe, cloneable callback wrapper.
///
/// Wraps the function in an `Arc`, making it cheaply cloneable with a
/// stable identity for the lifetime of the attached listener.
///
/// ## Type Parameters
///
/// - `Args`: the argument type the callback receives
/// - `Ret`: the return type of the callback
///
/// ## Example
///
/// ```
/// use formrelay::Callback;
///
/// let on_before_submit: Callback<(), ()> = Callback::new(|_| {
/// 	// disable the submit button
/// });
/// on_before_submit.call(());
/// ```
// Conditional Send + Sync bounds: wasm callbacks close over JS values and
// run on the single browser thread.
#[cfg(browser)]
pub struct Callback<Args = (), Ret = ()> {
	inner: Arc<dyn Fn(Args) -> Ret + 'static>,
}

/// A type-safe, cloneable callback wrapper (server-side version).
///
/// See the WASM version for full documentation. This version requires
/// `Send + Sync` so interceptors can be shared across threads in tests.
#[cfg(not(browser))]
pub struct Callback<Args = (), Ret = ()> {
	inner: Arc<dyn Fn(Args) -> Ret + Send + Sync + 'static>,
}

#[cfg(browser)]
impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

#[cfg(not(browser))]
impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

/// Handler invoked with a recognized submission error, just before the
/// native fallback runs.
///
/// Borrows the error because the same value continues into the fallback
/// path after the handler returns.
#[cfg(browser)]
pub type ErrorHandler = Arc<dyn Fn(&SubmitError) + 'static>;

/// Handler invoked with a recognized submission error (server-side version).
#[cfg(not(browser))]
pub type ErrorHandler = Arc<dyn Fn(&SubmitError) + Send + Sync + 'static>;
