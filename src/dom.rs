//! Browser bindings: DOM form target, fetch transport, and [`attach`].
//!
//! Everything in this module runs on `wasm32-unknown-unknown` only. The
//! target-independent flow lives in [`crate::interceptor`]; this module
//! wires it to a live `<form>` element and the `fetch` API.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;

use crate::diagnostics::{ConsoleDiagnostics, DiagnosticSink};
use crate::error::{SubmitError, SubmitResult};
use crate::form::FormTarget;
use crate::interceptor::{SubmitInterceptor, SubmitOptions, SubmitOutcome};
use crate::transport::{FormRequest, FormResponse, SUBMIT_TIMEOUT, Transport};

/// A live `<form>` element.
#[derive(Clone)]
pub struct DomForm {
	element: web_sys::HtmlFormElement,
	diagnostics: Arc<dyn DiagnosticSink>,
}

impl DomForm {
	pub fn new(element: web_sys::HtmlFormElement) -> Self {
		Self::with_diagnostics(element, Arc::new(ConsoleDiagnostics))
	}

	pub fn with_diagnostics(
		element: web_sys::HtmlFormElement,
		diagnostics: Arc<dyn DiagnosticSink>,
	) -> Self {
		Self {
			element,
			diagnostics,
		}
	}
}

impl FormTarget for DomForm {
	fn method(&self) -> String {
		self.element.method()
	}

	fn action(&self) -> String {
		self.element.action()
	}

	fn fields(&self) -> Vec<(String, String)> {
		// Snapshot taken at submit time. File entries have no urlencoded
		// representation and are skipped.
		let mut fields = Vec::new();
		let Ok(data) = web_sys::FormData::new_with_form(&self.element) else {
			return fields;
		};
		let Ok(Some(entries)) = js_sys::try_iter(&data) else {
			return fields;
		};
		for entry in entries.flatten() {
			let pair = js_sys::Array::from(&entry);
			let Some(name) = pair.get(0).as_string() else {
				continue;
			};
			if let Some(value) = pair.get(1).as_string() {
				fields.push((name, value));
			}
		}
		fields
	}

	fn submit_native(&self) {
		// submit() bypasses the submit event, so a removed listener can
		// never re-enter.
		if let Err(err) = self.element.submit() {
			self.diagnostics
				.error(&format!("native form submission failed: {err:?}"));
		}
	}
}

/// Maps a rejected promise value onto the error model.
///
/// Only genuine `Error` instances are recognized; any other thrown value
/// still triggers the fallback but never reaches `on_error`.
fn classify_rejection(value: JsValue) -> SubmitError {
	match value.dyn_into::<js_sys::Error>() {
		Ok(error) => {
			let name = String::from(error.name());
			if name == "TimeoutError" || name == "AbortError" {
				SubmitError::Timeout(SUBMIT_TIMEOUT.as_millis() as u64)
			} else {
				SubmitError::Transport {
					message: String::from(error.message()),
				}
			}
		}
		Err(value) => SubmitError::Unrecognized(format!("{value:?}")),
	}
}

/// `fetch`-backed transport.
///
/// Timeout support depends on the environment providing
/// `AbortSignal.timeout`; when the primitive is missing the request is
/// issued without a time budget.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl FetchTransport {
	pub fn new() -> Self {
		Self
	}

	/// Looks up the `AbortSignal.timeout` static, if the environment has
	/// one.
	fn timeout_constructor() -> Option<(js_sys::Function, JsValue)> {
		let signal_ctor =
			js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("AbortSignal")).ok()?;
		if signal_ctor.is_undefined() {
			return None;
		}
		let timeout_fn =
			js_sys::Reflect::get(&signal_ctor, &JsValue::from_str("timeout")).ok()?;
		let timeout_fn = timeout_fn.dyn_into::<js_sys::Function>().ok()?;
		Some((timeout_fn, signal_ctor))
	}

	fn timeout_signal(millis: u64) -> Option<web_sys::AbortSignal> {
		let (timeout_fn, signal_ctor) = Self::timeout_constructor()?;
		let signal = timeout_fn
			.call1(&signal_ctor, &JsValue::from_f64(millis as f64))
			.ok()?;
		signal.dyn_into::<web_sys::AbortSignal>().ok()
	}
}

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
	fn supports_timeout(&self) -> bool {
		Self::timeout_constructor().is_some()
	}

	async fn send(&self, request: FormRequest) -> SubmitResult<FormResponse> {
		let init = web_sys::RequestInit::new();
		init.set_method(&request.method);
		if let Some(body) = request.body()? {
			init.set_body(&JsValue::from_str(&body));
		}
		if let Some(timeout) = request.timeout
			&& let Some(signal) = Self::timeout_signal(timeout.as_millis() as u64)
		{
			init.set_signal(Some(&signal));
		}

		let outgoing = web_sys::Request::new_with_str_and_init(&request.url()?, &init)
			.map_err(classify_rejection)?;
		if !request.carries_query() {
			outgoing
				.headers()
				.set("Content-Type", "application/x-www-form-urlencoded")
				.map_err(classify_rejection)?;
		}

		let window = web_sys::window().ok_or_else(|| SubmitError::Transport {
			message: "no window in this environment".to_string(),
		})?;
		let response = JsFuture::from(window.fetch_with_request(&outgoing))
			.await
			.map_err(classify_rejection)?;
		let response: web_sys::Response =
			response.dyn_into().map_err(classify_rejection)?;

		let status = response.status();
		let body = match response.text() {
			Ok(promise) => JsFuture::from(promise)
				.await
				.ok()
				.and_then(|value| value.as_string())
				.unwrap_or_default(),
			Err(_) => String::new(),
		};
		FormResponse::from_raw(status, body)
	}
}

/// Enables a form to be submitted in the background via `fetch`, falling
/// back to the native submission if the attempt fails for any reason.
///
/// The fallback assumes the form action is idempotent: a failed attempt
/// may have partially succeeded server-side before the native
/// re-submission navigates the page.
///
/// # Errors
///
/// [`SubmitError::NotAForm`] if `element` is not a `<form>`;
/// [`SubmitError::MissingMethodOrAction`] if the form does not declare both
/// `method` and `action`. No listener is attached on failure.
///
/// # Examples
///
/// ```ignore
/// use formrelay::{attach, SubmitOptions};
///
/// let form = document.get_element_by_id("screening-form").unwrap();
/// attach(&form, SubmitOptions::new().on_success(|_| Ok(())))?;
/// ```
pub fn attach(element: &web_sys::Element, options: SubmitOptions) -> SubmitResult<()> {
	let form: web_sys::HtmlFormElement = element
		.clone()
		.dyn_into()
		.map_err(|_| SubmitError::NotAForm)?;
	attach_form(&form, options)
}

/// [`attach`] for an already-typed form element.
pub fn attach_form(form: &web_sys::HtmlFormElement, options: SubmitOptions) -> SubmitResult<()> {
	let target = DomForm::with_diagnostics(form.clone(), options.diagnostics_handle());
	let interceptor = Rc::new(SubmitInterceptor::new(target, FetchTransport::new(), options)?);

	// The closure holds a slot to itself so the fallback path can remove
	// the listener permanently. The resulting Rc cycle keeps the closure
	// alive for the lifetime of the listener, like Closure::forget.
	let slot: Rc<RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>> =
		Rc::new(RefCell::new(None));
	let closure = Closure::wrap(Box::new({
		let form = form.clone();
		let interceptor = Rc::clone(&interceptor);
		let slot = Rc::clone(&slot);
		move |event: web_sys::Event| {
			event.prevent_default();
			let form = form.clone();
			let interceptor = Rc::clone(&interceptor);
			let slot = Rc::clone(&slot);
			wasm_bindgen_futures::spawn_local(async move {
				if interceptor.handle_submit().await != SubmitOutcome::Delivered
					&& let Some(closure) = slot.borrow().as_ref()
				{
					let _ = form.remove_event_listener_with_callback(
						"submit",
						closure.as_ref().unchecked_ref(),
					);
				}
			});
		}
	}) as Box<dyn FnMut(_)>);

	form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
		.map_err(classify_rejection)?;
	*slot.borrow_mut() = Some(closure);
	Ok(())
}
