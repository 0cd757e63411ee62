//! Attach preconditions against a real DOM.
//!
//! Run with: wasm-pack test --chrome --headless

#![cfg(target_arch = "wasm32")]

use formrelay::{SubmitError, SubmitOptions, attach};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
	web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn attach_rejects_non_form_elements() {
	let div = document().create_element("div").unwrap();

	let result = attach(&div, SubmitOptions::new());
	assert!(matches!(result, Err(SubmitError::NotAForm)));
}

#[wasm_bindgen_test]
fn attach_accepts_form_with_method_and_action() {
	let form = document().create_element("form").unwrap();
	form.set_attribute("method", "post").unwrap();
	form.set_attribute("action", "/screening/submit").unwrap();
	document().body().unwrap().append_child(&form).unwrap();

	assert!(attach(&form, SubmitOptions::new()).is_ok());
}
