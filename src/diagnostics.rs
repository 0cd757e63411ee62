//! Injected diagnostic sink for warning and error reporting.
//!
//! The interceptor never logs through a hidden global: every warning and
//! error goes through the sink carried by `SubmitOptions`, so tests can
//! observe diagnostics without capturing process output. The default sink
//! writes to the browser console on wasm and to `tracing` elsewhere.

/// Destination for the interceptor's diagnostic output.
///
/// Diagnostics are informational only; they are not part of the functional
/// contract and nothing in the flow branches on the sink's behavior.
pub trait DiagnosticSink: Send + Sync {
	/// Report a non-fatal anomaly, such as a failing success callback.
	fn warn(&self, message: &str);

	/// Report a failed submission attempt.
	fn error(&self, message: &str);
}

/// Default sink: `console.warn`/`console.error` on the browser profile,
/// `tracing` on the server-side profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDiagnostics;

#[cfg(browser)]
impl DiagnosticSink for ConsoleDiagnostics {
	fn warn(&self, message: &str) {
		web_sys::console::warn_1(&message.into());
	}

	fn error(&self, message: &str) {
		web_sys::console::error_1(&message.into());
	}
}

#[cfg(not(browser))]
impl DiagnosticSink for ConsoleDiagnostics {
	fn warn(&self, message: &str) {
		tracing::warn!(target: "formrelay", "{message}");
	}

	fn error(&self, message: &str) {
		tracing::error!(target: "formrelay", "{message}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_console_diagnostics_accepts_messages() {
		// Smoke test: the default sink must not panic without a subscriber.
		let sink = ConsoleDiagnostics;
		sink.warn("submission succeeded but the success callback failed");
		sink.error("response status: 500");
	}
}
