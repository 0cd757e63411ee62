use cfg_aliases::cfg_aliases;

fn main() {
	// The "browser" profile is wasm32-unknown-unknown; everything else is
	// the server-side test profile.
	cfg_aliases! {
		browser: { all(target_family = "wasm", target_os = "unknown") },
	}
}
