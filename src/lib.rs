//! Rules Highlighter: pattern-driven rule highlighting for the rules page
//!
//! Paste the value of a rule-match header (e.g. `x-edg-mr: 591:0;591:3;591:8`)
//! and the matching rules are singled out, in whichever view the page shows.
//!
//! # Architecture
//!
//! ## Core (host-independent)
//! - `pattern.rs` - PatternParser: `<major>:<minor>` tokens → rule indices
//! - `surface.rs` - Surface detection + capability traits (`HostPage`, `Highlighter`)
//! - `list_view.rs` - ListViewAdapter: dims/tints draggable rule rows
//! - `editor.rs` - EditorAdapter: folds non-matching entries in the JSON editor
//! - `lifecycle.rs` - LifecycleController: mount state machine + event dispatch
//!
//! ## Support
//! - `config.rs` - Configuration types and defaults
//! - `error.rs` - Error taxonomy
//! - `logging.rs` - `tracing` → browser console
//! - `web/` - web-sys/js-sys bindings of the core traits and `install()`
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { install } from 'rules-highlighter';
//!
//! await init();
//!
//! // Defaults target the rules page markup; every field is optional
//! const handle = install({ settleDelayMs: 1000, logLevel: 'debug' });
//!
//! console.log(handle.state); // "observing" until the rule list renders
//! handle.dispose();
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod lifecycle;
pub mod list_view;
pub mod logging;
pub mod pattern;
pub mod surface;
pub mod web;

#[cfg(test)]
mod testing;

pub use config::*;
pub use editor::*;
pub use error::*;
pub use lifecycle::*;
pub use list_view::*;
pub use pattern::*;
pub use surface::*;
pub use web::{install, HighlighterHandle};

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("rules-highlighter v{}", env!("CARGO_PKG_VERSION"))
}
