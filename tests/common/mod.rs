//! Common test infrastructure
//!
//! Stand-ins for the OCR engine and the catalog search API, plus screenshot
//! fixtures. Tests should only import from this module.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{screenshot_png, FakeCatalog, ScriptedOcrEngine};
//!
//! let engine = ScriptedOcrEngine::new(&[(40, "Levitating\nDua Lipa")]);
//! let catalog = FakeCatalog::with_default_tracks();
//! let upload = screenshot_png("shot.png", 40);
//! ```

mod fixtures;
mod stubs;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use fixtures::{importer, screenshot_png, track, LEVEL_1, LEVEL_2, LEVEL_3};
#[allow(unused_imports)]
pub use stubs::{FakeCatalog, ScriptedOcrEngine};
