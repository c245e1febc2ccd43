//! Boxed, colorized panic reports that show the failing source line.
//!
//! ```no_run
//! use wreck::{
//!    Config,
//!    Diagnostic,
//! };
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("bad value")]
//! struct ValueError;
//!
//! let diagnostic = Diagnostic::new(&ValueError)
//!    .at("config.hlx", 10)
//!    .mark("bad");
//!
//! // Exits the process once the report is written.
//! let error = wreck::panic(&diagnostic, &Config::default()).unwrap_err();
//! eprintln!("{error}");
//! ```

mod config;
pub use config::{
   ColorChoice,
   Config,
};

mod error;
pub use error::{
   Error,
   Result,
};

mod mark;
pub use mark::{
   Marks,
   UnderlineRow,
   mark_all,
};

mod message;
pub use message::{
   DocCode,
   Message,
   MessageFormatter,
};

pub mod metrics;

mod output;
pub use output::{
   Captured,
   Output,
};

mod palette;
pub use palette::{
   Glyphs,
   Palette,
   SLOTS,
};

mod render;
pub use render::{
   Diagnostic,
   Exit,
   RenderContext,
   Stage,
   Terminate,
   panic,
   panic_with,
};

mod window;
pub use window::SourceWindow;
