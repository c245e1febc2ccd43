//! A rule table tokenizer and terminal highlighter for the Helix language.
//!
//! ```
//! let code = "let answer = 42;";
//!
//! for (category, text) in glint::helix::lexer().tokenize(code) {
//!    println!("{category} {text:?}");
//! }
//! ```

mod category;
pub use category::Category;

mod error;
pub use error::{
   Error,
   Result,
};

mod format;
pub use format::{
   Depth,
   Formatter,
   highlight,
};

pub mod helix;

mod lexer;
pub use lexer::{
   Lexer,
   Span,
   Tokens,
};

pub mod rule;
pub use rule::Rule;
