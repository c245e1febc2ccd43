use std::result;

/// A type alias for concise use of [`Error`].
pub type Result<T> = result::Result<T, Error>;

/// An invalid rule table.
#[derive(thiserror::Error, Debug)]
pub enum Error {
   #[error("invalid pattern '{pattern}' in state '{state}'")]
   Regex {
      state:   &'static str,
      pattern: &'static str,
      #[source]
      source:  regex::Error,
   },

   #[error("state '{from}' refers to unknown state '{name}'")]
   UnknownState {
      from: &'static str,
      name: &'static str,
   },

   #[error("state '{name}' includes itself")]
   IncludeCycle { name: &'static str },

   #[error("rule table has no '{root}' state", root = crate::rule::ROOT)]
   MissingRoot,
}
