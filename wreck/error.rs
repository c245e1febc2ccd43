use std::{
   io,
   path::PathBuf,
   result,
};

/// A type alias for concise use of [`Error`].
pub type Result<T> = result::Result<T, Error>;

/// Everything that can stop a report from being rendered.
#[derive(thiserror::Error, Debug)]
pub enum Error {
   #[error("failed to read '{path}'", path = path.display())]
   Read {
      path:   PathBuf,
      #[source]
      source: io::Error,
   },

   #[error("color palette needs exactly 6 slots, got {count}")]
   PaletteArity { count: usize },

   #[error("failed to write report")]
   Write(#[source] io::Error),

   #[error("failed to parse config '{path}'", path = path.display())]
   Config {
      path:   PathBuf,
      #[source]
      source: toml::de::Error,
   },
}
