use std::{
   fs,
   path::Path,
};

use crate::{
   Error,
   Result,
};

/// When to write escape sequences.
#[derive(
   serde::Deserialize, clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "kebab-case")]
pub enum ColorChoice {
   /// Only when the output stream supports it.
   #[default]
   Auto,
   Always,
   Never,
}

impl ColorChoice {
   /// Whether to color a stream that does or does not support it.
   #[must_use]
   pub fn enabled(self, supported: bool) -> bool {
      match self {
         Self::Auto => supported,
         Self::Always => true,
         Self::Never => false,
      }
   }
}

/// Report rendering settings.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
   /// The width of every report row. The terminal is never queried.
   pub width: usize,

   /// How many source lines are shown, the failing one included.
   pub window: usize,

   pub color: ColorChoice,

   /// Whether box drawing glyphs are used instead of ASCII ones.
   pub unicode: bool,

   /// Whether messages that carry a documentation code get a hint line on
   /// how to look it up.
   pub doc_hint: bool,

   /// Whether the source lines around the failing one are highlighted.
   pub highlight: bool,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         width:     80,
         window:    5,
         color:     ColorChoice::Auto,
         unicode:   true,
         doc_hint:  true,
         highlight: true,
      }
   }
}

impl Config {
   /// Reads the config from a TOML file. Missing keys keep their defaults.
   pub fn load(path: &Path) -> Result<Self> {
      let contents = fs::read_to_string(path).map_err(|source| {
         Error::Read {
            path: path.to_owned(),
            source,
         }
      })?;

      let config = toml::from_str::<Self>(&contents).map_err(|source| {
         Error::Config {
            path: path.to_owned(),
            source,
         }
      })?;

      tracing::debug!(path = %path.display(), ?config, "loaded config");
      Ok(config)
   }
}
