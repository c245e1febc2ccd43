use std::{
   borrow::Cow,
   iter,
};

use itertools::Itertools as _;
use smallvec::SmallVec;
use tint::Style;

use crate::{
   Error,
   Result,
};

/// The number of slots in a [`Palette`].
pub const SLOTS: usize = 6;

/// The six escape sequences a report is painted with. Either every slot holds
/// an escape sequence or every slot is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
   /// Frames, guides and the failing line.
   pub primary:   String,
   /// Marked text, carets, the title and the failing line number.
   pub emphasis:  String,
   /// Ends any of the others.
   pub reset:     String,
   /// Separators and continuation guides.
   pub muted:     String,
   /// The documentation lookup command.
   pub warning:   String,
   /// The location in the bottom rule.
   pub secondary: String,
}

impl Palette {
   /// Binds the slots in order: primary, emphasis, reset, muted, warning,
   /// secondary.
   pub fn from_slots<S: Into<String>>(slots: impl IntoIterator<Item = S>) -> Result<Self> {
      let slots = slots
         .into_iter()
         .map(Into::into)
         .collect::<SmallVec<String, SLOTS>>();
      let count = slots.len();

      let Some((primary, emphasis, reset, muted, warning, secondary)) =
         slots.into_iter().collect_tuple()
      else {
         return Err(Error::PaletteArity { count });
      };

      Ok(Self {
         primary,
         emphasis,
         reset,
         muted,
         warning,
         secondary,
      })
   }

   /// The palette with ANSI escape sequences.
   pub fn colored() -> Result<Self> {
      Self::from_slots([
         Style::new().red().prefix(),
         Style::new().red().bold().prefix(),
         Cow::Borrowed(tint::RESET),
         Style::new().bright_black().prefix(),
         Style::new().yellow().prefix(),
         Style::new().green().prefix(),
      ])
   }

   /// The palette of empty strings.
   pub fn plain() -> Result<Self> {
      Self::from_slots(iter::repeat_n("", SLOTS))
   }

   /// Picks the palette for a single color decision.
   pub fn resolve(colored: bool) -> Result<Self> {
      if colored {
         Self::colored()
      } else {
         Self::plain()
      }
   }

   /// Whether this is the palette of empty strings.
   #[must_use]
   pub fn is_plain(&self) -> bool {
      [
         &self.primary,
         &self.emphasis,
         &self.reset,
         &self.muted,
         &self.warning,
         &self.secondary,
      ]
      .iter()
      .all(|slot| slot.is_empty())
   }
}

/// The glyphs a report is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
   pub horizontal:   char,
   pub vertical:     char,
   pub top_left:     char,
   pub top_right:    char,
   pub bottom_left:  char,
   pub bottom_right: char,
   /// The guide of wrapped message lines after the first one.
   pub continuation: char,
   pub caret:        char,
   /// Where the leader under the failing line starts. Only drawn when
   /// [`Glyphs::extended`] is set.
   pub corner:       char,
   pub ellipsis:     &'static str,
   /// Whether these are box drawing glyphs, which take one more column of
   /// leader padding for [`Glyphs::corner`].
   pub extended:     bool,
}

impl Glyphs {
   pub const ASCII: Self = Self {
      horizontal:   '-',
      vertical:     '|',
      top_left:     '+',
      top_right:    '+',
      bottom_left:  '+',
      bottom_right: '+',
      continuation: ':',
      caret:        '^',
      corner:       '`',
      ellipsis:     "...",
      extended:     false,
   };

   pub const UNICODE: Self = Self {
      horizontal:   '─',
      vertical:     '│',
      top_left:     '╭',
      top_right:    '╮',
      bottom_left:  '╰',
      bottom_right: '╯',
      continuation: '┆',
      caret:        '^',
      corner:       '╰',
      ellipsis:     "...",
      extended:     true,
   };

   #[must_use]
   pub const fn new(unicode: bool) -> &'static Self {
      if unicode { &Self::UNICODE } else { &Self::ASCII }
   }
}
