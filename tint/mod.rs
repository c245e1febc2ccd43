//! Terminal text primitives.

use std::borrow::Cow;

mod style;
pub use style::{
   Color,
   RESET,
   Style,
   paint,
};

mod measure;
pub use measure::{
   is_emoji,
   number_width,
   width,
};

mod wrap;
pub use wrap::{
   Wrap,
   wrap,
};

pub const INDENT: &str = "   ";
pub const INDENT_WIDTH: usize = INDENT.len();

/// Replaces every tab with [`INDENT`], so that the character count of the
/// result lines up with what a terminal shows.
#[must_use]
pub fn expand_tabs(s: &str) -> Cow<'_, str> {
   if s.contains('\t') {
      Cow::Owned(s.replace('\t', INDENT))
   } else {
      Cow::Borrowed(s)
   }
}

/// Cuts the string so that it fits in `width_max` columns, ending it with
/// `ellipsis` if anything was cut.
#[must_use]
pub fn truncate<'a>(s: &'a str, width_max: usize, ellipsis: &str) -> Cow<'a, str> {
   use unicode_segmentation::UnicodeSegmentation as _;

   if width(s) <= width_max {
      return Cow::Borrowed(s);
   }

   let width_kept = width_max.saturating_sub(width(ellipsis));

   let mut width_total = 0;
   let end = s
      .grapheme_indices(true)
      .find_map(|(index, grapheme)| {
         width_total += width(grapheme);
         (width_total > width_kept).then_some(index)
      })
      .unwrap_or(s.len());

   let mut truncated = String::with_capacity(end + ellipsis.len());
   truncated.push_str(&s[..end]);
   truncated.push_str(ellipsis);

   Cow::Owned(truncated)
}
