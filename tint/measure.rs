use std::iter;

use num::traits::AsPrimitive;
use unicode_segmentation::UnicodeSegmentation as _;

use crate::INDENT_WIDTH;

/// The count of digits the number is written with in base 10.
pub fn number_width(number: impl AsPrimitive<u64>) -> usize {
   iter::successors(Some(number.as_()), |&rest| (rest >= 10).then_some(rest / 10)).count()
}

/// Whether the grapheme is drawn as an emoji.
#[must_use]
pub fn is_emoji(grapheme: &str) -> bool {
   !grapheme.is_ascii() && grapheme.chars().any(unic_emoji_char::is_emoji)
}

/// The columns a single grapheme takes. Tabs take [`INDENT_WIDTH`] columns
/// and emoji always take 2.
fn grapheme_width(grapheme: &str) -> usize {
   match grapheme {
      "\t" => INDENT_WIDTH,
      emoji if is_emoji(emoji) => 2,
      other => unicode_width::UnicodeWidthStr::width(other),
   }
}

/// The columns a terminal draws the string in, on a best effort basis.
#[must_use]
pub fn width(s: &str) -> usize {
   s.graphemes(true).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn number() {
      assert_eq!(number_width(0_u32), 1);
      assert_eq!(number_width(9_u32), 1);
      assert_eq!(number_width(10_u32), 2);
      assert_eq!(number_width(99_u32), 2);
      assert_eq!(number_width(100_u32), 3);
      assert_eq!(number_width(12345_u32), 5);
      assert_eq!(number_width(u64::MAX), 20);
   }

   #[test]
   fn grapheme() {
      assert_eq!(grapheme_width("\t"), INDENT_WIDTH);
      assert_eq!(grapheme_width("e\u{301}"), 1);
      assert_eq!(grapheme_width("👍🏽"), 2);
   }

   #[test]
   fn string() {
      assert_eq!(width(""), 0);
      assert_eq!(width("foo bar"), 7);
      assert_eq!(width("\tx"), 4);
      assert_eq!(width("æ"), 1);
      assert_eq!(width("日本"), 4);
      assert_eq!(width("🦀"), 2);
      assert_eq!(width("│ ╭─╮"), 5);
   }
}
