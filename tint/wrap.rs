use std::iter;

use crate::width;

/// Whitespace delimited words, yielded with their byte offset.
struct Words<'a> {
   text:   &'a str,
   offset: usize,
}

impl<'a> Iterator for Words<'a> {
   type Item = (usize, &'a str);

   fn next(&mut self) -> Option<Self::Item> {
      let start = self.offset + self.text[self.offset..].find(|c: char| !c.is_whitespace())?;
      let end = self.text[start..]
         .find(char::is_whitespace)
         .map_or(self.text.len(), |index| start + index);

      self.offset = end;
      Some((start, &self.text[start..end]))
   }
}

/// A greedy word wrap over a single line of text, see [`wrap`].
pub struct Wrap<'a> {
   text:      &'a str,
   words:     iter::Peekable<Words<'a>>,
   width_max: usize,
}

impl<'a> Iterator for Wrap<'a> {
   type Item = &'a str;

   fn next(&mut self) -> Option<Self::Item> {
      let (start, first) = self.words.next()?;

      let mut end = start + first.len();
      let mut line_width = width(first);

      while let Some(&(next_start, next)) = self.words.peek() {
         let added = width(&self.text[end..next_start]) + width(next);

         if line_width + added > self.width_max {
            break;
         }

         line_width += added;
         end = next_start + next.len();
         self.words.next();
      }

      Some(&self.text[start..end])
   }
}

impl iter::FusedIterator for Wrap<'_> {}

/// Wraps the text into lines no wider than `width_max`, breaking only at
/// whitespace. A word that is wider than `width_max` on its own is yielded
/// as its own line and overflows.
///
/// Leading and trailing whitespace of every line is dropped, the whitespace
/// between the words of a line is kept as is. Blank text yields no lines.
#[must_use]
pub fn wrap(text: &str, width_max: usize) -> Wrap<'_> {
   Wrap {
      text,
      words: Words { text, offset: 0 }.peekable(),
      width_max,
   }
}

#[cfg(test)]
mod tests {
   use proptest::prelude::*;

   use super::*;

   fn wrapped(text: &str, width_max: usize) -> Vec<&str> {
      wrap(text, width_max).collect()
   }

   #[test]
   fn short() {
      assert_eq!(wrapped("bad value", 80), ["bad value"]);
   }

   #[test]
   fn blank() {
      assert!(wrapped("", 10).is_empty());
      assert!(wrapped("   \t ", 10).is_empty());
   }

   #[test]
   fn greedy() {
      assert_eq!(
         wrapped("the quick brown fox jumps over the lazy dog", 10),
         ["the quick", "brown fox", "jumps over", "the lazy", "dog"],
      );
   }

   #[test]
   fn exact_fit() {
      assert_eq!(wrapped("aaaa bbbb", 9), ["aaaa bbbb"]);
      assert_eq!(wrapped("aaaa bbbb", 8), ["aaaa", "bbbb"]);
   }

   #[test]
   fn long_word_overflows() {
      assert_eq!(wrapped("a incomprehensibilities b", 6), [
         "a",
         "incomprehensibilities",
         "b"
      ]);
   }

   #[test]
   fn keeps_inner_spacing() {
      assert_eq!(wrapped("  a  b  ", 80), ["a  b"]);
   }

   #[test]
   fn restarts_per_call() {
      let text = "one two three";

      assert_eq!(wrapped(text, 7), wrapped(text, 7));
   }

   proptest! {
      #[test]
      fn never_wider_than_width_unless_single_word(
         text in "[a-z]{1,12}( {1,2}[a-z]{1,12}){0,20}",
         width_max in 1_usize..40,
      ) {
         for line in wrap(&text, width_max) {
            prop_assert!(
               width(line) <= width_max || !line.contains(' '),
               "line {line:?} is wider than {width_max}",
            );
         }
      }

      #[test]
      fn keeps_every_word(
         text in "[a-z]{1,12}( [a-z]{1,12}){0,20}",
         width_max in 1_usize..40,
      ) {
         let rejoined = wrap(&text, width_max).collect::<Vec<_>>().join(" ");

         prop_assert_eq!(rejoined, text);
      }
   }
}
