use std::fmt::Write as _;

use itertools::Itertools as _;
use smallvec::SmallVec;

use crate::Palette;

/// The substrings of the failing line to underline.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Marks(SmallVec<String, 2>);

impl Marks {
   /// Iterates over the marks in order, empty ones included.
   pub fn iter(&self) -> impl Iterator<Item = &str> {
      self.0.iter().map(String::as_str)
   }

   #[must_use]
   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }

   pub fn push(&mut self, mark: impl Into<String>) {
      self.0.push(mark.into());
   }
}

impl From<&str> for Marks {
   fn from(mark: &str) -> Self {
      Self::from(mark.to_owned())
   }
}

impl From<String> for Marks {
   fn from(mark: String) -> Self {
      let mut marks = Self::default();
      marks.push(mark);
      marks
   }
}

impl<S: Into<String>> FromIterator<S> for Marks {
   fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
      Self(iter.into_iter().map(Into::into).collect())
   }
}

impl<S: Into<String>> From<Vec<S>> for Marks {
   fn from(marks: Vec<S>) -> Self {
      marks.into_iter().collect()
   }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Marks {
   fn from(marks: [S; N]) -> Self {
      marks.into_iter().collect()
   }
}

/// A row as long as the right trimmed line plus one, holding a caret under
/// every marked character and a space everywhere else.
#[derive(derive_more::Deref, derive_more::Display, Debug, Clone, PartialEq, Eq)]
#[deref(forward)]
pub struct UnderlineRow(String);

impl UnderlineRow {
   /// The column of the first caret.
   #[must_use]
   pub fn first_caret(&self) -> Option<usize> {
      self.0.chars().position(|c| c != ' ')
   }

   /// Whether the row holds no caret.
   #[must_use]
   pub fn is_blank(&self) -> bool {
      self.0.chars().all(|c| c == ' ')
   }
}

/// Underlines every occurrence of every mark in the line.
///
/// Returns the line painted with [`Palette::emphasis`] over the marked
/// characters and [`Palette::primary`] everywhere else, and the
/// [`UnderlineRow`] with `caret` under the marked characters. Occurrences of
/// a mark do not overlap each other, occurrences of different marks may.
#[must_use]
pub fn mark_all(line: &str, marks: &Marks, palette: &Palette, caret: char) -> (String, UnderlineRow) {
   let chars = line.chars().collect::<Vec<_>>();
   let mut marked = vec![false; chars.len()];

   let mut underline = vec![' '; line.trim_end().chars().count() + 1];

   for mark in marks.iter().filter(|mark| !mark.is_empty()) {
      let length = mark.chars().count();

      for (byte, _) in line.match_indices(mark) {
         let start = line[..byte].chars().count();

         for column in start..start + length {
            marked[column] = true;

            if let Some(slot) = underline.get_mut(column) {
               *slot = caret;
            }
         }
      }
   }

   let mut painted = String::with_capacity(line.len());
   for (is_marked, run) in &chars
      .iter()
      .zip(&marked)
      .chunk_by(|&(_, &is_marked)| is_marked)
   {
      let color = if is_marked {
         &palette.emphasis
      } else {
         &palette.primary
      };

      painted.push_str(color);
      painted.extend(run.map(|(&c, _)| c));
      painted.push_str(&palette.reset);
   }

   (painted, UnderlineRow(underline.into_iter().collect()))
}

#[cfg(test)]
mod tests {
   use proptest::prelude::*;

   use super::*;

   fn plain() -> Palette {
      Palette::plain().unwrap()
   }

   fn underline(line: &str, marks: impl Into<Marks>) -> String {
      mark_all(line, &marks.into(), &plain(), '^').1.to_string()
   }

   #[test]
   fn single_mark() {
      assert_eq!(underline("let bad = 1;", "bad"), "    ^^^      ");
   }

   #[test]
   fn every_occurrence() {
      assert_eq!(underline("aXbXc", "X"), " ^ ^  ");
      assert_eq!(underline("aaaa", "aa"), "^^^^ ");
   }

   #[test]
   fn marks_accumulate() {
      assert_eq!(underline("foo(bar)", ["foo", "bar"]), "^^^ ^^^  ");
   }

   #[test]
   fn trailing_whitespace_is_not_counted() {
      assert_eq!(underline("ab   ", "b"), " ^ ");
   }

   #[test]
   fn columns_are_characters() {
      assert_eq!(underline("şey ok", "ok"), "    ^^ ");
   }

   #[test]
   fn missing_marks_leave_blank_row() {
      let row = mark_all("let x = 1;", &Marks::default(), &plain(), '^').1;

      assert!(row.is_blank());
      assert_eq!(row.first_caret(), None);
      assert_eq!(underline("let x = 1;", "nope"), " ".repeat(11));
      assert_eq!(underline("let x = 1;", ""), " ".repeat(11));
   }

   #[test]
   fn painted_wraps_runs() {
      let palette = Palette::from_slots(["<p>", "<e>", "</>", "", "", ""]).unwrap();
      let (painted, _) = mark_all("a bad b", &Marks::from("bad"), &palette, '^');

      assert_eq!(painted, "<p>a </><e>bad</><p> b</>");
   }

   #[test]
   fn plain_palette_leaves_line_untouched() {
      let (painted, _) = mark_all("a bad b", &Marks::from("bad"), &plain(), '^');

      assert_eq!(painted, "a bad b");
   }

   proptest! {
      #[test]
      fn row_is_never_longer_than_trimmed_line(
         line in r"[a-c \t]{0,30}",
         marks in prop::collection::vec(r"[a-c ]{0,3}", 0..4),
      ) {
         let row = underline(&line, marks);

         prop_assert!(row.chars().count() <= line.trim_end().chars().count() + 1);
      }

      #[test]
      fn first_occurrence_gets_a_caret(
         prefix in r"[a-c ]{0,10}",
         mark in r"[a-c]{1,3}",
         suffix in r"[a-c ]{0,10}",
      ) {
         let line = format!("{prefix}{mark}{suffix}");
         let column = line[..line.find(&mark).unwrap()].chars().count();

         let row = underline(&line, mark.as_str());

         prop_assert_eq!(row.chars().nth(column), Some('^'));
      }

      #[test]
      fn absent_marks_give_spaces(line in r"[a-c ]{0,30}", mark in r"[x-z]{1,3}") {
         prop_assert!(underline(&line, mark).chars().all(|c| c == ' '));
      }
   }
}
