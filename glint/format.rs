use std::fmt;

use rustc_hash::FxHashMap;
use tint::{
   Color,
   Style,
};

use crate::{
   Category,
   Lexer,
   Span,
};

/// The color depth a [`Formatter`] writes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
   /// 24 bit RGB colors.
   TrueColor,
   /// The xterm 256 color palette.
   Ansi256,
}

struct Entry {
   category: Category,
   rgb:      (u8, u8, u8),
   fixed:    u8,
   bold:     bool,
}

const fn entry(category: Category, rgb: (u8, u8, u8), fixed: u8) -> Entry {
   Entry {
      category,
      rgb,
      fixed,
      bold: false,
   }
}

/// The "one-dark" theme. Categories that are missing inherit the style of
/// their nearest ancestor.
const ONE_DARK: &[Entry] = &[
   entry(Category::Text, (0xAB, 0xB2, 0xBF), 249),
   entry(Category::Punctuation, (0xAB, 0xB2, 0xBF), 249),
   entry(Category::Keyword, (0xC6, 0x78, 0xDD), 176),
   entry(Category::Operator, (0x56, 0xB6, 0xC2), 73),
   entry(Category::Comment, (0x7F, 0x84, 0x8E), 245),
   entry(Category::Number, (0xD1, 0x9A, 0x66), 173),
   entry(Category::String, (0x98, 0xC3, 0x79), 114),
   entry(Category::Name, (0xE0, 0x6C, 0x75), 168),
   entry(Category::NameBuiltin, (0xE5, 0xC0, 0x7B), 180),
   entry(Category::NameClass, (0xE5, 0xC0, 0x7B), 180),
   Entry {
      bold: true,
      ..entry(Category::NameFunction, (0x61, 0xAF, 0xEF), 75)
   },
];

/// Writes token spans with the escape sequences of a theme.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
   styles: FxHashMap<Category, Style>,
}

impl Formatter {
   /// A formatter that writes the text as is.
   #[must_use]
   pub fn plain() -> Self {
      Self::default()
   }

   /// The "one-dark" theme in the given depth.
   #[must_use]
   pub fn one_dark(depth: Depth) -> Self {
      let styles = ONE_DARK
         .iter()
         .map(|entry| {
            let (r, g, b) = entry.rgb;

            let color = match depth {
               Depth::TrueColor => Color::Rgb(r, g, b),
               Depth::Ansi256 => Color::Fixed(entry.fixed),
            };

            let style = Style::new().fg(color);

            (entry.category, if entry.bold { style.bold() } else { style })
         })
         .collect();

      Self { styles }
   }

   /// Returns the style of the category or its nearest styled ancestor.
   #[must_use]
   pub fn style(&self, category: Category) -> Style {
      category
         .lineage()
         .find_map(|category| self.styles.get(&category).copied())
         .unwrap_or(Style::new())
   }

   /// Writes the spans in order. Newlines are written bare, so no escape
   /// sequence spans multiple lines.
   pub fn format<'a>(
      &self,
      writer: &mut impl fmt::Write,
      spans: impl IntoIterator<Item = Span<'a>>,
   ) -> fmt::Result {
      for (category, text) in spans {
         let style = self.style(category);

         for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
               writer.write_char('\n')?;
            }

            if !line.is_empty() {
               tint::paint(writer, line, style)?;
            }
         }
      }

      Ok(())
   }
}

/// Tokenizes the code and formats it into a string.
#[must_use]
pub fn highlight(code: &str, lexer: &Lexer, formatter: &Formatter) -> String {
   let mut highlighted = String::with_capacity(code.len() * 2);

   // Writing into a string does not fail.
   let _ = formatter.format(&mut highlighted, lexer.tokenize(code));

   highlighted
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::helix;

   #[test]
   fn plain_is_identity() {
      let code = "let x = foo(12, \"bar\"); ~~ comment\n~* block *~";

      assert_eq!(highlight(code, helix::lexer(), &Formatter::plain()), code);
   }

   #[test]
   fn styles_are_inherited() {
      let formatter = Formatter::one_dark(Depth::TrueColor);

      assert_eq!(
         formatter.style(Category::NameBuiltinPseudo),
         formatter.style(Category::NameBuiltin),
      );
      assert_eq!(
         formatter.style(Category::CommentMultiline),
         Style::new().fg(Color::Rgb(0x7F, 0x84, 0x8E)),
      );
      assert_eq!(
         formatter.style(Category::Whitespace),
         formatter.style(Category::Text)
      );
   }

   #[test]
   fn depth_selects_palette() {
      assert_eq!(
         Formatter::one_dark(Depth::Ansi256).style(Category::Keyword),
         Style::new().fg(Color::Fixed(176)),
      );
      assert_eq!(
         Formatter::one_dark(Depth::TrueColor).style(Category::NameFunction),
         Style::new().fg(Color::Rgb(0x61, 0xAF, 0xEF)).bold(),
      );
   }

   #[test]
   fn colored_output_keeps_text_and_lines() {
      let code = "~* a\nb *~ fn";
      let highlighted = highlight(code, helix::lexer(), &Formatter::one_dark(Depth::Ansi256));

      assert!(highlighted.contains("\x1B["));
      assert_eq!(highlighted.lines().count(), 2);

      for line in highlighted.lines() {
         assert!(line.ends_with(tint::RESET));
      }
   }
}
