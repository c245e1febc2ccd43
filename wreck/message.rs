use std::{
   borrow::Cow,
   fmt,
   sync::LazyLock,
};

use regex::Regex;

use crate::{
   Glyphs,
   Palette,
};

static DOC_CODE: LazyLock<Regex> = LazyLock::new(|| {
   Regex::new(r"<Hex\((\d+)\.(\w+)\)>(?:: )?").expect("documentation code pattern must compile")
});

/// A documentation code embedded in a message as `<Hex(12.E)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocCode {
   pub number: String,
   pub word:   String,
}

impl fmt::Display for DocCode {
   fn fmt(&self, writer: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(writer, "{number}.{word}", number = self.number, word = self.word)
   }
}

impl DocCode {
   /// Finds the first code in the text and returns it with the text the code,
   /// and a `: ` right after it, is removed from.
   #[must_use]
   pub fn extract(text: &str) -> (Option<Self>, Cow<'_, str>) {
      let Some(captures) = DOC_CODE.captures(text) else {
         return (None, Cow::Borrowed(text));
      };

      let code = Self {
         number: captures[1].to_owned(),
         word:   captures[2].to_owned(),
      };

      let range = captures.get(0).map_or(0..0, |whole| whole.range());

      let mut rest = String::with_capacity(text.len() - range.len());
      rest.push_str(&text[..range.start]);
      rest.push_str(&text[range.end..]);

      (Some(code), Cow::Owned(rest))
   }

   /// The command that opens the documentation of this code.
   #[must_use]
   pub fn command(&self) -> String {
      format!("'helix doc {self}'")
   }

   #[must_use]
   pub fn hint(&self) -> String {
      format!(
         "If this is your first time seeing this error, and you are not sure how to fix it, type \
          {command}.",
         command = self.command(),
      )
   }
}

/// A message, either whole or already split into lines.
#[derive(Debug, Clone)]
pub enum Message<'a> {
   Text(&'a str),
   Lines(&'a [&'a str]),
}

impl<'a> From<&'a str> for Message<'a> {
   fn from(text: &'a str) -> Self {
      Self::Text(text)
   }
}

impl<'a> From<&'a String> for Message<'a> {
   fn from(text: &'a String) -> Self {
      Self::Text(text)
   }
}

impl<'a> From<&'a [&'a str]> for Message<'a> {
   fn from(lines: &'a [&'a str]) -> Self {
      Self::Lines(lines)
   }
}

impl<'a> Message<'a> {
   fn lines(&self) -> Vec<Cow<'a, str>> {
      match *self {
         Message::Text(text) => text.split('\n').map(Cow::Borrowed).collect(),
         Message::Lines(lines) => lines.iter().copied().map(Cow::Borrowed).collect(),
      }
   }
}

/// Wraps messages into boxed report rows.
#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter<'a> {
   pub palette:  &'a Palette,
   pub glyphs:   &'a Glyphs,
   /// The width of a whole row, frame included.
   pub width:    usize,
   pub doc_hint: bool,
}

impl MessageFormatter<'_> {
   /// The width the message is wrapped at: the row without `"│ "` and `" │"`.
   #[must_use]
   pub fn text_width(&self) -> usize {
      self.width.saturating_sub(4)
   }

   /// The rule between the source and the message, naming the documentation
   /// code if there is one.
   #[must_use]
   pub fn separator(&self, code: Option<&DocCode>) -> String {
      let Palette {
         primary,
         emphasis,
         reset,
         ..
      } = self.palette;
      let Glyphs {
         vertical,
         horizontal,
         ..
      } = *self.glyphs;

      match code {
         Some(code) => {
            let code = code.to_string();
            let rule = tint::width(&code) + 8;

            format!(
               "{primary}{vertical} {horizontal}{horizontal} {emphasis}{code}{reset}{primary} {dashes} \
                {vertical}{reset}",
               dashes = horizontal
                  .to_string()
                  .repeat(self.width.saturating_sub(rule)),
            )
         },

         None => {
            format!(
               "{primary}{vertical} {dashes} {vertical}{reset}",
               dashes = horizontal.to_string().repeat(self.text_width()),
            )
         },
      }
   }

   /// Formats the message into rows: the separator rule first, then every
   /// wrapped line of the message.
   ///
   /// Every logical line is wrapped on its own. Its first row starts with
   /// [`Glyphs::vertical`], the rows it wraps into with
   /// [`Glyphs::continuation`]. Blank lines yield no rows.
   pub fn process<'m>(&self, message: impl Into<Message<'m>>) -> Vec<String> {
      let mut lines = message.into().lines();

      let mut code = None;
      for line in &mut lines {
         if let (Some(found), rest) = DocCode::extract(line) {
            let rest = rest.into_owned();
            *line = Cow::Owned(rest);
            code = Some(found);
            break;
         }
      }

      if let Some(code) = code.as_ref().filter(|_| self.doc_hint) {
         lines.push(Cow::Owned(code.hint()));
      }

      let mut rows = vec![self.separator(code.as_ref())];

      for line in &lines {
         for (index, fragment) in tint::wrap(line, self.text_width()).enumerate() {
            rows.push(self.row(fragment, index > 0, code.as_ref()));
         }
      }

      rows
   }

   fn row(&self, fragment: &str, continuation: bool, code: Option<&DocCode>) -> String {
      let Palette {
         primary,
         muted,
         warning,
         reset,
         ..
      } = self.palette;

      let (guide_color, guide) = if continuation {
         (muted, self.glyphs.continuation)
      } else {
         (primary, self.glyphs.vertical)
      };

      let padding = " ".repeat(self.text_width().saturating_sub(tint::width(fragment)));

      let fragment = match code {
         Some(code) if !warning.is_empty() => {
            let command = code.command();
            Cow::Owned(fragment.replace(&command, &format!("{warning}{command}{reset}")))
         },

         _ => Cow::Borrowed(fragment),
      };

      format!(
         "{guide_color}{guide}{reset} {fragment}{padding} {primary}{vertical}{reset}",
         vertical = self.glyphs.vertical,
      )
   }
}
