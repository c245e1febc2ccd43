use std::fmt;

#[doc(inline)]
pub use yansi::{
   Color,
   Style,
};

/// Resets every color and attribute.
pub const RESET: &str = "\x1B[0m";

/// Writes `text` wrapped in the escape sequences of `style`. The default style
/// writes the bare text.
pub fn paint(writer: &mut impl fmt::Write, text: &str, style: Style) -> fmt::Result {
   if style == Style::new() {
      return writer.write_str(text);
   }

   writer.write_str(&style.prefix())?;
   writer.write_str(text)?;
   writer.write_str(RESET)
}
