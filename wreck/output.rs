use std::io;

/// A stream a report is written to.
pub trait Output: io::Write {
   /// Whether the stream shows ANSI escape sequences as colors.
   fn supports_color(&self) -> bool;
}

impl Output for io::Stdout {
   fn supports_color(&self) -> bool {
      yansi::Condition::tty_and_color()
   }
}

/// An in memory stream with a fixed color capability.
#[derive(Debug, Default, Clone)]
pub struct Captured {
   bytes: Vec<u8>,
   color: bool,
}

impl Captured {
   #[must_use]
   pub fn new(color: bool) -> Self {
      Self {
         bytes: Vec::new(),
         color,
      }
   }

   /// Everything written so far, with invalid UTF-8 replaced.
   #[must_use]
   pub fn contents(&self) -> String {
      String::from_utf8_lossy(&self.bytes).into_owned()
   }
}

impl io::Write for Captured {
   fn write(&mut self, buffer: &[u8]) -> io::Result<usize> {
      self.bytes.write(buffer)
   }

   fn flush(&mut self) -> io::Result<()> {
      Ok(())
   }
}

impl Output for Captured {
   fn supports_color(&self) -> bool {
      self.color
   }
}
