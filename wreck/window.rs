use std::{
   fs,
   path::Path,
};

use crate::{
   Error,
   Result,
};

/// The lines of a file shown above and at the failing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWindow {
   pub lines:          Vec<String>,
   /// The zero based index of the first of [`SourceWindow::lines`] in the
   /// file.
   pub start_index:    usize,
   /// The index of the failing line in [`SourceWindow::lines`], if the line
   /// number points into the file.
   pub failing_offset: Option<usize>,
   /// The count of lines in the whole file.
   pub total:          usize,
}

impl SourceWindow {
   /// Reads the file and keeps at most `window` lines ending with the 1 based
   /// `line`. A line of 0 or one past the end yields no failing line.
   pub fn read(path: &Path, line: usize, window: usize) -> Result<Self> {
      let contents = fs::read_to_string(path).map_err(|source| {
         Error::Read {
            path: path.to_owned(),
            source,
         }
      })?;

      let window = Self::slice(&contents, line, window);

      tracing::debug!(
         path = %path.display(),
         line,
         start = window.start_index,
         count = window.lines.len(),
         total = window.total,
         "read source window",
      );

      Ok(window)
   }

   /// Slices already read contents the way [`SourceWindow::read`] does.
   #[must_use]
   pub fn slice(contents: &str, line: usize, window: usize) -> Self {
      let all = contents.lines().collect::<Vec<_>>();
      let total = all.len();

      let start_index = line.saturating_sub(window);
      let end = line.min(total);

      let lines = all
         .get(start_index..end)
         .unwrap_or_default()
         .iter()
         .map(|&line| line.to_owned())
         .collect::<Vec<_>>();

      let failing_offset =
         (start_index < end && line <= total).then(|| line - 1 - start_index);

      Self {
         lines,
         start_index,
         failing_offset,
         total,
      }
   }

   /// The failing line with its 1 based number, if it is in the window.
   #[must_use]
   pub fn failing(&self) -> Option<(usize, &str)> {
      let offset = self.failing_offset?;

      self
         .lines
         .get(offset)
         .map(|line| (self.start_index + offset + 1, line.as_str()))
   }
}
