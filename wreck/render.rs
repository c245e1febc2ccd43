use std::{
   any,
   convert::Infallible,
   env,
   error,
   io::{
      self,
      Write as _,
   },
   iter,
   panic::Location,
   path::{
      Component,
      MAIN_SEPARATOR,
      Path,
      PathBuf,
   },
};

use itertools::Itertools as _;

use crate::{
   Config,
   Error,
   Glyphs,
   Marks,
   MessageFormatter,
   Output,
   Palette,
   Result,
   SourceWindow,
   UnderlineRow,
   mark_all,
   metrics,
};

/// The stages a report goes through, in order. Each runs exactly once.
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
   #[display("START")]
   Start,
   #[display("COLOR_PROBE")]
   ColorProbe,
   #[display("WINDOW_READ")]
   WindowRead,
   #[display("TOP_BANNER")]
   TopBanner,
   #[display("BODY_LINES")]
   BodyLines,
   #[display("MARK_EMIT")]
   MarkEmit,
   #[display("MESSAGE_EMIT")]
   MessageEmit,
   #[display("BOTTOM_BANNER")]
   BottomBanner,
   #[display("DONE")]
   Done,
}

impl Stage {
   fn enter(self) {
      tracing::debug!(stage = %self, "entering stage");
   }
}

/// What happens once a report is written.
pub trait Terminate {
   type Output;

   fn terminate(self) -> Self::Output;
}

/// Exits the process with status 1.
#[derive(Debug, Clone, Copy)]
pub struct Exit;

impl Terminate for Exit {
   type Output = Infallible;

   fn terminate(self) -> Infallible {
      std::process::exit(1)
   }
}

/// An error to report, with the place it happened at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
   /// The short name of the error type, shown in the top rule.
   pub kind:    String,
   pub message: String,
   /// The source file. Empty when there is no location.
   pub file:    PathBuf,
   /// The 1 based failing line. 0 when there is no location.
   pub line:    usize,
   pub marks:   Marks,
}

impl Diagnostic {
   /// Describes the error with its type name and message, without a location.
   pub fn new<E: error::Error + ?Sized>(error: &E) -> Self {
      Self::custom(short_type_name(any::type_name::<E>()), error.to_string())
   }

   /// Describes an error that has no type of its own.
   pub fn custom(kind: impl Into<String>, message: impl Into<String>) -> Self {
      Self {
         kind:    kind.into(),
         message: message.into(),
         file:    PathBuf::new(),
         line:    0,
         marks:   Marks::default(),
      }
   }

   #[must_use]
   pub fn at(self, file: impl Into<PathBuf>, line: usize) -> Self {
      Self {
         file: file.into(),
         line,
         ..self
      }
   }

   /// Locates the diagnostic at the code calling this.
   #[must_use]
   #[track_caller]
   pub fn caller(self) -> Self {
      let location = Location::caller();

      self.at(location.file(), location.line() as usize)
   }

   #[must_use]
   pub fn mark(mut self, mark: impl Into<String>) -> Self {
      self.marks.push(mark);
      self
   }

   #[must_use]
   pub fn marks(self, marks: impl Into<Marks>) -> Self {
      Self {
         marks: marks.into(),
         ..self
      }
   }
}

fn short_type_name(name: &str) -> &str {
   let name = name.split('<').next().unwrap_or(name);

   name.rsplit("::").next().unwrap_or(name)
}

/// Everything decided once per report before any row is drawn.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
   pub config:    &'a Config,
   pub palette:   Palette,
   pub glyphs:    &'static Glyphs,
   pub formatter: glint::Formatter,
}

impl<'a> RenderContext<'a> {
   /// Resolves the palette and the highlighting theme for a stream that does
   /// or does not support color.
   pub fn new(config: &'a Config, supported: bool) -> Result<Self> {
      let colored = config.color.enabled(supported);
      let palette = Palette::resolve(colored)?;

      let formatter = if !palette.is_plain() && config.highlight {
         glint::Formatter::one_dark(if supported {
            glint::Depth::TrueColor
         } else {
            glint::Depth::Ansi256
         })
      } else {
         glint::Formatter::plain()
      };

      tracing::debug!(supported, colored, "resolved colors");

      Ok(Self {
         config,
         palette,
         glyphs: Glyphs::new(config.unicode),
         formatter,
      })
   }

   fn message_formatter(&self) -> MessageFormatter<'_> {
      MessageFormatter {
         palette:  &self.palette,
         glyphs:   self.glyphs,
         width:    self.config.width,
         doc_hint: self.config.doc_hint,
      }
   }

   fn top(&self, kind: &str) -> String {
      let Palette {
         primary,
         emphasis,
         reset,
         ..
      } = &self.palette;
      let Glyphs {
         horizontal,
         top_left,
         top_right,
         ellipsis,
         ..
      } = *self.glyphs;

      let kind = tint::truncate(kind, self.config.width.saturating_sub(6), ellipsis);
      let dashes = horizontal
         .to_string()
         .repeat(self.config.width.saturating_sub(5 + tint::width(&kind)));

      format!(
         "{primary}{top_left}{horizontal}{reset} {emphasis}{kind}{reset} \
          {primary}{dashes}{top_right}{reset}"
      )
   }

   /// A source row. `visible` is the width of `code` without escapes.
   fn code(&self, gutter: &str, code: &str, visible: usize, area: usize) -> String {
      let Palette {
         primary,
         muted,
         reset,
         ..
      } = &self.palette;
      let vertical = self.glyphs.vertical;

      let padding = " ".repeat(area.saturating_sub(visible));

      format!(
         "{primary}{vertical}{reset} {gutter} {muted}{vertical}{reset} \
          {code}{padding}{primary}{vertical}{reset}"
      )
   }

   /// The carets under the failing line, led from where its code starts by
   /// a run of [`Glyphs::horizontal`].
   fn underline(&self, line: &str, row: &UnderlineRow, gutter: usize, area: usize) -> String {
      let Palette {
         primary,
         emphasis,
         reset,
         ..
      } = &self.palette;
      let Glyphs {
         horizontal,
         corner,
         caret,
         extended,
         ..
      } = *self.glyphs;

      let mut cells = row.chars().collect::<Vec<_>>();

      let start = metrics::code_start(line);
      if let Some(first) = row.first_caret().filter(|&first| first > start) {
         if let Some(cell) = cells.get_mut(start).filter(|_| extended) {
            *cell = corner;
         }

         let from = metrics::skip_amount(line) + metrics::padding(line, extended);
         for cell in cells.iter_mut().take(first).skip(from) {
            *cell = horizontal;
         }
      }

      cells.truncate(area);

      let mut painted = String::with_capacity(cells.len() * 2);
      for (color, run) in &cells.iter().chunk_by(|&&cell| {
         match cell {
            ' ' => "",
            cell if cell == caret => emphasis.as_str(),
            _ => primary.as_str(),
         }
      }) {
         if color.is_empty() {
            painted.extend(run);
         } else {
            painted.push_str(color);
            painted.extend(run);
            painted.push_str(reset);
         }
      }

      self.code(&" ".repeat(gutter), &painted, cells.len(), area)
   }

   fn blank(&self) -> String {
      let Palette { primary, reset, .. } = &self.palette;
      let vertical = self.glyphs.vertical;

      format!(
         "{primary}{vertical}{spaces}{vertical}{reset}",
         spaces = " ".repeat(self.config.width.saturating_sub(2)),
      )
   }

   fn bottom(&self, file: &Path, line: usize) -> String {
      let Palette {
         primary,
         muted,
         secondary,
         reset,
         ..
      } = &self.palette;
      let Glyphs {
         horizontal,
         bottom_left,
         bottom_right,
         ..
      } = *self.glyphs;

      let inner = self.config.width.saturating_sub(2);

      if file.as_os_str().is_empty() {
         return format!(
            "{primary}{bottom_left}{dashes}{bottom_right}{reset}",
            dashes = horizontal.to_string().repeat(inner),
         );
      }

      let path = fit_path(file, line, self.config.width);
      let (left, right) = center(inner, tint::width(&format!(" {path}:{line} ")));

      format!(
         "{primary}{bottom_left}{left} {reset}{secondary}{path}{reset}{muted}:{reset}\
          {secondary}{line}{reset}{primary} {right}{bottom_right}{reset}",
         left = horizontal.to_string().repeat(left),
         right = horizontal.to_string().repeat(right),
      )
   }
}

/// Splits the margin around text the way a centered string is padded: an odd
/// margin puts the extra column left when the width is odd too.
fn center(width: usize, text: usize) -> (usize, usize) {
   let margin = width.saturating_sub(text);
   let left = margin / 2 + (margin & width & 1);

   (left, margin - left)
}

/// The columns left on each side of the location in the bottom rule.
fn halves(width: usize, location: &str) -> isize {
   (width as isize - 4 - tint::width(location) as isize) / 2
}

/// Shows the path as is, or relative to the working directory as
/// `./path` when the location would leave less than 2 columns of rule on
/// each side.
fn fit_path(path: &Path, line: usize, width: usize) -> String {
   let shown = path.display().to_string();

   if halves(width, &format!("{shown}:{line}")) >= 2 {
      return shown;
   }

   let Some(relative) = env::current_dir()
      .ok()
      .and_then(|directory| relative_to(path, &directory))
   else {
      return shown;
   };

   let rewritten = format!(".{MAIN_SEPARATOR}{relative}", relative = relative.display());

   tracing::debug!(
      from = %shown,
      to = %rewritten,
      halves = halves(width, &format!("{rewritten}:{line}")),
      "rewrote path in bottom rule",
   );

   rewritten
}

/// The path relative to `base`, climbing out of it with `..` where needed.
/// Relative paths are returned as they are, and `None` is returned if the
/// two share no root (such as paths on different drives).
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
   if path.is_relative() {
      return Some(path.to_owned());
   }

   let shared = path
      .components()
      .zip(base.components())
      .take_while(|(left, right)| left == right)
      .count();

   if shared == 0 {
      return None;
   }

   let climb = base.components().count() - shared;

   Some(
      iter::repeat_n(Component::ParentDir, climb)
         .chain(path.components().skip(shared))
         .collect(),
   )
}

fn emit(output: &mut impl Output, row: &str) -> Result<()> {
   writeln!(output, "{row}").map_err(Error::Write)
}

/// Writes the report to the output and terminates.
///
/// The source window is read before anything is written, so a file that
/// cannot be read fails the report without any output and without
/// terminating.
pub fn panic_with<T: Terminate>(
   diagnostic: &Diagnostic,
   config: &Config,
   output: &mut impl Output,
   terminate: T,
) -> Result<T::Output> {
   let span = tracing::debug_span!("panic", kind = %diagnostic.kind);
   let _guard = span.enter();

   Stage::Start.enter();
   tracing::debug!(
      file = %diagnostic.file.display(),
      line = diagnostic.line,
      marks = ?diagnostic.marks,
      "rendering report",
   );

   Stage::ColorProbe.enter();
   let context = RenderContext::new(config, output.supports_color())?;

   Stage::WindowRead.enter();
   let mut window = if diagnostic.file.as_os_str().is_empty() {
      SourceWindow::slice("", 0, config.window)
   } else {
      SourceWindow::read(&diagnostic.file, diagnostic.line, config.window)?
   };

   let gutter = tint::number_width(window.start_index + window.lines.len());
   let area = config.width.saturating_sub(gutter + 6);

   for line in &mut window.lines {
      *line = tint::truncate(&tint::expand_tabs(line), area, context.glyphs.ellipsis).into_owned();
   }

   Stage::TopBanner.enter();
   emit(output, &context.top(&diagnostic.kind))?;

   Stage::BodyLines.enter();
   // Highlighted as one text so comments spanning lines keep their state.
   let highlighted = glint::highlight(
      &window.lines.join("\n"),
      glint::helix::lexer(),
      &context.formatter,
   );

   let blank_gutter = " ".repeat(gutter);
   for (line, code) in window
      .lines
      .iter()
      .zip(highlighted.split('\n'))
      .take(window.failing_offset.unwrap_or(window.lines.len()))
   {
      emit(output, &context.code(&blank_gutter, code, tint::width(line), area))?;
   }

   Stage::MarkEmit.enter();
   if let Some((number, line)) = window.failing() {
      let (painted, row) = mark_all(line, &diagnostic.marks, &context.palette, context.glyphs.caret);

      if !diagnostic.marks.is_empty() && row.is_blank() {
         tracing::warn!(marks = ?diagnostic.marks, "no mark occurs in the failing line");
      }

      let Palette {
         emphasis, reset, ..
      } = &context.palette;

      emit(
         output,
         &context.code(
            &format!("{emphasis}{number:>gutter$}{reset}"),
            &painted,
            tint::width(line),
            area,
         ),
      )?;
      emit(output, &context.underline(line, &row, gutter, area))?;
   }

   Stage::MessageEmit.enter();
   emit(output, &context.blank())?;
   for row in context.message_formatter().process(&diagnostic.message) {
      emit(output, &row)?;
   }

   Stage::BottomBanner.enter();
   emit(output, &context.bottom(&diagnostic.file, diagnostic.line))?;

   Stage::Done.enter();
   output.flush().map_err(Error::Write)?;

   Ok(terminate.terminate())
}

/// Writes the report to standard output and exits the process with status 1.
///
/// Only returns if the report could not be written.
pub fn panic(diagnostic: &Diagnostic, config: &Config) -> Result<Infallible> {
   panic_with(diagnostic, config, &mut io::stdout(), Exit)
}

/// Reports the error at the calling line with the default config, marking
/// every given substring of it, and exits the process.
///
/// Evaluates to the [`Error`](crate::Error) that kept the report from being
/// written.
#[macro_export]
macro_rules! fatal {
   ($error:expr $(, $mark:expr)* $(,)?) => {{
      let diagnostic = $crate::Diagnostic::new(&$error)
         .caller()
         $(.mark($mark))*;

      match $crate::panic(&diagnostic, &$crate::Config::default()) {
         ::std::result::Result::Ok(never) => match never {},
         ::std::result::Result::Err(error) => error,
      }
   }};
}

#[cfg(test)]
mod tests {
   use std::{
      cell::Cell,
      io::Write as _,
   };

   use super::*;
   use crate::{
      Captured,
      ColorChoice,
   };

   #[derive(thiserror::Error, Debug)]
   #[error("bad value")]
   struct ValueError;

   /// Counts terminations instead of exiting.
   struct Recorded<'a>(&'a Cell<usize>);

   impl Terminate for Recorded<'_> {
      type Output = usize;

      fn terminate(self) -> usize {
         self.0.set(self.0.get() + 1);
         self.0.get()
      }
   }

   fn source(lines: impl IntoIterator<Item = String>) -> tempfile::NamedTempFile {
      let mut file = tempfile::Builder::new().suffix(".hlx").tempfile().unwrap();

      for line in lines {
         writeln!(file, "{line}").unwrap();
      }

      file
   }

   fn twenty_lines() -> tempfile::NamedTempFile {
      source((1..=20).map(|number| {
         if number == 10 {
            "let bad = compute(10);".to_owned()
         } else {
            format!("let value_{number} = {number};")
         }
      }))
   }

   fn render(diagnostic: &Diagnostic, config: &Config, color: bool) -> (Result<usize>, String) {
      let terminated = Cell::new(0);
      let mut output = Captured::new(color);

      let result = panic_with(diagnostic, config, &mut output, Recorded(&terminated));

      (result, output.contents())
   }

   fn column(row: &str, needle: &str) -> usize {
      row[..row.find(needle).unwrap()].chars().count()
   }

   #[test]
   fn kind_is_the_short_type_name() {
      assert_eq!(Diagnostic::new(&ValueError).kind, "ValueError");
      assert_eq!(Diagnostic::new(&ValueError).message, "bad value");
      assert_eq!(short_type_name("alloc::vec::Vec<core::fmt::Error>"), "Vec");
      assert_eq!(short_type_name("Plain"), "Plain");
   }

   #[test]
   fn caller_is_this_file() {
      let diagnostic = Diagnostic::new(&ValueError).caller();

      assert!(diagnostic.file.ends_with("render.rs"));
      assert!(diagnostic.line > 0);
   }

   #[test]
   fn fatal_expands() {
      // Only type checked, calling it would exit.
      let _ = || -> Error { fatal!(ValueError, "bad") };
   }

   #[test]
   fn single_mark_gets_one_caret_run() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 10).mark("bad");

      let (result, output) = render(&diagnostic, &Config::default(), false);
      assert_eq!(result.unwrap(), 1);

      let rows = output.lines().collect::<Vec<_>>();
      let failing = rows
         .iter()
         .position(|row| row.contains(" 10 │"))
         .unwrap();
      let underline = rows[failing + 1];

      assert_eq!(
         underline
            .split(|c: char| c != '^')
            .filter(|run| !run.is_empty())
            .count(),
         1,
      );
      assert_eq!(underline.matches('^').count(), 3);
      assert_eq!(column(rows[failing], "bad"), column(underline, "^"));
      assert!(underline.contains("╰───^^^"));
   }

   #[test]
   fn absent_mark_leaves_the_underline_blank() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 10).mark("missing");

      let (result, output) = render(&diagnostic, &Config::default(), false);
      assert!(result.is_ok());

      let rows = output.lines().collect::<Vec<_>>();
      let failing = rows
         .iter()
         .position(|row| row.contains(" 10 │ let bad = compute(10);"))
         .unwrap();

      assert!(!rows[failing + 1].contains('^'));
      assert!(!rows[failing + 1].contains('╰'));
   }

   #[test]
   fn missing_file_writes_nothing() {
      let directory = tempfile::tempdir().unwrap();
      let diagnostic = Diagnostic::new(&ValueError).at(directory.path().join("missing.hx"), 1);

      let (result, output) = render(&diagnostic, &Config::default(), true);

      assert!(matches!(result, Err(Error::Read { .. })));
      assert!(output.is_empty());
   }

   #[test]
   fn no_color_support_means_no_escapes() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 10).mark("bad");

      let (_, plain) = render(&diagnostic, &Config::default(), false);
      assert!(!plain.contains('\x1B'));

      let (_, colored) = render(&diagnostic, &Config::default(), true);
      assert!(colored.contains('\x1B'));

      let never = Config {
         color: ColorChoice::Never,
         ..Config::default()
      };
      assert_eq!(render(&diagnostic, &never, true).1, plain);
   }

   #[test]
   fn rows_are_boxed_to_width() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 10).mark("bad");

      for width in [60, 80, 100] {
         let config = Config {
            width,
            ..Config::default()
         };
         let (_, output) = render(&diagnostic, &config, false);
         let rows = output.lines().collect::<Vec<_>>();

         assert!(rows[0].starts_with("╭─ ValueError ─"));
         assert!(rows[rows.len() - 1].starts_with('╰'));
         assert!(rows[rows.len() - 1].contains(":10 "));

         for row in &rows {
            assert_eq!(tint::width(row), width, "{row:?}");
         }
      }
   }

   #[test]
   fn window_shows_lines_up_to_failing() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 10);

      let (_, output) = render(&diagnostic, &Config::default(), false);

      assert!(!output.contains("value_5 "));
      for number in 6..10 {
         assert!(output.contains(&format!("let value_{number} = {number};")));
      }
      assert!(!output.contains("value_11"));
   }

   #[test]
   fn long_lines_are_cut() {
      let file = source(["x".repeat(200)]);
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 1);

      let (_, output) = render(&diagnostic, &Config::default(), false);

      assert!(output.contains("x..."));
      assert!(output.lines().all(|row| tint::width(row) == 80));
   }

   #[test]
   fn ascii_glyphs() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 10).mark("bad");
      let config = Config {
         unicode: false,
         ..Config::default()
      };

      let (_, output) = render(&diagnostic, &config, false);

      assert!(output.starts_with("+- ValueError -"));
      assert!(output.contains("----^^^"));
      assert!(output.is_ascii());
   }

   #[test]
   fn no_location_has_no_failing_row() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::new(&ValueError).at(file.path(), 0).mark("bad");

      let (result, output) = render(&diagnostic, &Config::default(), false);

      assert!(result.is_ok());
      assert!(!output.contains('^'));
      assert!(!output.contains("let"));
   }

   #[test]
   fn custom_without_file_reads_nothing() {
      let diagnostic = Diagnostic::custom("Interrupted", "stopped");

      let (result, output) = render(&diagnostic, &Config::default(), false);

      assert!(result.is_ok());
      assert!(output.lines().last().unwrap().starts_with("╰──"));
      assert!(output.contains("│ stopped"));
   }

   #[test]
   fn doc_code_message() {
      let file = twenty_lines();
      let diagnostic = Diagnostic::custom("ValueError", "<Hex(12.E)>: bad value").at(file.path(), 10);

      let (_, output) = render(&diagnostic, &Config::default(), false);

      assert!(output.contains("│ ── 12.E ─"));
      assert!(output.contains("│ bad value "));
      assert!(output.contains("'helix doc 12.E'"));
   }

   #[test]
   fn center_like_strings() {
      assert_eq!(center(10, 4), (3, 3));
      assert_eq!(center(9, 4), (3, 2));
      assert_eq!(center(10, 5), (2, 3));
      assert_eq!(center(4, 9), (0, 0));
   }

   #[test]
   fn long_paths_are_rewritten() {
      let directory = env::current_dir().unwrap();
      let long = directory.join("a".repeat(90)).join("x.hlx");

      let shown = fit_path(&long, 3, 80);
      assert_eq!(shown, format!(".{MAIN_SEPARATOR}{}{MAIN_SEPARATOR}x.hlx", "a".repeat(90)));

      assert_eq!(fit_path(Path::new("x.hlx"), 3, 80), "x.hlx");
   }

   #[test]
   #[cfg(unix)]
   fn long_paths_outside_the_directory_climb_out() {
      let directory = env::current_dir().unwrap();
      let long = Path::new("/nonexistent_root_dir").join("a".repeat(90)).join("x.hlx");

      let climb = "../".repeat(directory.components().count() - 1);
      assert_eq!(
         fit_path(&long, 3, 80),
         format!("./{climb}nonexistent_root_dir/{}/x.hlx", "a".repeat(90)),
      );
   }

   #[test]
   #[cfg(unix)]
   fn relative_paths_stay_relative() {
      let base = Path::new("/home/helix/project");

      assert_eq!(relative_to(Path::new("src/x.hlx"), base).unwrap(), Path::new("src/x.hlx"));
      assert_eq!(
         relative_to(Path::new("/home/helix/project/src/x.hlx"), base).unwrap(),
         Path::new("src/x.hlx"),
      );
      assert_eq!(
         relative_to(Path::new("/home/other/x.hlx"), base).unwrap(),
         Path::new("../../other/x.hlx"),
      );
   }
}
