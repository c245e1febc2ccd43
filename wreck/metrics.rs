//! Indentation arithmetic over a single line. Everything counts characters,
//! not bytes.

/// Whether the character is leading whitespace that is not a tab.
fn is_blank(c: char) -> bool {
   c.is_whitespace() && c != '\t'
}

/// Whether the character is consumed by [`count_spaces`].
fn is_space(c: char) -> bool {
   matches!(c, ' ' | '\t' | '\u{3000}')
}

/// Returns the byte index of the character at `index`, or the length of the
/// line if it has fewer characters.
fn byte_index(line: &str, index: usize) -> usize {
   line
      .char_indices()
      .nth(index)
      .map_or(line.len(), |(byte, _)| byte)
}

/// The leading columns to skip: `1` if the line starts with a tab, otherwise
/// the count of leading non-tab whitespace.
#[must_use]
pub fn skip_amount(line: &str) -> usize {
   if line.starts_with('\t') {
      return 1;
   }

   line.chars().take_while(|&c| is_blank(c)).count()
}

/// The spaces and tab equivalents right after [`skip_amount`].
#[must_use]
pub fn count_spaces(line: &str) -> usize {
   line
      .chars()
      .skip(skip_amount(line))
      .take_while(|&c| is_space(c))
      .count()
}

/// The line without its skipped columns and the spaces after them.
#[must_use]
pub fn line_without_spaces(line: &str) -> &str {
   &line[byte_index(line, skip_amount(line) + count_spaces(line))..]
}

/// The columns of padding after [`skip_amount`]: [`count_spaces`], plus one
/// when the output draws extended characters.
#[must_use]
pub fn padding(line: &str, extended: bool) -> usize {
   count_spaces(line) + usize::from(extended)
}

/// The column the code of the line starts at.
#[must_use]
pub fn code_start(line: &str) -> usize {
   skip_amount(line) + count_spaces(line)
}
