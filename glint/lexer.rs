use std::{
   iter,
   result,
};

use regex::{
   Regex,
   RegexBuilder,
};
use rustc_hash::FxHashMap;
use smallvec::{
   SmallVec,
   smallvec,
};

use crate::{
   Category,
   Error,
   Result,
   rule::{
      Action,
      ROOT,
      Rule,
      Table,
      Transition,
   },
};

/// A classified piece of the input. Concatenating every span of a scan in order
/// gives back the input.
pub type Span<'a> = (Category, &'a str);

#[derive(Debug)]
struct Pattern {
   /// Used when the cursor is at the start of the text.
   start: Regex,
   /// Used everywhere else. Consumes the character before the cursor first so
   /// that `\b` and `^` see the real context.
   after: Regex,
}

impl Pattern {
   fn new(pattern: &str) -> result::Result<Self, regex::Error> {
      let build = |prefix: &str| {
         RegexBuilder::new(&format!(r"\A{prefix}(?:{pattern})"))
            .multi_line(true)
            .build()
      };

      Ok(Self {
         start: build("")?,
         after: build("(?s:.)")?,
      })
   }

   /// Returns the regex to match at `cursor` with and the offset of the
   /// haystack it expects.
   fn at(&self, text: &str, cursor: usize) -> (&Regex, usize) {
      match text[..cursor].chars().next_back() {
         None => (&self.start, 0),
         Some(previous) => (&self.after, cursor - previous.len_utf8()),
      }
   }
}

#[derive(Debug)]
enum Matcher {
   Literal {
      text:     &'static str,
      category: Category,
   },

   Pattern {
      pattern: Pattern,
      action:  Action,
   },
}

#[derive(Debug, Clone, Copy)]
enum Next {
   Stay,
   Push(usize),
   Pop,
}

#[derive(Debug)]
struct Compiled {
   matcher: Matcher,
   next:    Next,
}

/// A compiled rule table. Build it once and scan any number of texts with
/// [`Lexer::tokenize`].
#[derive(Debug)]
pub struct Lexer {
   names:  Vec<&'static str>,
   states: Vec<Vec<Compiled>>,
   root:   usize,
}

struct Builder {
   table:   Table,
   indices: FxHashMap<&'static str, usize>,
}

impl Builder {
   fn index(&self, from: &'static str, name: &'static str) -> Result<usize> {
      self
         .indices
         .get(name)
         .copied()
         .ok_or(Error::UnknownState { from, name })
   }

   fn flatten(
      &self,
      name: &'static str,
      visiting: &mut SmallVec<&'static str, 8>,
      compiled: &mut Vec<Compiled>,
   ) -> Result<()> {
      if visiting.contains(&name) {
         return Err(Error::IncludeCycle { name });
      }
      visiting.push(name);

      let (owner, rules) = self.table[self.indices[name]];

      for rule in rules {
         let (matcher, transition) = match *rule {
            Rule::Include(included) => {
               self.index(owner, included)?;
               self.flatten(included, visiting, compiled)?;
               continue;
            },

            Rule::Literal {
               text,
               category,
               transition,
            } => (Matcher::Literal { text, category }, transition),

            Rule::Pattern {
               pattern,
               action,
               transition,
            } => {
               let compiled = Pattern::new(pattern).map_err(|source| {
                  Error::Regex {
                     state: owner,
                     pattern,
                     source,
                  }
               })?;

               (
                  Matcher::Pattern {
                     pattern: compiled,
                     action,
                  },
                  transition,
               )
            },
         };

         let next = match transition {
            Transition::Stay => Next::Stay,
            Transition::Push(target) => Next::Push(self.index(owner, target)?),
            Transition::Pop => Next::Pop,
         };

         compiled.push(Compiled { matcher, next });
      }

      visiting.pop();
      Ok(())
   }
}

impl Lexer {
   /// Compiles the table, resolving every include and state reference.
   pub fn new(table: Table) -> Result<Self> {
      let builder = Builder {
         table,
         indices: table
            .iter()
            .enumerate()
            .map(|(index, &(name, _))| (name, index))
            .collect(),
      };

      let root = *builder.indices.get(ROOT).ok_or(Error::MissingRoot)?;

      let mut states = Vec::with_capacity(table.len());
      for &(name, _) in table {
         let mut compiled = Vec::new();
         builder.flatten(name, &mut SmallVec::new(), &mut compiled)?;

         tracing::debug!(state = name, rules = compiled.len(), "compiled state");
         states.push(compiled);
      }

      Ok(Self {
         names: table.iter().map(|&(name, _)| name).collect(),
         states,
         root,
      })
   }

   /// Scans the text lazily. The scan never fails: text no rule matches is
   /// emitted one character at a time as [`Category::Error`].
   #[must_use]
   pub fn tokenize<'a>(&'a self, text: &'a str) -> Tokens<'a> {
      Tokens {
         lexer: self,
         text,
         cursor: 0,
         stack: smallvec![self.root],
         pending: SmallVec::new(),
      }
   }
}

/// The lazy scan returned by [`Lexer::tokenize`].
pub struct Tokens<'a> {
   lexer:   &'a Lexer,
   text:    &'a str,
   cursor:  usize,
   stack:   SmallVec<usize, 8>,
   /// Spans matched but not yielded yet, in reverse order.
   pending: SmallVec<Span<'a>, 8>,
}

impl<'a> Tokens<'a> {
   fn gap(text: &'a str) -> Span<'a> {
      if text.chars().all(char::is_whitespace) {
         (Category::Whitespace, text)
      } else {
         (Category::Text, text)
      }
   }

   /// Tries the rule at the cursor, returning the end of the match.
   fn try_rule(&mut self, rule: &Compiled) -> Option<usize> {
      let (text, cursor) = (self.text, self.cursor);

      let (pattern, action) = match rule.matcher {
         Matcher::Literal { text: literal, category } => {
            if literal.is_empty() || !text[cursor..].starts_with(literal) {
               return None;
            }

            let end = cursor + literal.len();
            self.pending.push((category, &text[cursor..end]));
            return Some(end);
         },

         Matcher::Pattern {
            ref pattern,
            action,
         } => (pattern, action),
      };

      let (regex, offset) = pattern.at(text, cursor);

      match action {
         Action::Token(category) => {
            let end = offset + regex.find(&text[offset..])?.end();
            if end <= cursor {
               return None;
            }

            self.pending.push((category, &text[cursor..end]));
            Some(end)
         },

         Action::Groups(categories) => {
            let captures = regex.captures(&text[offset..])?;

            let end = offset + captures.get(0)?.end();
            if end <= cursor {
               return None;
            }

            let mut spans = SmallVec::<Span<'a>, 8>::new();
            let mut position = cursor;

            for (index, &category) in categories.iter().enumerate() {
               let Some(group) = captures.get(index + 1) else {
                  continue;
               };

               let (start, group_end) = (offset + group.start(), offset + group.end());
               if start < position || start == group_end {
                  continue;
               }

               if start > position {
                  spans.push(Self::gap(&text[position..start]));
               }

               spans.push((category, &text[start..group_end]));
               position = group_end;
            }

            if end > position {
               spans.push(Self::gap(&text[position..end]));
            }

            self.pending.extend(spans.into_iter().rev());
            Some(end)
         },
      }
   }

   fn transition(&mut self, next: Next) {
      match next {
         Next::Stay => {},

         Next::Push(state) => {
            tracing::trace!(state = self.lexer.names[state], "entering state");
            self.stack.push(state);
         },

         // The root state stays.
         Next::Pop if self.stack.len() > 1 => {
            let state = self.stack.pop();
            tracing::trace!(state = ?state.map(|state| self.lexer.names[state]), "leaving state");
         },

         Next::Pop => {},
      }
   }
}

impl<'a> Iterator for Tokens<'a> {
   type Item = Span<'a>;

   fn next(&mut self) -> Option<Self::Item> {
      if let Some(span) = self.pending.pop() {
         return Some(span);
      }

      if self.cursor >= self.text.len() {
         return None;
      }

      let lexer = self.lexer;
      let state = self.stack.last().copied().unwrap_or(lexer.root);

      for rule in &lexer.states[state] {
         if let Some(end) = self.try_rule(rule) {
            self.cursor = end;
            self.transition(rule.next);
            return self.pending.pop();
         }
      }

      let start = self.cursor;
      let c = self.text[start..].chars().next()?;
      self.cursor += c.len_utf8();

      let text = &self.text[start..self.cursor];

      if c == '\n' {
         self.stack.truncate(1);
         Some((Category::Whitespace, text))
      } else {
         Some((Category::Error, text))
      }
   }
}

impl iter::FusedIterator for Tokens<'_> {}
