//! Rule table definitions.
//!
//! A table is a list of named states, each an ordered list of [`Rule`]s. The
//! tokenizer tries the rules of the active state in order and the first one
//! that matches a non-empty prefix wins.

use crate::Category;

/// What to do with the state stack after a rule matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
   /// Keep the active state.
   Stay,
   /// Enter the named state.
   Push(&'static str),
   /// Leave the active state. The root state is never left.
   Pop,
}

/// How the text matched by a pattern is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
   /// The whole match gets the category.
   Token(Category),
   /// Every capture group gets the category at its position. Text of the match
   /// outside of the groups becomes [`Category::Whitespace`] or
   /// [`Category::Text`].
   Groups(&'static [Category]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
   /// Matches the text verbatim, case sensitive.
   Literal {
      text:       &'static str,
      category:   Category,
      transition: Transition,
   },

   /// Matches a regular expression at the cursor.
   Pattern {
      pattern:    &'static str,
      action:     Action,
      transition: Transition,
   },

   /// Splices the rules of the named state in place.
   Include(&'static str),
}

/// A table of named states.
pub type Table = &'static [(&'static str, &'static [Rule])];

/// The state every scan starts in.
pub const ROOT: &str = "root";

#[must_use]
pub const fn literal(text: &'static str, category: Category) -> Rule {
   Rule::Literal {
      text,
      category,
      transition: Transition::Stay,
   }
}

#[must_use]
pub const fn pattern(pattern: &'static str, category: Category) -> Rule {
   Rule::Pattern {
      pattern,
      action: Action::Token(category),
      transition: Transition::Stay,
   }
}

#[must_use]
pub const fn groups(pattern: &'static str, categories: &'static [Category]) -> Rule {
   Rule::Pattern {
      pattern,
      action: Action::Groups(categories),
      transition: Transition::Stay,
   }
}

#[must_use]
pub const fn include(state: &'static str) -> Rule {
   Rule::Include(state)
}

impl Rule {
   /// Returns the same rule, entering `state` when it matches.
   #[must_use]
   pub const fn push(self, state: &'static str) -> Self {
      self.with_transition(Transition::Push(state))
   }

   /// Returns the same rule, leaving the active state when it matches.
   #[must_use]
   pub const fn pop(self) -> Self {
      self.with_transition(Transition::Pop)
   }

   const fn with_transition(self, transition: Transition) -> Self {
      match self {
         Rule::Literal { text, category, .. } => {
            Rule::Literal {
               text,
               category,
               transition,
            }
         },

         Rule::Pattern { pattern, action, .. } => {
            Rule::Pattern {
               pattern,
               action,
               transition,
            }
         },

         Rule::Include(state) => Rule::Include(state),
      }
   }
}
