/// The category of a token span. Categories form a tree, see
/// [`Category::parent`].
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
   /// Plain text. The root of every other category.
   #[display("Text")]
   Text,

   #[display("Whitespace")]
   Whitespace,

   /// A character no rule could classify.
   #[display("Error")]
   Error,

   #[display("Keyword")]
   Keyword,

   #[display("Operator")]
   Operator,

   #[display("Punctuation")]
   Punctuation,

   #[display("Comment")]
   Comment,
   #[display("Comment.Single")]
   CommentSingle,
   #[display("Comment.Multiline")]
   CommentMultiline,

   #[display("Literal")]
   Literal,
   #[display("Number")]
   Number,
   #[display("String")]
   String,
   #[display("String.Char")]
   StringChar,

   #[display("Name")]
   Name,
   #[display("Name.Builtin")]
   NameBuiltin,
   #[display("Name.Builtin.Pseudo")]
   NameBuiltinPseudo,
   #[display("Name.Class")]
   NameClass,
   #[display("Name.Function")]
   NameFunction,
   #[display("Name.Namespace")]
   NameNamespace,
   #[display("Name.Variable")]
   NameVariable,
}

impl Category {
   /// Returns the category this one specializes, [`None`] for [`Category::Text`].
   #[must_use]
   pub const fn parent(self) -> Option<Self> {
      use Category::*;

      Some(match self {
         Text => return None,

         Whitespace | Error | Keyword | Operator | Punctuation | Comment | Literal | Name => Text,

         CommentSingle | CommentMultiline => Comment,

         Number | String => Literal,
         StringChar => String,

         NameBuiltin | NameClass | NameFunction | NameNamespace | NameVariable => Name,
         NameBuiltinPseudo => NameBuiltin,
      })
   }

   /// Iterates over this category and then every ancestor of it.
   pub fn lineage(self) -> impl Iterator<Item = Self> {
      std::iter::successors(Some(self), |category| category.parent())
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn display_is_dotted() {
      assert_eq!(Category::NameBuiltinPseudo.to_string(), "Name.Builtin.Pseudo");
      assert_eq!(Category::CommentSingle.to_string(), "Comment.Single");
      assert_eq!(Category::Whitespace.to_string(), "Whitespace");
   }

   #[test]
   fn lineage_ends_at_text() {
      assert_eq!(Category::NameBuiltinPseudo.lineage().collect::<Vec<_>>(), [
         Category::NameBuiltinPseudo,
         Category::NameBuiltin,
         Category::Name,
         Category::Text,
      ]);

      assert_eq!(Category::Text.lineage().collect::<Vec<_>>(), [Category::Text]);
   }
}
