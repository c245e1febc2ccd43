//! The Helix language rule table.

use std::sync::LazyLock;

use crate::{
   Category::*,
   Lexer,
   rule::{
      ROOT,
      Table,
      groups,
      include,
      literal,
      pattern,
   },
};

pub static TABLE: Table = &[
   (ROOT, &[
      pattern(r"\bfor\b", Keyword),
      include("comments"),
      include("block-comments"),
      include("keywords"),
      include("constants"),
      include("functions"),
      include("types"),
      include("in-line-replace"),
      include("namespaces"),
      include("punctuation"),
      include("strings"),
      include("variables"),
      include("class-reference"),
      pattern(r"\s+", Whitespace),
   ]),
   ("comments", &[pattern(r"~~.*$", CommentSingle)]),
   ("block-comments", &[
      literal("~*~", CommentMultiline).push("block-comment"),
      literal("~*", CommentMultiline).push("block-comment"),
   ]),
   ("block-comment", &[
      pattern(r"[^~*]+", CommentMultiline),
      literal("~*", CommentMultiline).push("block-comment"),
      literal("*~", CommentMultiline).pop(),
      pattern(r"[~*]", CommentMultiline),
   ]),
   ("constants", &[
      pattern(
         concat!(
            r"\b\d[\d_]*(\.?)[\d_]*(?:(E|e)([+-]?)([\d_]+))?",
            "(f32|f64|i128|i16|i32|i64|i8|isize|u128|u16|u32|u64|u8|usize)?",
            r"\b",
         ),
         Number,
      ),
      pattern(
         r"\b0x[\da-fA-F_]+(i128|i16|i32|i64|i8|isize|u128|u16|u32|u64|u8|usize)?\b",
         Number,
      ),
      pattern(
         r"\b0o[0-7_]+(i128|i16|i32|i64|i8|isize|u128|u16|u32|u64|u8|usize)?\b",
         Number,
      ),
      pattern(
         r"\b0b[01_]+(i128|i16|i32|i64|i8|isize|u128|u16|u32|u64|u8|usize)?\b",
         Number,
      ),
      pattern(r"\b(true|false)\b", Literal),
   ]),
   ("types", &[
      pattern(r"\b(int|float|double|char|string|bool|byte|short|long)\b", NameBuiltin),
      pattern(r"\b(array|list|tuple|map|set)\b", NameClass),
      pattern(r"\b(void|opt)\b", NameClass),
      groups(
         r"\b(class|struct|enum|union)\s+([A-Z][A-Za-z0-9_]*)(<)([A-Z][A-Za-z0-9_]*)(>)",
         &[Keyword, NameClass, Punctuation, NameClass, Punctuation],
      ),
      pattern(r"\b([A-Z][A-Za-z0-9_]*)\b", NameClass),
   ]),
   ("keywords", &[
      pattern(
         r"\b(if|else|else\s+if|while|break|continue|return|switch|case|default|stop)\b",
         Keyword,
      ),
      pattern(r"\b(fn|return|yield|async|for|await|lambda|delegate)\b", Keyword),
      pattern(r"\b(class|struct|new|interface|private|protected|final)\b", Keyword),
      pattern(r"\b(impl|abstract)\b", Keyword),
      pattern(r"\b(try|catch|finally|throw)\b", Keyword),
      pattern(r"\b(let|const|var|final)\b", Keyword),
      pattern(r"\b(public|private|protected)\b", Keyword),
      pattern(r"\b(include|import|using|from)\b", Keyword),
      pattern(r"\b(async|await|thread|yield|yield\s+from)\b", Keyword),
      pattern(r"\b(in|override|static|ref|type)\b", Keyword),
      // Longest first, so that `+=` is not split into `+` and `=`.
      pattern(
         r"(===|!==|<<|>>|\+\+|--|\+=|-=|\*=|/=|%=|==|!=|>=|<=|&&|\|\||::|=>|->|\+|-|\*|/|%|>|<|!|&|\||\^|~|\.|\?|,|@|#)",
         Operator,
      ),
   ]),
   ("functions", &[
      pattern(r"\bfn\b", Keyword),
      groups(r"([A-Za-z_][A-Za-z0-9_]*)\s*(\()", &[NameFunction, Punctuation]),
      pattern(r"\b(self|super)\b", NameBuiltinPseudo),
   ]),
   ("in-line-replace", &[
      pattern(r"\b[a-z_][A-Za-z0-9_]*!", NameFunction),
      pattern(r"\b[A-Z][A-Za-z0-9_]*!", NameClass),
   ]),
   ("namespaces", &[groups(r"\b([A-Za-z0-9_]+)(::)", &[
      NameNamespace,
      Punctuation,
   ])]),
   ("punctuation", &[
      pattern(r"[()\[\]{}]", Punctuation),
      literal(",", Punctuation),
      literal("...", Punctuation),
   ]),
   ("strings", &[
      pattern(r#""[^"\\]*(?:\\.[^"\\]*)*""#, String),
      pattern(r"'[^'\\]*(?:\\.[^'\\]*)*'", StringChar),
   ]),
   ("variables", &[pattern(r"\b[A-Za-z0-9_]+", NameVariable)]),
   ("class-reference", &[
      pattern(r"\bself\b", NameBuiltinPseudo),
      pattern(r"\bsuper\b", NameBuiltinPseudo),
   ]),
];

static LEXER: LazyLock<Lexer> =
   LazyLock::new(|| Lexer::new(TABLE).expect("helix rule table must compile"));

/// Returns the lexer for the Helix language, compiling it on first use.
#[must_use]
pub fn lexer() -> &'static Lexer {
   &LEXER
}
