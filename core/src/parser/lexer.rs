//! # Lexer
//!
//! Splits C# source into identifier, punctuation and literal tokens.
//! Comments, whitespace and preprocessor lines are dropped, as is every
//! conditional section whose `#if` branch is not taken. Literals are kept
//! only as opaque spans since nothing downstream inspects their values.

use super::preprocessor::Conditionals;
use crate::error::{AppError, AppResult};
use std::ops::Range;

/// Token categories the parser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords (`@`-prefixed identifiers keep their `@`).
    Ident,
    /// Operators and delimiters. `=>` and `::` are single tokens, everything else is one char.
    Punct,
    /// String, char and numeric literals.
    Literal,
}

/// A lexed token borrowing its text from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Category.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'a str,
    /// Byte range in the source.
    pub span: Range<usize>,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
}

impl Token<'_> {
    /// True if this is the given punctuation.
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// True if this is the given identifier or keyword.
    pub fn is_ident(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }
}

struct Cursor<'a> {
    path: &'a str,
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> AppError {
        AppError::Parse {
            path: self.path.to_string(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Tokenizes `src`. `path` is only used for error messages.
pub fn tokenize<'a>(path: &str, src: &'a str) -> AppResult<Vec<Token<'a>>> {
    let mut cur = Cursor {
        path,
        src,
        pos: 0,
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    let mut at_line_start = true;
    let mut conditionals = Conditionals::default();

    while let Some(c) = cur.peek() {
        if c == '\n' {
            cur.bump();
            at_line_start = true;
            continue;
        }
        if c.is_whitespace() || c == '\u{feff}' {
            cur.bump();
            continue;
        }

        let (start, line, column) = (cur.pos, cur.line, cur.column);

        if c == '#' && at_line_start {
            skip_line(&mut cur);
            conditionals
                .apply(&src[start + 1..cur.pos], (line, column))
                .map_err(|message| cur.error(line, column, message))?;
            continue;
        }
        if !conditionals.is_active() {
            skip_line(&mut cur);
            continue;
        }
        at_line_start = false;

        if cur.starts_with("//") {
            skip_line(&mut cur);
            at_line_start = true;
            continue;
        }
        if cur.starts_with("/*") {
            cur.bump_n(2);
            loop {
                if cur.starts_with("*/") {
                    cur.bump_n(2);
                    break;
                }
                if cur.bump().is_none() {
                    return Err(cur.error(line, column, "unterminated block comment"));
                }
            }
            continue;
        }

        let kind = if is_string_start(&cur) {
            lex_string(&mut cur)?;
            TokenKind::Literal
        } else if c == '\'' {
            lex_char(&mut cur)?;
            TokenKind::Literal
        } else if c.is_ascii_digit() || (c == '.' && cur.peek_nth(1).is_some_and(|d| d.is_ascii_digit())) {
            lex_number(&mut cur);
            TokenKind::Literal
        } else if c == '_' || c == '@' || c.is_alphabetic() {
            cur.bump();
            while cur.peek().is_some_and(|n| n == '_' || n.is_alphanumeric()) {
                cur.bump();
            }
            TokenKind::Ident
        } else if cur.starts_with("=>") || cur.starts_with("::") {
            cur.bump_n(2);
            TokenKind::Punct
        } else {
            cur.bump();
            TokenKind::Punct
        };

        tokens.push(Token {
            kind,
            text: &src[start..cur.pos],
            span: start..cur.pos,
            line,
            column,
        });
    }

    if let Some((line, column)) = conditionals.unclosed() {
        return Err(cur.error(line, column, "unterminated #if"));
    }
    Ok(tokens)
}

fn skip_line(cur: &mut Cursor) {
    while cur.peek().is_some_and(|c| c != '\n') {
        cur.bump();
    }
}

/// Looks past `$` / `@` prefixes for an opening quote.
fn is_string_start(cur: &Cursor) -> bool {
    let mut n = 0;
    while let Some(c) = cur.peek_nth(n) {
        match c {
            '$' | '@' if n < 4 => n += 1,
            '"' => return true,
            _ => return false,
        }
    }
    false
}

fn lex_string(cur: &mut Cursor) -> AppResult<()> {
    let (line, column) = (cur.line, cur.column);
    let mut verbatim = false;
    let mut interpolated = false;
    while let Some(c) = cur.peek() {
        match c {
            '$' => interpolated = true,
            '@' => verbatim = true,
            _ => break,
        }
        cur.bump();
    }

    let quotes = cur.src[cur.pos..].chars().take_while(|&c| c == '"').count();
    if quotes >= 3 {
        // Raw string literal: closed by the same number of quotes.
        let fence = "\"".repeat(quotes);
        cur.bump_n(quotes);
        loop {
            if cur.starts_with(&fence) {
                cur.bump_n(quotes);
                return Ok(());
            }
            if cur.bump().is_none() {
                return Err(cur.error(line, column, "unterminated raw string literal"));
            }
        }
    }

    cur.bump();
    loop {
        let Some(c) = cur.bump() else {
            return Err(cur.error(line, column, "unterminated string literal"));
        };
        match c {
            '"' if verbatim && cur.peek() == Some('"') => {
                cur.bump();
            }
            '"' => return Ok(()),
            '\\' if !verbatim => {
                cur.bump();
            }
            '\n' if !verbatim => {
                return Err(cur.error(line, column, "newline in string literal"));
            }
            '{' if interpolated && cur.peek() == Some('{') => {
                cur.bump();
            }
            '{' if interpolated => lex_interpolation_hole(cur, line, column)?,
            _ => {}
        }
    }
}

/// Skips an interpolation hole up to its closing brace, lexing nested literals.
fn lex_interpolation_hole(cur: &mut Cursor, line: usize, column: usize) -> AppResult<()> {
    let mut depth = 1usize;
    while depth > 0 {
        if is_string_start(cur) {
            lex_string(cur)?;
            continue;
        }
        match cur.peek() {
            Some('\'') => lex_char(cur)?,
            Some('{') => {
                depth += 1;
                cur.bump();
            }
            Some('}') => {
                depth -= 1;
                cur.bump();
            }
            Some(_) => {
                cur.bump();
            }
            None => return Err(cur.error(line, column, "unterminated interpolation")),
        }
    }
    Ok(())
}

fn lex_char(cur: &mut Cursor) -> AppResult<()> {
    let (line, column) = (cur.line, cur.column);
    cur.bump();
    loop {
        match cur.bump() {
            Some('\\') => {
                cur.bump();
            }
            Some('\'') => return Ok(()),
            Some('\n') | None => {
                return Err(cur.error(line, column, "unterminated character literal"))
            }
            Some(_) => {}
        }
    }
}

fn lex_number(cur: &mut Cursor) {
    let start = cur.pos;
    while let Some(c) = cur.peek() {
        let so_far = &cur.src[start..cur.pos];
        let is_hex = so_far.starts_with("0x") || so_far.starts_with("0X");
        let continues = c.is_ascii_alphanumeric()
            || c == '_'
            || (c == '.' && cur.peek_nth(1).is_some_and(|d| d.is_ascii_digit()))
            || ((c == '+' || c == '-') && !is_hex && so_far.ends_with(['e', 'E']));
        if !continues {
            break;
        }
        cur.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        tokenize("test.cs", src)
            .unwrap()
            .into_iter()
            .map(|t| t.text.to_string())
            .collect()
    }

    #[test]
    fn test_skips_comments_and_directives() {
        let src = "#region Models\n// line\n/* block\n */ public int /* inline */ Age;\n#endregion";
        assert_eq!(texts(src), vec!["public", "int", "Age", ";"]);
    }

    #[test]
    fn test_keeps_only_taken_conditional_branch() {
        let src = "#if NETFRAMEWORK\n class A : B {\n#else\n class A {\n#endif\n}";
        assert_eq!(texts(src), vec!["class", "A", "{", "}"]);

        let src = "#define MODERN\n#if LEGACY\nint X;\n#elif MODERN && !LEGACY\nint Y;\n#else\nint Z;\n#endif";
        assert_eq!(texts(src), vec!["int", "Y", ";"]);
    }

    #[test]
    fn test_unbalanced_conditionals_are_errors() {
        let err = tokenize("a.cs", "int X;\n  #endif").unwrap_err();
        assert_eq!(err.to_string(), "Parse Error: a.cs:2:3: #endif without #if");

        let err = tokenize("a.cs", "#if DEBUG\nint X;").unwrap_err();
        assert_eq!(err.to_string(), "Parse Error: a.cs:1:1: unterminated #if");
    }

    #[test]
    fn test_lambda_and_alias_are_single_tokens() {
        assert_eq!(
            texts("global::System.String X => y;"),
            vec!["global", "::", "System", ".", "String", "X", "=>", "y", ";"]
        );
    }

    #[test]
    fn test_string_literals() {
        let toks = tokenize(
            "t.cs",
            r#"a = "x\"y"; b = @"c:\dir""q"; c = $"{name} {{ {f("}")}"; d = """raw "" text""";"#,
        )
        .unwrap();
        let literals: Vec<_> = toks
            .iter()
            .filter(|t| t.kind == TokenKind::Literal)
            .map(|t| t.text)
            .collect();
        assert_eq!(
            literals,
            vec![
                r#""x\"y""#,
                r#"@"c:\dir""q""#,
                r#"$"{name} {{ {f("}")}""#,
                r#""""raw "" text""""#,
            ]
        );
    }

    #[test]
    fn test_numbers_and_chars() {
        assert_eq!(
            texts("x = 1.5e-3f + 0xFF + '\\'' + .5m;"),
            vec!["x", "=", "1.5e-3f", "+", "0xFF", "+", "'\\''", "+", ".5m", ";"]
        );
    }

    #[test]
    fn test_verbatim_identifier() {
        assert_eq!(texts("int @class;"), vec!["int", "@class", ";"]);
    }

    #[test]
    fn test_positions() {
        let toks = tokenize("t.cs", "class A\n{\n  int B;\n}").unwrap();
        let b = toks.iter().find(|t| t.text == "B").unwrap();
        assert_eq!((b.line, b.column), (3, 7));
        assert_eq!(b.span, 16..17);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("bad.cs", "class A { string s = \"oops;\n }").unwrap_err();
        match err {
            AppError::Parse { path, line, .. } => {
                assert_eq!(path, "bad.cs");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        assert!(tokenize("bad.cs", "class A { /* never closed").is_err());
    }
}
