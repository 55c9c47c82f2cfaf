//! # Preprocessor
//!
//! Tracks `#define`, `#undef` and `#if`/`#elif`/`#else`/`#endif` while lexing
//! so only one branch of each conditional reaches the parser. Symbols not
//! defined in the file itself evaluate to false. Other directives (`#region`,
//! `#pragma`, `#nullable` ...) are ignored.

use std::collections::HashSet;

/// One open `#if` block.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Whether the enclosing section is being kept.
    parent_active: bool,
    /// Whether some branch of this block has already been kept.
    taken: bool,
    /// Whether the current branch is being kept.
    active: bool,
    else_seen: bool,
    /// Position of the opening `#if`.
    opened_at: (usize, usize),
}

/// Conditional compilation state of one file.
#[derive(Debug, Default)]
pub(super) struct Conditionals {
    defined: HashSet<String>,
    frames: Vec<Frame>,
}

impl Conditionals {
    /// True when the current line belongs to a kept section.
    pub(super) fn is_active(&self) -> bool {
        self.frames.last().map_or(true, |f| f.active)
    }

    /// Position of the innermost `#if` still open, if any.
    pub(super) fn unclosed(&self) -> Option<(usize, usize)> {
        self.frames.last().map(|f| f.opened_at)
    }

    /// Applies one directive. `directive` is the line text after `#`.
    pub(super) fn apply(&mut self, directive: &str, at: (usize, usize)) -> Result<(), String> {
        let directive = directive.trim_start();
        let keyword_len = directive
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(directive.len());
        let (keyword, rest) = directive.split_at(keyword_len);
        let rest = match rest.find("//") {
            Some(comment) => &rest[..comment],
            None => rest,
        }
        .trim();

        match keyword {
            "define" | "undef" => {
                let symbol = rest
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| format!("expected symbol after #{keyword}"))?;
                if self.is_active() {
                    if keyword == "define" {
                        self.defined.insert(symbol.to_string());
                    } else {
                        self.defined.remove(symbol);
                    }
                }
            }
            "if" => {
                let parent_active = self.is_active();
                let taken = parent_active && evaluate(rest, &self.defined)?;
                self.frames.push(Frame {
                    parent_active,
                    taken,
                    active: taken,
                    else_seen: false,
                    opened_at: at,
                });
            }
            "elif" => {
                let Some(frame) = self.frames.last_mut() else {
                    return Err("#elif without #if".into());
                };
                if frame.else_seen {
                    return Err("#elif after #else".into());
                }
                let active = frame.parent_active && !frame.taken && evaluate(rest, &self.defined)?;
                frame.active = active;
                frame.taken |= active;
            }
            "else" => {
                let Some(frame) = self.frames.last_mut() else {
                    return Err("#else without #if".into());
                };
                if frame.else_seen {
                    return Err("duplicate #else".into());
                }
                frame.active = frame.parent_active && !frame.taken;
                frame.taken = true;
                frame.else_seen = true;
            }
            "endif" => {
                if self.frames.pop().is_none() {
                    return Err("#endif without #if".into());
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CondToken<'a> {
    Symbol(&'a str),
    Not,
    And,
    Or,
    Eq,
    Ne,
    Open,
    Close,
}

fn cond_tokens(expr: &str) -> Result<Vec<CondToken<'_>>, String> {
    let mut tokens = Vec::new();
    let mut rest = expr.trim_start();
    while let Some(c) = rest.chars().next() {
        let (token, len) = match c {
            '(' => (CondToken::Open, 1),
            ')' => (CondToken::Close, 1),
            '!' if rest.starts_with("!=") => (CondToken::Ne, 2),
            '!' => (CondToken::Not, 1),
            '=' if rest.starts_with("==") => (CondToken::Eq, 2),
            '&' if rest.starts_with("&&") => (CondToken::And, 2),
            '|' if rest.starts_with("||") => (CondToken::Or, 2),
            c if c == '_' || c.is_alphanumeric() => {
                let len = rest
                    .find(|n: char| n != '_' && !n.is_alphanumeric())
                    .unwrap_or(rest.len());
                (CondToken::Symbol(&rest[..len]), len)
            }
            other => return Err(format!("unexpected '{other}' in preprocessor expression")),
        };
        tokens.push(token);
        rest = rest[len..].trim_start();
    }
    Ok(tokens)
}

/// Recursive descent over `||`, `&&`, `==`/`!=`, `!` and parentheses, lowest
/// precedence first.
struct Condition<'t, 'a> {
    tokens: &'t [CondToken<'a>],
    pos: usize,
    defined: &'t HashSet<String>,
}

impl<'a> Condition<'_, 'a> {
    fn eat(&mut self, token: CondToken<'a>) -> bool {
        if self.tokens.get(self.pos) == Some(&token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<bool, String> {
        let mut value = self.and()?;
        while self.eat(CondToken::Or) {
            let rhs = self.and()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn and(&mut self) -> Result<bool, String> {
        let mut value = self.equality()?;
        while self.eat(CondToken::And) {
            let rhs = self.equality()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn equality(&mut self) -> Result<bool, String> {
        let mut value = self.unary()?;
        loop {
            if self.eat(CondToken::Eq) {
                value = value == self.unary()?;
            } else if self.eat(CondToken::Ne) {
                value = value != self.unary()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> Result<bool, String> {
        if self.eat(CondToken::Not) {
            return Ok(!self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<bool, String> {
        match self.tokens.get(self.pos).copied() {
            Some(CondToken::Symbol(name)) => {
                self.pos += 1;
                Ok(match name {
                    "true" => true,
                    "false" => false,
                    symbol => self.defined.contains(symbol),
                })
            }
            Some(CondToken::Open) => {
                self.pos += 1;
                let value = self.or()?;
                if !self.eat(CondToken::Close) {
                    return Err("expected ')' in preprocessor expression".into());
                }
                Ok(value)
            }
            _ => Err("expected symbol in preprocessor expression".into()),
        }
    }
}

fn evaluate(expr: &str, defined: &HashSet<String>) -> Result<bool, String> {
    let tokens = cond_tokens(expr)?;
    let mut condition = Condition {
        tokens: &tokens,
        pos: 0,
        defined,
    };
    let value = condition.or()?;
    if condition.pos != tokens.len() {
        return Err(format!("unexpected tokens in preprocessor expression '{expr}'"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined(symbols: &[&str]) -> HashSet<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_evaluate_expressions() {
        let d = defined(&["DEBUG", "NET8_0"]);
        assert!(evaluate("DEBUG", &d).unwrap());
        assert!(!evaluate("RELEASE", &d).unwrap());
        assert!(evaluate("!RELEASE && (DEBUG || X)", &d).unwrap());
        assert!(evaluate("NET8_0 == true", &d).unwrap());
        assert!(evaluate("RELEASE != DEBUG", &d).unwrap());
        assert!(!evaluate("false || RELEASE", &d).unwrap());
        // `&&` binds tighter than `||`.
        assert!(evaluate("DEBUG || RELEASE && X", &d).unwrap());
    }

    #[test]
    fn test_evaluate_rejects_malformed() {
        let d = defined(&[]);
        assert!(evaluate("", &d).is_err());
        assert!(evaluate("(A", &d).is_err());
        assert!(evaluate("A B", &d).is_err());
        assert!(evaluate("A & B", &d).is_err());
    }

    #[test]
    fn test_branch_selection() {
        let mut c = Conditionals::default();
        c.apply("define FAST // comment", (1, 1)).unwrap();
        c.apply("if SLOW", (2, 1)).unwrap();
        assert!(!c.is_active());
        c.apply("elif FAST", (3, 1)).unwrap();
        assert!(c.is_active());
        c.apply("else", (4, 1)).unwrap();
        assert!(!c.is_active());
        c.apply("endif", (5, 1)).unwrap();
        assert!(c.is_active());
        assert_eq!(c.unclosed(), None);
    }

    #[test]
    fn test_nested_inactive_block_stays_inactive() {
        let mut c = Conditionals::default();
        c.apply("if A", (1, 1)).unwrap();
        c.apply("define B", (2, 1)).unwrap();
        c.apply("if true", (3, 1)).unwrap();
        assert!(!c.is_active());
        c.apply("else", (4, 1)).unwrap();
        assert!(!c.is_active());
        c.apply("endif", (5, 1)).unwrap();
        c.apply("endif", (6, 1)).unwrap();
        c.apply("if B", (7, 1)).unwrap();
        assert!(!c.is_active());
        assert_eq!(c.unclosed(), Some((7, 1)));
    }

    #[test]
    fn test_unbalanced_directives() {
        let mut c = Conditionals::default();
        assert_eq!(c.apply("endif", (1, 1)).unwrap_err(), "#endif without #if");
        assert_eq!(c.apply("else", (1, 1)).unwrap_err(), "#else without #if");
        c.apply("if A", (1, 1)).unwrap();
        c.apply("else", (2, 1)).unwrap();
        assert_eq!(c.apply("elif B", (3, 1)).unwrap_err(), "#elif after #else");
        assert!(c.apply("define", (4, 1)).is_err());
        c.apply("region Models", (5, 1)).unwrap();
    }
}
