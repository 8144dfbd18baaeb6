//! Window-match expressions.
//!
//! A match is a sequence of terms joined by `&` or `|`, each optionally
//! negated with `!` and optionally a parenthesized group:
//!
//! ```text
//! class=Firefox & !(type=Dock | type=Desktop)
//! ```
//!
//! Terms are opaque strings; evaluating them against windows is the host's
//! business. Parsing is lenient (a missing `)` closes the group at the end of
//! input) and formatting is canonical, so `parse(format(m)) == m` for any
//! match whose terms are non-empty and carry no surrounding whitespace.
//!
//! Groups nest at most [`MAX_DEPTH`] levels deep. A `(` below that depth is
//! read as term text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

const SPECIAL: [char; 6] = ['&', '|', '(', ')', '!', '\\'];

/// Deepest group nesting the parser produces.
pub const MAX_DEPTH: usize = 32;

/// How an operation combines with the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTerm {
    Expr(String),
    Group(MatchExpr),
}

impl MatchTerm {
    pub fn expr(s: impl Into<String>) -> Self {
        Self::Expr(s.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOp {
    pub conjunction: Conjunction,
    pub negated: bool,
    pub term: MatchTerm,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchExpr {
    ops: Vec<MatchOp>,
}

impl MatchExpr {
    /// An empty match (matches nothing).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a match string. Never fails; unparsable fragments are dropped.
    pub fn parse(s: &str) -> Self {
        let mut chars = s.chars().peekable();
        Self {
            ops: parse_ops(&mut chars, 0),
        }
    }

    pub fn ops(&self) -> &[MatchOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Appends an operation. The first operation is always an `And`.
    pub fn push(&mut self, mut op: MatchOp) {
        if self.ops.is_empty() {
            op.conjunction = Conjunction::And;
        }
        self.ops.push(op);
    }

    /// Builder form of [`push`](Self::push) with `&`.
    #[must_use]
    pub fn and(mut self, term: MatchTerm) -> Self {
        self.push(MatchOp {
            conjunction: Conjunction::And,
            negated: false,
            term,
        });
        self
    }

    /// Builder form of [`push`](Self::push) with `|`.
    #[must_use]
    pub fn or(mut self, term: MatchTerm) -> Self {
        self.push(MatchOp {
            conjunction: Conjunction::Or,
            negated: false,
            term,
        });
        self
    }

    /// Builder form of [`push`](Self::push) with `& !`.
    #[must_use]
    pub fn and_not(mut self, term: MatchTerm) -> Self {
        self.push(MatchOp {
            conjunction: Conjunction::And,
            negated: true,
            term,
        });
        self
    }
}

fn skip_ws(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn parse_ops(chars: &mut Peekable<Chars<'_>>, depth: usize) -> Vec<MatchOp> {
    let mut ops = Vec::new();
    let mut conjunction = Conjunction::And;

    loop {
        skip_ws(chars);

        let mut negated = false;
        while chars.next_if_eq(&'!').is_some() {
            negated = !negated;
            skip_ws(chars);
        }

        let term = if depth < MAX_DEPTH && chars.next_if_eq(&'(').is_some() {
            Some(MatchTerm::Group(MatchExpr {
                ops: parse_ops(chars, depth + 1),
            }))
        } else {
            let text = read_term(chars, depth);
            (!text.is_empty()).then_some(MatchTerm::Expr(text))
        };

        if let Some(term) = term {
            ops.push(MatchOp {
                conjunction: if ops.is_empty() {
                    Conjunction::And
                } else {
                    conjunction
                },
                negated,
                term,
            });
        }

        // Anything between a term and the next separator is dropped.
        loop {
            match chars.next() {
                None => return ops,
                Some('&') => {
                    conjunction = Conjunction::And;
                    break;
                }
                Some('|') => {
                    conjunction = Conjunction::Or;
                    break;
                }
                Some(')') if depth > 0 => return ops,
                Some(_) => {}
            }
        }
    }
}

fn read_term(chars: &mut Peekable<Chars<'_>>, depth: usize) -> String {
    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            '&' | '|' => break,
            ')' if depth > 0 => break,
            '\\' => {
                chars.next();
                text.push(chars.next().unwrap_or('\\'));
            }
            _ => {
                chars.next();
                text.push(c);
            }
        }
    }
    text.trim_end().to_string()
}

fn write_escaped(f: &mut fmt::Formatter<'_>, term: &str) -> fmt::Result {
    for c in term.chars() {
        if SPECIAL.contains(&c) {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl fmt::Display for MatchExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Open groups with the index of their next operation.
        let mut stack: Vec<(&[MatchOp], usize)> = vec![(self.ops.as_slice(), 0)];

        while let Some(top) = stack.last_mut() {
            let (ops, index) = *top;
            let Some(op) = ops.get(index) else {
                stack.pop();
                if !stack.is_empty() {
                    f.write_str(")")?;
                }
                continue;
            };
            top.1 += 1;

            if index > 0 {
                f.write_str(match op.conjunction {
                    Conjunction::And => " & ",
                    Conjunction::Or => " | ",
                })?;
            }
            if op.negated {
                f.write_str("!")?;
            }
            match &op.term {
                MatchTerm::Expr(text) => write_escaped(f, text)?,
                MatchTerm::Group(group) => {
                    f.write_str("(")?;
                    stack.push((group.ops.as_slice(), 0));
                }
            }
        }
        Ok(())
    }
}
