//! Textual invocation syntax: `Name`, `Name()`, `Name(arg, "quoted, arg", ...)`.
//!
//! Several invocations may share one line separated by `;`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A parsed `Name(args...)` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("empty invocation")]
    Empty,

    #[error("invalid action name '{0}'")]
    InvalidName(String),

    #[error("missing ')' in '{0}'")]
    UnterminatedArguments(String),

    #[error("unterminated quoted argument in '{0}'")]
    UnterminatedQuote(String),

    #[error("unexpected input after ')': '{0}'")]
    TrailingInput(String),
}

impl Invocation {
    pub fn new(name: impl Into<String>, args: &[&str]) -> Self {
        Self {
            name: name.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Parses every `;`-separated invocation on a line.
    pub fn parse_line(line: &str) -> Result<Vec<Invocation>, InvocationError> {
        split_top_level(line, ';')?
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<Invocation>)
            .collect()
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

impl FromStr for Invocation {
    type Err = InvocationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InvocationError::Empty);
        }

        let (name, rest) = match text.find('(') {
            Some(open) => (text[..open].trim(), Some(&text[open + 1..])),
            None => (text, None),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(InvocationError::InvalidName(name.to_string()));
        }

        let args = match rest {
            None => Vec::new(),
            Some(rest) => {
                let close = find_closing(rest)
                    .ok_or_else(|| InvocationError::UnterminatedArguments(text.to_string()))?;
                let trailing = rest[close + 1..].trim();
                if !trailing.is_empty() {
                    return Err(InvocationError::TrailingInput(trailing.to_string()));
                }
                split_arguments(&rest[..close])?
            }
        };

        Ok(Invocation {
            name: name.to_string(),
            args,
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if arg.contains([',', '(', ')', '"', ';']) || arg.trim() != arg {
                write!(f, "\"{}\"", arg.replace('\\', "\\\\").replace('"', "\\\""))?;
            } else {
                f.write_str(arg)?;
            }
        }
        f.write_str(")")
    }
}

/// Index of the `)` closing the argument list, skipping quoted text.
fn find_closing(text: &str) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            ')' if !in_quote => return Some(idx),
            _ => {}
        }
    }
    None
}

fn split_top_level(text: &str, separator: char) -> Result<Vec<&str>, InvocationError> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            c if c == separator && !in_quote => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    if in_quote {
        return Err(InvocationError::UnterminatedQuote(text.to_string()));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

fn split_arguments(text: &str) -> Result<Vec<String>, InvocationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, ',')?
        .into_iter()
        .map(|raw| unquote(raw.trim()))
        .collect()
}

fn unquote(arg: &str) -> Result<String, InvocationError> {
    let Some(inner) = arg.strip_prefix('"') else {
        return Ok(arg.to_string());
    };
    let Some(inner) = inner.strip_suffix('"') else {
        return Err(InvocationError::UnterminatedQuote(arg.to_string()));
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}
