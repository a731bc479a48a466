// src/core/arglist.rs

//! Parsing of the raw argument list of an inclusion call.
//!
//! Only enough of the call syntax is understood to pull out string literals
//! and `name=value` keywords; any other expression is kept as opaque text.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    // `name = value`, but not `name == value`.
    static ref KEYWORD_RE: Regex =
        Regex::new(r"(?s)^([A-Za-z_][A-Za-z0-9_]*)\s*=(?:([^=].*)|)$").expect("valid keyword regex");
}

/// Represents errors found while splitting an argument list.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgListError {
    /// A quote was opened and never closed.
    #[error("Unterminated string literal starting at offset {offset}.")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        offset: usize,
    },
    /// A closing bracket without its opener, or an opener never closed.
    #[error("Unbalanced '{found}' at offset {offset}.")]
    UnbalancedBracket {
        /// The offending bracket.
        found: char,
        /// Its byte offset.
        offset: usize,
    },
    /// `name=` with nothing after the `=`.
    #[error("Keyword argument '{name}' has no value.")]
    MissingKeywordValue {
        /// The keyword.
        name: String,
    },
    /// Two commas in a row, or a leading comma.
    #[error("Empty argument at position {position}.")]
    EmptyArgument {
        /// Zero-based argument position.
        position: usize,
    },
    /// A positional argument after a keyword one.
    #[error("Positional argument at position {position} follows a keyword argument.")]
    PositionalAfterKeyword {
        /// Zero-based argument position.
        position: usize,
    },
}

/// A single argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A plain string literal, unescaped.
    Literal(String),
    /// Anything else, as written.
    Expression(String),
}

impl Argument {
    fn from_source(text: &str) -> Self {
        match parse_string_literal(text) {
            Some(s) => Self::Literal(s),
            None => Self::Expression(text.to_string()),
        }
    }

    /// The unescaped text, if this is a string literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Expression(_) => None,
        }
    }
}

/// The parsed arguments of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgList {
    /// Positional arguments, in order.
    pub positional: Vec<Argument>,
    /// `name=value` arguments, in order.
    pub keywords: Vec<(String, Argument)>,
}

impl ArgList {
    /// Positional arguments that are string literals, in order.
    pub fn string_literals(&self) -> impl Iterator<Item = &str> {
        self.positional.iter().filter_map(Argument::as_literal)
    }

    /// The value of keyword `name` if it was given as a string literal.
    pub fn keyword_literal(&self, name: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_literal())
    }
}

/// Parses the text between the parentheses of a call, e.g.
/// `'docs/a.md', 'docs/b', glob='*.md'`.
pub fn parse_arglist(raw: &str) -> Result<ArgList, ArgListError> {
    let mut arglist = ArgList::default();
    let segments = split_top_level(raw)?;
    let count = segments.len();

    for (position, segment) in segments.into_iter().enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            // `f()` and a single trailing comma `f(a,)` are fine.
            if count == 1 || (position + 1 == count && position > 0) {
                continue;
            }
            return Err(ArgListError::EmptyArgument { position });
        }

        if let Some(caps) = KEYWORD_RE.captures(segment) {
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let value = caps.get(2).map_or("", |m| m.as_str()).trim();
            if value.is_empty() {
                return Err(ArgListError::MissingKeywordValue { name });
            }
            arglist.keywords.push((name, Argument::from_source(value)));
        } else {
            if !arglist.keywords.is_empty() {
                return Err(ArgListError::PositionalAfterKeyword { position });
            }
            arglist.positional.push(Argument::from_source(segment));
        }
    }

    Ok(arglist)
}

/// Splits `raw` on commas that are outside of quotes and brackets.
fn split_top_level(raw: &str) -> Result<Vec<&str>, ArgListError> {
    let mut segments = Vec::new();
    let mut brackets: Vec<(char, usize)> = Vec::new();
    let mut quote: Option<(char, usize)> = None;
    let mut escaped = false;
    let mut start = 0;

    for (offset, c) in raw.char_indices() {
        if let Some((q, _)) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some((c, offset)),
            '(' | '[' | '{' => brackets.push((c, offset)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match brackets.pop() {
                    Some((open, _)) if open == expected => {}
                    _ => return Err(ArgListError::UnbalancedBracket { found: c, offset }),
                }
            }
            ',' if brackets.is_empty() => {
                segments.push(raw.get(start..offset).unwrap_or(""));
                start = offset + c.len_utf8();
            }
            _ => {}
        }
    }

    if let Some((_, offset)) = quote {
        return Err(ArgListError::UnterminatedString { offset });
    }
    if let Some((found, offset)) = brackets.pop() {
        return Err(ArgListError::UnbalancedBracket { found, offset });
    }

    segments.push(raw.get(start..).unwrap_or(""));
    Ok(segments)
}

/// Returns the unescaped value if `text` is exactly one string literal,
/// optionally prefixed by `r` or `u`.
fn parse_string_literal(text: &str) -> Option<String> {
    let (raw_mode, rest) = match text.chars().next()? {
        'r' | 'R' => (true, text.get(1..)?),
        'u' | 'U' => (false, text.get(1..)?),
        _ => (false, text),
    };

    let mut chars = rest.chars();
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;
    let mut value = String::new();

    while let Some(c) = chars.next() {
        if c == quote {
            // The literal must span the whole argument.
            return if chars.as_str().is_empty() {
                Some(value)
            } else {
                None
            };
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        let next = chars.next()?;
        if raw_mode {
            value.push('\\');
            value.push(next);
            continue;
        }
        match next {
            '\\' => value.push('\\'),
            '\'' => value.push('\''),
            '"' => value.push('"'),
            'n' => value.push('\n'),
            't' => value.push('\t'),
            other => {
                value.push('\\');
                value.push(other);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_literals_and_glob_keyword() {
        let args = parse_arglist(r#"'docs/a.md', "docs/b", glob='*.md'"#).unwrap();
        let paths: Vec<&str> = args.string_literals().collect();
        assert_eq!(paths, vec!["docs/a.md", "docs/b"]);
        assert_eq!(args.keyword_literal("glob"), Some("*.md"));
        assert_eq!(args.keyword_literal("sort_fn"), None);
    }

    #[test]
    fn test_non_literal_arguments_are_kept_opaque() {
        let args = parse_arglist("base_dir, 'x.md', sort_fn=sorted").unwrap();
        assert_eq!(args.positional.len(), 2);
        assert_eq!(
            args.positional[0],
            Argument::Expression("base_dir".to_string())
        );
        assert_eq!(args.string_literals().collect::<Vec<_>>(), vec!["x.md"]);
        assert_eq!(
            args.keywords[0],
            ("sort_fn".to_string(), Argument::Expression("sorted".to_string()))
        );
    }

    #[test]
    fn test_commas_inside_strings_and_brackets() {
        let args = parse_arglist("'a,b.md', ['c', 'd'], {'k': 'v, w'}").unwrap();
        assert_eq!(args.positional.len(), 3);
        assert_eq!(args.string_literals().collect::<Vec<_>>(), vec!["a,b.md"]);
    }

    #[test]
    fn test_escapes_and_prefixes() {
        let args = parse_arglist(r#"'it\'s.md', r'raw\d.md', u"uni.md""#).unwrap();
        assert_eq!(
            args.string_literals().collect::<Vec<_>>(),
            vec!["it's.md", r"raw\d.md", "uni.md"]
        );
    }

    #[test]
    fn test_concatenation_is_not_a_single_literal() {
        let args = parse_arglist("'a' + 'b'").unwrap();
        assert_eq!(args.string_literals().count(), 0);
    }

    #[test]
    fn test_empty_and_trailing_comma() {
        assert_eq!(parse_arglist("").unwrap(), ArgList::default());
        assert_eq!(parse_arglist("   ").unwrap(), ArgList::default());
        let args = parse_arglist("'a.md',").unwrap();
        assert_eq!(args.string_literals().collect::<Vec<_>>(), vec!["a.md"]);
    }

    #[test]
    fn test_keyword_without_value_is_rejected() {
        assert_eq!(
            parse_arglist("'a', bad="),
            Err(ArgListError::MissingKeywordValue {
                name: "bad".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_lists_are_rejected() {
        assert!(matches!(
            parse_arglist("'unterminated"),
            Err(ArgListError::UnterminatedString { offset: 0 })
        ));
        assert!(matches!(
            parse_arglist("['a'"),
            Err(ArgListError::UnbalancedBracket { found: '[', .. })
        ));
        assert!(matches!(
            parse_arglist("'a'])"),
            Err(ArgListError::UnbalancedBracket { found: ']', .. })
        ));
        assert!(matches!(
            parse_arglist("'a',,'b'"),
            Err(ArgListError::EmptyArgument { position: 1 })
        ));
        assert!(matches!(
            parse_arglist("glob='*', 'a'"),
            Err(ArgListError::PositionalAfterKeyword { position: 1 })
        ));
    }

    #[test]
    fn test_equality_comparison_is_not_a_keyword() {
        let args = parse_arglist("x == 'a'").unwrap();
        assert!(args.keywords.is_empty());
        assert_eq!(args.positional.len(), 1);
    }
}
