//! Positional placeholder rewriting: `?` to `$1, $2, ...`
//!
//! Queries written with SQLite-style `?` markers are rewritten into
//! Postgres numbered parameters before execution. Markers inside quoted
//! text, quoted identifiers, dollar-quoted bodies and comments are left
//! as-is. Queries already using `$N` contain no `?` and pass through.

use std::borrow::Cow;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan<'a> {
    Code,
    Literal,
    EscapeLiteral,
    Identifier,
    LineComment,
    BlockComment,
    Dollar(&'a str),
}

/// Rewrite each unquoted `?` in `query`, left to right, into `$1, $2, ...`.
pub fn convert_placeholders(query: &str) -> Cow<'_, str> {
    if !query.contains('?') {
        return Cow::Borrowed(query);
    }

    let mut out = String::with_capacity(query.len() + 8);
    let mut index = 0usize;
    let mut state = Scan::Code;
    let mut chars = query.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);

        match state {
            Scan::Code => match c {
                '?' => {
                    index += 1;
                    // Writing to a String cannot fail.
                    let _ = write!(out, "${index}");
                    continue;
                }
                '\'' if opens_escape_string(&query[..pos]) => state = Scan::EscapeLiteral,
                '\'' => state = Scan::Literal,
                '"' => state = Scan::Identifier,
                '-' if next == Some('-') => state = Scan::LineComment,
                '/' if next == Some('*') => {
                    out.push_str("/*");
                    chars.next();
                    state = Scan::BlockComment;
                    continue;
                }
                '$' => {
                    if let Some(tag) = dollar_tag(&query[pos..]) {
                        out.push_str(tag);
                        skip(&mut chars, tag.len() - 1);
                        state = Scan::Dollar(tag);
                        continue;
                    }
                }
                _ => {}
            },
            Scan::Literal => {
                if c == '\'' {
                    state = Scan::Code;
                }
            }
            Scan::EscapeLiteral => match c {
                '\\' => {
                    out.push(c);
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                    continue;
                }
                '\'' if next == Some('\'') => {
                    out.push_str("''");
                    chars.next();
                    continue;
                }
                '\'' => state = Scan::Code,
                _ => {}
            },
            Scan::Identifier => {
                if c == '"' {
                    state = Scan::Code;
                }
            }
            Scan::LineComment => {
                if c == '\n' {
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if c == '*' && next == Some('/') {
                    out.push_str("*/");
                    chars.next();
                    state = Scan::Code;
                    continue;
                }
            }
            Scan::Dollar(tag) => {
                if query[pos..].starts_with(tag) {
                    out.push_str(tag);
                    skip(&mut chars, tag.len() - 1);
                    state = Scan::Code;
                    continue;
                }
            }
        }

        out.push(c);
    }

    Cow::Owned(out)
}

/// Whether a quote following `before` starts an `E'...'` escape string:
/// `before` ends in a standalone `E` or `e`, not the tail of an identifier.
fn opens_escape_string(before: &str) -> bool {
    let Some(prefix) = before.strip_suffix(['E', 'e']) else {
        return false;
    };
    !prefix.ends_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Opening tag of a dollar-quoted string (`$$` or `$name$`) at the start of `s`.
fn dollar_tag(s: &str) -> Option<&str> {
    let rest = s.strip_prefix('$')?;
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());

    rest[name_len..].starts_with('$').then(|| &s[..name_len + 2])
}

fn skip(chars: &mut impl Iterator<Item = (usize, char)>, n: usize) {
    for _ in 0..n {
        chars.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_markers_left_to_right() {
        assert_eq!(
            convert_placeholders("SELECT * FROM photos WHERE id = ? AND \"isPublic\" = ?"),
            "SELECT * FROM photos WHERE id = $1 AND \"isPublic\" = $2"
        );
    }

    #[test]
    fn single_marker() {
        assert_eq!(
            convert_placeholders("SELECT * FROM photos WHERE id = ?"),
            "SELECT * FROM photos WHERE id = $1"
        );
    }

    #[test]
    fn query_without_markers_is_borrowed() {
        let query = "SELECT * FROM users WHERE id = $1";
        assert!(matches!(convert_placeholders(query), Cow::Borrowed(q) if q == query));
    }

    #[test]
    fn markers_in_string_literals_are_kept() {
        assert_eq!(
            convert_placeholders("UPDATE photos SET title = 'why?' WHERE id = ?"),
            "UPDATE photos SET title = 'why?' WHERE id = $1"
        );
        assert_eq!(
            convert_placeholders("SELECT 'it''s ?' , ?"),
            "SELECT 'it''s ?' , $1"
        );
    }

    #[test]
    fn escape_strings_skip_backslash_escapes() {
        assert_eq!(
            convert_placeholders(r"SELECT E'it\'s ?', ?"),
            r"SELECT E'it\'s ?', $1"
        );
        assert_eq!(
            convert_placeholders(r"SELECT e'a\\', ?"),
            r"SELECT e'a\\', $1"
        );
        assert_eq!(
            convert_placeholders(r"SELECT E'x''y\'?', ?"),
            r"SELECT E'x''y\'?', $1"
        );
    }

    #[test]
    fn identifier_ending_in_e_is_not_an_escape_prefix() {
        assert!(opens_escape_string("SELECT E"));
        assert!(opens_escape_string("WHERE a = e"));
        assert!(opens_escape_string("E"));
        assert!(!opens_escape_string("SELECT name"));
        assert!(!opens_escape_string("SELECT "));
        // backslash only escapes inside E strings
        assert_eq!(
            convert_placeholders(r"SELECT 'a\', ?"),
            r"SELECT 'a\', $1"
        );
    }

    #[test]
    fn markers_in_quoted_identifiers_are_kept() {
        assert_eq!(
            convert_placeholders("SELECT \"odd?col\" FROM t WHERE a = ?"),
            "SELECT \"odd?col\" FROM t WHERE a = $1"
        );
    }

    #[test]
    fn markers_in_comments_are_kept() {
        assert_eq!(
            convert_placeholders("SELECT 1 -- really?\nWHERE a = ? /* b = ? */ AND c = ?"),
            "SELECT 1 -- really?\nWHERE a = $1 /* b = ? */ AND c = $2"
        );
    }

    #[test]
    fn markers_in_dollar_quotes_are_kept() {
        assert_eq!(
            convert_placeholders("SELECT $$what?$$, $tag$ ? $tag$, ?"),
            "SELECT $$what?$$, $tag$ ? $tag$, $1"
        );
    }

    #[test]
    fn numbered_params_are_not_dollar_tags() {
        assert_eq!(dollar_tag("$1"), None);
        assert_eq!(dollar_tag("$$"), Some("$$"));
        assert_eq!(dollar_tag("$fn_body$ x"), Some("$fn_body$"));
        assert_eq!(dollar_tag("$abc"), None);
    }

    #[test]
    fn many_markers_get_multi_digit_numbers() {
        let query = vec!["?"; 12].join(", ");
        let converted = convert_placeholders(&query);
        assert!(converted.starts_with("$1, $2,"));
        assert!(converted.ends_with("$11, $12"));
    }
}
