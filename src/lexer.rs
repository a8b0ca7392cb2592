//! Quote- and escape-aware splitting of a raw command line.
//!
//! Words come out as [`Token`]s: the final text plus a flag telling whether
//! quoting or escaping was involved. Redirection operators are recognized
//! downstream, and only in words that were typed bare, so a quoted `">"`
//! never acts as an operator.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// True when any part of the word was quoted or backslash-escaped.
    pub quoted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Splits a line into words.
///
/// Outside quotes, space and tab separate words and a backslash escapes the
/// next character (a trailing backslash is dropped). Single quotes preserve
/// every byte. Inside double quotes a backslash escapes only `"`, `\`, `$`
/// and newline; before any other character it is kept as-is.
///
/// An unterminated quote is not an error: the accumulated text becomes the
/// final word.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut quoted = false;
    let mut state = Quote::None;
    let mut chars = line.chars().peekable();

    let emit = |buf: &mut String, quoted: &mut bool, tokens: &mut Vec<Token>| {
        if !buf.is_empty() {
            tokens.push(Token {
                text: std::mem::take(buf),
                quoted: *quoted,
            });
        }
        *quoted = false;
    };

    while let Some(c) = chars.next() {
        match state {
            Quote::None => match c {
                ' ' | '\t' => emit(&mut buf, &mut quoted, &mut tokens),
                '\\' => {
                    if let Some(next) = chars.next() {
                        buf.push(next);
                        quoted = true;
                    }
                }
                '\'' => {
                    state = Quote::Single;
                    quoted = true;
                }
                '"' => {
                    state = Quote::Double;
                    quoted = true;
                }
                _ => buf.push(c),
            },
            Quote::Single => match c {
                '\'' => state = Quote::None,
                _ => buf.push(c),
            },
            Quote::Double => match c {
                '"' => state = Quote::None,
                '\\' => match chars.peek() {
                    Some(&next @ ('"' | '\\' | '$' | '\n')) => {
                        chars.next();
                        buf.push(next);
                    }
                    _ => buf.push('\\'),
                },
                _ => buf.push(c),
            },
        }
    }
    emit(&mut buf, &mut quoted, &mut tokens);
    tokens
}

/// Splits a line into pipeline stages on `|` characters that sit outside
/// quotes. Quotes and escapes are preserved in the returned stages so each
/// one can be tokenized independently. A line without an unquoted `|` comes
/// back as a single stage.
pub fn split_stages(line: &str) -> Vec<String> {
    let mut stages = Vec::new();
    let mut buf = String::new();
    let mut state = Quote::None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match state {
            Quote::None => match c {
                '|' => stages.push(std::mem::take(&mut buf)),
                '\\' => {
                    buf.push(c);
                    if let Some(next) = chars.next() {
                        buf.push(next);
                    }
                }
                '\'' => {
                    state = Quote::Single;
                    buf.push(c);
                }
                '"' => {
                    state = Quote::Double;
                    buf.push(c);
                }
                _ => buf.push(c),
            },
            Quote::Single => {
                if c == '\'' {
                    state = Quote::None;
                }
                buf.push(c);
            }
            Quote::Double => match c {
                '"' => {
                    state = Quote::None;
                    buf.push(c);
                }
                '\\' => {
                    buf.push(c);
                    if let Some(next) = chars.next() {
                        buf.push(next);
                    }
                }
                _ => buf.push(c),
            },
        }
    }
    stages.push(buf);
    stages
}
