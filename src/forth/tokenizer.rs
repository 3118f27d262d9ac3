//! Tokenizer for stack-language lines
//!
//! Splits a command line into word tokens:
//! - `( ... )` comments are removed (an unclosed one runs to end of input)
//! - `\` starts a comment that runs to end of line
//! - `"..."` is a single token even when it contains whitespace, and keeps its
//!   surrounding quotes until the engine consumes it
//! - everything else is split on whitespace
//!
//! Tokens are never re-escaped or case-folded here.

use super::errors::ForthError;

/// Tokenize one command line (or a multi-line chunk)
pub fn tokenize(source: &str) -> Result<Vec<String>, ForthError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < chars.len() {
        let ch = chars[position];
        match ch {
            c if c.is_whitespace() => {
                position += 1;
            }
            // Parenthesized comment
            '(' if starts_word(&chars, position) => {
                position += 1;
                while position < chars.len() && chars[position] != ')' {
                    position += 1;
                }
                position += 1;
            }
            // Line comment
            '\\' if starts_word(&chars, position) => {
                while position < chars.len() && chars[position] != '\n' {
                    position += 1;
                }
            }
            // String literal
            '"' => {
                let start = position;
                position += 1;
                while position < chars.len() && chars[position] != '"' {
                    position += 1;
                }
                if position >= chars.len() {
                    return Err(ForthError::UnterminatedString { position: start });
                }
                position += 1;
                tokens.push(chars[start..position].iter().collect());
            }
            // Regular token
            _ => {
                let start = position;
                while position < chars.len() && !chars[position].is_whitespace() {
                    position += 1;
                }
                tokens.push(chars[start..position].iter().collect());
            }
        }
    }

    Ok(tokens)
}

/// A comment opener only counts when it stands alone, so `(` inside a word
/// like `(X` still starts a comment but `2(` stays one token
fn starts_word(chars: &[char], position: usize) -> bool {
    position == 0 || chars[position - 1].is_whitespace()
}

/// True if the token is a quoted string literal
pub fn is_string_literal(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

/// Contents of a string literal token, quotes removed
pub fn unquote(token: &str) -> &str {
    &token[1..token.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenize() {
        let tokens = tokenize("1 2 + .").unwrap();
        assert_eq!(tokens, vec!["1", "2", "+", "."]);
    }

    #[test]
    fn test_paren_comment() {
        let tokens = tokenize("1 2 ( n1 n2 -- sum ) + .").unwrap();
        assert_eq!(tokens, vec!["1", "2", "+", "."]);
    }

    #[test]
    fn test_line_comment() {
        let tokens = tokenize("1 2 \\ ignored\n+").unwrap();
        assert_eq!(tokens, vec!["1", "2", "+"]);
    }

    #[test]
    fn test_string_keeps_quotes_and_spaces() {
        let tokens = tokenize("\"hello world\" .").unwrap();
        assert_eq!(tokens, vec!["\"hello world\"", "."]);
        assert!(is_string_literal(&tokens[0]));
        assert_eq!(unquote(&tokens[0]), "hello world");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("1 \"oops").unwrap_err();
        assert_eq!(err, ForthError::UnterminatedString { position: 2 });
    }

    #[test]
    fn test_word_definition() {
        let tokens = tokenize(": double dup + ;").unwrap();
        assert_eq!(tokens, vec![":", "double", "dup", "+", ";"]);
    }
}
