//! Tokenizer for PL/0 assembly text.

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// An identifier (opcode or operation mnemonic). Always uppercase.
    Ident(String),
    /// A signed numeric literal (decimal or hex).
    Number(i64),
    /// A raw code written as `#<n>`, for sub-operations outside the set.
    Raw(u8),
}

impl Token {
    /// The token as it would be written back, for error messages.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Number(n) => n.to_string(),
            Token::Raw(code) => format!("#{code}"),
        }
    }
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines. `;` starts
/// a comment anywhere on the line; a `#` in the first column (after
/// indentation) comments out the whole line. Fields are separated by
/// whitespace or commas, so `LOD 1 -2` and `lod,1,-2` are the same line,
/// and a leading `N:` listing index is skipped.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };
    if line.trim_start().starts_with('#') {
        return Ok(Vec::new());
    }

    let invalid = |word: &str| AsmError::InvalidNumber {
        line: line_num,
        token: word.to_string(),
    };

    let mut words = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .peekable();
    if words.peek().is_some_and(|w| is_listing_index(w)) {
        words.next();
    }

    let mut tokens = Vec::new();
    for word in words {
        let token = if let Some(code) = word.strip_prefix('#') {
            Token::Raw(code.parse().map_err(|_| invalid(word))?)
        } else if looks_numeric(word) {
            Token::Number(parse_number(word).ok_or_else(|| invalid(word))?)
        } else {
            Token::Ident(word.to_uppercase())
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// `12:` as printed in front of each instruction by a listing.
fn is_listing_index(word: &str) -> bool {
    word.strip_suffix(':')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// A word is numeric if it starts with a digit, optionally after one sign.
fn looks_numeric(word: &str) -> bool {
    let unsigned = word.strip_prefix(['-', '+']).unwrap_or(word);
    unsigned.as_bytes().first().is_some_and(|b| b.is_ascii_digit())
}

fn parse_number(word: &str) -> Option<i64> {
    let (sign, rest) = match word.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", word.strip_prefix('+').unwrap_or(word)),
    };
    let (radix, digits) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };
    if !digits.as_bytes().first().is_some_and(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    #[test]
    fn empty_line() {
        assert_eq!(tokenize_line("", 1).unwrap(), vec![]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize_line("   \t  ", 1).unwrap(), vec![]);
    }

    #[test]
    fn comment_only() {
        assert_eq!(tokenize_line("; procedure p", 1).unwrap(), vec![]);
    }

    #[test]
    fn opcode_with_comment() {
        assert_eq!(
            tokenize_line("OPR ADD ; a + b", 1).unwrap(),
            vec![ident("OPR"), ident("ADD")]
        );
    }

    #[test]
    fn address_arguments() {
        assert_eq!(
            tokenize_line("  LOD 1 -2", 1).unwrap(),
            vec![ident("LOD"), Token::Number(1), Token::Number(-2)]
        );
    }

    #[test]
    fn lowercase_is_uppercased() {
        assert_eq!(
            tokenize_line("opr wrt", 1).unwrap(),
            vec![ident("OPR"), ident("WRT")]
        );
    }

    #[test]
    fn signed_and_hex_numbers() {
        assert_eq!(
            tokenize_line("LIT +7 0x2a -0X10", 1).unwrap(),
            vec![
                ident("LIT"),
                Token::Number(7),
                Token::Number(42),
                Token::Number(-16),
            ]
        );
    }

    #[test]
    fn raw_code() {
        assert_eq!(
            tokenize_line("OPR #99", 1).unwrap(),
            vec![ident("OPR"), Token::Raw(99)]
        );
    }

    #[test]
    fn raw_code_out_of_range() {
        assert_eq!(
            tokenize_line("OPR #256", 4).unwrap_err(),
            AsmError::InvalidNumber {
                line: 4,
                token: "#256".to_string()
            }
        );
    }

    #[test]
    fn invalid_numbers() {
        for word in ["12ab", "0xZZ", "-0x", "1-", "99999999999999999999999"] {
            let err = tokenize_line(&format!("LIT {word}"), 3).unwrap_err();
            assert_eq!(
                err,
                AsmError::InvalidNumber {
                    line: 3,
                    token: word.to_string()
                }
            );
        }
    }

    #[test]
    fn comma_separated_fields() {
        assert_eq!(
            tokenize_line("lod,1,-2", 1).unwrap(),
            vec![ident("LOD"), Token::Number(1), Token::Number(-2)]
        );
        assert_eq!(
            tokenize_line("OPR , wrt", 1).unwrap(),
            vec![ident("OPR"), ident("WRT")]
        );
    }

    #[test]
    fn hash_comment_lines() {
        assert_eq!(tokenize_line("# generated by pl0c", 1).unwrap(), vec![]);
        assert_eq!(tokenize_line("   #", 1).unwrap(), vec![]);
    }

    #[test]
    fn listing_index_is_skipped() {
        assert_eq!(
            tokenize_line("12:\tjpc,20", 1).unwrap(),
            vec![ident("JPC"), Token::Number(20)]
        );
        assert_eq!(
            tokenize_line(" 3: RET 0 0", 1).unwrap(),
            vec![ident("RET"), Token::Number(0), Token::Number(0)]
        );
    }

    #[test]
    fn index_without_colon_is_a_number() {
        assert_eq!(
            tokenize_line("3 RET", 1).unwrap(),
            vec![Token::Number(3), ident("RET")]
        );
    }

    #[test]
    fn lone_sign_is_an_identifier() {
        assert_eq!(tokenize_line("-", 1).unwrap(), vec![ident("-")]);
    }
}
