use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::error::WeaveError;

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(concat!(
        r"(//[^\n]*",
        r"|/\*(?s:.*?)\*/",
        r"|`[^`]*`",
        r#"|"(?:[^"\\\n]|\\.)*""#,
        r"|'(?:[^'\\\n]|\\.)*'",
        r"|(?:\d|\.\d)(?:[eEpP][+-]|[\w.])*",
        r"|[\p{L}_][\p{L}\p{N}_]*",
        r"|\.\.\.|<<=|>>=|&\^=|&&|\|\||<-|\+\+|--|==|!=|<=|>=|:=|<<|>>|&\^|[-+*/%&|^]=",
        r"|[-+*/%&|^<>=!~:.,;()\[\]{}]",
        r"|\s+)",
    )).unwrap();
}

pub const KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword,
    Number,
    Rune,
    String,
    RawString,
    Operator,
    /// Written `;` or inserted at a line break.
    Semicolon,
    Comment,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:     TokenKind,
    pub text:     String,
    pub line:     usize,
    pub column:   usize,
    /// Last line the token covers; differs from `line` only for block comments.
    pub end_line: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, line: usize, column: usize) -> Token {
        Token {
            kind,
            text: text.to_string(),
            line,
            column,
            end_line: line + text.matches('\n').count(),
        }
    }

    fn semicolon(line: usize, column: usize) -> Token {
        Token {
            kind: TokenKind::Semicolon,
            text: "\n".to_string(),
            line,
            column,
            end_line: line,
        }
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text && !matches!(self.kind, TokenKind::String | TokenKind::RawString | TokenKind::Comment)
    }

    /// Go inserts a semicolon after these tokens when a line ends.
    fn ends_statement(&self) -> bool {
        match self.kind {
            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Rune
            | TokenKind::String
            | TokenKind::RawString => true,
            TokenKind::Keyword => {
                matches!(self.text.as_str(), "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Operator => matches!(self.text.as_str(), "++" | "--" | ")" | "]" | "}"),
            _ => false,
        }
    }
}

fn classify(part: &str) -> Option<TokenKind> {
    let mut chars = part.chars();
    let first = chars.next()?;
    let kind = match first {
        '/' if part.starts_with("//") || part.starts_with("/*") => TokenKind::Comment,
        '`' => TokenKind::RawString,
        '"' => TokenKind::String,
        '\'' => TokenKind::Rune,
        ';' => TokenKind::Semicolon,
        '.' if chars.next().map_or(false, |c| c.is_ascii_digit()) => TokenKind::Number,
        c if c.is_ascii_digit() => TokenKind::Number,
        c if c.is_whitespace() => return None,
        c if c == '_' || c.is_alphabetic() => {
            if KEYWORDS.contains(&part) {
                TokenKind::Keyword
            } else {
                TokenKind::Ident
            }
        }
        _ => TokenKind::Operator,
    };
    Some(kind)
}

/// Split Go source text into tokens, comments included.
///
/// Semicolons are inserted at line breaks following Go's rules, so the parser
/// only ever sees explicit statement terminators. The last token is always `Eof`.
pub fn tokenize_source(text: &str) -> Result<Vec<Token>, WeaveError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut last_end = 0;
    // Whether the last non-comment token asks for a semicolon at the next line break.
    let mut pending_semicolon = false;

    for mat in TOKEN_REGEX.find_iter(text) {
        let start = mat.start();
        let end   = mat.end();
        let part  = mat.as_str();

        if start > last_end {
            let unexpected = &text[last_end..start];
            return Err(error(
                &format!("Syntax error: {}", quote(unexpected)),
                line,
                column,
            ));
        }

        let breaks_line = part.contains('\n');
        match classify(part) {
            Some(TokenKind::Comment) => {
                tokens.push(Token::new(TokenKind::Comment, part, line, column));
                // A general comment spanning lines acts like a newline.
                if breaks_line && pending_semicolon {
                    tokens.push(Token::semicolon(line, column));
                    pending_semicolon = false;
                }
            }
            Some(kind) => {
                let token = Token::new(kind, part, line, column);
                pending_semicolon = token.ends_statement();
                tokens.push(token);
            }
            None => {
                if breaks_line && pending_semicolon {
                    tokens.push(Token::semicolon(line, column));
                    pending_semicolon = false;
                }
            }
        }

        let newline_count = part.matches('\n').count();
        if newline_count > 0 {
            line += newline_count;
            if let Some(last_line_part) = part.split('\n').last() {
                column = last_line_part.chars().count() + 1;
            }
        } else {
            column += part.chars().count();
        }

        last_end = end;
    }

    if last_end != text.len() {
        let unexpected = &text[last_end..];
        return Err(error(
            &format!("Syntax error: {}", quote(unexpected)),
            line,
            column,
        ));
    }

    if pending_semicolon {
        tokens.push(Token::semicolon(line, column));
    }
    tokens.push(Token::new(TokenKind::Eof, "", line, column));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let got = tokenize_source("Title string").unwrap();
        let expected = vec![
            Token { kind: TokenKind::Ident,     text: "Title".into(),  line: 1, column: 1,  end_line: 1 },
            Token { kind: TokenKind::Ident,     text: "string".into(), line: 1, column: 7,  end_line: 1 },
            Token { kind: TokenKind::Semicolon, text: "\n".into(),     line: 1, column: 13, end_line: 1 },
            Token { kind: TokenKind::Eof,       text: "".into(),       line: 1, column: 13, end_line: 1 },
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_semicolon_insertion_follows_line_endings() {
        let got = tokenize_source("type A struct {\n\tX int\n}\n").unwrap();
        assert_eq!(
            texts(&got),
            vec!["type", "A", "struct", "{", "X", "int", "\n", "}", "\n", ""]
        );
        let kinds: Vec<TokenKind> = got.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::Keyword);
        assert_eq!(kinds[6], TokenKind::Semicolon);
    }

    #[test]
    fn test_tags_and_comments() {
        let input = "Tags []string `json:\"tags\"` // trailing\n/* block */";
        let got = tokenize_source(input).unwrap();
        assert_eq!(got[4].kind, TokenKind::RawString);
        assert_eq!(got[4].text, "`json:\"tags\"`");
        assert_eq!(got[5].kind, TokenKind::Comment);
        assert_eq!(got[5].text, "// trailing");
        assert_eq!(got[6].kind, TokenKind::Semicolon);
        assert_eq!(got[7].kind, TokenKind::Comment);
        assert_eq!(got[7].line, 2);
    }

    #[test]
    fn test_operators_and_numbers() {
        let got = tokenize_source("x := [...]int{1, 2.5e-3, 0x1F} <- ch").unwrap();
        assert_eq!(
            texts(&got),
            vec!["x", ":=", "[", "...", "]", "int", "{", "1", ",", "2.5e-3", ",", "0x1F", "}", "<-", "ch", "\n", ""]
        );
    }

    #[test]
    fn test_multiline_block_comment_spans_lines() {
        let got = tokenize_source("/* a\nb */\ntype").unwrap();
        assert_eq!(got[0].kind, TokenKind::Comment);
        assert_eq!(got[0].line, 1);
        assert_eq!(got[0].end_line, 2);
        assert_eq!(got[1].line, 3);
    }

    #[test]
    fn test_tokenize_unexpected_text() {
        let err = tokenize_source("type A struct { B string `unterminated }").unwrap_err();
        assert!(
            matches!(err, WeaveError::ParseError { .. }),
            "expected a ParseError but got {:?}",
            err
        );
    }
}
