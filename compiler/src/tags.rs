//! Go struct tag handling: literal unquoting and `key:"value"` lookup.

use crate::error::WeaveError;

fn tag_error(literal: &str, msg: &str) -> WeaveError {
    WeaveError::TagFormat {
        tag: literal.to_string(),
        msg: msg.to_string(),
    }
}

fn hex_value(literal: &str, digits: &mut std::str::Chars, count: usize) -> Result<u32, WeaveError> {
    let mut value = 0;
    for _ in 0..count {
        let digit = digits
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| tag_error(literal, "invalid hex escape"))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Unquote a Go string literal: a raw `` `...` `` string or an interpreted `"..."` string.
pub fn unquote(literal: &str) -> Result<String, WeaveError> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        let inner = &literal[1..literal.len() - 1];
        if inner.contains('`') {
            return Err(tag_error(literal, "unexpected backquote"));
        }
        return Ok(inner.replace('\r', ""));
    }

    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return Err(tag_error(literal, "not a quoted string"));
    }

    let inner = &literal[1..literal.len() - 1];
    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(tag_error(literal, "unescaped quote")),
            '\n' => return Err(tag_error(literal, "newline in string")),
            '\\' => {
                let escape = chars
                    .next()
                    .ok_or_else(|| tag_error(literal, "trailing backslash"))?;
                match escape {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => out.push(hex_value(literal, &mut chars, 2)? as u8),
                    '0'..='7' => {
                        let mut value = escape as u32 - '0' as u32;
                        for _ in 0..2 {
                            let digit = chars
                                .next()
                                .and_then(|c| c.to_digit(8))
                                .ok_or_else(|| tag_error(literal, "invalid octal escape"))?;
                            value = value * 8 + digit;
                        }
                        if value > 0xff {
                            return Err(tag_error(literal, "octal escape out of range"));
                        }
                        out.push(value as u8);
                    }
                    'u' | 'U' => {
                        let count = if escape == 'u' { 4 } else { 8 };
                        let code = hex_value(literal, &mut chars, count)?;
                        let c = char::from_u32(code)
                            .ok_or_else(|| tag_error(literal, "invalid unicode escape"))?;
                        push_char(&mut out, c);
                    }
                    other => {
                        return Err(tag_error(literal, &format!("unknown escape \\{}", other)));
                    }
                }
            }
            c => push_char(&mut out, c),
        }
    }

    String::from_utf8(out).map_err(|_| tag_error(literal, "invalid UTF-8"))
}

/// Look up `key` in a conventional struct tag (`json:"name" weave:"k=v"`).
///
/// Returns `None` when the key is absent. A malformed tag ends the search at
/// the point where it stops following the convention.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;

    while !rest.is_empty() {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() && bytes[i] > b' ' && bytes[i] != b':' && bytes[i] != b'"' && bytes[i] != 0x7f {
            i += 1;
        }
        if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
            break;
        }
        let name = &rest[..i];
        rest = &rest[i + 1..];

        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let quoted = &rest[..i + 1];
        rest = &rest[i + 1..];

        if name == key {
            return unquote(quoted).ok();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_literals_are_verbatim() {
        assert_eq!(unquote(r#"`json:"a"`"#).unwrap(), r#"json:"a""#);
        assert_eq!(unquote("`a\r\nb`").unwrap(), "a\nb");
    }

    #[test]
    fn interpreted_literals_resolve_escapes() {
        assert_eq!(unquote(r#""json:\"a\"""#).unwrap(), r#"json:"a""#);
        assert_eq!(unquote(r#""\t\x41\101é\U0001F600""#).unwrap(), "\tAAé😀");
    }

    #[test]
    fn bad_literals_are_tag_format_errors() {
        for literal in [r#""\q""#, r#""\'""#, r#""abc"#, "plain", r#""\xZZ""#, r#""\777""#, r#""\xff""#] {
            let err = unquote(literal).unwrap_err();
            assert!(
                matches!(err, WeaveError::TagFormat { .. }),
                "expected a TagFormat error for {} but got {:?}",
                literal,
                err
            );
        }
    }

    #[test]
    fn lookup_finds_each_key() {
        let tag = r#"json:"tags,omitempty" weave:"indexSearchable=true,tokenization=word""#;
        assert_eq!(lookup(tag, "json").as_deref(), Some("tags,omitempty"));
        assert_eq!(
            lookup(tag, "weave").as_deref(),
            Some("indexSearchable=true,tokenization=word")
        );
        assert_eq!(lookup(tag, "yaml"), None);
    }

    #[test]
    fn lookup_handles_escaped_quotes_and_empty_values() {
        let tag = r#"a:"x\"y" b:"""#;
        assert_eq!(lookup(tag, "a").as_deref(), Some("x\"y"));
        assert_eq!(lookup(tag, "b").as_deref(), Some(""));
    }

    #[test]
    fn lookup_stops_at_malformed_pairs() {
        assert_eq!(lookup(r#"json: "a""#, "json"), None);
        assert_eq!(lookup(r#"broken weave:"type=text""#, "weave"), None);
        assert_eq!(lookup(r#"json:"a" weave:"unterminated"#, "weave"), None);
    }
}
