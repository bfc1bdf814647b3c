use crate::error::WeaveError;

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn error(msg: &str, line: usize, column: usize) -> WeaveError {
    WeaveError::ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}

/// Go's export rule: an identifier is exported when it starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}

/// `ArticleID` -> `articleID`.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
