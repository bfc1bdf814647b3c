use crate::{
    tokenizer::{Token, TokenKind},
    types::{FieldDeclaration, SourceFile, TypeDeclaration, TypeExpr},
    utils::{error, is_exported, quote},
    error::WeaveError,
};

/// Adjacent comments with no blank line between them.
#[derive(Debug, Clone, PartialEq)]
struct CommentGroup {
    lines:    Vec<String>,
    end_line: usize,
    /// The group starts on a line that already carries code.
    trailing: bool,
}

/// Splits comments out of the token stream and remembers, for each remaining
/// token, the comment group that documents it.
fn attach_comments(tokens: Vec<Token>) -> (Vec<Token>, Vec<Option<Vec<String>>>) {
    let mut code = Vec::with_capacity(tokens.len());
    let mut docs = Vec::with_capacity(tokens.len());
    let mut group: Option<CommentGroup> = None;
    let mut last_code_line = 0;

    for token in tokens {
        match token.kind {
            TokenKind::Comment => {
                // A trailing group only takes comments on its own line.
                let continues = group.as_ref().map_or(false, |g| {
                    if g.trailing {
                        token.line == g.end_line
                    } else {
                        token.line <= g.end_line + 1
                    }
                });
                if continues {
                    if let Some(g) = group.as_mut() {
                        g.lines.push(token.text);
                        g.end_line = token.end_line;
                    }
                } else {
                    group = Some(CommentGroup {
                        trailing: token.line == last_code_line,
                        end_line: token.end_line,
                        lines:    vec![token.text],
                    });
                }
            }
            // Inserted and written semicolons neither end nor claim a pending group.
            TokenKind::Semicolon => {
                code.push(token);
                docs.push(None);
            }
            _ => {
                let doc = group
                    .take()
                    .filter(|g| !g.trailing && g.end_line + 1 == token.line)
                    .map(|g| g.lines);
                last_code_line = token.line;
                code.push(token);
                docs.push(doc);
            }
        }
    }

    (code, docs)
}

struct Parser {
    tokens:  Vec<Token>,
    docs:    Vec<Option<Vec<String>>>,
    index:   usize,
    package: String,
}

impl Parser {
    fn current(&self) -> &Token {
        // The tokenizer always ends the stream with `Eof`, which is never consumed.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &Token {
        &self.tokens[(self.index + offset).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn doc(&self) -> Vec<String> {
        self.docs
            .get(self.index)
            .cloned()
            .flatten()
            .unwrap_or_default()
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.current().is(text) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn eat_semicolons(&mut self) {
        while self.current().kind == TokenKind::Semicolon {
            self.index += 1;
        }
    }

    fn expect(&mut self, text: &str, expected: &str) -> Result<(), WeaveError> {
        if !self.eat(text) {
            return Err(self.unexpected(expected));
        }
        Ok(())
    }

    fn expect_ident(&mut self) -> Result<Token, WeaveError> {
        if self.current().kind != TokenKind::Ident {
            return Err(self.unexpected("identifier"));
        }
        Ok(self.advance())
    }

    /// A declaration ends at `;`, or right before a closing `)` or `}` of the enclosing list.
    fn expect_end_of_declaration(&mut self) -> Result<(), WeaveError> {
        let tok = self.current();
        if tok.kind == TokenKind::Semicolon {
            self.index += 1;
            Ok(())
        } else if tok.kind == TokenKind::Eof || tok.is(")") || tok.is("}") {
            Ok(())
        } else {
            Err(self.unexpected("\";\""))
        }
    }

    fn unexpected(&self, expected: &str) -> WeaveError {
        let tok = self.current();
        let found = if tok.kind == TokenKind::Eof {
            "end of file".to_string()
        } else if tok.kind == TokenKind::Semicolon {
            quote(";")
        } else {
            quote(&tok.text)
        };
        error(
            &format!("Expected {} but found {}", expected, found),
            tok.line,
            tok.column,
        )
    }

    /// Skip a bracketed run starting at the current `open` token, nesting included.
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<(), WeaveError> {
        self.expect(open, &quote(open))?;
        let mut depth = 1;
        while depth > 0 {
            let tok = self.advance();
            if tok.kind == TokenKind::Eof {
                return Err(error(
                    &format!("Expected {} but found end of file", quote(close)),
                    tok.line,
                    tok.column,
                ));
            }
            if tok.is(open) {
                depth += 1;
            } else if tok.is(close) {
                depth -= 1;
            }
        }
        Ok(())
    }

    /// Skip a declaration the compiler has no use for (`import`, `const`, `var`, `func`).
    fn skip_declaration(&mut self) -> Result<(), WeaveError> {
        let mut depth: usize = 0;
        loop {
            let tok = self.current().clone();
            match tok.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Semicolon if depth == 0 => {
                    self.index += 1;
                    return Ok(());
                }
                _ => {}
            }
            if tok.is("(") || tok.is("[") || tok.is("{") {
                depth += 1;
            } else if tok.is(")") || tok.is("]") || tok.is("}") {
                if depth == 0 {
                    return Err(error(
                        &format!("Unexpected token {}", quote(&tok.text)),
                        tok.line,
                        tok.column,
                    ));
                }
                depth -= 1;
            }
            self.index += 1;
        }
    }

    fn parse_file(&mut self) -> Result<SourceFile, WeaveError> {
        self.eat_semicolons();
        self.expect("package", "\"package\"")?;
        let pkg_tok = self.expect_ident()?;
        self.package = pkg_tok.text;
        self.expect_end_of_declaration()?;

        let mut declarations = Vec::new();
        loop {
            self.eat_semicolons();
            if self.at_eof() {
                break;
            }
            let tok = self.current();
            if tok.is("type") {
                self.parse_type_declaration(&mut declarations)?;
            } else if tok.is("import") || tok.is("const") || tok.is("var") || tok.is("func") {
                self.skip_declaration()?;
            } else {
                return Err(error(
                    &format!("Unexpected token {}", quote(&tok.text)),
                    tok.line,
                    tok.column,
                ));
            }
        }

        Ok(SourceFile {
            package: self.package.clone(),
            declarations,
        })
    }

    fn parse_type_declaration(&mut self, out: &mut Vec<TypeDeclaration>) -> Result<(), WeaveError> {
        let group_doc = self.doc();
        self.expect("type", "\"type\"")?;

        if self.eat("(") {
            loop {
                self.eat_semicolons();
                if self.eat(")") {
                    break;
                }
                if self.at_eof() {
                    return Err(self.unexpected("\")\""));
                }
                let spec_doc = self.doc();
                let decl = self.parse_type_spec(group_doc.clone(), spec_doc)?;
                out.push(decl);
                self.expect_end_of_declaration()?;
            }
        } else {
            let decl = self.parse_type_spec(group_doc, Vec::new())?;
            out.push(decl);
        }
        self.expect_end_of_declaration()
    }

    /// `[T any]` after a type name; `[N]T` is an array instead.
    fn at_type_parameters(&self) -> bool {
        if !self.current().is("[") || self.peek(1).kind != TokenKind::Ident {
            return false;
        }
        let after = self.peek(2);
        matches!(after.kind, TokenKind::Ident | TokenKind::Keyword)
            || after.is("~")
            || after.is(",")
            || after.is("[")
    }

    fn parse_type_spec(&mut self, group_doc: Vec<String>, spec_doc: Vec<String>) -> Result<TypeDeclaration, WeaveError> {
        let name_tok = self.expect_ident()?;
        if self.at_type_parameters() {
            self.skip_balanced("[", "]")?;
        }
        // Aliases declare the same shape as definitions.
        self.eat("=");
        let type_ = self.parse_type()?;

        Ok(TypeDeclaration {
            package: self.package.clone(),
            name:    name_tok.text,
            line:    name_tok.line,
            column:  name_tok.column,
            group_doc,
            spec_doc,
            type_,
        })
    }

    fn starts_type(&self) -> bool {
        let tok = self.current();
        tok.kind == TokenKind::Ident
            || ["*", "[", "(", "<-", "map", "struct", "interface", "func", "chan"]
                .iter()
                .any(|t| tok.is(t))
    }

    fn parse_type(&mut self) -> Result<TypeExpr, WeaveError> {
        let tok = self.current().clone();

        if tok.kind == TokenKind::Ident {
            self.index += 1;
            let expr = if self.eat(".") {
                let sel = self.expect_ident()?;
                TypeExpr::Qualified {
                    package: tok.text,
                    name:    sel.text,
                }
            } else {
                TypeExpr::Named(tok.text)
            };
            // Generic instantiation; arguments do not change the mapped shape.
            if self.current().is("[") {
                self.skip_balanced("[", "]")?;
            }
            return Ok(expr);
        }

        match tok.text.as_str() {
            "*" if tok.kind == TokenKind::Operator => {
                self.index += 1;
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            "[" if tok.kind == TokenKind::Operator => {
                if self.peek(1).is("]") {
                    self.index += 2;
                } else {
                    self.skip_balanced("[", "]")?;
                }
                Ok(TypeExpr::Array(Box::new(self.parse_type()?)))
            }
            "(" if tok.kind == TokenKind::Operator => {
                self.index += 1;
                let inner = self.parse_type()?;
                self.expect(")", "\")\"")?;
                Ok(inner)
            }
            "<-" if tok.kind == TokenKind::Operator => {
                self.index += 1;
                self.expect("chan", "\"chan\"")?;
                Ok(TypeExpr::Chan(Box::new(self.parse_type()?)))
            }
            "map" if tok.kind == TokenKind::Keyword => {
                self.index += 1;
                self.expect("[", "\"[\"")?;
                let key = self.parse_type()?;
                self.expect("]", "\"]\"")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key:   Box::new(key),
                    value: Box::new(value),
                })
            }
            "chan" if tok.kind == TokenKind::Keyword => {
                self.index += 1;
                self.eat("<-");
                Ok(TypeExpr::Chan(Box::new(self.parse_type()?)))
            }
            "struct" if tok.kind == TokenKind::Keyword => self.parse_struct(),
            "interface" if tok.kind == TokenKind::Keyword => {
                self.index += 1;
                self.skip_balanced("{", "}")?;
                Ok(TypeExpr::Interface)
            }
            "func" if tok.kind == TokenKind::Keyword => {
                self.index += 1;
                self.skip_balanced("(", ")")?;
                if self.current().is("(") {
                    self.skip_balanced("(", ")")?;
                } else if self.starts_type() {
                    self.parse_type()?;
                }
                Ok(TypeExpr::Func)
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn parse_struct(&mut self) -> Result<TypeExpr, WeaveError> {
        self.expect("struct", "\"struct\"")?;
        self.expect("{", "\"{\"")?;

        let mut fields = Vec::new();
        loop {
            self.eat_semicolons();
            if self.eat("}") {
                break;
            }
            if self.at_eof() {
                return Err(self.unexpected("\"}\""));
            }
            self.parse_field(&mut fields)?;
            self.expect_end_of_declaration()?;
        }

        Ok(TypeExpr::Struct(fields))
    }

    fn parse_tag(&mut self) -> Option<String> {
        match self.current().kind {
            TokenKind::String | TokenKind::RawString => Some(self.advance().text),
            _ => None,
        }
    }

    fn parse_field(&mut self, fields: &mut Vec<FieldDeclaration>) -> Result<(), WeaveError> {
        let first = self.current().clone();

        let embedded = first.is("*")
            || (first.kind == TokenKind::Ident && {
                let next = self.peek(1);
                if next.is("[") {
                    // `Base[T]` embeds an instantiation, `Items [4]T` names a field.
                    self.closing_offset(1, "[", "]")
                        .map_or(false, |end| ends_field(self.peek(end + 1)))
                } else {
                    ends_field(next) || next.is(".")
                }
            });

        if embedded {
            let type_ = self.parse_type()?;
            let raw_tag = self.parse_tag();
            fields.push(FieldDeclaration {
                name:     None,
                exported: false,
                type_,
                raw_tag,
                line:     first.line,
                column:   first.column,
            });
            return Ok(());
        }

        // `A, B T` declares one field, named and exported after `A`.
        let name = self.expect_ident()?;
        while self.eat(",") {
            self.expect_ident()?;
        }
        let type_ = self.parse_type()?;
        let raw_tag = self.parse_tag();

        fields.push(FieldDeclaration {
            exported: is_exported(&name.text),
            name:     Some(name.text),
            type_,
            raw_tag,
            line:     name.line,
            column:   name.column,
        });
        Ok(())
    }

    /// Offset of the token closing the bracket at `offset`, without consuming anything.
    fn closing_offset(&self, offset: usize, open: &str, close: &str) -> Option<usize> {
        let mut depth = 0usize;
        let mut at = offset;
        loop {
            let token = self.peek(at);
            if token.kind == TokenKind::Eof {
                return None;
            }
            if token.is(open) {
                depth += 1;
            } else if token.is(close) {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
            at += 1;
        }
    }
}

/// Tokens that may follow the type of an embedded field.
fn ends_field(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Semicolon | TokenKind::String | TokenKind::RawString
    ) || token.is("}")
}

/// Parse the type declarations of one Go source file.
pub fn parse_source(mut tokens: Vec<Token>) -> Result<SourceFile, WeaveError> {
    if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
        let (line, column) = tokens.last().map_or((1, 1), |t| (t.end_line, t.column));
        tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            line,
            column,
            end_line: line,
        });
    }
    let (tokens, docs) = attach_comments(tokens);
    let mut parser = Parser {
        tokens,
        docs,
        index: 0,
        package: String::new(),
    };
    parser.parse_file()
}
