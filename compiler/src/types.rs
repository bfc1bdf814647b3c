use serde::Serialize;

/// The shape of a Go type expression, as written in a declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    /// `string`, `int64`, `Author`, `any`
    Named(String),
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`, `[4]T`, `[...]T`
    Array(Box<TypeExpr>),
    /// `time.Time`
    Qualified {
        package: String,
        name:    String,
    },
    /// `struct { ... }`
    Struct(Vec<FieldDeclaration>),
    /// `map[K]V`
    Map {
        key:   Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `interface { ... }`
    Interface,
    /// `func(...) ...`
    Func,
    /// `chan T`, `<-chan T`, `chan<- T`
    Chan(Box<TypeExpr>),
}

impl TypeExpr {
    /// Short description of the shape, used in error messages.
    pub fn shape(&self) -> String {
        match self {
            TypeExpr::Named(name) => name.clone(),
            TypeExpr::Pointer(inner) => format!("*{}", inner.shape()),
            TypeExpr::Array(inner) => format!("[]{}", inner.shape()),
            TypeExpr::Qualified { package, name } => format!("{}.{}", package, name),
            TypeExpr::Struct(_) => "struct".to_string(),
            TypeExpr::Map { key, value } => format!("map[{}]{}", key.shape(), value.shape()),
            TypeExpr::Interface => "interface".to_string(),
            TypeExpr::Func => "func".to_string(),
            TypeExpr::Chan(inner) => format!("chan {}", inner.shape()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDeclaration {
    /// `None` for embedded fields.
    pub name:     Option<String>,
    pub exported: bool,
    pub type_:    TypeExpr,
    /// The tag literal exactly as written, quotes included.
    pub raw_tag:  Option<String>,
    pub line:     usize,
    pub column:   usize,
}

/// One top-level `type` spec of a Go file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDeclaration {
    pub package:   String,
    pub name:      String,
    pub line:      usize,
    pub column:    usize,
    /// Doc comment of the enclosing `type` keyword.
    pub group_doc: Vec<String>,
    /// Doc comment of the spec itself; only set inside `type ( ... )` groups.
    pub spec_doc:  Vec<String>,
    pub type_:     TypeExpr,
}

impl TypeDeclaration {
    pub fn is_record_type(&self) -> bool {
        matches!(self.type_, TypeExpr::Struct(_))
    }

    pub fn fields(&self) -> Option<&[FieldDeclaration]> {
        match &self.type_ {
            TypeExpr::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFile {
    pub package:      String,
    pub declarations: Vec<TypeDeclaration>,
}
