use weave_schema::{
    ARRAY_COMPATIBLE_TYPES, DATA_TYPE_BOOLEAN, DATA_TYPE_DATE, DATA_TYPE_INT, DATA_TYPE_NUMBER,
    DATA_TYPE_OBJECT, DATA_TYPE_OBJECT_ARRAY, DATA_TYPE_TEXT, DATA_TYPE_UUID,
};
use crate::{error::WeaveError, types::TypeExpr, utils::is_exported};

pub const INTEGER_TYPES: [&str; 13] = [
    "int", "int8", "int16", "int32", "int64",
    "uint", "uint8", "uint16", "uint32", "uint64", "uintptr",
    "byte", "rune",
];

pub const FLOAT_TYPES: [&str; 3] = ["float16", "float32", "float64"];

fn single(token: &str) -> Vec<String> {
    vec![token.to_string()]
}

fn map_named(name: &str) -> Vec<String> {
    match name {
        "string" => single(DATA_TYPE_TEXT),
        "bool" => single(DATA_TYPE_BOOLEAN),
        n if INTEGER_TYPES.contains(&n) => single(DATA_TYPE_INT),
        n if FLOAT_TYPES.contains(&n) => single(DATA_TYPE_NUMBER),
        // An exported name is taken to be another class; anything else is stored as text.
        n if is_exported(n) => single(n),
        _ => single(DATA_TYPE_TEXT),
    }
}

fn map_qualified(package: &str, name: &str) -> Vec<String> {
    match (package, name) {
        ("time", "Time") => single(DATA_TYPE_DATE),
        ("uuid", "UUID") => single(DATA_TYPE_UUID),
        _ => single(DATA_TYPE_TEXT),
    }
}

fn map_array(element: &TypeExpr) -> Result<Vec<String>, WeaveError> {
    let inner = map_type(element)?;
    if let [token] = inner.as_slice() {
        if ARRAY_COMPATIBLE_TYPES.contains(&token.as_str()) {
            return Ok(vec![format!("{}[]", token)]);
        }
        // References are multi-valued in Weaviate already, so the class name stands alone.
        if is_exported(token) {
            return Ok(inner);
        }
    }
    Ok(single(DATA_TYPE_OBJECT_ARRAY))
}

/// Map a Go type expression to Weaviate data type tokens.
///
/// The result is never empty. Function and channel types have no
/// representation and fail with `UnsupportedType`.
pub fn map_type(expr: &TypeExpr) -> Result<Vec<String>, WeaveError> {
    match expr {
        TypeExpr::Named(name) => Ok(map_named(name)),
        TypeExpr::Pointer(inner) => map_type(inner),
        TypeExpr::Array(element) => map_array(element),
        TypeExpr::Qualified { package, name } => Ok(map_qualified(package, name)),
        TypeExpr::Struct(_) | TypeExpr::Map { .. } => Ok(single(DATA_TYPE_OBJECT)),
        TypeExpr::Interface => Ok(single(DATA_TYPE_TEXT)),
        TypeExpr::Func | TypeExpr::Chan(_) => Err(WeaveError::UnsupportedType(expr.shape())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeExpr {
        TypeExpr::Named(name.to_string())
    }

    fn ptr(inner: TypeExpr) -> TypeExpr {
        TypeExpr::Pointer(Box::new(inner))
    }

    fn array(inner: TypeExpr) -> TypeExpr {
        TypeExpr::Array(Box::new(inner))
    }

    fn qualified(package: &str, name: &str) -> TypeExpr {
        TypeExpr::Qualified { package: package.into(), name: name.into() }
    }

    fn map_of(key: TypeExpr, value: TypeExpr) -> TypeExpr {
        TypeExpr::Map { key: Box::new(key), value: Box::new(value) }
    }

    fn mapped(expr: &TypeExpr) -> Vec<String> {
        map_type(expr).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(mapped(&named("string")), vec!["text"]);
        assert_eq!(mapped(&named("bool")), vec!["boolean"]);
        for int in ["int", "int8", "uint16", "int64", "uint64", "byte"] {
            assert_eq!(mapped(&named(int)), vec!["int"], "{}", int);
        }
        for float in ["float32", "float64"] {
            assert_eq!(mapped(&named(float)), vec!["number"], "{}", float);
        }
    }

    #[test]
    fn unknown_names_split_on_capitalization() {
        assert_eq!(mapped(&named("Author")), vec!["Author"]);
        assert_eq!(mapped(&named("status")), vec!["text"]);
        assert_eq!(mapped(&named("any")), vec!["text"]);
    }

    #[test]
    fn pointers_are_transparent() {
        let shapes = [
            named("int32"),
            named("Author"),
            array(named("string")),
            qualified("time", "Time"),
            map_of(named("string"), named("int")),
        ];
        for shape in shapes {
            assert_eq!(mapped(&ptr(shape.clone())), mapped(&shape));
            assert_eq!(mapped(&ptr(ptr(shape.clone()))), mapped(&shape));
        }
    }

    #[test]
    fn arrays() {
        assert_eq!(mapped(&array(named("string"))), vec!["text[]"]);
        assert_eq!(mapped(&array(named("float64"))), vec!["number[]"]);
        assert_eq!(mapped(&array(qualified("time", "Time"))), vec!["date[]"]);
        assert_eq!(mapped(&array(qualified("uuid", "UUID"))), vec!["uuid[]"]);
        assert_eq!(mapped(&array(map_of(named("string"), named("int")))), vec!["object[]"]);
        assert_eq!(mapped(&array(TypeExpr::Struct(vec![]))), vec!["object[]"]);
        assert_eq!(mapped(&array(ptr(named("Author")))), vec!["Author"]);
        assert_eq!(mapped(&array(array(named("int")))), vec!["object[]"]);
    }

    #[test]
    fn qualified_names() {
        assert_eq!(mapped(&qualified("time", "Time")), vec!["date"]);
        assert_eq!(mapped(&qualified("uuid", "UUID")), vec!["uuid"]);
        assert_eq!(mapped(&qualified("time", "Duration")), vec!["text"]);
        assert_eq!(mapped(&qualified("decimal", "Decimal")), vec!["text"]);
    }

    #[test]
    fn composites() {
        assert_eq!(mapped(&TypeExpr::Struct(vec![])), vec!["object"]);
        assert_eq!(mapped(&map_of(named("string"), named("any"))), vec!["object"]);
        assert_eq!(mapped(&TypeExpr::Interface), vec!["text"]);
    }

    #[test]
    fn functions_and_channels_are_unsupported() {
        let err = map_type(&TypeExpr::Func).unwrap_err();
        assert!(matches!(err, WeaveError::UnsupportedType(ref shape) if shape == "func"));

        let err = map_type(&array(TypeExpr::Chan(Box::new(named("int"))))).unwrap_err();
        assert!(matches!(err, WeaveError::UnsupportedType(ref shape) if shape == "chan int"));
    }
}
