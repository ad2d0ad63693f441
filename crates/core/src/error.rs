/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclError {
    /// Two types were registered under the same name.
    #[error("type '{name}' is declared more than once")]
    DuplicateType { name: String },

    /// A field declared the same part (type or override) twice.
    #[error("field '{owner}.{field}' declares its {part} more than once")]
    DuplicateField {
        owner: String,
        field: String,
        part: &'static str,
    },

    /// A field refers to a structured type that was never registered.
    #[error("field '{owner}.{field}' refers to unknown type '{name}'")]
    UnknownType {
        owner: String,
        field: String,
        name: String,
    },
}
