use thiserror::Error;

/// Errors that can occur while reading schema.org recipe data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrgError {
    /// The selected node carries no usable value for this field. Callers are
    /// expected to branch on this per field and fall back to another
    /// extraction source; it never aborts the other accessors.
    #[error("{0} not found in SchemaOrg data")]
    FieldAbsent(&'static str),
}
