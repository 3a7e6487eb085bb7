use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// The structured-data embedding syntax an item was found in.
///
/// The variant order is the search priority order: JSON-LD blocks are
/// consulted before microdata markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Syntax {
    JsonLd,
    Microdata,
}

impl Syntax {
    /// All supported syntaxes, in search priority order.
    pub const ALL: [Syntax; 2] = [Syntax::JsonLd, Syntax::Microdata];

    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::JsonLd => "json-ld",
            Syntax::Microdata => "microdata",
        }
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform output of the structured-data extractors: for each syntax, the
/// sequence of item mappings found on the page, in document order.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    items: HashMap<Syntax, Vec<Value>>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, syntax: Syntax, item: Value) {
        self.items.entry(syntax).or_default().push(item);
    }

    pub fn extend(&mut self, syntax: Syntax, items: impl IntoIterator<Item = Value>) {
        self.items.entry(syntax).or_default().extend(items);
    }

    /// Items found for one syntax, in document order. Empty for syntaxes
    /// that produced nothing.
    pub fn items(&self, syntax: Syntax) -> &[Value] {
        self.items.get(&syntax).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.items.values().all(Vec::is_empty)
    }
}
