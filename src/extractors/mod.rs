use crate::model::{ExtractionResult, Syntax};
use scraper::Html;
use serde_json::Value;

mod json_ld;
mod microdata;

pub use json_ld::JsonLdExtractor;
pub use microdata::MicrodataExtractor;

/// One structured-data embedding syntax: turns a parsed document into the
/// uniform sequence of item mappings the node locator consumes.
pub trait SyntaxExtractor {
    fn syntax(&self) -> Syntax;
    fn extract(&self, document: &Html) -> Vec<Value>;
}

/// Run the extractors for the requested syntaxes over raw page markup.
pub fn extract(html: &str, syntaxes: &[Syntax]) -> ExtractionResult {
    let document = Html::parse_document(html);
    let mut result = ExtractionResult::new();
    for syntax in syntaxes {
        let extractor: Box<dyn SyntaxExtractor> = match syntax {
            Syntax::JsonLd => Box::new(JsonLdExtractor),
            Syntax::Microdata => Box::new(MicrodataExtractor),
        };
        result.extend(extractor.syntax(), extractor.extract(&document));
    }
    result
}
