use super::SyntaxExtractor;
use crate::model::Syntax;
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;

pub struct JsonLdExtractor;

impl SyntaxExtractor for JsonLdExtractor {
    fn syntax(&self) -> Syntax {
        Syntax::JsonLd
    }

    fn extract(&self, document: &Html) -> Vec<Value> {
        let selector = Selector::parse("script[type='application/ld+json']")
            .expect("static selector");

        let mut items = Vec::new();
        for (index, script) in document.select(&selector).enumerate() {
            // Take the raw text nodes; inner_html() would re-escape entities
            // and leave the decode pass one level short.
            let raw = script.text().collect::<String>();
            let cleaned = sanitize_json(&raw);
            match serde_json::from_str::<Value>(&cleaned) {
                // A top-level array is a list of independent items.
                Ok(Value::Array(block)) => {
                    items.extend(block.into_iter().map(decode_strings))
                }
                Ok(item) => items.push(decode_strings(item)),
                Err(e) => {
                    debug!("skipping unparseable JSON-LD script {index}: {e}");
                }
            }
        }
        items
    }
}

// Publishers wrap JSON-LD in HTML comments, leave trailing commas, or lead
// with non-JSON junk often enough that a cleanup pass pays for itself.
fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str
        .replace("<!--", "")
        .replace("-->", "")
        .trim()
        .to_string();

    if !cleaned.starts_with('{') && !cleaned.starts_with('[') {
        if let Some(start) = cleaned.find('{') {
            cleaned = cleaned[start..].to_string();
        }
    }

    cleaned.replace(",]", "]").replace(",}", "}")
}

// for some reason need to decode twice to get the correct string
fn decode_entities(text: &str) -> String {
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

// HTML entities show up inside JSON string values as well; decode every
// string in the item, keys excluded.
fn decode_strings(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(decode_entities(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(decode_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, decode_strings(value)))
                .collect(),
        ),
        other => other,
    }
}
