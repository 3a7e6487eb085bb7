use super::SyntaxExtractor;
use crate::model::Syntax;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

pub struct MicrodataExtractor;

impl SyntaxExtractor for MicrodataExtractor {
    fn syntax(&self) -> Syntax {
        Syntax::Microdata
    }

    fn extract(&self, document: &Html) -> Vec<Value> {
        let selector = Selector::parse("[itemscope]").expect("static selector");
        let items: Vec<Value> = document
            .select(&selector)
            .filter(is_top_level_scope)
            .map(build_item)
            .collect();
        debug!("microdata: {} top-level itemscope elements", items.len());
        items
    }
}

// Nested itemscopes become nested mappings inside their parent item, so only
// scopes without an itemscope ancestor start a new item.
fn is_top_level_scope(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .all(|ancestor| ancestor.value().attr("itemscope").is_none())
}

fn build_item(scope: ElementRef) -> Value {
    let mut item = Map::new();

    // Uniform shape: itemtype="https://schema.org/Recipe" splits into
    // @context + @type, the same layout the JSON-LD items carry.
    if let Some(itemtype) = scope.value().attr("itemtype") {
        let itemtype = itemtype.trim().trim_end_matches('/');
        match itemtype.rsplit_once('/') {
            Some((context, item_type)) => {
                item.insert("@context".into(), Value::String(context.to_string()));
                item.insert("@type".into(), Value::String(item_type.to_string()));
            }
            None => {
                item.insert("@type".into(), Value::String(itemtype.to_string()));
            }
        }
    }

    let prop_selector = Selector::parse("[itemprop]").expect("static selector");
    for element in scope.select(&prop_selector) {
        // Properties of nested scopes belong to the nested item.
        if !belongs_to_scope(element, scope) {
            continue;
        }
        let Some(name) = element.value().attr("itemprop") else {
            continue;
        };
        let value = if element.value().attr("itemscope").is_some() {
            build_item(element)
        } else {
            Value::String(property_value(element))
        };
        insert_property(&mut item, name, value);
    }

    Value::Object(item)
}

fn belongs_to_scope(element: ElementRef, scope: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().attr("itemscope").is_some())
        .is_some_and(|ancestor| ancestor.id() == scope.id())
}

// Per the microdata processing rules the value lives in an attribute for
// some elements (machine-readable forms like datetime="PT30M"), in the text
// for the rest.
fn property_value(element: ElementRef) -> String {
    let attrs = element.value();
    if let Some(content) = attrs.attr("content") {
        return content.trim().to_string();
    }
    let attr = match attrs.name() {
        "img" | "audio" | "video" | "source" | "embed" | "iframe" | "track" => "src",
        "a" | "area" | "link" => "href",
        "object" => "data",
        "data" | "meter" => "value",
        "time" => "datetime",
        _ => "",
    };
    if !attr.is_empty() {
        if let Some(value) = attrs.attr(attr) {
            return value.trim().to_string();
        }
    }
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

// Repeated property names accumulate into an array, in document order.
fn insert_property(item: &mut Map<String, Value>, name: &str, value: Value) {
    match item.get_mut(name) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            item.insert(name.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract_items(body: &str) -> Vec<Value> {
        let html = format!("<html><body>{body}</body></html>");
        MicrodataExtractor.extract(&Html::parse_document(&html))
    }

    #[test]
    fn test_itemtype_splits_into_context_and_type() {
        let items = extract_items(
            r#"<div itemscope itemtype="https://schema.org/Recipe">
                <span itemprop="name">Banana Bread</span>
            </div>"#,
        );
        assert_eq!(
            items,
            vec![json!({
                "@context": "https://schema.org",
                "@type": "Recipe",
                "name": "Banana Bread"
            })]
        );
    }

    #[test]
    fn test_repeated_properties_become_arrays() {
        let items = extract_items(
            r#"<div itemscope itemtype="http://schema.org/Recipe">
                <li itemprop="recipeIngredient">2 eggs</li>
                <li itemprop="recipeIngredient">1 cup flour</li>
            </div>"#,
        );
        assert_eq!(
            items[0].get("recipeIngredient"),
            Some(&json!(["2 eggs", "1 cup flour"]))
        );
    }

    #[test]
    fn test_nested_scope_becomes_nested_item() {
        let items = extract_items(
            r#"<div itemscope itemtype="http://schema.org/Recipe">
                <div itemprop="author" itemscope itemtype="http://schema.org/Person">
                    <span itemprop="name">Cooking Divine</span>
                </div>
                <span itemprop="name">Banana Bread</span>
            </div>"#,
        );
        let item = &items[0];
        assert_eq!(item.get("name"), Some(&json!("Banana Bread")));
        assert_eq!(
            item.get("author"),
            Some(&json!({
                "@context": "http://schema.org",
                "@type": "Person",
                "name": "Cooking Divine"
            }))
        );
        // the nested Person is not reported as a top-level item
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_attribute_values_preferred_over_text() {
        let items = extract_items(
            r#"<div itemscope itemtype="http://schema.org/Recipe">
                <time itemprop="prepTime" datetime="PT10M">10 mins</time>
                <img itemprop="image" src="https://example.com/pie.jpg" alt="pie">
                <meta itemprop="recipeYield" content="8">
            </div>"#,
        );
        let item = &items[0];
        assert_eq!(item.get("prepTime"), Some(&json!("PT10M")));
        assert_eq!(item.get("image"), Some(&json!("https://example.com/pie.jpg")));
        assert_eq!(item.get("recipeYield"), Some(&json!("8")));
    }

    #[test]
    fn test_text_values_are_trimmed() {
        let items = extract_items(
            r#"<div itemscope itemtype="http://schema.org/Recipe">
                <div itemprop="description">
                    Grandma's favourite.
                </div>
            </div>"#,
        );
        assert_eq!(
            items[0].get("description"),
            Some(&json!("Grandma's favourite."))
        );
    }

    #[test]
    fn test_no_microdata_on_page() {
        assert!(extract_items("<p>just text</p>").is_empty());
    }
}
