use crate::model::{ExtractionResult, Syntax};
use log::debug;
use serde_json::{Map, Value};

pub const SCHEMA_ORG_HOST: &str = "schema.org";

/// Node types accepted as "the recipe", compared case-insensitively.
const SCHEMA_NAMES: [&str; 2] = ["recipe", "webpage"];

/// Find the single node representing the recipe.
///
/// Syntaxes are searched in priority order, items in document order, and the
/// first match wins; the whole search stops the moment a node is accepted.
/// Returns `None` when no item on the page qualifies.
pub fn locate(extraction: &ExtractionResult) -> Option<(Syntax, Map<String, Value>)> {
    for syntax in Syntax::ALL {
        for item in extraction.items(syntax) {
            if let Some(node) = match_item(item) {
                debug!("selected {} node via {}", node_type(&node), syntax);
                return Some((syntax, node));
            }
        }
    }
    debug!("no schema.org recipe node found");
    None
}

fn match_item(item: &Value) -> Option<Map<String, Value>> {
    if !host_in_context(item) {
        return None;
    }

    // The item itself may be the recipe, or a WebPage wrapping it.
    if let Some(item_type) = item.get("@type").and_then(Value::as_str) {
        if is_schema_name(item_type) {
            if item_type.eq_ignore_ascii_case("webpage") {
                return Some(main_entity(item));
            }
            return item.as_object().cloned();
        }
    }

    // Otherwise the recipe may sit inside a @graph array mixed with other
    // node types (Organization, WebSite, BreadcrumbList, ...).
    if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
        for entry in graph {
            let Some(entry_type) = entry.get("@type").and_then(Value::as_str) else {
                continue;
            };
            if !is_schema_name(entry_type) {
                continue;
            }
            if entry_type.eq_ignore_ascii_case("webpage") {
                return Some(main_entity(item));
            }
            return entry.as_object().cloned();
        }
    }

    None
}

fn host_in_context(item: &Value) -> bool {
    item.get("@context")
        .and_then(Value::as_str)
        .is_some_and(|context| context.contains(SCHEMA_ORG_HOST))
}

fn is_schema_name(item_type: &str) -> bool {
    SCHEMA_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(item_type))
}

// A WebPage node points at its recipe via mainEntity; take it without
// validating that it actually is a Recipe.
fn main_entity(item: &Value) -> Map<String, Value> {
    item.get("mainEntity")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn node_type(node: &Map<String, Value>) -> &str {
    node.get("@type").and_then(Value::as_str).unwrap_or("untyped")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_with(items: Vec<Value>) -> ExtractionResult {
        let mut extraction = ExtractionResult::new();
        extraction.extend(Syntax::JsonLd, items);
        extraction
    }

    #[test]
    fn test_selects_bare_recipe_node() {
        let extraction = result_with(vec![json!({
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": "Minestrone"
        })]);
        let (syntax, node) = locate(&extraction).unwrap();
        assert_eq!(syntax, Syntax::JsonLd);
        assert_eq!(node.get("name"), Some(&json!("Minestrone")));
    }

    #[test]
    fn test_type_comparison_is_case_insensitive() {
        let extraction = result_with(vec![json!({
            "@context": "http://schema.org/",
            "@type": "RECIPE",
            "name": "Shakshuka"
        })]);
        assert!(locate(&extraction).is_some());
    }

    #[test]
    fn test_skips_items_without_schema_org_context() {
        let extraction = result_with(vec![
            json!({"@context": "https://ogp.me/ns", "@type": "Recipe", "name": "wrong"}),
            json!({"@context": "https://schema.org", "@type": "Recipe", "name": "right"}),
        ]);
        let (_, node) = locate(&extraction).unwrap();
        assert_eq!(node.get("name"), Some(&json!("right")));
    }

    #[test]
    fn test_webpage_dereferences_main_entity() {
        let extraction = result_with(vec![json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
            "mainEntity": {"@type": "Recipe", "name": "Pho"}
        })]);
        let (_, node) = locate(&extraction).unwrap();
        assert_eq!(node.get("name"), Some(&json!("Pho")));
    }

    #[test]
    fn test_graph_recipe_entry_first_wins() {
        let extraction = result_with(vec![json!({
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "Organization", "name": "Site"},
                {"@type": "Recipe", "name": "Dal"},
                {"@type": "WebPage", "name": "Page"}
            ],
            "mainEntity": {"@type": "Recipe", "name": "FromMainEntity"}
        })]);
        let (_, node) = locate(&extraction).unwrap();
        assert_eq!(node.get("name"), Some(&json!("Dal")));
    }

    #[test]
    fn test_graph_webpage_entry_first_wins() {
        let extraction = result_with(vec![json!({
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Page"},
                {"@type": "Recipe", "name": "Dal"}
            ],
            "mainEntity": {"@type": "Recipe", "name": "FromMainEntity"}
        })]);
        let (_, node) = locate(&extraction).unwrap();
        assert_eq!(node.get("name"), Some(&json!("FromMainEntity")));
    }

    #[test]
    fn test_graph_entries_with_non_string_type_are_skipped() {
        let extraction = result_with(vec![json!({
            "@context": "https://schema.org",
            "@graph": [
                {"@type": ["WebPage", "CollectionPage"], "name": "Page"},
                {"@type": "Recipe", "name": "Dal"}
            ]
        })]);
        let (_, node) = locate(&extraction).unwrap();
        assert_eq!(node.get("name"), Some(&json!("Dal")));
    }

    #[test]
    fn test_json_ld_outranks_microdata() {
        let mut extraction = ExtractionResult::new();
        extraction.push(
            Syntax::Microdata,
            json!({"@context": "http://schema.org", "@type": "Recipe", "name": "micro"}),
        );
        extraction.push(
            Syntax::JsonLd,
            json!({"@context": "http://schema.org", "@type": "Recipe", "name": "ld"}),
        );
        let (syntax, node) = locate(&extraction).unwrap();
        assert_eq!(syntax, Syntax::JsonLd);
        assert_eq!(node.get("name"), Some(&json!("ld")));
    }

    #[test]
    fn test_no_qualifying_item() {
        let extraction = result_with(vec![json!({
            "@context": "https://schema.org",
            "@type": "NewsArticle"
        })]);
        assert!(locate(&extraction).is_none());
        assert!(locate(&ExtractionResult::new()).is_none());
    }

    #[test]
    fn test_locate_is_deterministic() {
        let extraction = result_with(vec![
            json!({"@context": "https://schema.org", "@type": "Recipe", "name": "a"}),
            json!({"@context": "https://schema.org", "@type": "Recipe", "name": "b"}),
        ]);
        let first = locate(&extraction).unwrap();
        let second = locate(&extraction).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.1.get("name"), Some(&json!("a")));
    }
}
