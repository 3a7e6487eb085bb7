use crate::error::SchemaOrgError;
use crate::locator::locate;
use crate::model::{ExtractionResult, Syntax};
use crate::utils::{get_minutes, normalize_string, value_to_string};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A page's schema.org recipe data.
///
/// Construction runs the node locator once; afterwards the instance is a
/// read-only view over the selected node and every accessor is an
/// independent pure read. When the page carries no qualifying node the
/// accessors degrade per field: `Option` fields report `None`, collection
/// fields come back empty, and yields/image/ratings return
/// [`SchemaOrgError::FieldAbsent`].
#[derive(Debug, Clone)]
pub struct SchemaOrg {
    syntax: Option<Syntax>,
    data: Map<String, Value>,
}

// Author can be a bare string, a Person object, or a list of either.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Text(String),
    Object(AuthorObject),
    Multiple(Vec<AuthorField>),
}

#[derive(Debug, Deserialize)]
struct AuthorObject {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageField {
    Url(String),
    Object(ImageObject),
    Multiple(Vec<ImageField>),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
}

// One element of a recipeInstructions array: either flat text or a
// HowToStep/HowToSection tree. Nodes of any other @type fail to
// deserialize and contribute nothing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Instruction {
    Text(String),
    Node(InstructionNode),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "@type")]
enum InstructionNode {
    HowToStep {
        name: Option<String>,
        text: Option<String>,
    },
    HowToSection {
        name: Option<String>,
        #[serde(rename = "Name")]
        name_cased: Option<String>,
        #[serde(rename = "itemListElement", default)]
        item_list_element: Vec<Instruction>,
    },
}

impl SchemaOrg {
    /// Select the recipe node out of an extraction result. Always succeeds;
    /// with no qualifying node the instance holds an empty mapping.
    pub fn new(extraction: &ExtractionResult) -> Self {
        match locate(extraction) {
            Some((syntax, data)) => Self {
                syntax: Some(syntax),
                data,
            },
            None => Self {
                syntax: None,
                data: Map::new(),
            },
        }
    }

    /// Run the structured-data extractors over raw HTML, then select the
    /// recipe node.
    pub fn from_html(html: &str) -> Self {
        Self::new(&crate::extractors::extract(html, &Syntax::ALL))
    }

    /// The syntax the selected node came from; kept for diagnostics.
    pub fn syntax(&self) -> Option<Syntax> {
        self.syntax
    }

    /// Raw view of the selected node.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn language(&self) -> Option<String> {
        ["inLanguage", "language"].iter().find_map(|key| {
            self.data
                .get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
    }

    pub fn title(&self) -> Option<String> {
        self.data
            .get("name")
            .and_then(Value::as_str)
            .map(normalize_string)
    }

    pub fn author(&self) -> Option<String> {
        let field = self.data.get("author")?;
        resolve_author(serde_json::from_value(field.clone()).ok()?)
    }

    /// Total time in whole minutes: `totalTime` when parseable, otherwise
    /// the sum of whichever of `prepTime` and `cookTime` parse.
    pub fn total_time(&self) -> Option<u32> {
        if let Some(total) = get_minutes(self.data.get("totalTime")) {
            return Some(total);
        }
        let parts: Vec<u32> = ["prepTime", "cookTime"]
            .iter()
            .filter_map(|key| get_minutes(self.data.get(*key)))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.iter().sum())
        }
    }

    pub fn yields(&self) -> Result<String, SchemaOrgError> {
        const ABSENT: SchemaOrgError = SchemaOrgError::FieldAbsent("Yields");
        let yield_data = self.data.get("recipeYield").ok_or(ABSENT)?;
        let first = match yield_data {
            Value::Array(items) => items.first().ok_or(ABSENT)?,
            other => other,
        };
        let recipe_yield = value_to_string(first)
            .filter(|s| !s.is_empty())
            .ok_or(ABSENT)?;

        // A value of three characters or fewer is almost certainly a bare
        // count, so give it a unit.
        if recipe_yield.chars().count() <= 3 {
            return Ok(format!("{recipe_yield} serving(s)"));
        }

        // Some sites prepend label lines ("Makes\n6-8 servings"); keep only
        // the text after the last newline.
        let recipe_yield = match recipe_yield.rsplit_once('\n') {
            Some((_, tail)) => tail.to_string(),
            None => recipe_yield,
        };
        Ok(recipe_yield)
    }

    /// The recipe image URL. Relative paths are unusable at this layer and
    /// come back as an empty string; the caller resolves them from the page
    /// itself.
    pub fn image(&self) -> Result<String, SchemaOrgError> {
        let field = self
            .data
            .get("image")
            .ok_or(SchemaOrgError::FieldAbsent("Image"))?;
        let image = serde_json::from_value(field.clone())
            .ok()
            .and_then(resolve_image)
            .unwrap_or_default();
        if !image.contains("http://") && !image.contains("https://") {
            return Ok(String::new());
        }
        Ok(image)
    }

    pub fn ingredients(&self) -> Vec<String> {
        let primary = self
            .data
            .get("recipeIngredient")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty());
        let fallback = self.data.get("ingredients").and_then(Value::as_array);
        let Some(items) = primary.or(fallback) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(Value::as_str)
            .filter(|entry| !entry.is_empty())
            .map(normalize_string)
            .collect()
    }

    pub fn nutrients(&self) -> HashMap<String, String> {
        let Some(Value::Object(nutrition)) = self.data.get("nutrition") else {
            return HashMap::new();
        };
        nutrition
            .iter()
            .filter(|(key, _)| key.as_str() != "@type")
            .filter_map(|(key, value)| {
                let value = value_to_string(value)?;
                Some((normalize_string(key), normalize_string(&value)))
            })
            .collect()
    }

    /// Flatten `recipeInstructions` to newline-separated step text,
    /// depth-first through HowToSection/HowToStep trees. A plain-string
    /// property is returned verbatim; no instructions at all gives "".
    pub fn instructions(&self) -> String {
        match self.data.get("recipeInstructions") {
            Some(Value::Array(items)) => {
                let mut fragments = Vec::new();
                for item in items {
                    if let Ok(instruction) = serde_json::from_value(item.clone()) {
                        collect_instruction_text(instruction, &mut fragments);
                    }
                }
                fragments
                    .iter()
                    .map(|fragment| normalize_string(fragment))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Some(Value::String(instructions)) => instructions.clone(),
            _ => String::new(),
        }
    }

    /// Aggregate rating value rounded to two decimal places.
    pub fn ratings(&self) -> Result<f64, SchemaOrgError> {
        const ABSENT: SchemaOrgError = SchemaOrgError::FieldAbsent("Ratings");
        let ratings = self.data.get("aggregateRating").ok_or(ABSENT)?;
        let value = match ratings {
            Value::Object(map) => map.get("ratingValue").ok_or(ABSENT)?,
            other => other,
        };
        let rating = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or(ABSENT)?;
        Ok((rating * 100.0).round() / 100.0)
    }

    pub fn cuisine(&self) -> Option<String> {
        match self.data.get("recipeCuisine")? {
            Value::String(cuisine) => Some(cuisine.clone()),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }
}

fn resolve_author(field: AuthorField) -> Option<String> {
    match field {
        AuthorField::Text(name) => Some(name),
        AuthorField::Object(object) => object.name,
        AuthorField::Multiple(list) => list.into_iter().next().and_then(resolve_author),
    }
}

fn resolve_image(field: ImageField) -> Option<String> {
    match field {
        ImageField::Url(url) => Some(url),
        ImageField::Object(object) => object.url,
        ImageField::Multiple(list) => list.into_iter().next().and_then(resolve_image),
    }
}

fn collect_instruction_text(instruction: Instruction, fragments: &mut Vec<String>) {
    match instruction {
        Instruction::Text(text) => fragments.push(text),
        Instruction::Node(InstructionNode::HowToStep { name, text }) => {
            let text = text.unwrap_or_default();
            // Some sites duplicate the step text into name, or truncate it
            // there; emit the name only when it adds something.
            if let Some(name) = name.filter(|name| !name.is_empty()) {
                if !text.starts_with(name.trim_end_matches('.')) {
                    fragments.push(name);
                }
            }
            fragments.push(text);
        }
        Instruction::Node(InstructionNode::HowToSection {
            name,
            name_cased,
            item_list_element,
        }) => {
            if let Some(name) = name.or(name_cased) {
                fragments.push(name);
            }
            for element in item_list_element {
                collect_instruction_text(element, fragments);
            }
        }
    }
}
