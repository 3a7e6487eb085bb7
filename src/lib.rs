//! schema.org Recipe extraction for scraped web pages.
//!
//! Pages embed recipe metadata using the schema.org vocabulary in JSON-LD
//! blocks or microdata markup, in many legal-but-inconsistent shapes. This
//! crate finds the one node that represents the recipe and normalizes its
//! fields (title, ingredients, instructions, timings, yield, rating, ...)
//! so a scraping pipeline can consume them uniformly, falling back to
//! page-specific HTML scraping only for the fields schema.org cannot answer.
//!
//! ```
//! use recipe_schema::SchemaOrg;
//!
//! let html = r#"
//!     <script type="application/ld+json">
//!     {
//!         "@context": "https://schema.org",
//!         "@type": "Recipe",
//!         "name": "Chocolate Chip Cookies",
//!         "totalTime": "PT25M",
//!         "recipeYield": "24"
//!     }
//!     </script>
//! "#;
//!
//! let schema = SchemaOrg::from_html(html);
//! assert_eq!(schema.title().as_deref(), Some("Chocolate Chip Cookies"));
//! assert_eq!(schema.total_time(), Some(25));
//! assert_eq!(schema.yields().unwrap(), "24 serving(s)");
//! ```

pub mod error;
pub mod extractors;
pub mod locator;
pub mod model;
pub mod schema;
pub mod utils;

pub use error::SchemaOrgError;
pub use model::{ExtractionResult, Syntax};
pub use schema::SchemaOrg;
