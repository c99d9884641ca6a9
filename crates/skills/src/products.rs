//! Catalog tools: search, details and recommendations.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

use shopdesk_core::{traits::Tool, types::ToolOutput, Result};
use shopdesk_store::{Product, ProductStore, WeatherCondition};

use crate::args::{self, non_blank};
use crate::kind::ToolKind;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Words to look for in product names, categories and descriptions.
    pub query: String,
    /// Optional category filter (Electronics, Clothing, Accessories, Sports, Books).
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProductIdArgs {
    /// The product ID, for example PROD001.
    pub product_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecommendationArgs {
    #[serde(default)]
    pub category: Option<String>,
    /// sunny, rainy, cloudy or stormy.
    #[serde(default)]
    pub weather_condition: Option<String>,
}

fn render_listing(product: &Product) -> String {
    format!(
        "**{}** (ID: {})\nCategory: {}\nPrice: {}\nAvailability: {}\nRating: {:.1}/5.0\nDescription: {}",
        product.name,
        product.id,
        product.category,
        product.price,
        product.availability(),
        product.rating,
        product.description
    )
}

// =============================================================================
// Search Products Tool
// =============================================================================

pub struct SearchProductsTool {
    products: Arc<ProductStore>,
}

impl SearchProductsTool {
    pub fn new(products: Arc<ProductStore>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> &str {
        ToolKind::SearchProducts.as_str()
    }

    fn description(&self) -> &str {
        "Search for products by name or category. Use this when customers are looking for specific products or browsing categories."
    }

    fn parameters(&self) -> Value {
        args::schema::<SearchArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: SearchArgs = args::parse(self.name(), args)?;
        let category = non_blank(args.category);
        let found = self.products.search(&args.query, category.as_deref());

        if found.is_empty() {
            let scope = category
                .map(|c| format!(" in category '{}'", c))
                .unwrap_or_default();
            return Ok(ToolOutput::rejected(format!(
                "No products found for '{}'{}. You might want to try different search terms or browse our categories.",
                args.query.trim(),
                scope
            )));
        }

        let listings: Vec<String> = found.iter().map(render_listing).collect();
        Ok(ToolOutput::result(format!(
            "Found {} product(s):\n\n{}",
            found.len(),
            listings.join("\n\n")
        )))
    }
}

// =============================================================================
// Product Details Tool
// =============================================================================

pub struct ProductDetailsTool {
    products: Arc<ProductStore>,
}

impl ProductDetailsTool {
    pub fn new(products: Arc<ProductStore>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl Tool for ProductDetailsTool {
    fn name(&self) -> &str {
        ToolKind::ProductDetails.as_str()
    }

    fn description(&self) -> &str {
        "Get detailed information about a product by product ID, including stock and features."
    }

    fn parameters(&self) -> Value {
        args::schema::<ProductIdArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: ProductIdArgs = args::parse(self.name(), args)?;

        let Some(product) = self.products.get(&args.product_id) else {
            return Ok(ToolOutput::rejected(format!(
                "Product {} not found. This product ID does not exist in our catalog. Please verify the product ID or search the catalog by name.",
                args.product_id.trim()
            )));
        };

        let mut out = format!(
            "Product Details Found\n**{}** (ID: {})\nCategory: {}\nPrice: {}\nAvailability: {}\nStock: {} units\nRating: {:.1}/5.0\nDescription: {}\n\nFeatures:",
            product.name,
            product.id,
            product.category,
            product.price,
            product.availability(),
            product.stock,
            product.rating,
            product.description
        );
        for feature in &product.features {
            let _ = write!(out, "\n  • {}", feature);
        }
        Ok(ToolOutput::result(out))
    }
}

// =============================================================================
// Product Recommendations Tool
// =============================================================================

pub struct ProductRecommendationsTool {
    products: Arc<ProductStore>,
}

impl ProductRecommendationsTool {
    pub fn new(products: Arc<ProductStore>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl Tool for ProductRecommendationsTool {
    fn name(&self) -> &str {
        ToolKind::ProductRecommendations.as_str()
    }

    fn description(&self) -> &str {
        "Get product recommendations based on category or weather conditions. Use this to suggest products to customers."
    }

    fn parameters(&self) -> Value {
        args::schema::<RecommendationArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: RecommendationArgs = args::parse(self.name(), args)?;
        let category = non_blank(args.category);
        let weather = non_blank(args.weather_condition).and_then(|w| w.parse::<WeatherCondition>().ok());

        let picks = self.products.recommendations(category.as_deref(), weather);
        if picks.is_empty() {
            return Ok(ToolOutput::rejected("No recommendations available at the moment."));
        }

        let lines: Vec<String> = picks
            .iter()
            .map(|p| {
                format!(
                    "**{}** - {}\n{}\nRating: {:.1}/5.0",
                    p.name, p.price, p.description, p.rating
                )
            })
            .collect();
        Ok(ToolOutput::result(format!(
            "Here are some recommended products:\n\n{}",
            lines.join("\n\n")
        )))
    }
}
