//! Product catalog, search and recommendations.

use dashmap::DashMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::{money::Money, normalize_id};

/// Stock at or below this level is reported as low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Maximum number of recommended products.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    LowStock,
    OutOfStock,
}

impl Availability {
    pub fn from_stock(stock: u32) -> Self {
        match stock {
            0 => Self::OutOfStock,
            n if n <= LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: u32,
    /// Average review score out of 5.
    pub rating: f32,
    pub description: String,
    pub features: Vec<String>,
}

impl Product {
    pub fn availability(&self) -> Availability {
        Availability::from_stock(self.stock)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    fn haystack(&self) -> String {
        let mut text = format!("{} {} {}", self.name, self.category, self.description);
        for feature in &self.features {
            text.push(' ');
            text.push_str(feature);
        }
        text.to_lowercase()
    }

    fn in_category(&self, category: Option<&str>) -> bool {
        category.map_or(true, |c| self.category.eq_ignore_ascii_case(c.trim()))
    }
}

/// Weather conditions the recommendation engine knows keywords for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Cloudy,
    Stormy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [Self::Sunny, Self::Rainy, Self::Cloudy, Self::Stormy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Rainy => "rainy",
            Self::Cloudy => "cloudy",
            Self::Stormy => "stormy",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Sunny => &["sunglasses", "summer", "outdoor", "water bottle"],
            Self::Rainy => &["rain", "waterproof", "umbrella"],
            Self::Cloudy => &["jacket", "backpack", "outdoor"],
            Self::Stormy => &["waterproof", "umbrella", "power bank"],
        }
    }

    /// Whether weather like this is expected to delay shipments.
    pub fn delays_shipping(&self) -> bool {
        matches!(self, Self::Rainy | Self::Stormy)
    }
}

impl FromStr for WeatherCondition {
    type Err = ();

    /// Accepts the bare condition or a provider description containing it
    /// ("light rain", "scattered clouds").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s.contains("storm") || s.contains("thunder") {
            Ok(Self::Stormy)
        } else if s.contains("rain") || s.contains("drizzle") || s.contains("shower") {
            Ok(Self::Rainy)
        } else if s.contains("cloud") || s.contains("overcast") {
            Ok(Self::Cloudy)
        } else if s.contains("sun") || s.contains("clear") {
            Ok(Self::Sunny)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concurrent product table keyed by product id.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: DashMap<String, Product>,
}

impl ProductStore {
    pub fn from_records(records: impl IntoIterator<Item = Product>) -> Self {
        let products = DashMap::new();
        for product in records {
            products.insert(product.id.clone(), product);
        }
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, product_id: &str) -> Option<Product> {
        self.products.get(&normalize_id(product_id)).map(|r| r.clone())
    }

    /// All products, by id.
    pub fn all(&self) -> Vec<Product> {
        let mut all: Vec<Product> = self.products.iter().map(|r| r.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Products matching every query token, or failing that any token.
    ///
    /// Tokens are matched against name, category, description and features.
    /// An empty query returns the whole (optionally filtered) catalog.
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<Product> {
        let tokens: Vec<String> = query
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let candidates: Vec<(Product, String)> = self
            .all()
            .into_iter()
            .filter(|p| p.in_category(category))
            .map(|p| {
                let text = p.haystack();
                (p, text)
            })
            .collect();

        if tokens.is_empty() {
            return candidates.into_iter().map(|(p, _)| p).collect();
        }

        let all_tokens: Vec<Product> = candidates
            .iter()
            .filter(|(_, text)| tokens.iter().all(|t| text.contains(t.as_str())))
            .map(|(p, _)| p.clone())
            .collect();
        if !all_tokens.is_empty() {
            return all_tokens;
        }

        candidates
            .into_iter()
            .filter(|(_, text)| tokens.iter().any(|t| text.contains(t.as_str())))
            .map(|(p, _)| p)
            .collect()
    }

    /// Top in-stock products by rating, narrowed by category and weather.
    pub fn recommendations(
        &self,
        category: Option<&str>,
        weather: Option<WeatherCondition>,
    ) -> Vec<Product> {
        let base: Vec<Product> = self
            .all()
            .into_iter()
            .filter(|p| p.in_category(category))
            .collect();

        let mut picked = match weather {
            Some(condition) => {
                let matching: Vec<Product> = base
                    .iter()
                    .filter(|p| {
                        let text = p.haystack();
                        condition.keywords().iter().any(|k| text.contains(k))
                    })
                    .cloned()
                    .collect();
                if matching.is_empty() {
                    base
                } else {
                    matching
                }
            }
            None => base,
        };

        picked.retain(Product::in_stock);
        picked.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        picked.truncate(MAX_RECOMMENDATIONS);
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockStores;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_availability_from_stock() {
        let stores = MockStores::seeded();
        assert_eq!(stores.products.get("PROD005").unwrap().availability(), Availability::LowStock);
        assert_eq!(stores.products.get("PROD008").unwrap().availability(), Availability::OutOfStock);
        assert_eq!(stores.products.get("PROD001").unwrap().availability(), Availability::InStock);
    }

    #[test]
    fn test_search_requires_all_tokens_first() {
        let stores = MockStores::seeded();
        let found = stores.products.search("waterproof jacket", None);
        assert_eq!(ids(&found), vec!["PROD003"]);
    }

    #[test]
    fn test_search_falls_back_to_any_token() {
        let stores = MockStores::seeded();
        let found = stores.products.search("headphones umbrella", None);
        assert_eq!(ids(&found), vec!["PROD001", "PROD005"]);
    }

    #[test]
    fn test_search_with_category_filter() {
        let stores = MockStores::seeded();
        let found = stores.products.search("", Some("sports"));
        assert_eq!(ids(&found), vec!["PROD007", "PROD010"]);
        assert!(stores.products.search("headphones", Some("Books")).is_empty());
    }

    #[test]
    fn test_recommendations_rainy() {
        let stores = MockStores::seeded();
        let recs = stores.products.recommendations(None, Some(WeatherCondition::Rainy));
        assert_eq!(ids(&recs), vec!["PROD003", "PROD010", "PROD005"]);
    }

    #[test]
    fn test_recommendations_exclude_out_of_stock_and_cap() {
        let stores = MockStores::seeded();
        let recs = stores.products.recommendations(None, None);
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
        assert!(recs.iter().all(Product::in_stock));
        assert!(recs.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert!(stores.products.recommendations(Some("Books"), None).is_empty());
    }

    #[test]
    fn test_recommendations_weather_falls_back_to_category() {
        let stores = MockStores::seeded();
        let recs = stores
            .products
            .recommendations(Some("Electronics"), Some(WeatherCondition::Rainy));
        assert_eq!(ids(&recs), vec!["PROD001", "PROD002", "PROD009"]);
    }

    #[test]
    fn test_weather_condition_parsing() {
        assert_eq!("Light Rain".parse(), Ok(WeatherCondition::Rainy));
        assert_eq!("scattered clouds".parse(), Ok(WeatherCondition::Cloudy));
        assert_eq!("clear sky".parse(), Ok(WeatherCondition::Sunny));
        assert_eq!("thunderstorm".parse(), Ok(WeatherCondition::Stormy));
        assert!("foggy".parse::<WeatherCondition>().is_err());
    }
}
