//! Catalog filter composition: category by name equality, inclusive price
//! range, case-insensitive substring search on the product name. The filter
//! is stateless and order-preserving, so the predicates can be applied in
//! any order with the same result.

use serde::Deserialize;

use crate::entities::{category, product};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, prod: &product::Model, cat: Option<&category::Model>) -> bool {
        if let Some(name) = self.category.as_deref() {
            if cat.map(|c| c.name.as_str()) != Some(name) {
                return false;
            }
        }

        if let Some(min) = self.min {
            if prod.price < min {
                return false;
            }
        }

        if let Some(max) = self.max {
            if prod.price > max {
                return false;
            }
        }

        if let Some(term) = self.search.as_deref() {
            if !term.is_empty()
                && !prod.name.to_lowercase().contains(&term.to_lowercase())
            {
                return false;
            }
        }

        true
    }
}

pub fn filter_products(
    rows: Vec<(product::Model, Option<category::Model>)>,
    filter: &ProductFilter,
) -> Vec<(product::Model, Option<category::Model>)> {
    rows.into_iter()
        .filter(|(prod, cat)| filter.matches(prod, cat.as_ref()))
        .collect()
}
