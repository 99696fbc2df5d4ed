//! Recipe catalog data models.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dietary restriction tag, shared by user profiles and recipe tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryRestriction {
    None,
    Vegetarian,
    Vegan,
    Halal,
    Kosher,
    Carnivore,
    GlutenFree,
    DairyFree,
    NutFree,
}

impl DietaryRestriction {
    pub const ALL: [DietaryRestriction; 9] = [
        Self::None,
        Self::Vegetarian,
        Self::Vegan,
        Self::Halal,
        Self::Kosher,
        Self::Carnivore,
        Self::GlutenFree,
        Self::DairyFree,
        Self::NutFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Halal => "halal",
            Self::Kosher => "kosher",
            Self::Carnivore => "carnivore",
            Self::GlutenFree => "gluten-free",
            Self::DairyFree => "dairy-free",
            Self::NutFree => "nut-free",
        }
    }
}

impl std::fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryRestriction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown dietary restriction: {s}"))
    }
}

/// A quantity of a named item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique within the owning recipe.
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Free-form, never converted.
    pub unit: String,
    /// Estimated unit price, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl Ingredient {
    pub fn new(id: &str, name: &str, amount: f64, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            amount,
            unit: unit.to_string(),
            price: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    /// Minutes.
    pub prep_time: u32,
    /// Minutes.
    pub cook_time: u32,
    pub dietary_tags: Vec<DietaryRestriction>,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Prep plus cook time, in minutes.
    pub fn total_time(&self) -> u32 {
        self.prep_time + self.cook_time
    }

    pub fn has_tag(&self, tag: DietaryRestriction) -> bool {
        self.dietary_tags.contains(&tag)
    }
}

/// A store groceries can be ordered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryStore {
    pub id: String,
    pub name: String,
    pub logo: String,
    /// Flat fee added to every order.
    pub delivery_fee: Decimal,
    pub min_order: Decimal,
    pub has_api: bool,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn dietary_restriction_serde_matches_display() {
        for tag in DietaryRestriction::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{tag}\""), "serde and Display differ for {tag:?}");
        }
    }

    #[test]
    fn dietary_restriction_from_str() {
        assert_eq!(
            "gluten-free".parse::<DietaryRestriction>().unwrap(),
            DietaryRestriction::GlutenFree
        );
        assert_eq!(
            "none".parse::<DietaryRestriction>().unwrap(),
            DietaryRestriction::None
        );
        assert!("gluten_free".parse::<DietaryRestriction>().is_err());
    }

    #[test]
    fn ingredient_price_is_optional_in_json() {
        let plain: Ingredient =
            serde_json::from_str(r#"{"id":"1","name":"Salt","amount":0.5,"unit":"tsp"}"#).unwrap();
        assert!(plain.price.is_none());
        assert!(!serde_json::to_string(&plain).unwrap().contains("price"));

        let priced = Ingredient::new("2", "Honey", 1.0, "tbsp").with_price(dec!(0.45));
        let json = serde_json::to_string(&priced).unwrap();
        let parsed: Ingredient = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.price, Some(dec!(0.45)));
    }
}
