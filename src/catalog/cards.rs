//! Catalog card model and the built-in card set

use crate::saved::SearchCriteria;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sport value that means "no sport filter"
pub const ALL_SPORTS: &str = "All Sports";

/// A card in the catalog with its market values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    pub id: u32,
    pub player: String,
    pub year: String,
    pub product: String,
    pub card_number: String,
    pub sport: String,
    pub image: String,
    /// Raw (ungraded) value in USD
    pub ungraded_value: u64,
    /// Value by grade label ("PSA 10", "BGS 9.5", ...)
    pub graded_values: BTreeMap<String, u64>,
}

impl CatalogCard {
    /// Whether this card satisfies every non-blank field of `criteria`.
    ///
    /// Player, product and card number match case-insensitively as
    /// substrings, year as a substring, sport exactly.
    pub fn matches(&self, criteria: &SearchCriteria) -> bool {
        contains_ci(&self.player, &criteria.player)
            && contains(&self.year, &criteria.year)
            && contains_ci(&self.product, &criteria.product)
            && contains_ci(&self.card_number, &criteria.card_number)
            && sport_matches(&self.sport, &criteria.sport)
    }

    /// Value at a grade label, if known
    pub fn graded_value(&self, grade: &str) -> Option<u64> {
        self.graded_values.get(grade).copied()
    }

    /// Year as a number, 0 if not numeric
    pub fn year_number(&self) -> i32 {
        self.year.trim().parse().unwrap_or(0)
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.contains(needle)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn sport_matches(sport: &str, wanted: &str) -> bool {
    let wanted = wanted.trim();
    wanted.is_empty() || wanted == ALL_SPORTS || sport == wanted
}

fn card(
    id: u32,
    player: &str,
    year: &str,
    product: &str,
    card_number: &str,
    sport: &str,
    ungraded_value: u64,
    graded: [u64; 4],
) -> CatalogCard {
    let labels = ["PSA 10", "PSA 9", "BGS 9.5", "SGC 10"];
    CatalogCard {
        id,
        player: player.to_string(),
        year: year.to_string(),
        product: product.to_string(),
        card_number: card_number.to_string(),
        sport: sport.to_string(),
        image: "/api/placeholder/300/400".to_string(),
        ungraded_value,
        graded_values: labels
            .iter()
            .map(|l| l.to_string())
            .zip(graded)
            .collect(),
    }
}

/// The built-in card set
pub fn builtin_cards() -> Vec<CatalogCard> {
    vec![
        card(
            1,
            "Michael Jordan",
            "1986",
            "Fleer",
            "#57",
            "Basketball",
            5000,
            [150000, 25000, 35000, 120000],
        ),
        card(
            2,
            "LeBron James",
            "2003",
            "Topps Chrome",
            "#111",
            "Basketball",
            2000,
            [75000, 15000, 20000, 60000],
        ),
        card(
            3,
            "Mike Trout",
            "2011",
            "Topps Update",
            "#US175",
            "Baseball",
            800,
            [12000, 3000, 4500, 10000],
        ),
        card(
            4,
            "Tom Brady",
            "2000",
            "Bowman Chrome",
            "#236",
            "Football",
            3000,
            [85000, 20000, 30000, 70000],
        ),
        card(
            5,
            "Wayne Gretzky",
            "1979",
            "O-Pee-Chee",
            "#18",
            "Hockey",
            1500,
            [45000, 12000, 18000, 40000],
        ),
    ]
}
