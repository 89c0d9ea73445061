//! Shopping list aggregation
//!
//! Merges the ingredient quantities of every recipe in a user's cart into one
//! consolidated list, summing amounts for repeated ingredient names.

/// One line of the aggregated shopping list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

/// Aggregate ingredient quantities by ingredient name
///
/// Entries are merged in input order: the first occurrence of a name fixes its
/// position and its measurement unit, later occurrences only add to the amount.
/// Amounts are summed by name alone; a name reused with a different unit is
/// still merged under the first-seen unit.
pub fn aggregate(entries: impl IntoIterator<Item = ShoppingItem>) -> Vec<ShoppingItem> {
    let mut items: Vec<ShoppingItem> = Vec::new();
    for entry in entries {
        match items.iter().position(|item| item.name == entry.name) {
            Some(i) => items[i].amount += entry.amount,
            None => items.push(entry),
        }
    }
    items
}

/// Render the aggregated list as plain text, one line per ingredient
pub fn render(items: &[ShoppingItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "{} - {} {}\n",
            item.name, item.amount, item.measurement_unit
        ));
    }
    out
}
