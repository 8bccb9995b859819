//! Row types for the three ledger tables plus the read-time dish view.
//! Callers hold snapshots; the store owns the rows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// Delivery state of an ingredient. The stored text matches what earlier
/// databases wrote, so existing files keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryStatus {
    #[default]
    NotStarted,
    Completed,
    Incomplete,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::NotStarted => "Not Started",
            DeliveryStatus::Completed => "Completed",
            DeliveryStatus::Incomplete => "Incomplete",
        }
    }

    /// Short badge used in list views.
    pub fn badge(&self) -> &'static str {
        match self {
            DeliveryStatus::NotStarted => "○ Not Started",
            DeliveryStatus::Completed => "✓ Completed",
            DeliveryStatus::Incomplete => "✗ Incomplete",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown delivery status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for DeliveryStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" => Ok(DeliveryStatus::NotStarted),
            "Completed" => Ok(DeliveryStatus::Completed),
            "Incomplete" => Ok(DeliveryStatus::Incomplete),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl ToSql for DeliveryStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DeliveryStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// One ingredient row scoped to a named list.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    /// Owning list, e.g. `Local-List`.
    pub list_name: String,
    /// Unique within its list.
    pub item_name: String,
    /// Ordered amount, in `unit`.
    pub quantity: f64,
    pub unit: String,
    /// Zero when completed; the undelivered remainder when incomplete.
    pub delivered_quantity: f64,
    pub status: DeliveryStatus,
    /// Baseline captured at insert; only read by reset.
    pub original_quantity: f64,
    pub created_at: NaiveDateTime,
}

impl Ingredient {
    pub fn quantity_display(&self) -> String {
        format_quantity(self.quantity, &self.unit)
    }
}

/// Render `50 kg` instead of `50.0 kg` while keeping real fractions intact.
pub fn format_quantity(quantity: f64, unit: &str) -> String {
    if quantity.fract() == 0.0 {
        format!("{} {}", quantity as i64, unit)
    } else {
        format!("{quantity} {unit}")
    }
}

/// Guest party with an adjustable lunch headcount.
#[derive(Debug, Clone, PartialEq)]
pub struct Invitee {
    pub id: i64,
    /// Guest category the party belongs to.
    pub list_name: String,
    /// Party name, unique within its list.
    pub name: String,
    /// Current lunch headcount for the party.
    pub lunch: i64,
    /// Part of the party travelling with the cohort, cohort lists only.
    pub to_sakti: Option<i64>,
    /// One of [`TRAVEL_OPTIONS`] once chosen.
    pub travel_by: Option<String>,
    /// Cohort members going by bus.
    pub bus_sakti: Option<i64>,
    /// Cohort members going by car.
    pub car_sakti: Option<i64>,
    /// Headcount as imported; restored by reset.
    pub original_lunch: i64,
    pub created_at: NaiveDateTime,
}

impl Invitee {
    /// Cohort members without a chosen vehicle. Recomputed on every read and
    /// floored at zero so stale sub-counts never show a negative number.
    pub fn unsure_sakti(&self) -> Option<i64> {
        let to_sakti = self.to_sakti?;
        let assigned = self.bus_sakti.unwrap_or(0).saturating_add(self.car_sakti.unwrap_or(0));
        Some((to_sakti - assigned).max(0))
    }
}

/// Travel choices offered by the guest screen for cohort lists.
pub const TRAVEL_OPTIONS: [&str; 3] = ["Bus", "Car", "Not"];

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub id: i64,
    /// Date as written in the source sheet, `dd/mm/yy`.
    pub date: String,
    /// Meal name, unique per date.
    pub meal: String,
    /// Plates expected for this meal.
    pub headcount: i64,
    /// Dish names separated by newlines and/or commas.
    pub menu_items: String,
    pub created_at: NaiveDateTime,
}

impl Menu {
    pub fn dishes(&self) -> Vec<Dish> {
        split_dishes(&self.menu_items)
            .into_iter()
            .map(Dish::classify)
            .collect()
    }

    /// Blob with the dish at `index` renamed, or `None` when out of range.
    pub fn rename_dish(&self, index: usize, name: &str) -> Option<String> {
        let mut names = split_dishes(&self.menu_items);
        let slot = names.get_mut(index)?;
        *slot = name.trim().to_string();
        Some(names.join("\n"))
    }

    /// Blob with the dish at `index` removed, or `None` when out of range.
    pub fn remove_dish(&self, index: usize) -> Option<String> {
        let mut names = split_dishes(&self.menu_items);
        if index >= names.len() {
            return None;
        }
        names.remove(index);
        Some(names.join("\n"))
    }
}

fn split_dishes(blob: &str) -> Vec<String> {
    blob.split(['\n', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishCategory {
    Sweet,
    Beverage,
    Staple,
    Main,
}

impl DishCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DishCategory::Sweet => "Sweet",
            DishCategory::Beverage => "Beverage",
            DishCategory::Staple => "Staple",
            DishCategory::Main => "Main",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dietary {
    Veg,
    NonVeg,
}

impl Dietary {
    pub fn label(&self) -> &'static str {
        match self {
            Dietary::Veg => "Veg",
            Dietary::NonVeg => "Non-veg",
        }
    }
}

const SWEET_KEYWORDS: &[&str] = &[
    "sweet", "dessert", "mishti", "rasgulla", "rosogolla", "sandesh", "payesh", "kheer",
    "halwa", "ice cream", "doi", "jalebi", "gulab",
];
const BEVERAGE_KEYWORDS: &[&str] = &[
    "tea", "coffee", "juice", "lassi", "sherbet", "sharbat", "water", "drink", "soda",
];
const STAPLE_KEYWORDS: &[&str] = &[
    "rice", "pulao", "biryani", "luchi", "puri", "roti", "naan", "paratha", "bread", "dal",
];
const NON_VEG_KEYWORDS: &[&str] = &[
    "fish", "mach", "mutton", "mangsho", "chicken", "egg", "dim", "prawn", "chingri", "meat",
    "keema",
];

/// Read-time view of one menu entry; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    pub name: String,
    pub category: DishCategory,
    pub dietary: Dietary,
}

impl Dish {
    pub fn classify(name: String) -> Self {
        let lower = name.to_lowercase();
        let has_word = |keywords: &[&str]| {
            keywords.iter().any(|keyword| {
                lower
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| word == *keyword)
                    || (keyword.contains(' ') && lower.contains(keyword))
            })
        };

        let category = if has_word(SWEET_KEYWORDS) {
            DishCategory::Sweet
        } else if has_word(BEVERAGE_KEYWORDS) {
            DishCategory::Beverage
        } else if has_word(STAPLE_KEYWORDS) {
            DishCategory::Staple
        } else {
            DishCategory::Main
        };
        let dietary = if has_word(NON_VEG_KEYWORDS) {
            Dietary::NonVeg
        } else {
            Dietary::Veg
        };

        Self {
            name,
            category,
            dietary,
        }
    }
}
