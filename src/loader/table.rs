//! Rectangular CSV input and the typed rows parsed out of it.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Why a row was left out of a bulk load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("missing value for '{0}'")]
    MissingField(&'static str),
    #[error("'{value}' is not a valid number for '{field}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("name is blank")]
    BlankName,
    #[error("repeated header row")]
    HeaderRow,
    #[error("summary row")]
    SummaryRow,
    #[error("duplicate of an earlier row")]
    Duplicate,
}

/// Headers plus rows of optional cells. Header names are trimmed and empty
/// cells read as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Read CSV with a header line. Rows the parser rejects outright are
    /// logged and dropped; ragged rows are kept.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    warn!(error = %err, "skipping malformed CSV row");
                    continue;
                }
            };
            rows.push(record.iter().map(cell).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Open and read a CSV file; see [`Table::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Build a table in memory, mostly for tests and programmatic imports.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<&str>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.trim().to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(cell).collect())
                .collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in file order, each addressable by column name.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            headers: &self.headers,
            cells,
        })
    }
}

fn cell(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// One row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [Option<String>],
}

impl<'a> Record<'a> {
    /// `true` when the header exists, even if this row leaves it empty.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }

    /// Cell under `name`; `None` when the column is absent, the row is short,
    /// or the cell is empty.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|header| header == name)?;
        self.cells.get(index)?.as_deref()
    }

    fn require(&self, name: &'static str) -> Result<&'a str, SkipReason> {
        self.get(name).ok_or(SkipReason::MissingField(name))
    }
}

fn parse_real(field: &'static str, raw: &str) -> Result<f64, SkipReason> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SkipReason::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Integers may arrive as `4.0` from spreadsheet exports; anything with a
/// fractional part, or outside the `i64` range, is rejected.
fn parse_integer(field: &'static str, raw: &str) -> Result<i64, SkipReason> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
        Ok(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(SkipReason::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRow {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
}

impl IngredientRow {
    pub fn parse(record: &Record<'_>) -> Result<Self, SkipReason> {
        let name = record.require("Item Name")?;
        let quantity = record.require("Quantity")?;
        let unit = record.require("Unit")?;

        let item_name = name.trim();
        if item_name.is_empty() {
            return Err(SkipReason::BlankName);
        }

        Ok(Self {
            item_name: item_name.to_string(),
            quantity: parse_real("Quantity", quantity)?,
            unit: unit.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InviteeRow {
    pub name: String,
    pub lunch: i64,
    pub to_sakti: Option<i64>,
    pub travel_by: Option<String>,
}

impl InviteeRow {
    /// Guest exports carry repeated `Index` header lines and a trailing
    /// `117 Total` line; both are skipped.
    pub fn parse(record: &Record<'_>) -> Result<Self, SkipReason> {
        let name = record.require("Name")?.trim();
        let lunch = record.require("Lunch")?;

        if name.is_empty() {
            return Err(SkipReason::BlankName);
        }
        let lowered = name.to_lowercase();
        if lowered.starts_with("index") {
            return Err(SkipReason::HeaderRow);
        }
        if lowered.ends_with("total") {
            return Err(SkipReason::SummaryRow);
        }

        let lunch = parse_integer("Lunch", lunch)?;
        let to_sakti = record
            .get("To SAKTI")
            .map(|raw| parse_integer("To SAKTI", raw))
            .transpose()?;
        let travel_by = record
            .get("Travel By")
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            lunch,
            to_sakti,
            travel_by,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuRow {
    pub date: String,
    pub meal: String,
    pub headcount: i64,
    pub menu_items: String,
}

impl MenuRow {
    pub fn parse(record: &Record<'_>) -> Result<Self, SkipReason> {
        let date = record.require("Date")?.trim();
        let meal = record.require("Meal")?.trim();
        let headcount = parse_integer("Headcount", record.require("Headcount")?)?;
        let menu_items = record.require("Menu Items")?;

        Ok(Self {
            date: date.to_string(),
            meal: meal.to_string(),
            headcount,
            menu_items: menu_items.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_row(table: &Table) -> Record<'_> {
        table.records().next().unwrap()
    }

    #[test]
    fn headers_are_trimmed() {
        let csv = " Item Name ,Quantity , Unit\nRice,50,kg\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.headers(), ["Item Name", "Quantity", "Unit"]);
        assert_eq!(first_row(&table).get("Unit"), Some("kg"));
    }

    #[test]
    fn short_rows_read_as_missing() {
        let csv = "Item Name,Quantity,Unit\nRice,50\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        let row = first_row(&table);
        assert!(row.has_column("Unit"));
        assert_eq!(row.get("Unit"), None);
        assert_eq!(
            IngredientRow::parse(&row),
            Err(SkipReason::MissingField("Unit"))
        );
    }

    #[test]
    fn ingredient_fields_are_trimmed() {
        let table = Table::from_rows(
            &["Item Name", "Quantity", "Unit"],
            vec![vec!["  Basmati Rice ", " 12.5", " kg "]],
        );
        let row = IngredientRow::parse(&first_row(&table)).unwrap();
        assert_eq!(row.item_name, "Basmati Rice");
        assert_eq!(row.quantity, 12.5);
        assert_eq!(row.unit, "kg");
    }

    #[test]
    fn ingredient_rejects_bad_quantity() {
        let table = Table::from_rows(
            &["Item Name", "Quantity", "Unit"],
            vec![vec!["Salt", "a lot", "kg"], vec!["   ", "1", "kg"]],
        );
        let reasons: Vec<_> = table
            .records()
            .map(|record| IngredientRow::parse(&record))
            .collect();
        assert!(matches!(
            reasons[0],
            Err(SkipReason::InvalidNumber { field: "Quantity", .. })
        ));
        assert_eq!(reasons[1], Err(SkipReason::BlankName));
    }

    #[test]
    fn invitee_skips_header_and_summary_lines() {
        let table = Table::from_rows(
            &["Name", "Lunch"],
            vec![vec!["Index", "0"], vec!["117 Total", "117"], vec!["", "2"]],
        );
        let reasons: Vec<_> = table
            .records()
            .map(|record| InviteeRow::parse(&record))
            .collect();
        assert_eq!(reasons[0], Err(SkipReason::HeaderRow));
        assert_eq!(reasons[1], Err(SkipReason::SummaryRow));
        assert_eq!(reasons[2], Err(SkipReason::MissingField("Name")));
    }

    #[test]
    fn invitee_cohort_columns_are_optional() {
        let table = Table::from_rows(
            &["Name", "Lunch", "To SAKTI", "Travel By"],
            vec![vec!["Asha", "4.0", "2", " Bus "], vec!["Ravi", "3", "", ""]],
        );
        let rows: Vec<_> = table
            .records()
            .map(|record| InviteeRow::parse(&record).unwrap())
            .collect();
        assert_eq!(rows[0].lunch, 4);
        assert_eq!(rows[0].to_sakti, Some(2));
        assert_eq!(rows[0].travel_by.as_deref(), Some("Bus"));
        assert_eq!(rows[1].to_sakti, None);
        assert_eq!(rows[1].travel_by, None);
    }

    #[test]
    fn invitee_rejects_fractional_lunch() {
        let table = Table::from_rows(&["Name", "Lunch"], vec![vec!["Asha", "2.5"]]);
        assert!(matches!(
            InviteeRow::parse(&first_row(&table)),
            Err(SkipReason::InvalidNumber { field: "Lunch", .. })
        ));
    }

    #[test]
    fn integers_outside_i64_range_are_rejected() {
        for raw in ["1e30", "-1e30", "9223372036854775808.0", "inf", "NaN"] {
            assert!(
                matches!(
                    parse_integer("Lunch", raw),
                    Err(SkipReason::InvalidNumber { field: "Lunch", .. })
                ),
                "{raw} should be rejected"
            );
        }
        assert_eq!(parse_integer("Lunch", "1e3"), Ok(1000));
        assert_eq!(parse_integer("Lunch", "-4.0"), Ok(-4));
    }

    #[test]
    fn invitee_rejects_non_numeric_cohort() {
        let table = Table::from_rows(
            &["Name", "Lunch", "To SAKTI"],
            vec![vec!["Asha", "4", "some"]],
        );
        assert!(matches!(
            InviteeRow::parse(&first_row(&table)),
            Err(SkipReason::InvalidNumber { field: "To SAKTI", .. })
        ));
    }

    #[test]
    fn menu_items_are_kept_verbatim() {
        let table = Table::from_rows(
            &["Date", "Meal", "Headcount", "Menu Items"],
            vec![vec![" 05/12/25 ", "Lunch ", "120", "Luchi, Aloo Dum\nFish Fry "]],
        );
        let row = MenuRow::parse(&first_row(&table)).unwrap();
        assert_eq!(row.date, "05/12/25");
        assert_eq!(row.meal, "Lunch");
        assert_eq!(row.menu_items, "Luchi, Aloo Dum\nFish Fry ");
    }
}
