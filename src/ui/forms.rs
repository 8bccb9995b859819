use anyhow::{anyhow, bail, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Ingredient, Invitee};

/// Input accepted by a single form field.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum FieldKind {
    Text,
    /// Non-negative decimal.
    Real,
    /// Non-negative whole number.
    Integer,
}

#[derive(Clone, Debug)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
}

impl FormField {
    fn new(label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            label,
            value: String::new(),
            kind,
            required,
        }
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Popup form made of labelled fields, one of which has focus.
#[derive(Clone, Debug)]
pub(crate) struct FieldForm {
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl FieldForm {
    fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            active: 0,
            error: None,
        }
    }

    pub(crate) fn new_ingredient() -> Self {
        Self::new(vec![
            FormField::new("Item", FieldKind::Text, true),
            FormField::new("Quantity", FieldKind::Real, true),
            FormField::new("Unit", FieldKind::Text, true),
        ])
    }

    /// Quantity and unit only; the item name is the record's identity.
    pub(crate) fn edit_ingredient(ingredient: &Ingredient) -> Self {
        Self::new(vec![
            FormField::new("Quantity", FieldKind::Real, true)
                .with_value(trim_real(ingredient.quantity)),
            FormField::new("Unit", FieldKind::Text, true).with_value(ingredient.unit.clone()),
        ])
    }

    pub(crate) fn undelivered(ingredient: &Ingredient) -> Self {
        Self::new(vec![FormField::new("Undelivered", FieldKind::Real, true)
            .with_value(trim_real(ingredient.quantity))])
    }

    /// Cohort lists also ask how many of the party travel with the cohort.
    pub(crate) fn new_guest(cohort: bool) -> Self {
        let mut fields = vec![
            FormField::new("Name", FieldKind::Text, true),
            FormField::new("Lunch", FieldKind::Integer, true),
        ];
        if cohort {
            fields.push(FormField::new("To SAKTI", FieldKind::Integer, false));
        }
        Self::new(fields)
    }

    pub(crate) fn cohort_split(invitee: &Invitee) -> Self {
        let text = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();
        Self::new(vec![
            FormField::new("To SAKTI", FieldKind::Integer, false).with_value(text(invitee.to_sakti)),
            FormField::new("Bus", FieldKind::Integer, false).with_value(text(invitee.bus_sakti)),
            FormField::new("Car", FieldKind::Integer, false).with_value(text(invitee.car_sakti)),
        ])
    }

    pub(crate) fn dish(name: &str) -> Self {
        Self::new(vec![
            FormField::new("Dish", FieldKind::Text, true).with_value(name.to_string())
        ])
    }

    /// Cycle focus forward through the fields.
    pub(crate) fn toggle_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    /// Append a character to the active field if its kind accepts it.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.fields.get_mut(self.active) else {
            return false;
        };
        let accepted = match field.kind {
            FieldKind::Text => !ch.is_control(),
            FieldKind::Real => ch.is_ascii_digit() || (ch == '.' && !field.value.contains('.')),
            FieldKind::Integer => ch.is_ascii_digit(),
        };
        if accepted {
            field.value.push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    /// Render one field; the focused field is highlighted.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let Some(field) = self.fields.get(index) else {
            return Line::from("");
        };
        let is_active = index == self.active;

        let display = if field.value.is_empty() {
            if field.required {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Column where the cursor sits on the active field's line.
    pub(crate) fn cursor_offset(&self) -> usize {
        self.fields
            .get(self.active)
            .map(|field| field.label.len() + 2 + field.value.chars().count())
            .unwrap_or(0)
    }

    fn text(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|field| field.value.trim())
            .unwrap_or("")
    }

    fn label(&self, index: usize) -> &'static str {
        self.fields.get(index).map(|field| field.label).unwrap_or("Value")
    }

    fn required_text(&self, index: usize) -> Result<String> {
        let value = self.text(index);
        if value.is_empty() {
            bail!("{} is required.", self.label(index));
        }
        Ok(value.to_string())
    }

    fn real(&self, index: usize) -> Result<f64> {
        let raw = self.required_text(index)?;
        raw.parse::<f64>()
            .map_err(|_| anyhow!("{} must be a number.", self.label(index)))
    }

    /// Ordered quantities are strictly positive.
    fn quantity(&self, index: usize) -> Result<f64> {
        let value = self.real(index)?;
        if value <= 0.0 {
            bail!("{} must be greater than zero.", self.label(index));
        }
        Ok(value)
    }

    fn integer(&self, index: usize) -> Result<i64> {
        let raw = self.required_text(index)?;
        raw.parse::<i64>()
            .map_err(|_| anyhow!("{} must be a whole number.", self.label(index)))
    }

    fn optional_integer(&self, index: usize) -> Result<Option<i64>> {
        if self.text(index).is_empty() {
            Ok(None)
        } else {
            self.integer(index).map(Some)
        }
    }

    /// `(item, quantity, unit)` from [`FieldForm::new_ingredient`].
    pub(crate) fn parse_new_ingredient(&self) -> Result<(String, f64, String)> {
        let item = self.required_text(0)?;
        let quantity = self.quantity(1)?;
        let unit = self.required_text(2)?;
        Ok((item, quantity, unit))
    }

    /// `(quantity, unit)` from [`FieldForm::edit_ingredient`].
    pub(crate) fn parse_edited_ingredient(&self) -> Result<(f64, String)> {
        Ok((self.quantity(0)?, self.required_text(1)?))
    }

    /// Undelivered amount, bounded by the ordered quantity.
    pub(crate) fn parse_undelivered(&self, ordered: f64) -> Result<f64> {
        let undelivered = self.real(0)?;
        if undelivered > ordered {
            return Err(anyhow!(
                "Undelivered quantity cannot exceed the ordered {ordered}."
            ));
        }
        Ok(undelivered)
    }

    pub(crate) fn parse_new_guest(&self) -> Result<GuestInput> {
        let name = self.required_text(0)?;
        let lunch = self.integer(1)?;
        if lunch < 1 {
            bail!("Lunch must be at least 1.");
        }
        let to_sakti = if self.fields.len() > 2 {
            self.optional_integer(2)?
        } else {
            None
        };
        if to_sakti.is_some_and(|to_sakti| to_sakti > lunch) {
            bail!("To SAKTI cannot exceed lunch ({lunch}).");
        }
        Ok(GuestInput {
            name,
            lunch,
            to_sakti,
        })
    }

    /// Validate `bus + car <= to_sakti <= lunch`.
    pub(crate) fn parse_cohort_split(&self, lunch: i64) -> Result<CohortSplit> {
        let split = CohortSplit {
            to_sakti: self.optional_integer(0)?,
            bus: self.optional_integer(1)?,
            car: self.optional_integer(2)?,
        };

        let assigned = split
            .bus
            .unwrap_or(0)
            .checked_add(split.car.unwrap_or(0))
            .ok_or_else(|| anyhow!("Bus + car is too large."))?;
        match split.to_sakti {
            Some(to_sakti) if to_sakti > lunch => {
                bail!("To SAKTI cannot exceed lunch ({lunch}).")
            }
            Some(to_sakti) if assigned > to_sakti => {
                bail!("Bus + car ({assigned}) cannot exceed To SAKTI ({to_sakti}).")
            }
            None if assigned > 0 => bail!("Set To SAKTI before splitting by bus and car."),
            _ => Ok(split),
        }
    }

    pub(crate) fn parse_dish(&self) -> Result<String> {
        let name = self.required_text(0)?;
        if name.contains(',') {
            bail!("Dish names cannot contain commas.");
        }
        Ok(name)
    }
}

fn trim_real(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GuestInput {
    pub(crate) name: String,
    pub(crate) lunch: i64,
    pub(crate) to_sakti: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CohortSplit {
    pub(crate) to_sakti: Option<i64>,
    pub(crate) bus: Option<i64>,
    pub(crate) car: Option<i64>,
}

/// What a pending delete confirmation refers to.
#[derive(Clone, Debug)]
pub(crate) enum ConfirmDelete {
    Ingredient { list_name: String, item_name: String },
    Guest { list_name: String, name: String },
    Dish { index: usize, name: String },
}

impl ConfirmDelete {
    pub(crate) fn prompt(&self) -> String {
        match self {
            ConfirmDelete::Ingredient { item_name, .. } => format!("Delete ingredient '{item_name}'?"),
            ConfirmDelete::Guest { name, .. } => format!("Delete guest '{name}'?"),
            ConfirmDelete::Dish { name, .. } => format!("Remove '{name}' from this menu?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(mut form: FieldForm, values: &[&str]) -> FieldForm {
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = value.to_string();
        }
        form
    }

    #[test]
    fn numeric_fields_reject_letters() {
        let mut form = FieldForm::new_ingredient();
        form.toggle_field();
        assert!(!form.push_char('x'));
        assert!(form.push_char('1'));
        assert!(form.push_char('.'));
        assert!(!form.push_char('.'));
        assert!(form.push_char('5'));
        assert_eq!(form.fields[1].value, "1.5");
    }

    #[test]
    fn new_ingredient_requires_every_field() {
        let form = filled(FieldForm::new_ingredient(), &["Rice", "50", ""]);
        let err = form.parse_new_ingredient().unwrap_err();
        assert_eq!(err.to_string(), "Unit is required.");

        let form = filled(FieldForm::new_ingredient(), &[" Rice ", "50", "kg"]);
        assert_eq!(
            form.parse_new_ingredient().unwrap(),
            ("Rice".to_string(), 50.0, "kg".to_string())
        );
    }

    #[test]
    fn undelivered_is_bounded_by_quantity() {
        let form = filled(
            FieldForm::new(vec![FormField::new("Undelivered", FieldKind::Real, true)]),
            &["12"],
        );
        assert!(form.parse_undelivered(10.0).is_err());
        assert_eq!(form.parse_undelivered(12.0).unwrap(), 12.0);
    }

    #[test]
    fn guest_cohort_cannot_exceed_lunch() {
        let form = filled(FieldForm::new_guest(true), &["Asha", "4", "5"]);
        assert!(form.parse_new_guest().is_err());

        let form = filled(FieldForm::new_guest(true), &["Asha", "4", ""]);
        assert_eq!(form.parse_new_guest().unwrap().to_sakti, None);
    }

    #[test]
    fn guest_needs_positive_lunch() {
        let form = filled(FieldForm::new_guest(false), &["Asha", "0"]);
        assert!(form.parse_new_guest().is_err());
    }

    #[test]
    fn cohort_split_checks_both_bounds() {
        let base = FieldForm::new(vec![
            FormField::new("To SAKTI", FieldKind::Integer, false),
            FormField::new("Bus", FieldKind::Integer, false),
            FormField::new("Car", FieldKind::Integer, false),
        ]);

        let ok = filled(base.clone(), &["4", "2", "1"]);
        assert_eq!(
            ok.parse_cohort_split(6).unwrap(),
            CohortSplit {
                to_sakti: Some(4),
                bus: Some(2),
                car: Some(1),
            }
        );
        assert!(filled(base.clone(), &["7", "", ""]).parse_cohort_split(6).is_err());
        assert!(filled(base.clone(), &["3", "2", "2"]).parse_cohort_split(6).is_err());
        assert!(filled(base, &["", "1", ""]).parse_cohort_split(6).is_err());
    }

    #[test]
    fn huge_bus_and_car_counts_are_an_error() {
        let base = FieldForm::new(vec![
            FormField::new("To SAKTI", FieldKind::Integer, false),
            FormField::new("Bus", FieldKind::Integer, false),
            FormField::new("Car", FieldKind::Integer, false),
        ]);
        let form = filled(base, &["4", "9000000000000000000", "9000000000000000000"]);
        let err = form.parse_cohort_split(6).unwrap_err();
        assert_eq!(err.to_string(), "Bus + car is too large.");
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let added = filled(FieldForm::new_ingredient(), &["Rice", "0", "kg"]);
        assert!(added.parse_new_ingredient().is_err());

        let edit_form = FieldForm::new(vec![
            FormField::new("Quantity", FieldKind::Real, true),
            FormField::new("Unit", FieldKind::Text, true),
        ]);
        let edited = filled(edit_form, &["0.0", "kg"]);
        assert!(edited.parse_edited_ingredient().is_err());

        let ok = filled(FieldForm::new_ingredient(), &["Rice", "0.5", "kg"]);
        assert_eq!(ok.parse_new_ingredient().unwrap().1, 0.5);
    }

    #[test]
    fn dish_names_cannot_split_the_blob() {
        assert!(filled(FieldForm::dish(""), &["Fish, Fry"]).parse_dish().is_err());
        assert_eq!(
            filled(FieldForm::dish(""), &[" Fish Fry "]).parse_dish().unwrap(),
            "Fish Fry"
        );
    }
}
