use crate::config::ListConfig;
use crate::db::{CohortTotals, DeliverySummary, SearchKind, SearchResults};
use crate::models::{Dish, Ingredient, Invitee, Menu};

/// Records plus the subset matching the current filter, with a selection
/// into that subset.
pub(crate) struct FilteredList<T> {
    pub(crate) items: Vec<T>,
    pub(crate) filtered: Vec<usize>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
    matches: fn(&T, &str) -> bool,
}

impl<T> FilteredList<T> {
    pub(crate) fn new(matches: fn(&T, &str) -> bool) -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            filter: None,
            selected: 0,
            matches,
        }
    }

    pub(crate) fn apply_filter(&mut self) {
        let query = self
            .filter
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .unwrap_or_default();

        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| query.is_empty() || (self.matches)(item, &query))
            .map(|(index, _)| index)
            .collect();

        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
        self.apply_filter();
    }

    pub(crate) fn has_filter(&self) -> bool {
        self.filter
            .as_ref()
            .map(|q| !q.trim().is_empty())
            .unwrap_or(false)
    }

    /// Replace the records and keep the cursor on `focus` when it is still
    /// visible.
    pub(crate) fn set_items(&mut self, items: Vec<T>, focus: Option<impl Fn(&T) -> bool>) {
        self.items = items;
        self.apply_filter();
        if let Some(focus) = focus {
            if let Some(position) = self
                .filtered
                .iter()
                .position(|&index| focus(&self.items[index]))
            {
                self.selected = position;
            }
        }
    }

    pub(crate) fn visible(&self) -> impl Iterator<Item = &T> {
        self.filtered.iter().map(move |&index| &self.items[index])
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.filtered
            .get(self.selected)
            .and_then(|&index| self.items.get(index))
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        if self.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len() - 1;
        }
    }
}

/// Step through `len` entries, wrapping at both ends.
fn cycle_index(current: usize, len: usize, offset: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    ((current as isize + offset).rem_euclid(len)) as usize
}

fn ingredient_matches(ingredient: &Ingredient, query: &str) -> bool {
    ingredient.item_name.to_lowercase().contains(query)
}

fn invitee_matches(invitee: &Invitee, query: &str) -> bool {
    invitee.name.to_lowercase().contains(query)
}

pub(crate) struct IngredientScreen {
    pub(crate) lists: Vec<ListConfig>,
    pub(crate) list_index: usize,
    pub(crate) rows: FilteredList<Ingredient>,
    pub(crate) summary: DeliverySummary,
}

impl IngredientScreen {
    pub(crate) fn new(lists: Vec<ListConfig>) -> Self {
        Self {
            lists,
            list_index: 0,
            rows: FilteredList::new(ingredient_matches),
            summary: DeliverySummary::default(),
        }
    }

    pub(crate) fn current_list(&self) -> Option<&ListConfig> {
        self.lists.get(self.list_index)
    }

    pub(crate) fn list_key(&self) -> Option<String> {
        self.current_list().map(|list| list.key.clone())
    }

    /// Switch list; the filter is cleared because it rarely carries over.
    pub(crate) fn cycle_list(&mut self, offset: isize) {
        self.list_index = cycle_index(self.list_index, self.lists.len(), offset);
        self.rows.filter = None;
        self.rows.selected = 0;
    }
}

pub(crate) struct GuestScreen {
    pub(crate) lists: Vec<ListConfig>,
    pub(crate) list_index: usize,
    pub(crate) rows: FilteredList<Invitee>,
    pub(crate) total: i64,
    pub(crate) cohort: Option<CohortTotals>,
}

impl GuestScreen {
    pub(crate) fn new(lists: Vec<ListConfig>) -> Self {
        Self {
            lists,
            list_index: 0,
            rows: FilteredList::new(invitee_matches),
            total: 0,
            cohort: None,
        }
    }

    pub(crate) fn current_list(&self) -> Option<&ListConfig> {
        self.lists.get(self.list_index)
    }

    pub(crate) fn list_key(&self) -> Option<String> {
        self.current_list().map(|list| list.key.clone())
    }

    pub(crate) fn is_cohort_list(&self) -> bool {
        self.current_list().is_some_and(|list| list.cohort)
    }

    pub(crate) fn cycle_list(&mut self, offset: isize) {
        self.list_index = cycle_index(self.list_index, self.lists.len(), offset);
        self.rows.filter = None;
        self.rows.selected = 0;
    }
}

#[derive(Default)]
pub(crate) struct MenuScreen {
    pub(crate) dates: Vec<String>,
    pub(crate) date_index: usize,
    pub(crate) meals: Vec<String>,
    pub(crate) meal_index: usize,
    pub(crate) menu: Option<Menu>,
    pub(crate) dishes: Vec<Dish>,
    pub(crate) selected: usize,
}

impl MenuScreen {
    pub(crate) fn current_date(&self) -> Option<&str> {
        self.dates.get(self.date_index).map(String::as_str)
    }

    pub(crate) fn current_meal(&self) -> Option<&str> {
        self.meals.get(self.meal_index).map(String::as_str)
    }

    pub(crate) fn cycle_date(&mut self, offset: isize) {
        self.date_index = cycle_index(self.date_index, self.dates.len(), offset);
        self.meal_index = 0;
        self.selected = 0;
    }

    pub(crate) fn cycle_meal(&mut self, offset: isize) {
        self.meal_index = cycle_index(self.meal_index, self.meals.len(), offset);
        self.selected = 0;
    }

    pub(crate) fn set_menu(&mut self, menu: Option<Menu>) {
        self.dishes = menu.as_ref().map(Menu::dishes).unwrap_or_default();
        self.menu = menu;
        if self.selected >= self.dishes.len() {
            self.selected = self.dishes.len().saturating_sub(1);
        }
    }

    pub(crate) fn current_dish(&self) -> Option<&Dish> {
        self.dishes.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.dishes.is_empty() {
            return;
        }
        let len = self.dishes.len() as isize;
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }
}

pub(crate) struct SearchScreen {
    pub(crate) query: String,
    pub(crate) kind: SearchKind,
    pub(crate) results: SearchResults,
    pub(crate) scroll: u16,
}

impl Default for SearchScreen {
    fn default() -> Self {
        Self {
            query: String::new(),
            kind: SearchKind::default(),
            results: SearchResults::Ingredients(Vec::new()),
            scroll: 0,
        }
    }
}

impl SearchScreen {
    /// Flatten grouped results into display lines: a header per list followed
    /// by its hits.
    pub(crate) fn display_lines(&self, label_for: impl Fn(&str) -> String) -> Vec<(bool, String)> {
        let mut lines = Vec::new();
        match &self.results {
            SearchResults::Ingredients(groups) => {
                for group in groups {
                    lines.push((true, format!("{} ({})", label_for(&group.list_name), group.hits.len())));
                    for hit in &group.hits {
                        lines.push((
                            false,
                            format!(
                                "  {} - {} - {}",
                                hit.item_name,
                                hit.quantity_display(),
                                hit.status
                            ),
                        ));
                    }
                }
            }
            SearchResults::Invitees(groups) => {
                for group in groups {
                    lines.push((true, format!("{} ({})", label_for(&group.list_name), group.hits.len())));
                    for hit in &group.hits {
                        lines.push((false, format!("  {} - lunch {}", hit.name, hit.lunch)));
                    }
                }
            }
        }
        lines
    }

    pub(crate) fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).max(0);
        self.scroll = next.min(u16::MAX as i32) as u16;
    }
}
