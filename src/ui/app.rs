use std::mem;

use anyhow::{anyhow, bail, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::config::AppConfig;
use crate::db::{
    add_ingredient, add_invitee, cohort_totals, delete_ingredient, delete_invitee,
    fetch_ingredients, fetch_invitees, fetch_meals_for_date, fetch_menu, fetch_menu_dates,
    global_search, ingredient_summary, reset_ingredient, reset_invitee, total_headcount,
    update_cohort_split, update_ingredient, update_ingredient_status, update_invitee,
    update_menu_items, SearchKind, Store,
};
use crate::models::{format_quantity, DeliveryStatus, Dietary, Ingredient, Invitee, TRAVEL_OPTIONS};

use super::forms::{ConfirmDelete, FieldForm};
use super::helpers::{centered_rect, cohort_line, list_label, summary_line, surface_error};
use super::screens::{GuestScreen, IngredientScreen, MenuScreen, SearchScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const TABS_HEIGHT: u16 = 3;
/// Bordered header holding two lines of list context.
const HEADER_HEIGHT: u16 = 4;
const PAGE_SIZE: isize = 10;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Tab {
    Ingredients,
    Guests,
    Menus,
    Search,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Ingredients, Tab::Guests, Tab::Menus, Tab::Search];

    fn title(self) -> &'static str {
        match self {
            Tab::Ingredients => "Ingredients",
            Tab::Guests => "Guests",
            Tab::Menus => "Menus",
            Tab::Search => "Search",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Tab {
        let len = Tab::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len) as usize;
        Tab::ALL[next]
    }
}

/// Fine-grained modes scoped to the current tab.
enum Mode {
    Normal,
    Filtering(String),
    Querying,
    AddingIngredient(FieldForm),
    EditingIngredient {
        item_name: String,
        form: FieldForm,
    },
    MarkingIncomplete {
        item_name: String,
        ordered: f64,
        form: FieldForm,
    },
    AddingGuest(FieldForm),
    EditingCohort {
        name: String,
        lunch: i64,
        form: FieldForm,
    },
    RenamingDish {
        index: usize,
        form: FieldForm,
    },
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: Store,
    tab: Tab,
    ingredients: IngredientScreen,
    guests: GuestScreen,
    menus: MenuScreen,
    search: SearchScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: Store, config: &AppConfig) -> Self {
        let mut app = Self {
            tab: Tab::Ingredients,
            ingredients: IngredientScreen::new(config.ingredient_lists.clone()),
            guests: GuestScreen::new(config.invitee_lists.clone()),
            menus: MenuScreen::default(),
            search: SearchScreen::default(),
            mode: Mode::Normal,
            status: None,
            store,
        };

        app.reload_ingredients(None);
        app.reload_guests(None);
        app.reload_menus();

        if !app.store.is_ready() {
            app.set_status(
                "Database unavailable; nothing will be saved. See the log for details.",
                StatusKind::Error,
            );
        }
        app
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Filtering(query) => self.handle_filter(code, query),
            Mode::Querying => self.handle_query(code),
            Mode::AddingIngredient(form) => self.handle_form(
                code,
                form,
                "Add ingredient",
                Self::save_new_ingredient,
                Mode::AddingIngredient,
            ),
            Mode::EditingIngredient { item_name, form } => {
                let reopen_name = item_name.clone();
                self.handle_form(
                    code,
                    form,
                    "Edit",
                    move |app, form| app.save_edited_ingredient(&item_name, form),
                    move |form| Mode::EditingIngredient {
                        item_name: reopen_name,
                        form,
                    },
                )
            }
            Mode::MarkingIncomplete {
                item_name,
                ordered,
                form,
            } => {
                let reopen_name = item_name.clone();
                self.handle_form(
                    code,
                    form,
                    "Status change",
                    move |app, form| app.save_incomplete(&item_name, ordered, form),
                    move |form| Mode::MarkingIncomplete {
                        item_name: reopen_name,
                        ordered,
                        form,
                    },
                )
            }
            Mode::AddingGuest(form) => self.handle_form(
                code,
                form,
                "Add guest",
                Self::save_new_guest,
                Mode::AddingGuest,
            ),
            Mode::EditingCohort { name, lunch, form } => {
                let reopen_name = name.clone();
                self.handle_form(
                    code,
                    form,
                    "Cohort edit",
                    move |app, form| app.save_cohort_split(&name, lunch, form),
                    move |form| Mode::EditingCohort {
                        name: reopen_name,
                        lunch,
                        form,
                    },
                )
            }
            Mode::RenamingDish { index, form } => self.handle_form(
                code,
                form,
                "Rename",
                move |app, form| app.save_dish_rename(index, form),
                move |form| Mode::RenamingDish { index, form },
            ),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Ctrl+C quits from any mode.
    pub(crate) fn handle_interrupt(&mut self) -> bool {
        info!("interrupt received, leaving");
        self.mode = Mode::Normal;
        true
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Esc => {
                if !self.clear_active_filter() {
                    *exit = true;
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Tab => {
                self.switch_tab(self.tab.offset(1));
                return Ok(Mode::Normal);
            }
            KeyCode::BackTab => {
                self.switch_tab(self.tab.offset(-1));
                return Ok(Mode::Normal);
            }
            KeyCode::Char(ch @ '1'..='4') => {
                let index = ch as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index]);
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        let mode = match self.tab {
            Tab::Ingredients => self.handle_ingredient_key(code),
            Tab::Guests => self.handle_guest_key(code),
            Tab::Menus => self.handle_menu_key(code),
            Tab::Search => self.handle_search_key(code),
        };
        Ok(mode)
    }

    fn handle_ingredient_key(&mut self, code: KeyCode) -> Mode {
        let rows = &mut self.ingredients.rows;
        match code {
            KeyCode::Up => rows.move_selection(-1),
            KeyCode::Down => rows.move_selection(1),
            KeyCode::PageUp => rows.move_selection(-PAGE_SIZE),
            KeyCode::PageDown => rows.move_selection(PAGE_SIZE),
            KeyCode::Home => rows.select_first(),
            KeyCode::End => rows.select_last(),
            KeyCode::Left | KeyCode::Char('[') => {
                self.ingredients.cycle_list(-1);
                self.reload_ingredients(None);
            }
            KeyCode::Right | KeyCode::Char(']') => {
                self.ingredients.cycle_list(1);
                self.reload_ingredients(None);
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                let query = rows.filter.clone().unwrap_or_default();
                return Mode::Filtering(query);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                if self.ingredients.current_list().is_some() {
                    return Mode::AddingIngredient(FieldForm::new_ingredient());
                }
                self.set_status("No ingredient list configured.", StatusKind::Error);
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.current_ingredient() {
                Ok(ingredient) => {
                    return Mode::EditingIngredient {
                        form: FieldForm::edit_ingredient(&ingredient),
                        item_name: ingredient.item_name,
                    }
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            KeyCode::Char('c') => {
                let result = self.mark_completed();
                self.report(result);
            }
            KeyCode::Char('i') => match self.current_ingredient() {
                Ok(ingredient) => {
                    return Mode::MarkingIncomplete {
                        form: FieldForm::undelivered(&ingredient),
                        ordered: ingredient.quantity,
                        item_name: ingredient.item_name,
                    }
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            KeyCode::Char('r') => {
                let result = self.reset_current_ingredient();
                self.report(result);
            }
            KeyCode::Char('d') | KeyCode::Delete => match self.current_ingredient() {
                Ok(ingredient) => {
                    return Mode::ConfirmDelete(ConfirmDelete::Ingredient {
                        list_name: ingredient.list_name,
                        item_name: ingredient.item_name,
                    })
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            _ => {}
        }
        Mode::Normal
    }

    fn handle_guest_key(&mut self, code: KeyCode) -> Mode {
        let rows = &mut self.guests.rows;
        match code {
            KeyCode::Up => rows.move_selection(-1),
            KeyCode::Down => rows.move_selection(1),
            KeyCode::PageUp => rows.move_selection(-PAGE_SIZE),
            KeyCode::PageDown => rows.move_selection(PAGE_SIZE),
            KeyCode::Home => rows.select_first(),
            KeyCode::End => rows.select_last(),
            KeyCode::Left | KeyCode::Char('[') => {
                self.guests.cycle_list(-1);
                self.reload_guests(None);
            }
            KeyCode::Right | KeyCode::Char(']') => {
                self.guests.cycle_list(1);
                self.reload_guests(None);
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                let query = rows.filter.clone().unwrap_or_default();
                return Mode::Filtering(query);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let result = self.adjust_lunch(1);
                self.report(result);
            }
            KeyCode::Char('-') => {
                let result = self.adjust_lunch(-1);
                self.report(result);
            }
            KeyCode::Char('t') => {
                let result = self.cycle_travel();
                self.report(result);
            }
            KeyCode::Char('c') => {
                if !self.guests.is_cohort_list() {
                    self.set_status("This list does not track a cohort.", StatusKind::Error);
                    return Mode::Normal;
                }
                match self.current_invitee() {
                    Ok(invitee) => {
                        return Mode::EditingCohort {
                            form: FieldForm::cohort_split(&invitee),
                            lunch: invitee.lunch,
                            name: invitee.name,
                        }
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
            }
            KeyCode::Char('a') => {
                if self.guests.current_list().is_some() {
                    return Mode::AddingGuest(FieldForm::new_guest(self.guests.is_cohort_list()));
                }
                self.set_status("No guest list configured.", StatusKind::Error);
            }
            KeyCode::Char('r') => {
                let result = self.reset_current_guest();
                self.report(result);
            }
            KeyCode::Char('d') | KeyCode::Delete => match self.current_invitee() {
                Ok(invitee) => {
                    return Mode::ConfirmDelete(ConfirmDelete::Guest {
                        list_name: invitee.list_name,
                        name: invitee.name,
                    })
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            _ => {}
        }
        Mode::Normal
    }

    fn handle_menu_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Up => self.menus.move_selection(-1),
            KeyCode::Down => self.menus.move_selection(1),
            KeyCode::Left => {
                self.menus.cycle_date(-1);
                self.reload_menus();
            }
            KeyCode::Right => {
                self.menus.cycle_date(1);
                self.reload_menus();
            }
            KeyCode::Char('[') => {
                self.menus.cycle_meal(-1);
                self.reload_menus();
            }
            KeyCode::Char(']') => {
                self.menus.cycle_meal(1);
                self.reload_menus();
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.menus.current_dish() {
                Some(dish) => {
                    return Mode::RenamingDish {
                        index: self.menus.selected,
                        form: FieldForm::dish(&dish.name),
                    }
                }
                None => self.set_status("No dish selected.", StatusKind::Error),
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.menus.current_dish() {
                Some(dish) => {
                    return Mode::ConfirmDelete(ConfirmDelete::Dish {
                        index: self.menus.selected,
                        name: dish.name.clone(),
                    })
                }
                None => self.set_status("No dish selected.", StatusKind::Error),
            },
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Enter => return Mode::Querying,
            KeyCode::Char('k') => {
                self.search.kind = self.search.kind.toggle();
                self.run_search();
            }
            KeyCode::Up => self.search.scroll_by(-1),
            KeyCode::Down => self.search.scroll_by(1),
            KeyCode::PageUp => self.search.scroll_by(-(PAGE_SIZE as i32)),
            KeyCode::PageDown => self.search.scroll_by(PAGE_SIZE as i32),
            _ => {}
        }
        Mode::Normal
    }

    /// Live filter over the current ingredient or guest list.
    fn handle_filter(&mut self, code: KeyCode, mut query: String) -> Mode {
        let rows_filter = |app: &mut Self, filter: Option<String>| match app.tab {
            Tab::Ingredients => app.ingredients.rows.set_filter(filter),
            Tab::Guests => app.guests.rows.set_filter(filter),
            _ => {}
        };

        match code {
            KeyCode::Esc => {
                rows_filter(self, None);
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.move_rows(-1),
            KeyCode::Down => self.move_rows(1),
            KeyCode::Backspace => {
                query.pop();
                rows_filter(self, Some(query.clone()));
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                query.push(ch);
                rows_filter(self, Some(query.clone()));
            }
            _ => {}
        }
        Mode::Filtering(query)
    }

    /// Edit the global search query; results refresh on every keystroke.
    fn handle_query(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Normal,
            KeyCode::Backspace => {
                self.search.query.pop();
                self.run_search();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                self.search.query.push(ch);
                self.run_search();
            }
            _ => {}
        }
        Mode::Querying
    }

    fn handle_form(
        &mut self,
        code: KeyCode,
        mut form: FieldForm,
        action: &str,
        save: impl FnOnce(&mut Self, &FieldForm) -> Result<()>,
        reopen: impl FnOnce(FieldForm) -> Mode,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status(format!("{action} cancelled."), StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match save(self, &form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        reopen(form)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Mode::Normal,
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Mode::ConfirmDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Ingredients => self.draw_ingredients(frame, chunks[1]),
            Tab::Guests => self.draw_guests(frame, chunks[1]),
            Tab::Menus => self.draw_menus(frame, chunks[1]),
            Tab::Search => self.draw_search(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingIngredient(form) => self.draw_form(frame, area, "Add Ingredient", form),
            Mode::EditingIngredient { item_name, form } => {
                self.draw_form(frame, area, &format!("Edit {item_name}"), form)
            }
            Mode::MarkingIncomplete {
                item_name, form, ..
            } => self.draw_form(frame, area, &format!("{item_name}: not delivered"), form),
            Mode::AddingGuest(form) => self.draw_form(frame, area, "Add Guest", form),
            Mode::EditingCohort { name, form, .. } => {
                self.draw_form(frame, area, &format!("{name}: SAKTI travel"), form)
            }
            Mode::RenamingDish { form, .. } => self.draw_form(frame, area, "Rename Dish", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Filtering(query) => self.draw_input_bar(frame, chunks[1], "Filter", query),
            Mode::Querying => self.draw_input_bar(frame, chunks[1], "Search", &self.search.query),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL).title("Feast Ledger"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn split_header(&self, area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
            .split(area);
        (chunks[0], chunks[1])
    }

    fn draw_ingredients(&self, frame: &mut Frame, area: Rect) {
        let screen = &self.ingredients;
        let Some(list) = screen.current_list() else {
            let message = Paragraph::new("No ingredient lists configured.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        };

        let (header_area, list_area) = self.split_header(area);
        let header = Paragraph::new(vec![
            self.list_heading(&list.label, screen.list_index, screen.lists.len(), screen.rows.filter.as_deref()),
            Line::from(summary_line(&screen.summary)),
        ])
        .block(Block::default().borders(Borders::ALL).title("Ingredients"));
        frame.render_widget(header, header_area);

        let empty_message = if screen.rows.items.is_empty() {
            Some("No ingredients in this list. Press 'a' to add one.")
        } else if screen.rows.filtered.is_empty() {
            Some("No ingredients match the current filter.")
        } else {
            None
        };
        if let Some(text) = empty_message {
            self.draw_empty(frame, list_area, text);
            return;
        }

        let items: Vec<ListItem> = screen.rows.visible().map(ingredient_item).collect();
        self.draw_list(frame, list_area, items, screen.rows.selected);
    }

    fn draw_guests(&self, frame: &mut Frame, area: Rect) {
        let screen = &self.guests;
        let Some(list) = screen.current_list() else {
            let message = Paragraph::new("No guest lists configured.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        };

        let (header_area, list_area) = self.split_header(area);
        let mut totals = format!("Total headcount {}", screen.total);
        if let Some(cohort) = &screen.cohort {
            totals.push_str("   ");
            totals.push_str(&cohort_line(cohort));
        }
        let header = Paragraph::new(vec![
            self.list_heading(&list.label, screen.list_index, screen.lists.len(), screen.rows.filter.as_deref()),
            Line::from(totals),
        ])
        .block(Block::default().borders(Borders::ALL).title("Guests"));
        frame.render_widget(header, header_area);

        let empty_message = if screen.rows.items.is_empty() {
            Some("No guests in this list. Press 'a' to add one.")
        } else if screen.rows.filtered.is_empty() {
            Some("No guests match the current filter.")
        } else {
            None
        };
        if let Some(text) = empty_message {
            self.draw_empty(frame, list_area, text);
            return;
        }

        let cohort = screen.is_cohort_list();
        let items: Vec<ListItem> = screen
            .rows
            .visible()
            .map(|invitee| invitee_item(invitee, cohort))
            .collect();
        self.draw_list(frame, list_area, items, screen.rows.selected);
    }

    fn draw_menus(&self, frame: &mut Frame, area: Rect) {
        let screen = &self.menus;
        let (header_area, list_area) = self.split_header(area);

        let date_line = match screen.current_date() {
            Some(date) => format!(
                "Date {date} ({}/{})   Meal {}",
                screen.date_index + 1,
                screen.dates.len(),
                screen.current_meal().unwrap_or("-")
            ),
            None => "No menus loaded.".to_string(),
        };
        let headcount_line = screen
            .menu
            .as_ref()
            .map(|menu| format!("Headcount {}   {} dishes", menu.headcount, screen.dishes.len()))
            .unwrap_or_default();
        let header = Paragraph::new(vec![Line::from(date_line), Line::from(headcount_line)])
            .block(Block::default().borders(Borders::ALL).title("Menus"));
        frame.render_widget(header, header_area);

        if screen.dishes.is_empty() {
            self.draw_empty(frame, list_area, "No dishes for this meal.");
            return;
        }

        let items: Vec<ListItem> = screen
            .dishes
            .iter()
            .map(|dish| {
                let dietary_style = match dish.dietary {
                    Dietary::Veg => Style::default().fg(Color::Green),
                    Dietary::NonVeg => Style::default().fg(Color::Red),
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<32}", dish.name)),
                    Span::styled(
                        format!("[{}] ", dish.category.label()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(format!("[{}]", dish.dietary.label()), dietary_style),
                ]))
            })
            .collect();
        self.draw_list(frame, list_area, items, screen.selected);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let (header_area, results_area) = self.split_header(area);
        let header = Paragraph::new(vec![
            Line::from(format!("Query: {}", self.search.query)),
            Line::from(format!("Searching {}", self.search.kind.label())),
        ])
        .block(Block::default().borders(Borders::ALL).title("Search"));
        frame.render_widget(header, header_area);

        let block = Block::default().borders(Borders::ALL).title("Results");
        if self.search.query.trim().is_empty() {
            let paragraph = Paragraph::new("Press / to type a search term.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, results_area);
            return;
        }
        if self.search.results.is_empty() {
            let paragraph = Paragraph::new("No matches.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, results_area);
            return;
        }

        let lists = match self.search.kind {
            SearchKind::Ingredients => &self.ingredients.lists,
            SearchKind::Invitees => &self.guests.lists,
        };
        let lines: Vec<Line> = self
            .search
            .display_lines(|key| list_label(lists, key))
            .into_iter()
            .map(|(is_heading, text)| {
                if is_heading {
                    Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
                } else {
                    Line::from(text)
                }
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Results ({})", self.search.results.total())),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.search.scroll, 0));
        frame.render_widget(paragraph, results_area);
    }

    fn list_heading(&self, label: &str, index: usize, count: usize, filter: Option<&str>) -> Line<'static> {
        let mut spans = vec![
            Span::styled(label.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  ({}/{})", index + 1, count)),
        ];
        if let Some(filter) = filter.filter(|q| !q.trim().is_empty()) {
            spans.push(Span::styled(
                format!("  filter: {filter}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }

    fn draw_empty(&self, frame: &mut Frame, area: Rect, text: &str) {
        let message = Paragraph::new(text.to_string())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect, items: Vec<ListItem>, selected: usize) {
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_input_bar(&self, frame: &mut Frame, area: Rect, title: &str, value: &str) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let prefix = format!("{title}: ");
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let paragraph = Paragraph::new(Span::raw(format!("{prefix}{value}")))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + prefix.len() as u16 + value.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.mode, self.tab) {
            (Mode::Filtering(_), _) | (Mode::Querying, _) => &[
                ("[Enter]", "Keep"),
                ("[Esc]", "Close"),
                ("[↑↓]", "Navigate"),
            ],
            (Mode::ConfirmDelete(_), _) => &[("[y]", "Confirm"), ("[n]", "Cancel")],
            (Mode::Normal, Tab::Ingredients) => &[
                ("[←→]", "List"),
                ("[/]", "Filter"),
                ("[c]", "Complete"),
                ("[i]", "Incomplete"),
                ("[e]", "Edit"),
                ("[a]", "Add"),
                ("[d]", "Delete"),
                ("[r]", "Reset"),
                ("[Tab]", "Next tab"),
                ("[q]", "Quit"),
            ],
            (Mode::Normal, Tab::Guests) => &[
                ("[←→]", "List"),
                ("[/]", "Filter"),
                ("[+/-]", "Lunch"),
                ("[t]", "Travel"),
                ("[c]", "Cohort"),
                ("[a]", "Add"),
                ("[d]", "Delete"),
                ("[r]", "Reset"),
                ("[Tab]", "Next tab"),
                ("[q]", "Quit"),
            ],
            (Mode::Normal, Tab::Menus) => &[
                ("[←→]", "Date"),
                ("[[ ]]", "Meal"),
                ("[↑↓]", "Dish"),
                ("[e]", "Rename"),
                ("[d]", "Remove"),
                ("[Tab]", "Next tab"),
                ("[q]", "Quit"),
            ],
            (Mode::Normal, Tab::Search) => &[
                ("[/]", "Type query"),
                ("[k]", "Ingredients/Guests"),
                ("[↑↓]", "Scroll"),
                ("[Tab]", "Next tab"),
                ("[q]", "Quit"),
            ],
            _ => &[
                ("[Enter]", "Save"),
                ("[Tab]", "Next field"),
                ("[Esc]", "Cancel"),
            ],
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, action) in keys {
            spans.push(Span::styled(key.to_string(), key_style));
            spans.push(Span::raw(format!(" {action}   ")));
        }
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &FieldForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len())
            .map(|index| form.build_line(index))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset() as u16;
        let cursor_y = inner.y + form.active as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(confirm.prompt()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Show the error of a failed action in the footer.
    fn report(&mut self, result: Result<()>) {
        if let Err(err) = result {
            self.set_status(surface_error(&err), StatusKind::Error);
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clear_status();
        match tab {
            Tab::Ingredients => self.reload_ingredients(None),
            Tab::Guests => self.reload_guests(None),
            Tab::Menus => self.reload_menus(),
            Tab::Search => self.run_search(),
        }
    }

    /// Returns `true` if a filter was active and has been cleared.
    fn clear_active_filter(&mut self) -> bool {
        let rows_filtered = match self.tab {
            Tab::Ingredients => self.ingredients.rows.has_filter(),
            Tab::Guests => self.guests.rows.has_filter(),
            _ => false,
        };
        if rows_filtered {
            match self.tab {
                Tab::Ingredients => self.ingredients.rows.set_filter(None),
                Tab::Guests => self.guests.rows.set_filter(None),
                _ => {}
            }
        }
        rows_filtered
    }

    fn move_rows(&mut self, offset: isize) {
        match self.tab {
            Tab::Ingredients => self.ingredients.rows.move_selection(offset),
            Tab::Guests => self.guests.rows.move_selection(offset),
            _ => {}
        }
    }

    fn reload_ingredients(&mut self, focus: Option<&str>) {
        let Some(list) = self.ingredients.list_key() else {
            return;
        };
        let items = fetch_ingredients(&self.store, &list);
        self.ingredients.rows.set_items(
            items,
            focus.map(|name| move |ingredient: &Ingredient| ingredient.item_name == name),
        );
        self.ingredients.summary = ingredient_summary(&self.store, &list);
    }

    fn reload_guests(&mut self, focus: Option<&str>) {
        let Some(list) = self.guests.list_key() else {
            return;
        };
        let items = fetch_invitees(&self.store, &list);
        self.guests.rows.set_items(
            items,
            focus.map(|name| move |invitee: &Invitee| invitee.name == name),
        );
        self.guests.total = total_headcount(&self.store, &list);
        self.guests.cohort = self
            .guests
            .is_cohort_list()
            .then(|| cohort_totals(&self.store, &list));
    }

    fn reload_menus(&mut self) {
        let screen = &mut self.menus;
        screen.dates = fetch_menu_dates(&self.store);
        if screen.date_index >= screen.dates.len() {
            screen.date_index = 0;
        }

        screen.meals = match screen.current_date() {
            Some(date) => fetch_meals_for_date(&self.store, date),
            None => Vec::new(),
        };
        if screen.meal_index >= screen.meals.len() {
            screen.meal_index = 0;
        }

        let menu = match (screen.current_date(), screen.current_meal()) {
            (Some(date), Some(meal)) => fetch_menu(&self.store, date, meal),
            _ => None,
        };
        screen.set_menu(menu);
    }

    fn run_search(&mut self) {
        self.search.results = global_search(&self.store, &self.search.query, self.search.kind);
        self.search.scroll = 0;
    }

    fn current_ingredient(&self) -> Result<Ingredient> {
        self.ingredients
            .rows
            .current()
            .cloned()
            .ok_or_else(|| anyhow!("No ingredient selected."))
    }

    fn current_invitee(&self) -> Result<Invitee> {
        self.guests
            .rows
            .current()
            .cloned()
            .ok_or_else(|| anyhow!("No guest selected."))
    }

    fn ingredient_list(&self) -> Result<String> {
        self.ingredients
            .list_key()
            .ok_or_else(|| anyhow!("No ingredient list configured."))
    }

    fn guest_list(&self) -> Result<String> {
        self.guests
            .list_key()
            .ok_or_else(|| anyhow!("No guest list configured."))
    }

    fn save_new_ingredient(&mut self, form: &FieldForm) -> Result<()> {
        let (item_name, quantity, unit) = form.parse_new_ingredient()?;
        let list = self.ingredient_list()?;
        if !add_ingredient(&self.store, &list, &item_name, quantity, &unit) {
            bail!("Could not add '{item_name}'; it may already be in this list.");
        }
        self.reload_ingredients(Some(item_name.as_str()));
        self.set_status(format!("Added {item_name}."), StatusKind::Info);
        Ok(())
    }

    fn save_edited_ingredient(&mut self, item_name: &str, form: &FieldForm) -> Result<()> {
        let (quantity, unit) = form.parse_edited_ingredient()?;
        let list = self.ingredient_list()?;
        if !update_ingredient(&self.store, &list, item_name, quantity, &unit) {
            bail!("Could not update {item_name}.");
        }
        self.reload_ingredients(Some(item_name));
        self.set_status(
            format!("{item_name} now {}.", format_quantity(quantity, &unit)),
            StatusKind::Info,
        );
        Ok(())
    }

    fn mark_completed(&mut self) -> Result<()> {
        let ingredient = self.current_ingredient()?;
        if !update_ingredient_status(
            &self.store,
            &ingredient.list_name,
            &ingredient.item_name,
            DeliveryStatus::Completed,
            0.0,
        ) {
            bail!("Could not update {}.", ingredient.item_name);
        }
        self.reload_ingredients(Some(ingredient.item_name.as_str()));
        self.set_status(
            format!("{} marked completed.", ingredient.item_name),
            StatusKind::Info,
        );
        Ok(())
    }

    /// The stored quantity under `Incomplete` is what is still outstanding.
    fn save_incomplete(&mut self, item_name: &str, ordered: f64, form: &FieldForm) -> Result<()> {
        let undelivered = form.parse_undelivered(ordered)?;
        let list = self.ingredient_list()?;
        if !update_ingredient_status(
            &self.store,
            &list,
            item_name,
            DeliveryStatus::Incomplete,
            undelivered,
        ) {
            bail!("Could not update {item_name}.");
        }
        self.reload_ingredients(Some(item_name));
        self.set_status(
            format!("{item_name} marked incomplete, {undelivered} outstanding."),
            StatusKind::Info,
        );
        Ok(())
    }

    fn reset_current_ingredient(&mut self) -> Result<()> {
        let ingredient = self.current_ingredient()?;
        if !reset_ingredient(&self.store, &ingredient.list_name, &ingredient.item_name) {
            bail!("Could not reset {}.", ingredient.item_name);
        }
        self.reload_ingredients(Some(ingredient.item_name.as_str()));
        self.set_status(
            format!("{} reset to its original order.", ingredient.item_name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_new_guest(&mut self, form: &FieldForm) -> Result<()> {
        let input = form.parse_new_guest()?;
        let list = self.guest_list()?;
        if !add_invitee(
            &self.store,
            &list,
            &input.name,
            input.lunch,
            input.to_sakti,
            None,
        ) {
            bail!("Could not add '{}'; it may already be in this list.", input.name);
        }
        self.reload_guests(Some(input.name.as_str()));
        self.set_status(format!("Added {}.", input.name), StatusKind::Info);
        Ok(())
    }

    /// Step lunch by `delta`. Lunch never drops below one or below the
    /// party's cohort size.
    fn adjust_lunch(&mut self, delta: i64) -> Result<()> {
        let invitee = self.current_invitee()?;
        let lunch = invitee.lunch + delta;
        if lunch < 1 {
            bail!("Lunch cannot go below 1.");
        }
        if invitee.to_sakti.is_some_and(|to_sakti| to_sakti > lunch) {
            bail!("Lower To SAKTI before reducing lunch below it.");
        }

        let (to_sakti, travel_by) = if self.guests.is_cohort_list() {
            (invitee.to_sakti, invitee.travel_by.as_deref())
        } else {
            (None, None)
        };
        if !update_invitee(
            &self.store,
            &invitee.list_name,
            &invitee.name,
            lunch,
            to_sakti,
            travel_by,
        ) {
            bail!("Could not update {}.", invitee.name);
        }
        self.reload_guests(Some(invitee.name.as_str()));
        self.set_status(format!("{} lunch: {lunch}.", invitee.name), StatusKind::Info);
        Ok(())
    }

    fn cycle_travel(&mut self) -> Result<()> {
        if !self.guests.is_cohort_list() {
            bail!("This list does not track travel.");
        }
        let invitee = self.current_invitee()?;
        let next = match invitee
            .travel_by
            .as_deref()
            .and_then(|current| TRAVEL_OPTIONS.iter().position(|option| *option == current))
        {
            Some(position) => TRAVEL_OPTIONS[(position + 1) % TRAVEL_OPTIONS.len()],
            None => TRAVEL_OPTIONS[0],
        };

        if !update_invitee(
            &self.store,
            &invitee.list_name,
            &invitee.name,
            invitee.lunch,
            invitee.to_sakti,
            Some(next),
        ) {
            bail!("Could not update {}.", invitee.name);
        }
        self.reload_guests(Some(invitee.name.as_str()));
        self.set_status(format!("{} travels by {next}.", invitee.name), StatusKind::Info);
        Ok(())
    }

    fn save_cohort_split(&mut self, name: &str, lunch: i64, form: &FieldForm) -> Result<()> {
        let split = form.parse_cohort_split(lunch)?;
        let list = self.guest_list()?;
        if !update_cohort_split(&self.store, &list, name, split.to_sakti, split.bus, split.car) {
            bail!("Could not update {name}.");
        }
        self.reload_guests(Some(name));
        self.set_status(format!("Updated SAKTI travel for {name}."), StatusKind::Info);
        Ok(())
    }

    fn reset_current_guest(&mut self) -> Result<()> {
        let invitee = self.current_invitee()?;
        if !reset_invitee(&self.store, &invitee.list_name, &invitee.name) {
            bail!("Could not reset {}.", invitee.name);
        }
        self.reload_guests(Some(invitee.name.as_str()));
        self.set_status(
            format!("{} reset to original headcount.", invitee.name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn save_dish_rename(&mut self, index: usize, form: &FieldForm) -> Result<()> {
        let name = form.parse_dish()?;
        let menu = self
            .menus
            .menu
            .clone()
            .ok_or_else(|| anyhow!("No menu selected."))?;
        let blob = menu
            .rename_dish(index, &name)
            .ok_or_else(|| anyhow!("That dish is no longer on the menu."))?;
        if !update_menu_items(&self.store, &menu.date, &menu.meal, &blob) {
            bail!("Could not update the {} menu.", menu.meal);
        }
        self.reload_menus();
        self.set_status(format!("Renamed to {name}."), StatusKind::Info);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        match confirm {
            ConfirmDelete::Ingredient {
                list_name,
                item_name,
            } => {
                if !delete_ingredient(&self.store, list_name, item_name) {
                    bail!("Could not delete {item_name}.");
                }
                self.reload_ingredients(None);
                self.set_status(format!("Deleted {item_name}."), StatusKind::Info);
            }
            ConfirmDelete::Guest { list_name, name } => {
                if !delete_invitee(&self.store, list_name, name) {
                    bail!("Could not delete {name}.");
                }
                self.reload_guests(None);
                self.set_status(format!("Deleted {name}."), StatusKind::Info);
            }
            ConfirmDelete::Dish { index, name } => {
                let menu = self
                    .menus
                    .menu
                    .clone()
                    .ok_or_else(|| anyhow!("No menu selected."))?;
                let blob = menu
                    .remove_dish(*index)
                    .ok_or_else(|| anyhow!("That dish is no longer on the menu."))?;
                if !update_menu_items(&self.store, &menu.date, &menu.meal, &blob) {
                    bail!("Could not update the {} menu.", menu.meal);
                }
                self.reload_menus();
                self.set_status(format!("Removed {name}."), StatusKind::Info);
            }
        }
        Ok(())
    }
}

fn ingredient_item(ingredient: &Ingredient) -> ListItem<'static> {
    let status_style = match ingredient.status {
        DeliveryStatus::Completed => Style::default().fg(Color::Green),
        DeliveryStatus::Incomplete => Style::default().fg(Color::Red),
        DeliveryStatus::NotStarted => Style::default().fg(Color::DarkGray),
    };

    let mut spans = vec![
        Span::raw(format!("{:<32}", ingredient.item_name)),
        Span::raw(format!("{:<14}", ingredient.quantity_display())),
        Span::styled(ingredient.status.badge().to_string(), status_style),
    ];
    if ingredient.status == DeliveryStatus::Incomplete {
        spans.push(Span::styled(
            format!(
                "  ({} not delivered)",
                format_quantity(ingredient.delivered_quantity, &ingredient.unit)
            ),
            Style::default().fg(Color::Yellow),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn invitee_item(invitee: &Invitee, cohort: bool) -> ListItem<'static> {
    let mut spans = vec![
        Span::raw(format!("{:<32}", invitee.name)),
        Span::raw(format!("lunch {:<4}", invitee.lunch)),
    ];
    if invitee.lunch != invitee.original_lunch {
        spans.push(Span::styled(
            format!(" (was {})", invitee.original_lunch),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if cohort {
        if let Some(to_sakti) = invitee.to_sakti {
            spans.push(Span::styled(
                format!(
                    "   SAKTI {to_sakti}: bus {} car {} unsure {}",
                    invitee.bus_sakti.unwrap_or(0),
                    invitee.car_sakti.unwrap_or(0),
                    invitee.unsure_sakti().unwrap_or(0)
                ),
                Style::default().fg(Color::Cyan),
            ));
        }
        if let Some(travel_by) = &invitee.travel_by {
            spans.push(Span::raw(format!("   [{travel_by}]")));
        }
    }
    ListItem::new(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::config::ListConfig;

    fn test_app() -> (TempDir, App) {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().join("ledger.sqlite"), Duration::from_secs(5));
        let config = AppConfig {
            ingredient_lists: vec![ListConfig {
                key: "Local-List".to_string(),
                label: "Local List".to_string(),
                cohort: false,
            }],
            invitee_lists: vec![ListConfig {
                key: "Barati".to_string(),
                label: "Barati".to_string(),
                cohort: true,
            }],
            ..AppConfig::default()
        };
        (dir, App::new(store, &config))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).expect("key");
        }
    }

    #[test]
    fn tabs_wrap_in_both_directions() {
        assert_eq!(Tab::Ingredients.offset(-1).title(), "Search");
        assert_eq!(Tab::Search.offset(1).title(), "Ingredients");
    }

    #[test]
    fn add_form_saves_ingredient_and_focuses_it() {
        let (_dir, mut app) = test_app();
        app.handle_key(KeyCode::Char('a')).expect("open form");
        type_text(&mut app, "Rice");
        app.handle_key(KeyCode::Tab).expect("next field");
        type_text(&mut app, "50");
        app.handle_key(KeyCode::Tab).expect("next field");
        type_text(&mut app, "kg");
        app.handle_key(KeyCode::Enter).expect("save");

        assert!(matches!(app.mode, Mode::Normal));
        let current = app.ingredients.rows.current().expect("selected row");
        assert_eq!(current.item_name, "Rice");
        assert_eq!(app.ingredients.summary.not_started, 1);
    }

    #[test]
    fn lunch_never_drops_below_cohort_size() {
        let (_dir, mut app) = test_app();
        assert!(add_invitee(&app.store, "Barati", "Asha", 3, Some(3), Some("Bus")));
        app.switch_tab(Tab::Guests);

        app.handle_key(KeyCode::Char('-')).expect("key");
        let asha = app.guests.rows.current().expect("selected row");
        assert_eq!(asha.lunch, 3);
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));

        app.handle_key(KeyCode::Char('+')).expect("key");
        let asha = app.guests.rows.current().expect("selected row");
        assert_eq!(asha.lunch, 4);
        assert_eq!(asha.travel_by.as_deref(), Some("Bus"));
        assert_eq!(app.guests.total, 4);
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let (_dir, mut app) = test_app();
        assert!(add_ingredient(&app.store, "Local-List", "Salt", 5.0, "kg"));
        app.reload_ingredients(None);

        app.handle_key(KeyCode::Char('d')).expect("key");
        app.handle_key(KeyCode::Char('n')).expect("key");
        assert_eq!(app.ingredients.rows.items.len(), 1);

        app.handle_key(KeyCode::Char('d')).expect("key");
        app.handle_key(KeyCode::Char('y')).expect("key");
        assert!(app.ingredients.rows.items.is_empty());
    }

    #[test]
    fn escape_clears_filter_before_quitting() {
        let (_dir, mut app) = test_app();
        app.handle_key(KeyCode::Char('/')).expect("key");
        type_text(&mut app, "ri");
        app.handle_key(KeyCode::Enter).expect("key");
        assert!(app.ingredients.rows.has_filter());

        assert!(!app.handle_key(KeyCode::Esc).expect("key"));
        assert!(!app.ingredients.rows.has_filter());
        assert!(app.handle_key(KeyCode::Esc).expect("key"));
    }
}
