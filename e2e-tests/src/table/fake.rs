//! An in-memory toolbar table, serving the PatternFly layout.

use super::TableLayout;
use crate::page::{Element, Locator, Page};
use crate::DriverError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nav {
    First,
    Previous,
    Next,
}

#[derive(Debug, Default)]
pub struct FakeTable {
    /// Labels, and whether the header renders a sort toggle instead of plain text.
    pub headers: Vec<(String, bool)>,
    pub rows: Vec<Vec<String>>,
    pub page_size: usize,
    /// Currently displayed page, 0-based.
    pub page: usize,
    /// Pages navigated to, 0-based, in order.
    pub visited: Vec<usize>,
    pub toggle_text: Option<String>,
    /// Show only the total, not the displayed range.
    pub total_only: bool,
    pub without_first_button: bool,
    pub next_never_disabled: bool,
    /// Page (0-based) on which "next" is disabled although more pages follow.
    pub next_disabled_on: Option<usize>,
    pub previous_always_enabled: bool,
    /// Page (0-based) rendered one row short.
    pub short_page: Option<usize>,
}

impl FakeTable {
    pub fn new(headers: &[&str], rows: Vec<Vec<String>>, page_size: usize) -> Self {
        Self {
            headers: headers.iter().map(|label| (label.to_string(), false)).collect(),
            rows,
            page_size,
            ..Default::default()
        }
    }

    fn pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    fn displayed(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(self.rows.len());
        let mut end = (start + self.page_size).min(self.rows.len());
        if self.short_page == Some(self.page) {
            end = end.saturating_sub(1).max(start);
        }
        start..end
    }

    fn toggle(&self) -> String {
        if let Some(text) = &self.toggle_text {
            return text.clone();
        }
        let total = self.rows.len();
        if self.total_only {
            return format!("of {total}");
        }
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        match total {
            0 => "0 - 0 of 0".to_string(),
            _ => format!("{} - {end} of {total}", start + 1),
        }
    }

    fn enabled(&self, nav: Nav) -> bool {
        match nav {
            Nav::Next => {
                (self.page + 1 < self.pages() || self.next_never_disabled)
                    && self.next_disabled_on != Some(self.page)
            }
            Nav::Previous => self.page > 0 || self.previous_always_enabled,
            Nav::First => self.page > 0,
        }
    }

    fn navigate(&mut self, nav: Nav) {
        if !self.enabled(nav) {
            return;
        }
        self.page = match nav {
            Nav::First => 0,
            Nav::Previous => self.page.saturating_sub(1),
            Nav::Next => (self.page + 1).min(self.pages() - 1),
        };
        self.visited.push(self.page);
    }
}

#[derive(Clone, Debug)]
enum Kind {
    Table,
    Pagination,
    Toggle,
    Nav(Nav),
    Row(usize),
    Cell(String),
    Header(usize),
    SortToggle(String),
}

#[derive(Clone)]
pub struct FakePage {
    pub state: Arc<Mutex<FakeTable>>,
    layout: Arc<TableLayout>,
}

impl FakePage {
    pub fn new(table: FakeTable, layout: TableLayout) -> Self {
        Self {
            state: Arc::new(Mutex::new(table)),
            layout: Arc::new(layout),
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut FakeTable) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    fn element(&self, kind: Kind) -> FakeElement {
        FakeElement {
            page: self.clone(),
            kind,
        }
    }
}

#[derive(Clone)]
pub struct FakeElement {
    page: FakePage,
    kind: Kind,
}

#[async_trait]
impl Page for FakePage {
    type Element = FakeElement;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>, DriverError> {
        let kind = if *locator == self.layout.table {
            Kind::Table
        } else if *locator == self.layout.pagination {
            Kind::Pagination
        } else {
            return Ok(vec![]);
        };
        Ok(vec![self.element(kind)])
    }

    async fn goto(&self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn current_url(&self) -> Result<Url, DriverError> {
        Ok(Url::parse("http://localhost:8080/").expect("valid url"))
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>, DriverError> {
        let layout = &self.page.layout;
        let kinds = self.page.with(|state| match &self.kind {
            Kind::Table if *locator == layout.rows => state.displayed().map(Kind::Row).collect(),
            Kind::Table if *locator == layout.headers => (0..state.headers.len()).map(Kind::Header).collect(),
            Kind::Row(index) if *locator == layout.cells => {
                state.rows[*index].iter().cloned().map(Kind::Cell).collect()
            }
            Kind::Header(index) if *locator == layout.sort_control => match &state.headers[*index] {
                (label, true) => vec![Kind::SortToggle(label.clone())],
                (_, false) => vec![],
            },
            Kind::Pagination if *locator == layout.toggle => vec![Kind::Toggle],
            Kind::Pagination if *locator == layout.next => vec![Kind::Nav(Nav::Next)],
            Kind::Pagination if *locator == layout.previous => vec![Kind::Nav(Nav::Previous)],
            Kind::Pagination if *locator == layout.first && !state.without_first_button => {
                vec![Kind::Nav(Nav::First)]
            }
            _ => vec![],
        });
        Ok(kinds.into_iter().map(|kind| self.page.element(kind)).collect())
    }

    async fn text(&self) -> Result<String, DriverError> {
        Ok(self.page.with(|state| match &self.kind {
            Kind::Toggle => state.toggle(),
            Kind::Cell(text) | Kind::SortToggle(text) => text.clone(),
            Kind::Header(index) => match &state.headers[*index] {
                (label, false) => label.clone(),
                // a sort toggle only: the label lives on the button
                (_, true) => String::new(),
            },
            _ => String::new(),
        }))
    }

    async fn attr(&self, _name: &str) -> Result<Option<String>, DriverError> {
        Ok(None)
    }

    async fn is_displayed(&self) -> Result<bool, DriverError> {
        Ok(true)
    }

    async fn is_enabled(&self) -> Result<bool, DriverError> {
        Ok(match self.kind {
            Kind::Nav(nav) => self.page.with(|state| state.enabled(nav)),
            _ => true,
        })
    }

    async fn click(&self) -> Result<(), DriverError> {
        if let Kind::Nav(nav) = self.kind {
            self.page.with(|state| state.navigate(nav));
        }
        Ok(())
    }

    async fn send_keys(&self, _text: &str) -> Result<(), DriverError> {
        Ok(())
    }
}
