//! Verification of PatternFly toolbar tables: a data table paired with a pagination toolbar.
//!
//! All checks read the live document. Nothing is cached between calls, and every call that
//! pages through the table puts it back on the page it started from before returning
//! successfully. After a failure the page position is undefined.

mod column;
mod pagination;
mod traverse;

#[cfg(test)]
mod fake;

pub use column::*;
pub use pagination::*;

use crate::error::Error;
use crate::page::{Element, Locator, Page};
use crate::wait::{self, Wait};
use crate::DriverError;
use std::collections::HashMap;

/// Where the parts of a toolbar table are found.
///
/// `table` and `pagination` are looked up in the page, `rows` and `headers` below the table,
/// `cells` below a row, `sort_control` below a header cell, and the remaining locators below
/// the pagination control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLayout {
    pub table: Locator,
    pub pagination: Locator,
    pub rows: Locator,
    pub cells: Locator,
    pub headers: Locator,
    pub sort_control: Locator,
    pub toggle: Locator,
    pub next: Locator,
    pub previous: Locator,
    pub first: Locator,
}

impl TableLayout {
    /// The markup PatternFly renders for a table labelled `name`, with the pagination control
    /// at the top carrying the id `<name-slug>-pagination-top`.
    pub fn patternfly(name: &str) -> Self {
        Self {
            table: Locator::css(format!("table[aria-label=\"{name}\"]")),
            pagination: Locator::id(format!("{}-pagination-top", slug(name))),
            rows: Locator::css("tbody tr"),
            cells: Locator::css("td"),
            headers: Locator::css("thead th"),
            sort_control: Locator::css("button"),
            toggle: Locator::css("[class*=\"pagination__page-menu\"]"),
            next: Locator::css("button[data-action=\"next\"]"),
            previous: Locator::css("button[data-action=\"previous\"]"),
            first: Locator::css("button[data-action=\"first\"]"),
        }
    }
}

fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Where a verification call currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Idle,
    /// Capturing the rows of a page, 1-based.
    Reading(usize),
    Verified,
    Failed,
}

pub(crate) trait TableContext<T> {
    fn table(self, name: &str) -> Result<T, Error>;
}

impl<T> TableContext<T> for Result<T, DriverError> {
    fn table(self, name: &str) -> Result<T, Error> {
        self.map_err(|err| Error::driver(name, err))
    }
}

/// A paginated, sortable table of a page.
///
/// The verification calls take `&mut self`: paging is a side effect visible to everyone
/// looking at the table, so one table must not be verified from two places at once.
pub struct ToolbarTable<'p, P: Page> {
    page: &'p P,
    name: String,
    layout: TableLayout,
    wait: Wait,
    kinds: HashMap<String, ColumnKind>,
    key_column: usize,
    unique_rows: bool,
    progress: Progress,
}

impl<'p, P: Page> ToolbarTable<'p, P> {
    pub fn new(page: &'p P, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            page,
            layout: TableLayout::patternfly(&name),
            name,
            wait: Wait::default(),
            kinds: HashMap::new(),
            key_column: 0,
            unique_rows: true,
            progress: Progress::Idle,
        }
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_wait(mut self, wait: Wait) -> Self {
        self.wait = wait;
        self
    }

    /// Declare how the cells of a column compare. Undeclared columns compare as text.
    pub fn with_column(mut self, label: impl Into<String>, kind: ColumnKind) -> Self {
        self.kinds.insert(label.into(), kind);
        self
    }

    /// The cell (0-based) identifying a row. Defaults to the first one.
    pub fn with_key_column(mut self, index: usize) -> Self {
        self.key_column = index;
        self
    }

    /// Don't fail when the same row identifier shows up more than once.
    pub fn allow_duplicate_rows(mut self) -> Self {
        self.unique_rows = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Read the state shown by a pagination control, failing unless it reports items.
    pub async fn pagination_state(&self, control: &Locator) -> Result<PaginationState, Error> {
        let state = self.read_state(control).await?;
        if state.total_items == 0 {
            return Err(Error::assertion(&self.name, "pagination reports no items"));
        }
        Ok(state)
    }

    /// Page forward through the whole table using `control`, checking that every page is full
    /// except the last, that no row shows up twice, and that paging ends on the last page.
    pub async fn verify_pagination(&mut self, control: &Locator) -> Result<(), Error> {
        self.progress = Progress::Idle;
        let result = self.walk(control).await.map(|pages| {
            log::info!("{}: paged through {} page(s)", self.name, pages.len());
        });
        self.finish(result)
    }

    /// Check the values of column `label` are ordered across all pages of the table. Equal
    /// neighbours are fine.
    pub async fn verify_sorted_by(&mut self, label: &str, direction: Direction) -> Result<(), Error> {
        self.progress = Progress::Idle;
        let result = self.check_sorted(label, direction).await;
        self.finish(result)
    }

    /// Check a header for each of `labels` is displayed.
    pub async fn verify_columns_visible<S: AsRef<str>>(&self, labels: &[S]) -> Result<(), Error> {
        for label in labels {
            let label = label.as_ref();
            let (_, header) = self.resolve_header(label).await?;
            if !header.is_displayed().await.table(&self.name)? {
                return Err(Error::assertion(&self.name, format!("column '{label}' is not visible")));
            }
        }
        Ok(())
    }

    /// Position (0-based) of the column labelled `label`.
    pub async fn column_index(&self, label: &str) -> Result<usize, Error> {
        Ok(self.resolve_header(label).await?.0)
    }

    /// Headers are either plain text or wrap a sort toggle carrying the label. Plain text is
    /// tried first, then the toggles. Returns the column position and the matching element.
    async fn resolve_header(&self, label: &str) -> Result<(usize, P::Element), Error> {
        let table = wait::visible(self.page, &self.layout.table, self.wait)
            .await
            .table(&self.name)?;
        let headers = table.find_all(&self.layout.headers).await.table(&self.name)?;

        for (index, header) in headers.iter().enumerate() {
            if header.text().await.table(&self.name)?.trim() == label {
                return Ok((index, header.clone()));
            }
        }

        for (index, header) in headers.iter().enumerate() {
            for control in header.find_all(&self.layout.sort_control).await.table(&self.name)? {
                if control.text().await.table(&self.name)?.trim() == label {
                    return Ok((index, control));
                }
            }
        }

        Err(Error::assertion(&self.name, format!("no column labelled '{label}'")))
    }

    async fn check_sorted(&mut self, label: &str, direction: Direction) -> Result<(), Error> {
        let index = self.column_index(label).await?;
        let kind = self.kinds.get(label).copied().unwrap_or_default();
        let control = self.layout.pagination.clone();
        let pages = self.walk(&control).await?;

        let mut previous: Option<(usize, &str, CellValue)> = None;
        for (page, rows) in (1..).zip(&pages) {
            for row in rows {
                let text = row.get(index).ok_or_else(|| {
                    Error::assertion(&self.name, format!("page {page} has a row without a '{label}' cell"))
                })?;
                let value = CellValue::parse(kind, text).ok_or_else(|| {
                    Error::assertion(
                        &self.name,
                        format!("'{text}' in column '{label}' on page {page} is not a {kind} value"),
                    )
                })?;

                if let Some((previous_page, previous_text, previous_value)) = &previous {
                    if !direction.allows(previous_value, &value) {
                        return Err(Error::assertion(
                            &self.name,
                            format!(
                                "column '{label}' is not sorted {direction}: \
                                 '{previous_text}' (page {previous_page}) comes before '{text}' (page {page})"
                            ),
                        ));
                    }
                }
                previous = Some((page, text, value));
            }
        }

        log::info!(
            "{}: column '{label}' is sorted {direction} across {} page(s)",
            self.name,
            pages.len()
        );
        Ok(())
    }

    fn finish<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        self.progress = match &result {
            Ok(_) => Progress::Verified,
            Err(err) => {
                log::debug!("Verification failed: {err}");
                Progress::Failed
            }
        };
        result
    }
}
