use super::{PaginationState, Progress, TableContext, ToolbarTable};
use crate::error::Error;
use crate::page::{Element, Locator, Page};
use crate::wait;
use crate::DriverError;
use std::collections::HashMap;

/// Cell texts of the rows of a page.
pub(super) type Rows = Vec<Vec<String>>;

/// How to tell a navigation has completed.
#[derive(Clone, Copy, Debug)]
enum Arrival {
    /// The displayed range starts at this item.
    At(usize),
    /// The displayed range starts before this item.
    Before(usize),
    /// The first row changed. For controls that show no range.
    Changed,
}

impl<'p, P: Page> ToolbarTable<'p, P> {
    /// Capture every page once, from the first to the last, then go back to where the table
    /// was before.
    pub(super) async fn walk(&mut self, control: &Locator) -> Result<Vec<Rows>, Error> {
        let initial = self.pagination_state(control).await?;

        // a control showing only the total gives no hint of the current page
        let mut state = match initial.range {
            Some(range) if range.first <= 1 => initial,
            _ => self.rewind(control).await?,
        };

        let mut page_size = state.current_page_items();
        let mut seen = HashMap::<String, usize>::new();
        let mut pages = Vec::new();

        for page in 1.. {
            self.progress = Progress::Reading(page);
            log::debug!("{}: reading page {page}", self.name);

            if state.total_items != initial.total_items {
                return Err(Error::assertion(
                    &self.name,
                    format!(
                        "total changed from {} to {} on page {page}",
                        initial.total_items, state.total_items
                    ),
                ));
            }

            let rows = self.read_rows().await.table(&self.name)?;
            let size = *page_size.get_or_insert(rows.len());
            if size == 0 {
                return Err(Error::assertion(
                    &self.name,
                    format!("page {page} shows no rows, but {} items are reported", state.total_items),
                ));
            }

            let expected = state.expected_rows(page, size);
            if rows.len() != expected {
                return Err(Error::assertion(
                    &self.name,
                    format!("page {page} shows {} rows, expected {expected}", rows.len()),
                ));
            }

            if self.unique_rows {
                for row in &rows {
                    let key = self.key(row).filter(|key| !key.is_empty()).ok_or_else(|| {
                        Error::assertion(
                            &self.name,
                            format!(
                                "page {page} has a row without an identifier in column {}",
                                self.key_column + 1
                            ),
                        )
                    })?;
                    if let Some(first_seen) = seen.insert(key.to_string(), page) {
                        return Err(Error::assertion(
                            &self.name,
                            format!("page {page} duplicates row {key} from page {first_seen}"),
                        ));
                    }
                }
            }

            let first_key = rows.first().and_then(|row| self.key(row)).map(str::to_string);
            pages.push(rows);

            let page_count = state.page_count(size);
            if page >= page_count {
                self.check_last_page(control, page, page_count).await?;
                break;
            }

            if self.affordance(control, &self.layout.next).await.table(&self.name)?.is_none() {
                return Err(Error::assertion(
                    &self.name,
                    format!("next page control is disabled on page {page} of {page_count}"),
                ));
            }
            state = self
                .step(control, &self.layout.next, Arrival::At(page * size + 1), first_key)
                .await?;
        }

        let size = page_size.unwrap_or_default();
        self.restore(control, initial, size).await?;

        Ok(pages)
    }

    async fn check_last_page(&self, control: &Locator, page: usize, page_count: usize) -> Result<(), Error> {
        if self.affordance(control, &self.layout.next).await.table(&self.name)?.is_some() {
            return Err(Error::assertion(
                &self.name,
                format!("next page control is still enabled on the last page ({page})"),
            ));
        }
        if page_count == 1 && self.affordance(control, &self.layout.previous).await.table(&self.name)?.is_some() {
            return Err(Error::assertion(
                &self.name,
                "previous page control is enabled although there is only one page",
            ));
        }
        Ok(())
    }

    /// Go back to the page the table showed before paging, identified by its first item.
    async fn restore(&self, control: &Locator, initial: PaginationState, page_size: usize) -> Result<(), Error> {
        let Some(target) = initial.range.map(|range| range.first) else {
            // only the total is shown, the starting page is unknown
            self.rewind(control).await?;
            return Ok(());
        };

        let mut state = self.read_state(control).await?;
        if state.range.map(|range| range.first) == Some(target) {
            return Ok(());
        }

        state = self.rewind(control).await?;
        while let Some(range) = state.range.filter(|range| range.first < target) {
            let first_key = self.first_key().await.table(&self.name)?;
            state = self
                .step(control, &self.layout.next, Arrival::At(range.first + page_size), first_key)
                .await?;
        }

        log::debug!("{}: restored page starting at item {target}", self.name);
        Ok(())
    }

    /// Go to the first page, with the "first page" control if there is one, otherwise by
    /// stepping back one page at a time.
    async fn rewind(&self, control: &Locator) -> Result<PaginationState, Error> {
        let first_key = self.first_key().await.table(&self.name)?;
        if self.affordance(control, &self.layout.first).await.table(&self.name)?.is_some() {
            return self.step(control, &self.layout.first, Arrival::At(1), first_key).await;
        }

        let mut state = self.read_state(control).await?;
        loop {
            let arrival = match state.range {
                Some(range) if range.first <= 1 => return Ok(state),
                Some(range) => Arrival::Before(range.first),
                None => Arrival::Changed,
            };
            if self.affordance(control, &self.layout.previous).await.table(&self.name)?.is_none() {
                return match arrival {
                    // without a range, a disabled "previous" control is how the first page shows
                    Arrival::Changed => Ok(state),
                    _ => Err(Error::assertion(
                        &self.name,
                        "previous page control is disabled before reaching the first page",
                    )),
                };
            }
            let first_key = self.first_key().await.table(&self.name)?;
            state = self.step(control, &self.layout.previous, arrival, first_key).await?;
        }
    }

    /// Click a navigation control and wait for the page to change.
    ///
    /// Without a displayed range, arrival falls back to the first row changing.
    async fn step(
        &self,
        control: &Locator,
        button: &Locator,
        arrival: Arrival,
        first_key: Option<String>,
    ) -> Result<PaginationState, Error> {
        let element = self
            .affordance(control, button)
            .await
            .table(&self.name)?
            .ok_or_else(|| Error::assertion(&self.name, format!("navigation control {button} is disabled")))?;
        element.click().await.table(&self.name)?;

        let what = match arrival {
            Arrival::At(first) => format!("the page starting at item {first}"),
            Arrival::Before(first) => format!("a page before item {first}"),
            Arrival::Changed => format!("the page to change after clicking {button}"),
        };
        let first_key = &first_key;

        // no nested waits while polling, the poll itself is bounded by `self.wait`
        self.wait
            .until(&what, || async move {
                let toggle = self.page.find(control).await?.find(&self.layout.toggle).await?;
                let Some(state) = PaginationState::parse(toggle.text().await?.trim()) else {
                    return Ok(None);
                };
                let arrived = match (arrival, state.range) {
                    (Arrival::At(first), Some(range)) => range.first == first,
                    (Arrival::Before(first), Some(range)) => range.first < first,
                    _ => {
                        let table = self.page.find(&self.layout.table).await?;
                        &self.first_key_in(&table).await? != first_key
                    }
                };
                Ok(arrived.then_some(state))
            })
            .await
            .table(&self.name)
    }

    pub(super) async fn read_state(&self, control: &Locator) -> Result<PaginationState, Error> {
        let text = self.toggle_text(control).await.table(&self.name)?;
        PaginationState::parse(&text).ok_or_else(|| Error::Parse {
            table: self.name.clone(),
            text,
        })
    }

    async fn toggle_text(&self, control: &Locator) -> Result<String, DriverError> {
        let control = wait::visible(self.page, control, self.wait).await?;
        let toggle = wait::visible_in(&control, &self.layout.toggle, self.wait).await?;
        Ok(toggle.text().await?.trim().to_string())
    }

    /// The displayed navigation control matching `which`, if the user can click it. Absent
    /// and disabled controls are both `None`.
    async fn affordance(&self, control: &Locator, which: &Locator) -> Result<Option<P::Element>, DriverError> {
        let control = wait::visible(self.page, control, self.wait).await?;
        for element in control.find_all(which).await? {
            if element.is_displayed().await? && element.is_actionable().await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    async fn read_rows(&self) -> Result<Rows, DriverError> {
        let table = wait::visible(self.page, &self.layout.table, self.wait).await?;
        let mut rows = Vec::new();
        for row in table.find_all(&self.layout.rows).await? {
            let mut cells = Vec::new();
            for cell in row.find_all(&self.layout.cells).await? {
                cells.push(cell.text().await?.trim().to_string());
            }
            rows.push(cells);
        }
        Ok(rows)
    }

    async fn first_key(&self) -> Result<Option<String>, DriverError> {
        let table = wait::visible(self.page, &self.layout.table, self.wait).await?;
        self.first_key_in(&table).await
    }

    async fn first_key_in(&self, table: &P::Element) -> Result<Option<String>, DriverError> {
        let Some(row) = table.find_all(&self.layout.rows).await?.into_iter().next() else {
            return Ok(None);
        };
        match row.find_all(&self.layout.cells).await?.get(self.key_column) {
            Some(cell) => Ok(Some(cell.text().await?.trim().to_string())),
            None => Ok(None),
        }
    }

    fn key<'r>(&self, row: &'r [String]) -> Option<&'r str> {
        row.get(self.key_column).map(String::as_str)
    }
}
