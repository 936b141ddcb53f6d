use crate::page::{Element, Locator, Page, Role};
use crate::wait::{self, Wait};
use crate::DriverError;

/// WebDriver code point of the return key.
const ENTER: &str = "\u{e007}";

/// A search page reachable from the navigation sidebar, e.g. "Advisories".
pub struct SearchPage<'p, P: Page> {
    page: &'p P,
    label: String,
    input: Locator,
    results: Locator,
    wait: Wait,
}

impl<'p, P: Page> SearchPage<'p, P> {
    pub fn new(page: &'p P, label: impl Into<String>) -> Self {
        Self {
            page,
            label: label.into(),
            input: Locator::css("#search-input input"),
            results: Locator::css("table tbody tr"),
            wait: Wait::default(),
        }
    }

    pub fn with_wait(mut self, wait: Wait) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_input(mut self, input: Locator) -> Self {
        self.input = input;
        self
    }

    pub fn with_results(mut self, results: Locator) -> Self {
        self.results = results;
        self
    }

    /// Open the page through its navigation link.
    pub async fn open(&self) -> Result<(), DriverError> {
        let link = wait::enabled(self.page, &Locator::role(Role::Link, &self.label), self.wait).await?;
        link.click().await
    }

    /// Open the page, search for `term`, and return the result rows once some show up.
    pub async fn dedicated_search(&self, term: &str) -> Result<Vec<P::Element>, DriverError> {
        self.open().await?;

        let input = wait::enabled(self.page, &self.input, self.wait).await?;
        input.click().await?;
        input.send_keys(term).await?;
        input.send_keys(ENTER).await?;

        log::debug!("Searching {} for '{term}'", self.label);

        self.wait
            .until(&format!("{} results for '{term}'", self.label), || async move {
                let rows = self.page.find_all(&self.results).await?;
                Ok((!rows.is_empty()).then_some(rows))
            })
            .await
    }
}
