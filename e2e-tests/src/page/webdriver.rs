use super::{Element, Locator, Page};
use crate::DriverError;
use async_trait::async_trait;
use thirtyfour::prelude::*;
use url::Url;

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(selector) => By::Css(selector.clone()),
        Locator::Id(id) => By::Id(id.clone()),
        Locator::XPath(_) | Locator::Role { .. } => By::XPath(locator.to_xpath().unwrap_or_default()),
    }
}

/// Role and XPath locators start with `//`, which searches the whole document. Below an
/// element they have to be anchored at the context node.
fn scoped_xpath(locator: &Locator) -> Option<String> {
    let expression = locator.to_xpath()?;
    if expression.starts_with('(') {
        Some(expression.replace("(//", "(.//").replace("| //", "| .//"))
    } else if expression.starts_with("//") {
        Some(format!(".{expression}"))
    } else {
        Some(expression)
    }
}

#[async_trait]
impl Page for WebDriver {
    type Element = WebElement;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<WebElement>, DriverError> {
        Ok((**self).find_all(by(locator)).await?)
    }

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        Ok((**self).goto(url).await?)
    }

    async fn current_url(&self) -> Result<Url, DriverError> {
        Ok((**self).current_url().await?)
    }
}

#[async_trait]
impl Element for WebElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<WebElement>, DriverError> {
        let by = match scoped_xpath(locator) {
            Some(expression) => By::XPath(expression),
            None => by(locator),
        };
        Ok(WebElement::find_all(self, by).await?)
    }

    async fn text(&self) -> Result<String, DriverError> {
        Ok(WebElement::text(self).await?)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(WebElement::attr(self, name).await?)
    }

    async fn is_displayed(&self) -> Result<bool, DriverError> {
        Ok(WebElement::is_displayed(self).await?)
    }

    async fn is_enabled(&self) -> Result<bool, DriverError> {
        Ok(WebElement::is_enabled(self).await?)
    }

    async fn click(&self) -> Result<(), DriverError> {
        Ok(WebElement::click(self).await?)
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        Ok(WebElement::send_keys(self, text).await?)
    }
}
