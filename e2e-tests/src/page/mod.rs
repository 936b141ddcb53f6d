//! The slice of browser automation the suite relies on.
//!
//! Everything is expressed as "find by locator, read text, check state, click". A
//! [`thirtyfour`] session implements it, tests substitute an in-memory page.

mod webdriver;

use crate::DriverError;
use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use url::Url;

/// ARIA roles the suite addresses elements by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Link,
    Tab,
    Button,
    ColumnHeader,
    Heading(u8),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
    Id(String),
    /// An element of a role, identified by its accessible name (visible text or `aria-label`).
    Role { role: Role, name: String, exact: bool },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Match elements of `role` whose name equals `name`, case-sensitively.
    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: name.into(),
            exact: true,
        }
    }

    /// Match elements of `role` whose name contains `name`.
    pub fn role_containing(role: Role, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: name.into(),
            exact: false,
        }
    }

    /// Role locators rendered as an XPath expression, any other locator as is.
    pub fn to_xpath(&self) -> Option<String> {
        match self {
            Self::XPath(expression) => Some(expression.clone()),
            Self::Role { role, name, exact } => Some(role_xpath(*role, name, *exact)),
            Self::Css(_) | Self::Id(_) => None,
        }
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(selector) => write!(f, "{selector}"),
            Self::XPath(expression) => write!(f, "xpath={expression}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Role { role, name, .. } => write!(f, "{role:?} '{name}'"),
        }
    }
}

fn role_xpath(role: Role, name: &str, exact: bool) -> String {
    let base = match role {
        Role::Link => "//a | //*[@role='link']".to_string(),
        Role::Tab => "//*[@role='tab']".to_string(),
        Role::Button => "//button | //*[@role='button']".to_string(),
        Role::ColumnHeader => "//th | //*[@role='columnheader']".to_string(),
        Role::Heading(level) => format!("//h{level} | //*[@role='heading' and @aria-level='{level}']"),
    };

    let name = xpath_literal(name);
    let predicate = match exact {
        true => format!("normalize-space(.)={name} or @aria-label={name}"),
        false => format!("contains(normalize-space(.), {name}) or contains(@aria-label, {name})"),
    };

    format!("({base})[{predicate}]")
}

/// Quote a string for use inside an XPath expression.
///
/// XPath 1.0 has no escape sequences, so values containing both quote kinds are split up and
/// glued back together with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts = value
            .split('\'')
            .map(|part| format!("'{part}'"))
            .collect::<Vec<_>>()
            .join(", \"'\", ");
        format!("concat({parts})")
    }
}

/// A loaded document.
#[async_trait]
pub trait Page: Send + Sync {
    type Element: Element;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, DriverError>;

    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<Url, DriverError>;

    async fn find(&self, locator: &Locator) -> Result<Self::Element, DriverError> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(locator.to_string()))
    }
}

/// A handle to a rendered element. Handles may go stale once the document re-renders.
#[async_trait]
pub trait Element: Clone + Send + Sync + Sized {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, DriverError>;

    async fn text(&self) -> Result<String, DriverError>;

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError>;

    async fn is_displayed(&self) -> Result<bool, DriverError>;

    async fn is_enabled(&self) -> Result<bool, DriverError>;

    async fn click(&self) -> Result<(), DriverError>;

    async fn send_keys(&self, text: &str) -> Result<(), DriverError>;

    async fn find(&self, locator: &Locator) -> Result<Self, DriverError> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(locator.to_string()))
    }

    /// Usable by the user: enabled, and not marked `aria-disabled`.
    async fn is_actionable(&self) -> Result<bool, DriverError> {
        if !self.is_enabled().await? {
            return Ok(false);
        }
        Ok(self.attr("aria-disabled").await?.as_deref() != Some("true"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn literal_quoting() {
        assert_eq!(xpath_literal("ID"), "'ID'");
        assert_eq!(xpath_literal("Don't"), "\"Don't\"");
        assert_eq!(
            xpath_literal(r#"a'b"c"#),
            r#"concat('a', "'", 'b"c')"#
        );
    }

    #[test]
    fn exact_role_xpath() {
        let locator = Locator::role(Role::Tab, "Vulnerabilities");
        assert_eq!(
            locator.to_xpath().as_deref(),
            Some("(//*[@role='tab'])[normalize-space(.)='Vulnerabilities' or @aria-label='Vulnerabilities']")
        );
    }

    #[test]
    fn heading_role_xpath() {
        let locator = Locator::role_containing(Role::Heading(1), "CVE-2023-0001");
        assert_eq!(
            locator.to_xpath().as_deref(),
            Some(
                "(//h1 | //*[@role='heading' and @aria-level='1'])\
                 [contains(normalize-space(.), 'CVE-2023-0001') or contains(@aria-label, 'CVE-2023-0001')]"
            )
        );
    }

    #[test]
    fn css_has_no_xpath() {
        assert_eq!(Locator::css("tbody tr").to_xpath(), None);
        assert_eq!(Locator::id("search").to_string(), "#search");
    }
}
