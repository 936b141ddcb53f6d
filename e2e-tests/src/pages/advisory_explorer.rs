use crate::world::E2EWorld;
use cucumber::{given, then};
use e2e_tests::page::{Locator, Page, Role};
use e2e_tests::search::SearchPage;
use e2e_tests::table::{ColumnKind, Direction, ToolbarTable};
use e2e_tests::wait;
use regex::Regex;
use thirtyfour::WebDriver;

const VULN_TABLE_NAME: &str = "vulnerability table";
const VULN_TABLE_TOP_PAGINATION: &str = r#"//div[@id="vulnerability-table-pagination-top"]"#;
const COLUMN_LABELS: [&str; 6] = ["ID", "Title", "Discovery", "Release", "Score", "CWE"];

fn vulnerability_table(world: &E2EWorld) -> anyhow::Result<ToolbarTable<'_, WebDriver>> {
    Ok(ToolbarTable::new(world.driver()?, VULN_TABLE_NAME)
        .with_wait(world.wait)
        .with_column("ID", ColumnKind::Identifier)
        .with_column("Title", ColumnKind::Text)
        .with_column("Discovery", ColumnKind::Date)
        .with_column("Release", ColumnKind::Date)
        .with_column("Score", ColumnKind::Numeric)
        .with_column("CWE", ColumnKind::Identifier))
}

#[given(expr = "User visits Advisory details Page of {string}")]
async fn visit_advisory(world: &mut E2EWorld, advisory: String) -> anyhow::Result<()> {
    let driver = world.driver()?;

    SearchPage::new(driver, "Advisories")
        .with_wait(world.wait)
        .dedicated_search(&advisory)
        .await?;

    wait::enabled(driver, &Locator::role(Role::Link, &advisory), world.wait)
        .await?
        .click()
        .await?;
    Ok(())
}

#[then(expr = "User navigates to the Vulnerabilites tab on the Advisory Overview page")]
async fn open_vulnerabilities_tab(world: &mut E2EWorld) -> anyhow::Result<()> {
    let driver = world.driver()?;
    wait::enabled(driver, &Locator::role(Role::Tab, "Vulnerabilities"), world.wait)
        .await?
        .click()
        .await?;
    Ok(())
}

#[then(expr = "Pagination of Vulnerabilities list works")]
async fn vulnerability_pagination(world: &mut E2EWorld) -> anyhow::Result<()> {
    let mut table = vulnerability_table(world)?;
    table
        .verify_pagination(&Locator::xpath(VULN_TABLE_TOP_PAGINATION))
        .await?;
    Ok(())
}

#[then(expr = "A list of all active vulnerabilites tied to the advisory should display")]
async fn vulnerabilities_listed(world: &mut E2EWorld) -> anyhow::Result<()> {
    let table = vulnerability_table(world)?;
    let state = table
        .pagination_state(&Locator::xpath(VULN_TABLE_TOP_PAGINATION))
        .await?;
    log::info!("The advisory lists {} vulnerabilities", state.total_items);
    Ok(())
}

#[then(
    expr = "The ID, Title, Discovery, Release, Score and CWE information should be visible for each vulnerability"
)]
async fn vulnerability_columns(world: &mut E2EWorld) -> anyhow::Result<()> {
    vulnerability_table(world)?
        .verify_columns_visible(&COLUMN_LABELS)
        .await?;
    Ok(())
}

#[then(expr = "The vulnerabilities should be sorted by ID by default")]
async fn sorted_by_id(world: &mut E2EWorld) -> anyhow::Result<()> {
    let mut table = vulnerability_table(world)?;
    table.verify_sorted_by("ID", Direction::Ascending).await?;
    Ok(())
}

#[then(expr = "User visits Vulnerability details Page of {string} by clicking it")]
async fn visit_vulnerability(world: &mut E2EWorld, id: String) -> anyhow::Result<()> {
    let driver = world.driver()?;

    wait::enabled(driver, &Locator::role_containing(Role::Link, &id), world.wait)
        .await?
        .click()
        .await?;

    let path = Regex::new(&format!("/vulnerabilities/{}$", regex::escape(&id)))?;
    let path = &path;
    world
        .wait
        .until(&format!("the details page of {id}"), || async move {
            let url = Page::current_url(driver).await?;
            Ok(path.is_match(url.path()).then_some(()))
        })
        .await?;

    let title = Regex::new(&format!(r"^{}\s*$", regex::escape(&id)))?;
    let heading = Locator::role_containing(Role::Heading(1), &id);
    let (title, heading) = (&title, &heading);
    world
        .wait
        .until(&format!("the heading of {id}"), || async move {
            for element in driver.find_all(heading).await? {
                if element.is_displayed().await? && title.is_match(&element.text().await?) {
                    return Ok(Some(()));
                }
            }
            Ok(None)
        })
        .await?;

    Ok(())
}
