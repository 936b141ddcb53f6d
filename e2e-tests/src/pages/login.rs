use crate::world::E2EWorld;
use anyhow::Context;
use cucumber::given;
use e2e_tests::page::{Locator, Page, Role};
use e2e_tests::wait::{self, Wait};
use thirtyfour::WebDriver;

const LOGIN_FORM: &str = "kc-form";

#[given(expr = "User is logged in")]
async fn log_in(world: &mut E2EWorld) -> anyhow::Result<()> {
    let driver = world.driver()?;
    let application = world.application.as_deref().context("No application URL configured")?;

    Page::goto(driver, application).await?;
    deny_consent(driver).await?;

    if login_form_shown(driver, world.wait).await? {
        let (Some(user_name), Some(password)) = (&world.user_name, &world.password) else {
            anyhow::bail!("The application asks for a login, but no credentials are configured");
        };

        wait::visible(driver, &Locator::id("username"), world.wait)
            .await?
            .send_keys(user_name.as_str())
            .await?;
        driver.find(&Locator::id("password")).await?.send_keys(password.as_str()).await?;
        driver.find(&Locator::id("kc-login")).await?.click().await?;
    }

    wait::visible(driver, &Locator::role(Role::Link, "Advisories"), world.wait).await?;
    log::info!("Logged in to {application}");
    Ok(())
}

/// The tracking consent dialog shows up on the first visit only.
async fn deny_consent(driver: &WebDriver) -> anyhow::Result<()> {
    if driver.find_all(&Locator::id("modal-description")).await?.is_empty() {
        return Ok(());
    }
    if let Some(deny) = driver.find_all(&Locator::role(Role::Button, "Deny")).await?.into_iter().next() {
        deny.click().await?;
    }
    Ok(())
}

/// Wait for either the SSO form or the application itself.
async fn login_form_shown(driver: &WebDriver, wait: Wait) -> anyhow::Result<bool> {
    let form = Locator::id(LOGIN_FORM);
    let navigation = Locator::role(Role::Link, "Advisories");
    let (form, navigation) = (&form, &navigation);

    let shown = wait
        .until("the login form or the application", || async move {
            if !driver.find_all(form).await?.is_empty() {
                return Ok(Some(true));
            }
            if !driver.find_all(navigation).await?.is_empty() {
                return Ok(Some(false));
            }
            Ok(None)
        })
        .await?;

    Ok(shown)
}
