use anyhow::Context;
use cucumber::World;
use e2e_tests::wait::Wait;
use thirtyfour::WebDriver;

/// State of one scenario. The browser session is opened before and quit after each scenario.
#[derive(Debug, Default, World)]
pub struct E2EWorld {
    pub driver: Option<WebDriver>,
    pub application: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub wait: Wait,
}

impl E2EWorld {
    pub fn driver(&self) -> anyhow::Result<&WebDriver> {
        self.driver
            .as_ref()
            .context("No browser session, make sure the driver is running")
    }
}
