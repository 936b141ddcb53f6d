use cucumber::cli;
use e2e_tests::wait::Wait;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

/// Options of the runner, on top of the ones cucumber brings.
#[derive(cli::Args, Clone, Debug)] // re-export of `clap::Args`
pub struct E2ECli {
    /// Application URL under test
    #[arg(long, env = "APPLICATION_URL")]
    pub application: String,

    /// User name to log in with, the login form is skipped when absent
    #[arg(long, env = "E2E_USER")]
    pub user_name: Option<String>,

    /// Password to log in with
    #[arg(long, env = "E2E_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// URL of the (chrome/gecko)driver
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Browser to run the application in (chrome/firefox)
    #[arg(long, env = "E2E_BROWSER", default_value_t = Browser::Chrome)]
    pub browser: Browser,

    /// Run the browser without a window
    #[arg(long, env = "E2E_HEADLESS")]
    pub headless: bool,

    /// How long to wait for elements to show up
    #[arg(long, env = "E2E_WAIT_TIMEOUT", default_value = "10s")]
    pub wait_timeout: humantime::Duration,

    /// How often to check while waiting
    #[arg(long, env = "E2E_WAIT_INTERVAL", default_value = "250ms")]
    pub wait_interval: humantime::Duration,
}

impl E2ECli {
    pub fn wait(&self) -> Wait {
        Wait::new(self.wait_timeout.into(), self.wait_interval.into())
    }
}
