mod config;
mod pages;
mod world;

use config::{Browser, E2ECli};
use cucumber::{cli, writer, World, WriterExt};
use futures::FutureExt;
use std::fs::File;
use std::sync::Arc;
use thirtyfour::prelude::*;
use world::E2EWorld;

async fn start_browser(settings: &E2ECli) -> anyhow::Result<WebDriver> {
    let caps: Capabilities = match settings.browser {
        Browser::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            caps.set_no_sandbox()?;
            caps.set_disable_dev_shm_usage()?;
            caps.add_arg("start-maximized")?;
            if settings.headless {
                caps.set_headless()?;
            }
            caps.into()
        }
        Browser::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if settings.headless {
                caps.set_headless()?;
            }
            caps.into()
        }
    };

    Ok(WebDriver::new(settings.webdriver_url.as_str(), caps).await?)
}

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();

    let junit_output_file =
        File::create(format!("{}/junit.xml", env!("CARGO_MANIFEST_DIR"))).expect("Error file creation");
    let json_output_file =
        File::create(format!("{}/cucumber.json", env!("CARGO_MANIFEST_DIR"))).expect("Error file creation");

    let opts = cli::Opts::<_, _, _, E2ECli>::parsed();
    let settings = Arc::new(opts.custom.clone());
    log::info!(
        "Testing {} using {} at {}",
        settings.application,
        settings.browser,
        settings.webdriver_url
    );

    E2EWorld::cucumber()
        .before(move |_, _, _, world| {
            let settings = Arc::clone(&settings);
            async move {
                match start_browser(&settings).await {
                    Ok(driver) => world.driver = Some(driver),
                    // steps fail on their own without a session
                    Err(err) => log::error!("Unable to start {}: {err:#}", settings.browser),
                }
                world.application = Some(settings.application.clone());
                world.user_name = settings.user_name.clone();
                world.password = settings.password.clone();
                world.wait = settings.wait();
            }
            .boxed_local()
        })
        .with_cli(opts)
        .after(move |_, _, _, _, world| {
            async move {
                if let Some(driver) = world.and_then(|world| world.driver.take()) {
                    if let Err(err) = driver.quit().await {
                        log::warn!("Failed to quit the browser session: {err}");
                    }
                }
            }
            .boxed_local()
        })
        .with_writer(
            writer::Libtest::or_basic()
                .tee::<E2EWorld, _>(writer::JUnit::for_tee(junit_output_file, writer::Verbosity::default()))
                .tee::<E2EWorld, _>(writer::Json::for_tee(json_output_file))
                .normalized(),
        )
        .run(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features/"))
        .await;
}
