//! Bounded polling for element state.

use crate::page::{Element, Locator, Page};
use crate::DriverError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wait {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for Wait {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl Wait {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Poll `probe` until it yields a value.
    ///
    /// The probe runs at least once, even with a zero timeout. A probe error counts as "not
    /// yet", elements go stale while the page re-renders. If the last attempt before the
    /// deadline failed, that error is returned instead of a timeout.
    pub async fn until<T, F, Fut>(&self, what: &str, mut probe: F) -> Result<T, DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, DriverError>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            let failure = match probe().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => None,
                Err(err) => {
                    log::trace!("Still waiting for {what}: {err}");
                    Some(err)
                }
            };
            if Instant::now() >= deadline {
                log::debug!("Gave up waiting for {what} after {:?}", self.timeout);
                return Err(failure.unwrap_or_else(|| DriverError::Timeout(what.to_string())));
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// First displayed element matching `locator`.
pub async fn visible<P: Page + ?Sized>(page: &P, locator: &Locator, wait: Wait) -> Result<P::Element, DriverError> {
    wait.until(&format!("{locator} to be visible"), || async move {
        first_displayed(page.find_all(locator).await?).await
    })
    .await
}

/// First displayed element below `parent` matching `locator`.
pub async fn visible_in<E: Element>(parent: &E, locator: &Locator, wait: Wait) -> Result<E, DriverError> {
    wait.until(&format!("{locator} to be visible"), || async move {
        first_displayed(parent.find_all(locator).await?).await
    })
    .await
}

/// First displayed element matching `locator` the user can act on.
pub async fn enabled<P: Page + ?Sized>(page: &P, locator: &Locator, wait: Wait) -> Result<P::Element, DriverError> {
    wait.until(&format!("{locator} to be enabled"), || async move {
        for element in page.find_all(locator).await? {
            if element.is_displayed().await? && element.is_actionable().await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    })
    .await
}

async fn first_displayed<E: Element>(elements: Vec<E>) -> Result<Option<E>, DriverError> {
    for element in elements {
        if element.is_displayed().await? {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    #[ntest::timeout(5_000)]
    async fn yields_once_probe_succeeds() {
        let calls = AtomicUsize::new(0);
        let wait = Wait::new(Duration::from_secs(1), Duration::from_millis(1));

        let value = wait
            .until("third attempt", || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok((attempt == 2).then_some(attempt)) }
            })
            .await
            .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    #[ntest::timeout(5_000)]
    async fn times_out() {
        let wait = Wait::new(Duration::from_millis(20), Duration::from_millis(5));

        let result: Result<(), _> = wait.until("nothing", || async { Ok(None) }).await;

        match result {
            Err(DriverError::Timeout(what)) => assert_eq!(what, "nothing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    #[ntest::timeout(5_000)]
    async fn keeps_polling_after_a_stale_element() {
        let calls = AtomicUsize::new(0);
        let wait = Wait::new(Duration::from_secs(1), Duration::from_millis(1));

        let value = wait
            .until("re-rendered row", || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    match attempt {
                        0 => Err(DriverError::NotFound("stale element".into())),
                        _ => Ok(Some(attempt)),
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[ntest::timeout(5_000)]
    async fn reports_the_last_error_at_the_deadline() {
        let wait = Wait::new(Duration::from_millis(20), Duration::from_millis(5));

        let result: Result<(), _> = wait
            .until("gone", || async { Err(DriverError::NotFound("no such element".into())) })
            .await;

        match result {
            Err(DriverError::NotFound(what)) => assert_eq!(what, "no such element"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    #[ntest::timeout(5_000)]
    async fn zero_timeout_probes_once() {
        let calls = AtomicUsize::new(0);
        let wait = Wait::new(Duration::ZERO, Duration::from_millis(5));

        let value = wait
            .until("immediately", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Some(())) }
            })
            .await;

        assert!(value.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
