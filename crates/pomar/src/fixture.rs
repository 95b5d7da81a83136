//! Fixture providers.
//!
//! A [`Fixture`] assembles what a scenario needs (page objects bound to the
//! scenario's session, a signed-in user, seeded records) and optionally
//! cleans up afterwards. Setup is all-or-nothing: any failing step becomes
//! [`PomarError::SetupFailure`] and no composite is handed out. Teardown is
//! best-effort and never fails a scenario.
//!
//! Fixtures take their dependencies (data generator, API client, other
//! fixtures) at construction, so composition is plain struct nesting:
//!
//! ```ignore
//! struct AuthenticatedUser<'g> {
//!     data: &'g DataGenerator,
//!     pages: ContactPagesFixture,
//! }
//!
//! #[async_trait]
//! impl<'s> Fixture<'s> for AuthenticatedUser<'_> {
//!     type Output = (ContactPages<'s>, UserData);
//!
//!     async fn setup(&self, driver: &Driver<'s>) -> PomarResult<Self::Output> {
//!         let pages = self.pages.setup(driver).await?;
//!         let user = UserData::full(self.data);
//!         pages.signup.register(&user).await?;
//!         Ok((pages, user))
//!     }
//! }
//! ```

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::ops::Deref;

use crate::page::{Driver, StepOutcome};
use crate::result::{PomarError, PomarResult};

/// Builds a scenario's dependencies against one session
#[async_trait]
pub trait Fixture<'s>: Send + Sync {
    /// What setup yields
    type Output: Send + Sync;

    /// Fixture name for logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Build the composite.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    async fn setup(&self, driver: &Driver<'s>) -> PomarResult<Self::Output>;

    /// Release what setup created.
    ///
    /// # Errors
    ///
    /// Errors are logged by the caller and never fail the scenario.
    async fn teardown(&self, _driver: &Driver<'s>, _output: &Self::Output) -> PomarResult<()> {
        Ok(())
    }
}

/// A fixture whose setup completed, holding its composite until teardown
pub struct Provided<'d, 's, F: Fixture<'s>> {
    fixture: &'d F,
    driver: &'d Driver<'s>,
    output: F::Output,
}

impl<'s, F: Fixture<'s>> fmt::Debug for Provided<'_, 's, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provided")
            .field("fixture", &self.fixture.name())
            .finish_non_exhaustive()
    }
}

impl<'d, 's, F: Fixture<'s>> Provided<'d, 's, F> {
    /// Run setup to completion.
    ///
    /// # Errors
    ///
    /// Returns [`PomarError::SetupFailure`] wrapping the originating error.
    pub async fn setup(fixture: &'d F, driver: &'d Driver<'s>) -> PomarResult<Self> {
        tracing::info!(fixture = fixture.name(), "fixture setup");
        match fixture.setup(driver).await {
            Ok(output) => Ok(Self {
                fixture,
                driver,
                output,
            }),
            Err(err) => {
                tracing::error!(fixture = fixture.name(), error = %err, "fixture setup failed");
                Err(PomarError::setup_failure(fixture.name(), err))
            }
        }
    }

    /// The composite
    #[must_use]
    pub const fn output(&self) -> &F::Output {
        &self.output
    }

    /// Take the composite without running teardown
    #[must_use]
    pub fn into_output(self) -> F::Output {
        self.output
    }

    /// Best-effort teardown; failures are logged and reported, never raised
    pub async fn teardown(self) -> StepOutcome {
        let name = self.fixture.name();
        match self.fixture.teardown(self.driver, &self.output).await {
            Ok(()) => {
                tracing::debug!(fixture = name, "fixture teardown");
                StepOutcome::Performed
            }
            Err(err) => {
                tracing::warn!(fixture = name, error = %err, "fixture teardown failed");
                StepOutcome::Failed(err)
            }
        }
    }
}

impl<'s, F: Fixture<'s>> Deref for Provided<'_, 's, F> {
    type Target = F::Output;

    fn deref(&self) -> &Self::Target {
        &self.output
    }
}

/// Set up `fixture`, run `body` with its composite, then tear down.
///
/// Returns the body's result unchanged, whatever teardown does.
///
/// # Errors
///
/// Returns [`PomarError::SetupFailure`] if setup fails (the body never
/// runs), otherwise the body's error.
pub async fn with_fixture<'s, F, R, B>(fixture: &F, driver: &Driver<'s>, body: B) -> PomarResult<R>
where
    F: Fixture<'s>,
    B: for<'o> FnOnce(&'o F::Output) -> BoxFuture<'o, PomarResult<R>>,
{
    let provided = Provided::setup(fixture, driver).await?;
    let result = body(provided.output()).await;
    let _ = provided.teardown().await;
    result
}
