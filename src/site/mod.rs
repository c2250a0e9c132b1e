//! Site composition: every application, mounted in one place.

use crate::router::{RouteError, Router};
use crate::{devtest, polls};

/// Build the site router.
///
/// Each call returns a freshly constructed router, so tests can build their
/// own instance without touching process-wide state.
///
/// # Errors
///
/// Returns [`RouteError`] if any app's table fails to build; with the route
/// tables checked in below this only happens if a pattern or name is edited
/// into an invalid state.
pub fn router() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.mount("/polls", "polls", polls::routes()?)?;
    router.mount("/devtest", "devtest", devtest::routes()?)?;
    Ok(router)
}
