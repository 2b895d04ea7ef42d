//! Test helpers.

use salvo::{affix_state::inject, prelude::*};

use crate::state::State;

/// Build a service with the process state injected, the way `main` does.
pub(crate) fn plans_service(route: Router) -> Service {
    Service::new(Router::new().hoop(inject(State::shared())).push(route))
}
