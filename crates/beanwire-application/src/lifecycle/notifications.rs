//! `@Initialized`, `@BeforeDestroyed` and `@Destroyed` notifications
//!
//! These are ordinary events with a [`ScopeBoundary`] payload. A failing
//! observer is logged; it does not stop the scope transition.

use crate::events::EventDispatcher;
use beanwire_domain::entities::FiredEvent;
use beanwire_domain::events::ScopeBoundary;
use beanwire_domain::value_objects::{Qualifier, ScopeKind};
use tracing::{debug, error};

/// Fire a scope lifecycle notification for `scope`
pub fn notify_scope(
    dispatcher: &EventDispatcher,
    qualifier: Qualifier,
    scope: &ScopeKind,
    unit: Option<&str>,
) {
    let kind = qualifier.kind().to_string();
    let event = FiredEvent::new(
        ScopeBoundary::new(scope.clone(), unit.map(str::to_string)),
        ScopeBoundary::type_descriptor(),
    )
    .with_qualifier(qualifier);
    match dispatcher.fire(event) {
        Ok(()) => debug!(scope = %scope, notification = %kind, unit = ?unit, "Scope notification fired"),
        Err(e) => error!(
            scope = %scope,
            notification = %kind,
            error = %e,
            "Scope lifecycle observer failed"
        ),
    }
}
