//! The scoped logger handle shared by every dispatcher component.

use tracing::Span;

use crate::models::{BusReference, BUS_TYPE, DISPATCHER_COMPONENT};

/// Root span carrying the bus identity, bus type and component role.
///
/// Every worker future and every broker call runs inside this span (or a
/// child of it), so each event written to the sink carries the same
/// correlation fields.
pub fn dispatcher_span(bus_ref: &BusReference) -> Span {
    tracing::info_span!(
        "dispatcher",
        "channels.knative.dev/bus" = %bus_ref,
        "channels.knative.dev/busType" = BUS_TYPE,
        "channels.knative.dev/busComponent" = DISPATCHER_COMPONENT,
    )
}
