/*!
 * Control Channel
 * Receives lifecycle notifications and maintains the derived state
 */

mod events;
mod state;

pub use events::{CtlArg, CtlClass, CtlCommand, LifecycleEvent};
pub use state::{ControlState, ProcessRecord};

use crate::core::types::{CtlStatus, CTL_ACK, CTL_REJECT};
use std::collections::BTreeSet;
use tracing::{trace, warn};

/// Handler for the host's `(class, command, args)` notifications
pub struct ControlChannel {
    classes: BTreeSet<CtlClass>,
    state: ControlState,
}

impl ControlChannel {
    pub fn new(classes: BTreeSet<CtlClass>) -> Self {
        Self {
            classes,
            state: ControlState::new(),
        }
    }

    #[inline]
    pub fn observes(&self, class: CtlClass) -> bool {
        self.classes.contains(&class)
    }

    /// Raw host entry point; returns 0 on acknowledgement, -1 for a malformed
    /// event in a subscribed class. Unsubscribed classes are acknowledged
    /// without being looked at.
    pub fn on_control(&self, class: CtlClass, command: &str, args: &[CtlArg]) -> CtlStatus {
        if !self.observes(class) {
            trace!(%class, command, "ignoring unsubscribed lifecycle class");
            return CTL_ACK;
        }

        match LifecycleEvent::parse(class, command, args) {
            Ok(event) => self.deliver(&event),
            Err(err) => {
                warn!(%class, command, error = %err, "rejected lifecycle event");
                CTL_REJECT
            }
        }
    }

    /// Typed entry point
    pub fn deliver(&self, event: &LifecycleEvent) -> CtlStatus {
        if self.observes(event.class()) {
            trace!(?event, "lifecycle event");
            self.state.apply(event);
        }
        CTL_ACK
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }
}
