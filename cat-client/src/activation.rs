//! Process-wide "is the client collecting" switch.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cat_logger::{log_info, Logger};

const DISABLED: u32 = 0;
const ENABLED: u32 = 1;

/// Lock-free enabled/disabled state. Transitions are single atomic swaps and
/// report whether they actually changed the state.
#[derive(Debug, Default)]
pub struct ActivationFlag(AtomicU32);

impl ActivationFlag {
    pub const fn new() -> Self {
        Self(AtomicU32::new(DISABLED))
    }

    /// Returns `true` only on the disabled → enabled edge.
    pub fn enable(&self) -> bool {
        self.0.swap(ENABLED, Ordering::AcqRel) == DISABLED
    }

    /// Returns `true` only on the enabled → disabled edge.
    pub fn disable(&self) -> bool {
        self.0.swap(DISABLED, Ordering::AcqRel) == ENABLED
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire) != DISABLED
    }
}

/// [`ActivationFlag`] plus the log line announcing each real state change.
pub struct Activation {
    flag: ActivationFlag,
    logger: Arc<dyn Logger>,
}

impl Activation {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            flag: ActivationFlag::new(),
            logger,
        }
    }

    pub fn enable(&self) -> bool {
        let changed = self.flag.enable();
        if changed {
            log_info!(self.logger, "Cat has been enabled.");
        }
        changed
    }

    pub fn disable(&self) -> bool {
        let changed = self.flag.disable();
        if changed {
            log_info!(self.logger, "Cat has been disabled.");
        }
        changed
    }

    pub fn is_enabled(&self) -> bool {
        self.flag.is_enabled()
    }
}
