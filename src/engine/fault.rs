//! Call-scoped fault channel.
//!
//! The engine can raise faults from background work that no direct call
//! returns. Each validation call installs its own listener right before the
//! engine starts and detaches it once the engine is closed, so faults never
//! cross between concurrent calls and never outlive the call.

use tokio::sync::mpsc;

use super::EngineFault;

/// Message of the known, harmless parent-symbol binding defect
pub const PARENT_SYMBOL_FAULT: &str = "Cannot create the symbol map";

/// Engine-side handle for raising faults. Reports after detach are dropped.
#[derive(Debug, Clone)]
pub struct FaultReporter {
    tx: mpsc::UnboundedSender<EngineFault>,
}

impl FaultReporter {
    pub fn report(&self, fault: EngineFault) {
        if self.tx.send(fault).is_err() {
            log::trace!("Fault reported after listener detached");
        }
    }
}

/// Faults captured during one call, split by kind
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CapturedFaults {
    /// Occurrences of the parent-symbol binding defect
    pub known_defects: Vec<EngineFault>,
    pub other: Vec<EngineFault>,
}

impl CapturedFaults {
    pub fn is_empty(&self) -> bool {
        self.known_defects.is_empty() && self.other.is_empty()
    }
}

#[derive(Debug)]
pub struct FaultListener {
    rx: mpsc::UnboundedReceiver<EngineFault>,
}

impl FaultListener {
    pub fn install() -> (Self, FaultReporter) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, FaultReporter { tx })
    }

    /// Stop listening and drain whatever was captured
    pub fn detach(mut self) -> CapturedFaults {
        self.rx.close();

        let mut captured = CapturedFaults::default();
        while let Ok(fault) = self.rx.try_recv() {
            if is_parent_symbol_defect(&fault) {
                captured.known_defects.push(fault);
            } else {
                captured.other.push(fault);
            }
        }
        captured
    }
}

pub fn is_parent_symbol_defect(fault: &EngineFault) -> bool {
    fault.message().contains(PARENT_SYMBOL_FAULT)
}
