//! Deferred interrupt handling.
//!
//! The Ctrl-C handler only records that an interrupt arrived; nothing acts
//! on it until [`Interrupts::take`] is called at a safe point. Argument
//! processing never polls, so the flag state and the input-unit queue are
//! never observed or mutated mid-build. The Vm polls between input units
//! and files.

use std::sync::mpsc::{channel, Receiver};

pub struct Interrupts {
    rx: Receiver<()>,
}

impl Interrupts {
    /// Installs the process-wide Ctrl-C handler. May only be called once
    /// per process.
    pub fn install() -> Self {
        let (tx, rx) = channel();
        // The send fails only when the receiver is gone, at which point the
        // process is exiting anyway.
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })
        .expect("Error setting Ctrl-C handler.");
        Interrupts { rx }
    }

    #[cfg(test)]
    pub fn from_receiver(rx: Receiver<()>) -> Self {
        Interrupts { rx }
    }

    /// Reports whether any interrupt arrived since the last check, draining
    /// everything that is pending.
    pub fn take(&self) -> bool {
        let mut seen = false;
        while self.rx.try_recv().is_ok() {
            seen = true;
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::Interrupts;
    use std::sync::mpsc::channel;

    #[test]
    fn take_drains_pending_interrupts() {
        let (tx, rx) = channel();
        let interrupts = Interrupts::from_receiver(rx);
        assert!(!interrupts.take());
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        assert!(interrupts.take());
        assert!(!interrupts.take());
    }
}
