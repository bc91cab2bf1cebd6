//! Interrupt handling. An interrupt (Ctrl-C, or a termination signal) ends the
//! process at once, except while files are being rewritten: then it only
//! raises a flag, and the rewrite stops at the next file boundary so that no
//! scratch file is left behind.
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Exit code after an interrupt: 128 + SIGINT
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared view of whether an interrupt has arrived.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    requested: Arc<AtomicBool>,
    deferring: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// A handler with no interrupt recorded and no signal hook. Useful when
    /// the flag is only ever raised by `request_shutdown`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Has an interrupt arrived?
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Records an interrupt, as if one had arrived.
    pub fn request_shutdown(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Is an interrupt, right now, recorded rather than acted upon?
    #[must_use]
    pub fn is_deferring(&self) -> bool {
        self.deferring.load(Ordering::SeqCst)
    }

    /// Runs `work` with interrupts deferred: an interrupt arriving during
    /// `work` only raises the flag, which `work` is expected to poll.
    pub fn defer<T>(&self, work: impl FnOnce() -> T) -> T {
        self.deferring.store(true, Ordering::SeqCst);
        let result = work();
        self.deferring.store(false, Ordering::SeqCst);
        result
    }

    fn on_signal(&self) {
        self.request_shutdown();
        if !self.is_deferring() {
            std::process::exit(EXIT_CODE_INTERRUPTED);
        }
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Stopping after the current file...");
        log::info!("Interrupt received while rewriting");
    }
}

/// Hooks Ctrl-C and termination signals. If the hook can't be installed, the
/// returned handler still works, but only `request_shutdown` raises its flag.
#[must_use]
pub fn install_handler() -> ShutdownHandler {
    let handler = ShutdownHandler::new();
    let hooked = handler.clone();
    if let Err(e) = ctrlc::set_handler(move || hooked.on_signal()) {
        log::warn!("Can't install the interrupt handler: {e}");
    }
    handler
}
