//! Host error-reporting hook.
//!
//! Fatal configuration problems (for example an MMU-dependent exception
//! path reached while full MMU emulation is disabled) are surfaced to the
//! embedding frontend through this hook so it can show a message box or
//! abort the session. Architectural exceptions raised by emulated code
//! never pass through here; those stay inside the core and are delivered
//! back into guest state.

use std::sync::OnceLock;

/// Severity of a host report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Recoverable problem; emulation continues.
    Warning,
    /// Fatal-to-the-session problem; the frontend must halt emulation.
    Error,
}

/// Host report callback: severity plus a formatted message.
pub type ReportFn = fn(Severity, &str);

static REPORTER: OnceLock<ReportFn> = OnceLock::new();

/// Install the frontend's reporter.
///
/// The first install wins and stays for the life of the process; returns
/// false if a reporter was already installed.
pub fn install_reporter(reporter: ReportFn) -> bool {
    REPORTER.set(reporter).is_ok()
}

/// Report a message to the host.
///
/// Falls back to the `log` crate when no reporter is installed, so the
/// message is never silently dropped.
pub fn report(severity: Severity, message: &str) {
    match REPORTER.get() {
        Some(reporter) => reporter(severity, message),
        None => match severity {
            Severity::Info => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        },
    }
}
