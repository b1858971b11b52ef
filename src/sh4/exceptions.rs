//! Precise exception raising and delivery.
//!
//! Architectural exceptions (illegal instruction, FPU-disable, TLB
//! faults, traps) are part of normal guest behavior. An operation that
//! detects one builds a [`Sh4Exception`] and returns it up the
//! interpreter's call chain as a [`StepResult`]; the dispatch loop
//! consumes it by calling [`Sh4Context::deliver_exception`], which
//! mutates guest state and resumes at the handler vector. Nothing here
//! unwinds the host stack, so control flow stays deterministic and
//! inspectable.
//!
//! Host/configuration faults (an MMU-dependent path reached without full
//! MMU emulation enabled) are a different species: they surface as
//! [`CoreError`], get reported through the host hook, and end the
//! session. They never mutate architectural state.

use thiserror::Error;

use crate::config::Settings;
use crate::host::{self, Severity};

use super::context::{Sh4Context, RESET_PC};

/// Power-on reset.
pub const EVENT_POWER_ON_RESET: u32 = 0x000;
/// Manual reset.
pub const EVENT_MANUAL_RESET: u32 = 0x020;
/// TLB miss on read.
pub const EVENT_TLB_MISS_READ: u32 = 0x040;
/// TLB miss on write.
pub const EVENT_TLB_MISS_WRITE: u32 = 0x060;
/// Initial page write.
pub const EVENT_INITIAL_PAGE_WRITE: u32 = 0x080;
/// TLB protection violation on read.
pub const EVENT_TLB_PROT_READ: u32 = 0x0A0;
/// TLB protection violation on write.
pub const EVENT_TLB_PROT_WRITE: u32 = 0x0C0;
/// Unconditional trap (TRAPA).
pub const EVENT_TRAP: u32 = 0x160;
/// Illegal instruction.
pub const EVENT_ILLEGAL_INSTRUCTION: u32 = 0x180;
/// Illegal instruction in a delay slot.
pub const EVENT_SLOT_ILLEGAL_INSTRUCTION: u32 = 0x1A0;
/// FPU access with SR.FD set.
pub const EVENT_FPU_DISABLE: u32 = 0x800;
/// FPU access with SR.FD set, in a delay slot.
pub const EVENT_SLOT_FPU_DISABLE: u32 = 0x820;

/// Vector offset for general exceptions.
pub const VECTOR_GENERAL: u32 = 0x100;
/// Vector offset for TLB miss exceptions.
pub const VECTOR_TLB_MISS: u32 = 0x400;

/// Host/configuration faults. Fatal to the emulation session; the
/// frontend must halt rather than continue with wrong semantics.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// An exception path that depends on full MMU emulation was reached
    /// while the capability is disabled.
    #[error("full MMU support required to deliver event 0x{event:03X}")]
    MmuRequired {
        /// Event code of the exception that could not be delivered.
        event: u32,
    },
}

/// A pending precise exception: faulting PC, event code, vector offset.
///
/// Transient; created where the fault is detected and consumed by the
/// dispatch point that calls [`Sh4Context::deliver_exception`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sh4Exception {
    /// PC of the faulting instruction (saved to SPC on delivery).
    pub epc: u32,
    /// Event code (saved to EXPEVT on delivery).
    pub event: u32,
    /// Handler offset from VBR.
    pub vector: u32,
}

impl Sh4Exception {
    pub fn new(epc: u32, event: u32, vector: u32) -> Self {
        Self { epc, event, vector }
    }

    /// Adjust for a fault raised by the instruction occupying a delay
    /// slot: the architectural faulting address is the branch itself,
    /// two bytes earlier, and slotted event codes replace their plain
    /// variants.
    ///
    /// The remap is a fixed table. Codes without a slotted variant pass
    /// through unchanged; there is no generic +0x20 rule.
    #[must_use]
    pub fn for_delay_slot(self) -> Self {
        let event = match self.event {
            EVENT_FPU_DISABLE => EVENT_SLOT_FPU_DISABLE,
            EVENT_ILLEGAL_INSTRUCTION => EVENT_SLOT_ILLEGAL_INSTRUCTION,
            other => other,
        };
        Self {
            epc: self.epc.wrapping_sub(2),
            event,
            vector: self.vector,
        }
    }

    /// Whether delivering this event needs page-table state that only
    /// full MMU emulation tracks.
    #[inline]
    pub fn requires_mmu(&self) -> bool {
        matches!(
            self.event,
            EVENT_TLB_MISS_READ
                | EVENT_TLB_MISS_WRITE
                | EVENT_INITIAL_PAGE_WRITE
                | EVENT_TLB_PROT_READ
                | EVENT_TLB_PROT_WRITE
        )
    }

    /// Whether this is a reset-class event, which enters at the fixed
    /// reset vector instead of VBR + offset.
    #[inline]
    pub fn is_reset(&self) -> bool {
        matches!(self.event, EVENT_POWER_ON_RESET | EVENT_MANUAL_RESET)
    }
}

/// Outcome of one interpreted instruction, propagated explicitly to the
/// dispatch loop instead of unwinding the host stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Continue with the next instruction.
    Continue,
    /// A precise exception is pending delivery.
    Exception(Sh4Exception),
}

impl From<Sh4Exception> for StepResult {
    fn from(ex: Sh4Exception) -> Self {
        StepResult::Exception(ex)
    }
}

impl Sh4Context {
    /// Deliver a precise exception into guest state.
    ///
    /// Saves SR to SSR, the faulting PC to SPC, and r15 to SGR; records
    /// the event in EXPEVT; enters privileged, blocked, bank-1 mode; and
    /// resumes at VBR + vector (or the fixed reset vector for
    /// reset-class events).
    ///
    /// Fails without touching any architectural state when the event
    /// class requires full MMU emulation and the capability is off. The
    /// caller must treat that as a fatal configuration error, not as
    /// something to retry.
    ///
    /// # Panics
    ///
    /// A non-reset exception arriving while SR.BL is set means an
    /// exception was raised during exception delivery. That is a
    /// documented hazard, not a supported case, and aborts rather than
    /// mis-delivering.
    pub fn deliver_exception(
        &mut self,
        ex: Sh4Exception,
        settings: &Settings,
    ) -> Result<(), CoreError> {
        if ex.requires_mmu() && !settings.full_mmu {
            log::error!(
                "cannot deliver MMU-dependent event 0x{:03X} without full MMU emulation",
                ex.event
            );
            return Err(CoreError::MmuRequired { event: ex.event });
        }

        assert!(
            ex.is_reset() || !self.sr.bl(),
            "exception 0x{:03X} raised while SR.BL is set (nested delivery)",
            ex.event
        );

        self.expevt = ex.event;
        self.ssr = self.sr.full();
        self.spc = ex.epc;
        self.sgr = self.r[15];

        self.sr.set_bl(true);
        self.sr.set_md(true);
        self.sr.set_rb(true);
        self.update_sr();

        self.pc = if ex.is_reset() {
            RESET_PC
        } else {
            self.vbr.wrapping_add(ex.vector)
        };

        log::debug!(
            "delivered exception: event=0x{:03X} epc=0x{:08X} -> pc=0x{:08X}",
            ex.event,
            ex.epc,
            self.pc
        );
        Ok(())
    }

    /// Raise an FPU-disable fault for the instruction PC has already
    /// advanced past.
    ///
    /// Precise delivery of this fault needs the full-MMU interpreter
    /// plumbing; without it the session cannot continue correctly, so
    /// the failure is reported through the host hook and returned as a
    /// fatal [`CoreError`] instead of silently executing the FPU
    /// instruction.
    pub fn raise_fpu_disable(&self, settings: &Settings) -> Result<Sh4Exception, CoreError> {
        if settings.full_mmu {
            Ok(Sh4Exception::new(
                self.pc.wrapping_sub(2),
                EVENT_FPU_DISABLE,
                VECTOR_GENERAL,
            ))
        } else {
            host::report(Severity::Error, "Full MMU support needed");
            Err(CoreError::MmuRequired {
                event: EVENT_FPU_DISABLE,
            })
        }
    }
}
