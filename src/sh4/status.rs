//! SR/FPSCR bitfields and derived-state updates.
//!
//! The status register gates which general-register bank is active and
//! whether FPU instructions trap; FPSCR selects rounding, denormal
//! handling, transfer size, and which floating-point bank is primary.
//!
//! # Update Contract
//!
//! Any write to SR or FPSCR must be followed by [`Sh4Context::update_sr`]
//! or [`Sh4Context::update_fpscr`] respectively, including direct bit
//! manipulation by the interpreter. The updaters compare against the
//! previous value and swap physical bank storage when the selection bits
//! changed, so skipping a call leaves the visible banks stale.

use crate::config::Settings;

use super::context::Sh4Context;

/// SH4 status register.
///
/// Bit layout: T(0), S(1), IMASK(7:4), Q(8), M(9), FD(15), BL(28),
/// RB(29), MD(30). All other bits read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusReg(u32);

impl StatusReg {
    /// Architecturally defined SR bits.
    pub const MASK: u32 = 0x7000_83F3;

    /// Wrap a raw value, masking undefined bits.
    pub const fn new(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    /// The full register value.
    #[inline]
    pub fn full(self) -> u32 {
        self.0
    }

    /// Replace the full register value, masking undefined bits.
    ///
    /// Callers must invoke [`Sh4Context::update_sr`] afterwards.
    #[inline]
    pub fn set_full(&mut self, value: u32) {
        self.0 = value & Self::MASK;
    }

    #[inline]
    fn bit(self, n: u32) -> bool {
        (self.0 >> n) & 1 != 0
    }

    #[inline]
    fn set_bit(&mut self, n: u32, value: bool) {
        if value {
            self.0 |= 1 << n;
        } else {
            self.0 &= !(1 << n);
        }
    }

    /// T: test/carry flag.
    #[inline]
    pub fn t(self) -> bool {
        self.bit(0)
    }

    #[inline]
    pub fn set_t(&mut self, value: bool) {
        self.set_bit(0, value);
    }

    /// S: saturation flag for MAC instructions.
    #[inline]
    pub fn s(self) -> bool {
        self.bit(1)
    }

    #[inline]
    pub fn set_s(&mut self, value: bool) {
        self.set_bit(1, value);
    }

    /// IMASK: interrupt mask level (0-15).
    #[inline]
    pub fn imask(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    #[inline]
    pub fn set_imask(&mut self, level: u8) {
        self.0 = (self.0 & !0xF0) | (((level & 0xF) as u32) << 4);
    }

    /// Q: divide-step state.
    #[inline]
    pub fn q(self) -> bool {
        self.bit(8)
    }

    #[inline]
    pub fn set_q(&mut self, value: bool) {
        self.set_bit(8, value);
    }

    /// M: divide-step state.
    #[inline]
    pub fn m(self) -> bool {
        self.bit(9)
    }

    #[inline]
    pub fn set_m(&mut self, value: bool) {
        self.set_bit(9, value);
    }

    /// FD: FPU disable. FPU instructions raise event 0x800 while set.
    #[inline]
    pub fn fd(self) -> bool {
        self.bit(15)
    }

    #[inline]
    pub fn set_fd(&mut self, value: bool) {
        self.set_bit(15, value);
    }

    /// BL: exception/interrupt block.
    #[inline]
    pub fn bl(self) -> bool {
        self.bit(28)
    }

    #[inline]
    pub fn set_bl(&mut self, value: bool) {
        self.set_bit(28, value);
    }

    /// RB: register bank select (privileged mode only).
    #[inline]
    pub fn rb(self) -> bool {
        self.bit(29)
    }

    #[inline]
    pub fn set_rb(&mut self, value: bool) {
        self.set_bit(29, value);
    }

    /// MD: processor mode (true = privileged).
    #[inline]
    pub fn md(self) -> bool {
        self.bit(30)
    }

    #[inline]
    pub fn set_md(&mut self, value: bool) {
        self.set_bit(30, value);
    }
}

/// SH4 floating-point status/control register.
///
/// Bit layout: RM(1:0), flag/enable/cause fields (16:2), DN(18), PR(19),
/// SZ(20), FR(21).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FpuStatusReg(u32);

impl FpuStatusReg {
    /// Architecturally defined FPSCR bits.
    pub const MASK: u32 = 0x003F_FFFF;

    /// Wrap a raw value, masking undefined bits.
    pub const fn new(raw: u32) -> Self {
        Self(raw & Self::MASK)
    }

    /// The full register value.
    #[inline]
    pub fn full(self) -> u32 {
        self.0
    }

    /// Replace the full register value, masking undefined bits.
    ///
    /// Callers must invoke [`Sh4Context::update_fpscr`] afterwards.
    #[inline]
    pub fn set_full(&mut self, value: u32) {
        self.0 = value & Self::MASK;
    }

    /// RM: rounding mode. 0 = to nearest, 1 = toward zero; 2 and 3 are
    /// reserved and behave like toward zero on real hardware.
    #[inline]
    pub fn rm(self) -> u32 {
        self.0 & 3
    }

    /// DN: denormals are treated as zero while set.
    #[inline]
    pub fn dn(self) -> bool {
        (self.0 >> 18) & 1 != 0
    }

    /// PR: double-precision mode for arithmetic instructions.
    #[inline]
    pub fn pr(self) -> bool {
        (self.0 >> 19) & 1 != 0
    }

    /// SZ: 64-bit transfer size for FMOV.
    #[inline]
    pub fn sz(self) -> bool {
        (self.0 >> 20) & 1 != 0
    }

    /// FR: floating-point bank select.
    #[inline]
    pub fn fr(self) -> bool {
        (self.0 >> 21) & 1 != 0
    }

    #[inline]
    pub fn set_fr(&mut self, value: bool) {
        if value {
            self.0 |= 1 << 21;
        } else {
            self.0 &= !(1 << 21);
        }
    }
}

impl Sh4Context {
    /// Recompute state derived from SR after any write to it.
    ///
    /// Swaps the physical low general-register bank when the effective
    /// RB selection changed (user mode always runs on bank 0, so RB is
    /// forced back to 0 there). Returns whether the active bank changed,
    /// so callers can invalidate anything derived from bank identity.
    /// Interrupt re-evaluation against the new IMASK is the interrupt
    /// controller's job, triggered off the same call site.
    pub fn update_sr(&mut self) -> bool {
        let swapped = if self.sr.md() {
            if self.old_sr.rb() != self.sr.rb() {
                self.swap_gpr_banks();
                true
            } else {
                false
            }
        } else {
            // User mode: RB reads back as 0 and bank 0 is active.
            self.sr.set_rb(false);
            if self.old_sr.rb() {
                self.swap_gpr_banks();
                true
            } else {
                false
            }
        };

        self.old_sr = self.sr;
        if swapped {
            log::trace!(
                "SR update switched to bank {} (sr=0x{:08X})",
                if self.sr.rb() { 1 } else { 0 },
                self.sr.full()
            );
        }
        swapped
    }

    /// Recompute state derived from FPSCR after any write to it.
    ///
    /// Swaps the primary/extended floating-point banks when FR changed
    /// and re-propagates the rounding/denormal mode to the host FPU.
    /// Idempotent: calling again without an intervening FPSCR write
    /// changes nothing.
    pub fn update_fpscr(&mut self) {
        if self.fpscr.fr() != self.old_fpscr.fr() {
            self.swap_fp_banks();
            log::trace!(
                "FPSCR update switched FP bank (fpscr=0x{:08X})",
                self.fpscr.full()
            );
        }
        self.old_fpscr = self.fpscr;
        if Settings::get().host_fpu {
            self.sync_host_fpu();
        }
    }

    /// Propagate the emulated rounding/denormal mode into the host FPU
    /// control word, so host float instructions used to implement SH4
    /// opcodes round the way the guest expects.
    #[cfg(target_arch = "x86_64")]
    pub fn sync_host_fpu(&self) {
        use std::arch::x86_64::{
            _MM_FLUSH_ZERO_OFF, _MM_FLUSH_ZERO_ON, _MM_ROUND_NEAREST, _MM_ROUND_TOWARD_ZERO,
            _MM_SET_FLUSH_ZERO_MODE, _MM_SET_ROUNDING_MODE,
        };

        let round = if self.fpscr.rm() == 0 {
            _MM_ROUND_NEAREST
        } else {
            _MM_ROUND_TOWARD_ZERO
        };
        let flush = if self.fpscr.dn() {
            _MM_FLUSH_ZERO_ON
        } else {
            _MM_FLUSH_ZERO_OFF
        };

        // SAFETY: only alters the calling thread's MXCSR control bits.
        unsafe {
            _MM_SET_ROUNDING_MODE(round);
            _MM_SET_FLUSH_ZERO_MODE(flush);
        }
    }

    /// No host FPU control word on this target. Accuracy limitation:
    /// host arithmetic always rounds to nearest regardless of the
    /// emulated FPSCR.RM, and denormals are not flushed.
    #[cfg(not(target_arch = "x86_64"))]
    pub fn sync_host_fpu(&self) {}
}
