//! SH4 architectural state.
//!
//! One [`Sh4Context`] holds the complete register state of an emulated
//! core. Exactly one logical thread executes instructions against it; no
//! locking is required, and the state is safe to suspend and resume at
//! any instruction boundary.
//!
//! Floating-point registers are stored as raw `u32` bit patterns rather
//! than `f32` so that NaN payloads survive every move untouched. The
//! typed views live in the `fpu` module.

use super::status::{FpuStatusReg, StatusReg};

/// Program counter value after any reset.
pub const RESET_PC: u32 = 0xA000_0000;

/// SR value after a reset: MD=1, RB=1, BL=1, IMASK=0xF.
pub const RESET_SR: u32 = 0x7000_00F0;

/// FPSCR value after a reset: DN=1, RM=round-toward-zero.
pub const RESET_FPSCR: u32 = 0x0004_0001;

/// Complete architectural state of one SH4 core.
///
/// `r[0..8]` is always the *active* low bank; `r_bank` holds the other
/// bank's eight words. `update_sr` swaps the two when SR.RB changes, so
/// instruction implementations can index `r` directly without consulting
/// the bank bit.
#[derive(Debug, Clone)]
pub struct Sh4Context {
    /// General registers r0..r15 (bank-aware view).
    pub r: [u32; 16],
    /// Inactive low-bank storage (the other bank's r0..r7).
    pub r_bank: [u32; 8],

    /// Global base register.
    pub gbr: u32,
    /// Saved status register (written on exception entry).
    pub ssr: u32,
    /// Saved program counter (written on exception entry).
    pub spc: u32,
    /// Saved general register 15 (written on exception entry).
    pub sgr: u32,
    /// Debug base register.
    pub dbr: u32,
    /// Vector base register.
    pub vbr: u32,

    /// 64-bit multiply-accumulate accumulator (MACH:MACL).
    pub mac: u64,
    /// Procedure return register.
    pub pr: u32,
    /// FPU communication register.
    pub fpul: u32,

    /// PC of the next instruction to execute.
    pub pc: u32,

    /// Status register.
    pub sr: StatusReg,
    /// Floating-point status/control register.
    pub fpscr: FpuStatusReg,

    /// SR value as of the last `update_sr`, used to detect bank changes.
    pub(crate) old_sr: StatusReg,
    /// FPSCR value as of the last `update_fpscr`.
    pub(crate) old_fpscr: FpuStatusReg,

    /// Primary single-precision bank fr0..fr15, raw bit patterns.
    pub fr: [u32; 16],
    /// Extended single-precision bank xf0..xf15, raw bit patterns.
    pub xf: [u32; 16],

    /// Exception event register (cause of the last delivered exception).
    pub expevt: u32,

    /// Core run flag; cleared by the frontend to stop the dispatch loop.
    pub cpu_running: bool,
}

impl Sh4Context {
    /// Create a context in the power-on reset state.
    pub fn new() -> Self {
        let mut ctx = Self {
            r: [0; 16],
            r_bank: [0; 8],
            gbr: 0,
            ssr: 0,
            spc: 0,
            sgr: 0,
            dbr: 0,
            vbr: 0,
            mac: 0,
            pr: 0,
            fpul: 0,
            pc: 0,
            sr: StatusReg::default(),
            fpscr: FpuStatusReg::default(),
            old_sr: StatusReg::default(),
            old_fpscr: FpuStatusReg::default(),
            fr: [0; 16],
            xf: [0; 16],
            expevt: 0,
            cpu_running: false,
        };
        ctx.reset();
        ctx
    }

    /// Reset to the power-on architectural state.
    ///
    /// Register contents other than the control registers are
    /// architecturally undefined after reset; they are zeroed here for
    /// reproducibility.
    pub fn reset(&mut self) {
        self.r = [0; 16];
        self.r_bank = [0; 8];
        self.gbr = 0;
        self.ssr = 0;
        self.spc = 0;
        self.sgr = 0;
        self.dbr = 0;
        self.vbr = 0;
        self.mac = 0;
        self.pr = 0;
        self.fpul = 0;
        self.fr = [0; 16];
        self.xf = [0; 16];
        self.expevt = 0;
        self.pc = RESET_PC;
        self.sr = StatusReg::new(RESET_SR);
        self.old_sr = self.sr;
        self.fpscr = FpuStatusReg::new(RESET_FPSCR);
        self.old_fpscr = self.fpscr;
        self.cpu_running = false;
        log::debug!("SH4 context reset: pc=0x{:08X} sr=0x{:08X}", self.pc, self.sr.full());
    }

    /// MACH: high half of the multiply-accumulate accumulator.
    #[inline]
    pub fn mach(&self) -> u32 {
        (self.mac >> 32) as u32
    }

    /// MACL: low half of the multiply-accumulate accumulator.
    #[inline]
    pub fn macl(&self) -> u32 {
        self.mac as u32
    }

    #[inline]
    pub fn set_mach(&mut self, value: u32) {
        self.mac = (self.mac & 0x0000_0000_FFFF_FFFF) | ((value as u64) << 32);
    }

    #[inline]
    pub fn set_macl(&mut self, value: u32) {
        self.mac = (self.mac & 0xFFFF_FFFF_0000_0000) | value as u64;
    }

    /// Swap the active low general-register bank with the shadow bank.
    pub(crate) fn swap_gpr_banks(&mut self) {
        for i in 0..8 {
            std::mem::swap(&mut self.r[i], &mut self.r_bank[i]);
        }
    }

    /// Swap the primary and extended floating-point banks.
    pub(crate) fn swap_fp_banks(&mut self) {
        std::mem::swap(&mut self.fr, &mut self.xf);
    }
}

impl Default for Sh4Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let ctx = Sh4Context::new();
        assert_eq!(ctx.pc, RESET_PC);
        assert_eq!(ctx.sr.full(), RESET_SR);
        assert!(ctx.sr.md());
        assert!(ctx.sr.rb());
        assert!(ctx.sr.bl());
        assert_eq!(ctx.sr.imask(), 0xF);
        assert_eq!(ctx.fpscr.full(), RESET_FPSCR);
        assert!(ctx.fpscr.dn());
        assert_eq!(ctx.fpscr.rm(), 1);
        assert!(!ctx.cpu_running);
    }

    #[test]
    fn test_mac_halves() {
        let mut ctx = Sh4Context::new();
        ctx.set_mach(0xDEAD_BEEF);
        ctx.set_macl(0x0BAD_F00D);
        assert_eq!(ctx.mach(), 0xDEAD_BEEF);
        assert_eq!(ctx.macl(), 0x0BAD_F00D);
        assert_eq!(ctx.mac, 0xDEAD_BEEF_0BAD_F00D);
    }

    #[test]
    fn test_gpr_bank_swap_preserves_both_banks() {
        let mut ctx = Sh4Context::new();
        for i in 0..8 {
            ctx.r[i] = 0x1000 + i as u32;
            ctx.r_bank[i] = 0x2000 + i as u32;
        }

        ctx.swap_gpr_banks();
        for i in 0..8 {
            assert_eq!(ctx.r[i], 0x2000 + i as u32);
            assert_eq!(ctx.r_bank[i], 0x1000 + i as u32);
        }

        ctx.swap_gpr_banks();
        for i in 0..8 {
            assert_eq!(ctx.r[i], 0x1000 + i as u32);
            assert_eq!(ctx.r_bank[i], 0x2000 + i as u32);
        }
    }

    #[test]
    fn test_high_registers_untouched_by_bank_swap() {
        let mut ctx = Sh4Context::new();
        for i in 8..16 {
            ctx.r[i] = 0xAA00 + i as u32;
        }
        ctx.swap_gpr_banks();
        for i in 8..16 {
            assert_eq!(ctx.r[i], 0xAA00 + i as u32);
        }
    }
}
