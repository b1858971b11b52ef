//! Symbolic register identifiers for debugger/introspection access.
//!
//! Instruction implementations index [`Sh4Context`] fields directly; this
//! lookup exists for debuggers and tooling that name registers at
//! runtime. Reads and pokes go through a value interface rather than a
//! retained location, so a bank switch between two accesses can never
//! leave a caller holding storage from the wrong bank.

use super::context::Sh4Context;

/// A register name, resolvable against any [`Sh4Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sh4Reg {
    /// General register r0..r15 (bank-aware view).
    R(u8),
    /// Inactive low-bank register r0..r7 of the other bank.
    RBank(u8),
    /// Primary single-precision register fr0..fr15, raw bits.
    Fr(u8),
    /// Extended single-precision register xf0..xf15, raw bits.
    Xf(u8),
    /// Global base register.
    Gbr,
    /// Saved status register.
    Ssr,
    /// Saved program counter.
    Spc,
    /// Saved general register 15.
    Sgr,
    /// Debug base register.
    Dbr,
    /// Vector base register.
    Vbr,
    /// High half of the MAC accumulator.
    Mach,
    /// Low half of the MAC accumulator.
    Macl,
    /// Procedure return register.
    Pr,
    /// FPU communication register.
    Fpul,
    /// Program counter (next instruction).
    Pc,
    /// Status register.
    Sr,
    /// Floating-point status/control register.
    Fpscr,
    /// Exception event register.
    Expevt,
}

impl Sh4Context {
    /// Read a register by symbolic identifier.
    ///
    /// Indexed variants with an out-of-range index are a caller-contract
    /// violation, checked only by debug assertion.
    pub fn reg(&self, reg: Sh4Reg) -> u32 {
        match reg {
            Sh4Reg::R(n) => {
                debug_assert!(n < 16, "r index out of range: {}", n);
                self.r[n as usize]
            }
            Sh4Reg::RBank(n) => {
                debug_assert!(n < 8, "r_bank index out of range: {}", n);
                self.r_bank[n as usize]
            }
            Sh4Reg::Fr(n) => self.fr_bits(n as usize),
            Sh4Reg::Xf(n) => self.xf_bits(n as usize),
            Sh4Reg::Gbr => self.gbr,
            Sh4Reg::Ssr => self.ssr,
            Sh4Reg::Spc => self.spc,
            Sh4Reg::Sgr => self.sgr,
            Sh4Reg::Dbr => self.dbr,
            Sh4Reg::Vbr => self.vbr,
            Sh4Reg::Mach => self.mach(),
            Sh4Reg::Macl => self.macl(),
            Sh4Reg::Pr => self.pr,
            Sh4Reg::Fpul => self.fpul,
            Sh4Reg::Pc => self.pc,
            Sh4Reg::Sr => self.sr.full(),
            Sh4Reg::Fpscr => self.fpscr.full(),
            Sh4Reg::Expevt => self.expevt,
        }
    }

    /// Write a register by symbolic identifier (debugger poke).
    ///
    /// Pokes to SR and FPSCR run the corresponding updater, so bank
    /// selection stays consistent with the new value.
    pub fn set_reg(&mut self, reg: Sh4Reg, value: u32) {
        match reg {
            Sh4Reg::R(n) => {
                debug_assert!(n < 16, "r index out of range: {}", n);
                self.r[n as usize] = value;
            }
            Sh4Reg::RBank(n) => {
                debug_assert!(n < 8, "r_bank index out of range: {}", n);
                self.r_bank[n as usize] = value;
            }
            Sh4Reg::Fr(n) => self.set_fr_bits(n as usize, value),
            Sh4Reg::Xf(n) => self.set_xf_bits(n as usize, value),
            Sh4Reg::Gbr => self.gbr = value,
            Sh4Reg::Ssr => self.ssr = value,
            Sh4Reg::Spc => self.spc = value,
            Sh4Reg::Sgr => self.sgr = value,
            Sh4Reg::Dbr => self.dbr = value,
            Sh4Reg::Vbr => self.vbr = value,
            Sh4Reg::Mach => self.set_mach(value),
            Sh4Reg::Macl => self.set_macl(value),
            Sh4Reg::Pr => self.pr = value,
            Sh4Reg::Fpul => self.fpul = value,
            Sh4Reg::Pc => self.pc = value,
            Sh4Reg::Sr => {
                self.sr.set_full(value);
                self.update_sr();
            }
            Sh4Reg::Fpscr => {
                self.fpscr.set_full(value);
                self.update_fpscr();
            }
            Sh4Reg::Expevt => self.expevt = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sh4::status::StatusReg;

    #[test]
    fn test_scalar_roundtrip() {
        let mut ctx = Sh4Context::new();
        let regs = [
            Sh4Reg::Gbr,
            Sh4Reg::Ssr,
            Sh4Reg::Spc,
            Sh4Reg::Sgr,
            Sh4Reg::Dbr,
            Sh4Reg::Vbr,
            Sh4Reg::Pr,
            Sh4Reg::Fpul,
            Sh4Reg::Pc,
            Sh4Reg::Expevt,
        ];
        for (i, &reg) in regs.iter().enumerate() {
            let value = 0xC0DE_0000 + i as u32;
            ctx.set_reg(reg, value);
            assert_eq!(ctx.reg(reg), value, "{:?}", reg);
        }
    }

    #[test]
    fn test_general_and_bank_registers() {
        let mut ctx = Sh4Context::new();
        ctx.set_reg(Sh4Reg::R(3), 33);
        ctx.set_reg(Sh4Reg::R(15), 1515);
        ctx.set_reg(Sh4Reg::RBank(3), 44);
        assert_eq!(ctx.r[3], 33);
        assert_eq!(ctx.r[15], 1515);
        assert_eq!(ctx.r_bank[3], 44);
    }

    #[test]
    fn test_mac_halves_via_lookup() {
        let mut ctx = Sh4Context::new();
        ctx.set_reg(Sh4Reg::Mach, 0x1234_5678);
        ctx.set_reg(Sh4Reg::Macl, 0x9ABC_DEF0);
        assert_eq!(ctx.reg(Sh4Reg::Mach), 0x1234_5678);
        assert_eq!(ctx.reg(Sh4Reg::Macl), 0x9ABC_DEF0);
        assert_eq!(ctx.mac, 0x1234_5678_9ABC_DEF0);
    }

    #[test]
    fn test_sr_poke_runs_updater() {
        let mut ctx = Sh4Context::new();
        ctx.r[0] = 0xA1;
        ctx.r_bank[0] = 0xA0;

        // Reset state has RB=1; poke SR with RB cleared.
        let mut sr = StatusReg::new(ctx.reg(Sh4Reg::Sr));
        sr.set_rb(false);
        ctx.set_reg(Sh4Reg::Sr, sr.full());

        // Bank 0 became active through the poke.
        assert_eq!(ctx.reg(Sh4Reg::R(0)), 0xA0);
        assert_eq!(ctx.reg(Sh4Reg::RBank(0)), 0xA1);
    }

    #[test]
    fn test_fpscr_poke_runs_updater() {
        let mut ctx = Sh4Context::new();
        ctx.fr[0] = 0x0F;
        ctx.xf[0] = 0xF0;

        // Set FR through a poke: banks swap.
        let fpscr = ctx.reg(Sh4Reg::Fpscr) | (1 << 21);
        ctx.set_reg(Sh4Reg::Fpscr, fpscr);
        assert_eq!(ctx.reg(Sh4Reg::Fr(0)), 0xF0);
        assert_eq!(ctx.reg(Sh4Reg::Xf(0)), 0x0F);
    }
}
