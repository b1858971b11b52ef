//! Floating-point register views and NaN quirks.
//!
//! The 32 single-precision slots are addressable four ways: 16 primary
//! singles (fr), 16 extended singles (xf), 8 primary doubles (dr), and
//! 8 extended doubles (xd). A double pairs two adjacent singles with the
//! *high* 32 bits stored at the lower array index and the low 32 bits at
//! index+1, mirroring how the physical register file is wired. Double
//! accessors reinterpret the bit patterns; there is no numeric
//! conversion anywhere in this module.

use super::context::Sh4Context;

/// Canonical quiet-NaN bit pattern the SH4 FPU produces for singles.
pub const QNAN_BITS_32: u32 = 0x7FBF_FFFF;

/// Canonical quiet-NaN bit pattern the SH4 FPU produces for doubles.
pub const QNAN_BITS_64: u64 = 0x7FF7_FFFF_FFFF_FFFF;

impl Sh4Context {
    /// Primary single fr[n] as a float.
    #[inline]
    pub fn fr(&self, n: usize) -> f32 {
        f32::from_bits(self.fr_bits(n))
    }

    #[inline]
    pub fn set_fr(&mut self, n: usize, value: f32) {
        self.set_fr_bits(n, value.to_bits());
    }

    /// Raw bit pattern of primary single fr[n].
    #[inline]
    pub fn fr_bits(&self, n: usize) -> u32 {
        debug_assert!(n < 16, "fr index out of range: {}", n);
        self.fr[n]
    }

    #[inline]
    pub fn set_fr_bits(&mut self, n: usize, bits: u32) {
        debug_assert!(n < 16, "fr index out of range: {}", n);
        self.fr[n] = bits;
    }

    /// Extended single xf[n] as a float.
    #[inline]
    pub fn xf(&self, n: usize) -> f32 {
        f32::from_bits(self.xf_bits(n))
    }

    #[inline]
    pub fn set_xf(&mut self, n: usize, value: f32) {
        self.set_xf_bits(n, value.to_bits());
    }

    /// Raw bit pattern of extended single xf[n].
    #[inline]
    pub fn xf_bits(&self, n: usize) -> u32 {
        debug_assert!(n < 16, "xf index out of range: {}", n);
        self.xf[n]
    }

    #[inline]
    pub fn set_xf_bits(&mut self, n: usize, bits: u32) {
        debug_assert!(n < 16, "xf index out of range: {}", n);
        self.xf[n] = bits;
    }

    /// Primary double dr[n], n in [0,7].
    ///
    /// High half from slot 2n, low half from slot 2n+1, reinterpreted.
    #[inline]
    pub fn dr(&self, n: usize) -> f64 {
        f64::from_bits(pair_bits(&self.fr, n))
    }

    #[inline]
    pub fn set_dr(&mut self, n: usize, value: f64) {
        set_pair_bits(&mut self.fr, n, value.to_bits());
    }

    /// Extended double xd[n], n in [0,7].
    #[inline]
    pub fn xd(&self, n: usize) -> f64 {
        f64::from_bits(pair_bits(&self.xf, n))
    }

    #[inline]
    pub fn set_xd(&mut self, n: usize, value: f64) {
        set_pair_bits(&mut self.xf, n, value.to_bits());
    }
}

/// Assemble a double's bit pattern from a single-precision bank.
///
/// Slot 2n holds the high 32 bits and slot 2n+1 the low 32 bits. The
/// ordering is load-bearing: guest code reinterprets float bits as
/// double bits through paired FMOVs and expects exactly this layout.
#[inline]
fn pair_bits(bank: &[u32; 16], n: usize) -> u64 {
    debug_assert!(n < 8, "double register index out of range: {}", n);
    ((bank[2 * n] as u64) << 32) | bank[2 * n + 1] as u64
}

/// Scatter a double's bit pattern back into a single-precision bank.
#[inline]
fn set_pair_bits(bank: &mut [u32; 16], n: usize, bits: u64) {
    debug_assert!(n < 8, "double register index out of range: {}", n);
    bank[2 * n] = (bits >> 32) as u32;
    bank[2 * n + 1] = bits as u32;
}

/// Canonicalize a single-precision NaN the way the SH4 FPU does.
///
/// The SH4 clears the IEEE-754 signaling bit in the quiet NaNs it
/// produces (0x7FBFFFFF), unlike every recent host CPU; some titles
/// depend on seeing that exact pattern. Apply this to the result of any
/// host arithmetic implementing an SH4 float opcode.
#[inline]
pub fn fix_nan(value: f32) -> f32 {
    if value.is_nan() {
        f32::from_bits(QNAN_BITS_32)
    } else {
        value
    }
}

/// Canonicalize a double-precision NaN the way the SH4 FPU does.
#[inline]
pub fn fix_nan64(value: f64) -> f64 {
    if value.is_nan() {
        f64::from_bits(QNAN_BITS_64)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_roundtrip_bit_exact() {
        let mut ctx = Sh4Context::new();

        let patterns: [u64; 6] = [
            0x0000_0000_0000_0000,
            0x3FF0_0000_0000_0000,            // 1.0
            0xFFFF_FFFF_FFFF_FFFF,            // NaN with full payload
            0x7FF0_0000_0000_0001,            // signaling NaN, payload 1
            0x8000_0000_0000_0000,            // -0.0
            0x0123_4567_89AB_CDEF,
        ];

        for n in 0..8 {
            for &bits in &patterns {
                ctx.set_dr(n, f64::from_bits(bits));
                assert_eq!(ctx.dr(n).to_bits(), bits, "dr{} pattern 0x{:016X}", n, bits);

                ctx.set_xd(n, f64::from_bits(bits));
                assert_eq!(ctx.xd(n).to_bits(), bits, "xd{} pattern 0x{:016X}", n, bits);
            }
        }
    }

    #[test]
    fn test_double_pairing_is_swapped_not_adjacent() {
        let mut ctx = Sh4Context::new();

        for n in 0..8 {
            ctx.set_fr_bits(2 * n, 0xDEAD_0000 + n as u32);
            ctx.set_fr_bits(2 * n + 1, 0xBEEF_0000 + n as u32);

            let bits = ctx.dr(n).to_bits();
            assert_eq!((bits >> 32) as u32, 0xDEAD_0000 + n as u32, "high half of dr{}", n);
            assert_eq!(bits as u32, 0xBEEF_0000 + n as u32, "low half of dr{}", n);
        }
    }

    #[test]
    fn test_set_double_scatters_to_slots() {
        let mut ctx = Sh4Context::new();
        ctx.set_dr(3, f64::from_bits(0x4009_21FB_5444_2D18)); // pi
        assert_eq!(ctx.fr_bits(6), 0x4009_21FB);
        assert_eq!(ctx.fr_bits(7), 0x5444_2D18);
    }

    #[test]
    fn test_xd_uses_extended_bank() {
        let mut ctx = Sh4Context::new();
        ctx.set_xd(0, f64::from_bits(0x1122_3344_5566_7788));
        assert_eq!(ctx.xf_bits(0), 0x1122_3344);
        assert_eq!(ctx.xf_bits(1), 0x5566_7788);
        // Primary bank untouched
        assert_eq!(ctx.fr_bits(0), 0);
        assert_eq!(ctx.fr_bits(1), 0);
    }

    #[test]
    fn test_single_accessors_are_reinterpreting() {
        let mut ctx = Sh4Context::new();
        ctx.set_fr(2, 1.5f32);
        assert_eq!(ctx.fr_bits(2), 0x3FC0_0000);
        ctx.set_xf_bits(5, 0xBF80_0000);
        assert_eq!(ctx.xf(5), -1.0f32);
    }

    #[test]
    fn test_fix_nan_canonicalizes() {
        assert_eq!(fix_nan(f32::NAN).to_bits(), QNAN_BITS_32);
        // Signaling NaN input also canonicalizes
        assert_eq!(fix_nan(f32::from_bits(0x7F80_0001)).to_bits(), QNAN_BITS_32);
        // Non-NaN values pass through bit-exact
        assert_eq!(fix_nan(-0.0f32).to_bits(), 0x8000_0000);
        assert_eq!(fix_nan(f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn test_fix_nan64_canonicalizes() {
        assert_eq!(fix_nan64(f64::NAN).to_bits(), QNAN_BITS_64);
        assert_eq!(fix_nan64(f64::from_bits(0xFFF0_0000_0000_0001)).to_bits(), QNAN_BITS_64);
        assert_eq!(fix_nan64(2.0f64), 2.0f64);
    }
}
