//! SH4 CPU core state model.
//!
//! This module owns the architectural state of one emulated SH4 core and
//! the exception-delivery contract every instruction implementation
//! depends on:
//!
//! - `context`: the register file ([`Sh4Context`]), including the banked
//!   low general registers and both floating-point banks
//! - `status`: SR/FPSCR bitfields and the derived-state updaters
//! - `fpu`: the paired single/double register view and NaN quirks
//! - `registers`: symbolic register identifiers for debugger access
//! - `exceptions`: precise exception raising, delay-slot adjustment, and
//!   delivery into guest state

pub mod context;
pub mod exceptions;
pub mod fpu;
pub mod registers;
pub mod status;

pub use context::Sh4Context;
pub use exceptions::{CoreError, Sh4Exception, StepResult};
pub use registers::Sh4Reg;
pub use status::{FpuStatusReg, StatusReg};
