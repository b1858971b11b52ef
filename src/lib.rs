//! sh4-emu library
//!
//! Processor-state model for the SH4 CPU at the heart of a Dreamcast-class
//! console emulator: the banked general register file, the paired
//! single/double floating-point register view, status-register handling,
//! and precise exception delivery (including delay-slot adjustment).
//!
//! The instruction interpreter, MMU page-table walker, and platform
//! frontend live outside this crate and drive it through [`Sh4Context`].

pub mod config;
pub mod host;
pub mod sh4;

pub use config::Settings;
pub use sh4::{CoreError, Sh4Context, Sh4Exception, Sh4Reg, StepResult};
