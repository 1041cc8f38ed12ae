//! # Teletype engine
//!
//! The scripting core of a programmable trigger and CV sequencer.
//!
//! A scene holds ten scripts of up to six lines: eight run on trigger
//! inputs, one on the metronome and one at startup. Lines are written
//! in a terse prefix language:
//! ```text
//! EVERY 4: TR.PULSE 1
//! CV 1 N P.NEXT
//! IF GT IN 8000: DEL 250: TR.PULSE 2
//! ```
//! Each line compiles once, when it is entered. Errors are reported
//! right away and the line is kept as a no-op, so a running scene is
//! never left half parsed.
//!
//! The engine reaches hardware only through the [`mach::Io`] trait,
//! and persists scenes through [`flash::Storage`]. The `teletype`
//! binary drives it from a terminal.

pub mod flash;
pub mod lang;
pub mod mach;
