//! Scripted adapters that serve queued results instead of touching the OS.

pub mod shell;

pub use shell::{ScriptedShell, ScriptedStep};
