//! Live adapters for real operating-system interactions.

pub mod id_gen;
pub mod shell;
pub mod temp_path;

pub use id_gen::LiveIdGenerator;
pub use shell::LiveShell;
pub use temp_path::{temp_generator, ExclusiveTempFiles, NameOnlyTempPaths};
