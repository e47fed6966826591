//! CLI command implementations

pub mod engines;
pub mod list;
pub mod run;
pub mod verify;

pub use engines::EnginesCommand;
pub use list::ListCommand;
pub use run::RunCommand;
pub use verify::VerifyCommand;
