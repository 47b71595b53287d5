// DB Migrator Console Service
//
// Log history, canned operation scripts and the timer-driven simulator.

mod buffer;
mod script;
mod simulator;

pub use buffer::{LogBuffer, TrimPolicy};
pub use script::{OperationKind, ScriptStep};
pub use simulator::{
    OperationHandle, OperationOutcome, OperationSimulator, OverlapPolicy, SimulatorConfig,
};
