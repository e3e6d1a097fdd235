/// Usable-energy accumulation.
pub mod accumulator;
/// Simulation clock over wall-clock timestamps.
pub mod clock;
pub mod engine;
pub mod kpi;
/// Single-step orchestration of the physical models.
pub mod stepper;
/// Electrical and environment sensor readings.
pub mod telemetry;
pub mod types;

pub use engine::Engine;
pub use kpi::RunSummary;
pub use stepper::SimulationStepper;
pub use types::{SimulationState, StepInput, StepOutput, StepResult};
