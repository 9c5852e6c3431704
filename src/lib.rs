pub mod types;
pub mod grammar;
pub mod discovery;
pub mod extraction;
pub mod sampling;
pub mod materialize;
pub mod execution;
pub mod config;
pub mod session;
pub mod utils;

pub use config::{ConfigError, SweepConfig};
pub use discovery::{discover, FileStructure};
pub use execution::{BatchManager, CaseLauncher, ProcessLauncher, RunSettings};
pub use grammar::Dialect;
pub use materialize::{materialize, StudySummary};
pub use sampling::{generate_values, ParameterSelection, SamplePlan, SamplingStrategy, SelectionSpec};
pub use session::{SessionError, StudySession};
