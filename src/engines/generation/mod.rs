pub mod genome;
pub mod codec;
pub mod operators;
pub mod fitness;
pub mod genetic_optimizer;
pub mod progress;

pub use genome::Chromosome;
pub use codec::{FieldEncoding, ParameterCodec, FIELD_COUNT};
pub use fitness::{FitnessEvaluator, FitnessFunction};
pub use genetic_optimizer::{GenerationSummary, GeneticOptimizer, OptimizerState, ProgressCallback};
pub use operators::{ParentSelection, SelectionPath};
pub use progress::{
    ChannelProgressCallback, LoggingProgressCallback, NoopProgressCallback, ProgressMessage,
};
