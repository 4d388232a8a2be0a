use super::genetic_optimizer::{GenerationSummary, ProgressCallback};
use crate::error::TradeIntervalError;
use std::sync::mpsc::Sender;

/// Reports progress through the `log` facade every `log_every` generations
pub struct LoggingProgressCallback {
    log_every: usize,
}

impl LoggingProgressCallback {
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every: log_every.max(1),
        }
    }
}

impl ProgressCallback for LoggingProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!("Generation {} starting", generation);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        if summary.generation % self.log_every == 0 {
            log::info!(
                "Generation {}: Best Fitness = {:.4} ({} valid candidates)",
                summary.generation,
                summary.best_so_far,
                summary.valid_candidates
            );
        } else {
            log::debug!(
                "Generation {}: generation best {:.4}",
                summary.generation,
                summary.generation_best
            );
        }
    }

    fn on_generation_skipped(&mut self, generation: usize, error: &TradeIntervalError) {
        log::warn!("Generation {} skipped: {}", generation, error);
    }
}

pub struct NoopProgressCallback;

impl ProgressCallback for NoopProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _summary: &GenerationSummary) {}
    fn on_generation_skipped(&mut self, _generation: usize, _error: &TradeIntervalError) {}
}

// For a UI thread polling the search
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete(GenerationSummary),
    GenerationSkipped { generation: usize, reason: String },
}

pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(summary.clone()));
    }

    fn on_generation_skipped(&mut self, generation: usize, error: &TradeIntervalError) {
        let _ = self.sender.send(ProgressMessage::GenerationSkipped {
            generation,
            reason: error.to_string(),
        });
    }
}
