use publisher_core::Stage;
use publisher_logging::{publish_debug, publish_warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    StageReached(Stage),
    /// A later candidate of an ordered selector list had to be used.
    FallbackUsed {
        action: String,
        selector: String,
        position: usize,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: WorkflowEvent);
}

/// Writes workflow events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::StageReached(stage) => publish_debug!("Stage reached: {stage}"),
            WorkflowEvent::FallbackUsed {
                action,
                selector,
                position,
            } => publish_warn!("Fallback #{position} used for {action}: {selector}"),
        }
    }
}
