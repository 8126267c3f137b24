use crate::model::{KeepSet, RunStatistics};

/// State shared by the stages of a single run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub stats: RunStatistics,
    pub keep_set: KeepSet,
}
