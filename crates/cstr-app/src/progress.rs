//! Progress events emitted while a run executes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStage {
    CheckingCache,
    LoadingCachedResult,
    Building,
    Simulating,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::Building => "building",
            RunStage::Simulating => "simulating",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    /// (steps taken, total steps) while simulating
    pub steps: Option<(usize, usize)>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            steps: None,
        }
    }
}
