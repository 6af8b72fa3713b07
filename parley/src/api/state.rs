//! Application state shared across route handlers.

use std::time::Instant;

use pchat::ChatOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ChatOrchestrator,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(orchestrator: ChatOrchestrator) -> Self {
        Self {
            orchestrator,
            started_at: Instant::now(),
        }
    }
}
