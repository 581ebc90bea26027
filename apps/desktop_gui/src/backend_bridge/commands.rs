//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    SetText(String),
    Analyze,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetText(_) => "set_text",
            Self::Analyze => "analyze",
        }
    }
}
