#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("Unknown label template id: {0} (expected 1..=5)")]
    UnknownLabelTemplate(u8),
}
