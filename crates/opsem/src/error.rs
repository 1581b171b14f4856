use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("lane index {index} out of range for a {len}-lane aggregate")]
    LaneOutOfRange { index: usize, len: usize },
}
