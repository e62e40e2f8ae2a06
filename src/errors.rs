use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("room index does not point at a live room")]
    RoomNotFound,
}

pub type QuestResult<T> = Result<T, QuestError>;

impl QuestError {
    /// Exit code reported when this error ends the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            QuestError::Io(_) => crate::exitcode::IOERR,
            QuestError::RoomNotFound => crate::exitcode::SOFTWARE,
        }
    }
}
