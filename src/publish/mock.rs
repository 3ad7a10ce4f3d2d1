use crate::error::{BuildInfoError, Result};
use crate::payload::BuildInformationRecord;
use crate::publish::{BuildInformationClient, OverwriteMode};
use std::cell::RefCell;

/// In-memory client that records pushes instead of sending them
#[derive(Default)]
pub struct RecordingClient {
    pushes: RefCell<Vec<(BuildInformationRecord, OverwriteMode)>>,
    failure: Option<String>,
}

impl RecordingClient {
    /// A client whose pushes succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose pushes fail with a remote submission error
    pub fn failing(message: impl Into<String>) -> Self {
        RecordingClient {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Every push attempted so far, including failed ones
    pub fn pushes(&self) -> Vec<(BuildInformationRecord, OverwriteMode)> {
        self.pushes.borrow().clone()
    }
}

impl BuildInformationClient for RecordingClient {
    fn push(&self, record: &BuildInformationRecord, mode: OverwriteMode) -> Result<()> {
        self.pushes.borrow_mut().push((record.clone(), mode));

        match &self.failure {
            Some(message) => Err(BuildInfoError::remote(message.clone())),
            None => Ok(()),
        }
    }
}
