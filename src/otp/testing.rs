use anyhow::{anyhow, Result};
use secrecy::SecretString;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{
    delivery::{CodeIssuer, Destination},
    navigation::Navigator,
};

/// Issuer that hands out a fixed list of codes in order.
pub(crate) struct QueuedIssuer {
    codes: Mutex<VecDeque<String>>,
    issued: Mutex<usize>,
}

impl QueuedIssuer {
    pub(crate) fn new<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            codes: Mutex::new(codes.into_iter().map(str::to_string).collect()),
            issued: Mutex::new(0),
        }
    }

    pub(crate) fn issued(&self) -> usize {
        *self.issued.lock().unwrap()
    }
}

impl CodeIssuer for QueuedIssuer {
    fn issue_code(&self, _destination: &Destination) -> Result<SecretString> {
        let code = self
            .codes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no codes left"))?;
        *self.issued.lock().unwrap() += 1;
        Ok(SecretString::from(code))
    }
}

pub(crate) struct FailingIssuer;

impl CodeIssuer for FailingIssuer {
    fn issue_code(&self, _destination: &Destination) -> Result<SecretString> {
        Err(anyhow!("delivery unavailable"))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    calls: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn on_verified(&self, destination: &Destination) {
        self.calls.lock().unwrap().push(destination.to_string());
    }
}
