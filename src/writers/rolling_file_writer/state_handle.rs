use super::state::State;
use crate::{
    util::{buffer_with, ErrorCode},
    DeferredNow, ErrorChannel, FormatFunction, RollingError,
};
use log::Record;
use std::{path::PathBuf, sync::Mutex};

// Serializes the access to the State, and formats the records before the lock is taken.
pub(super) struct StateHandle {
    m_state: Mutex<State>,
    format_function: FormatFunction,
    line_ending: &'static [u8],
    error_channel: ErrorChannel,
}
impl StateHandle {
    pub(super) fn new(state: State, format_function: FormatFunction) -> Self {
        let line_ending = state.config().line_ending;
        let error_channel = state.config().error_channel.clone();
        Self {
            m_state: Mutex::new(state),
            format_function,
            line_ending,
            error_channel,
        }
    }

    pub(super) fn current_path(&self) -> Result<Option<PathBuf>, RollingError> {
        Ok(self
            .m_state
            .lock()
            .map_err(|_| RollingError::Poison)?
            .current_path())
    }

    pub(super) fn write(&self, now: &mut DeferredNow, record: &Record) {
        buffer_with(|tl_buf| match tl_buf.try_borrow_mut() {
            Ok(mut buffer) => {
                self.format_and_write(&mut buffer, now, record);
                buffer.clear();
            }
            Err(_e) => {
                // We arrive here in the rare cases of recursive logging
                // (e.g. log calls in Debug or Display implementations);
                // the inner calls are written before the outer one
                let mut tmp_buf = Vec::<u8>::with_capacity(200);
                self.format_and_write(&mut tmp_buf, now, record);
            }
        });
    }

    fn format_and_write(&self, buffer: &mut Vec<u8>, now: &mut DeferredNow, record: &Record) {
        (self.format_function)(buffer, now, record).unwrap_or_else(|e| {
            self.error_channel
                .report_err(ErrorCode::Format, "formatting failed", &e);
        });
        buffer.extend_from_slice(self.line_ending);
        match self.m_state.lock() {
            Ok(mut state) => state.write_buffer(buffer, now).unwrap_or_else(|e| {
                self.error_channel
                    .report_err(ErrorCode::Write, "writing failed", &e);
            }),
            Err(_) => self.error_channel.report_msg(
                ErrorCode::Poison,
                "log file state is poisoned, the log line is dropped",
            ),
        }
    }

    pub(super) fn flush(&self) -> std::io::Result<()> {
        if let Ok(ref mut state) = self.m_state.lock() {
            state.flush()?;
        }
        Ok(())
    }

    pub(super) fn shutdown(&self) {
        // do nothing in case of poison errors
        if let Ok(ref mut state) = self.m_state.lock() {
            state.shutdown();
        }
    }
}
impl std::fmt::Debug for StateHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("StateHandle")
            .field("m_state", &self.m_state)
            .field("format", &"<..>")
            .field("line_ending", &self.line_ending)
            .field("error_channel", &self.error_channel)
            .finish()
    }
}
