//! Session navigation state machine and its persistence

mod state;
mod store;

pub(crate) use state::{NavAction, Page, SessionState, View};
pub(crate) use store::{SessionStore, default_session_dir};
