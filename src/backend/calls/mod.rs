//! Calls Module
//!
//! Bookkeeping for audio and video calls. Media never passes through the
//! server: a call record only tracks who called whom, the callee's verdict
//! and whether the call is still ongoing. The record ID doubles as the room
//! ID clients join.
//!
//! # Call Lifecycle
//!
//! 1. **Start**: caller posts the callee's ID → record created as `Ongoing`
//! 2. **Verdict**: a participant reports `Accepted`, `Denied`, `Missed` or
//!    `Busy`; anything but `Accepted` ends the call
//! 3. **End**: a participant hangs up → `Ended` with `ended_at`
//!
//! The call log lists both kinds together, newest first.

pub mod db;
pub mod handlers;

pub use handlers::{end_call, get_call_logs, start_audio_call, start_video_call, update_call};
