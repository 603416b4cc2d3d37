//! Users Module
//!
//! Profile endpoints for the caller, the user directory and the friend list.
//! Every route here sits behind `protect`.

pub mod db;
pub mod handlers;

pub use handlers::{get_all_verified_users, get_friends, get_me, get_users, update_me};
