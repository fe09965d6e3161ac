//! Application orchestration: feed controllers, state, event loop plumbing
//! and input handling.

pub mod brand_feed;
pub mod event;
pub mod feed_runtime;
pub mod handler;
pub mod scroll;
pub mod state;
pub mod time_feed;
