//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! start(initial_path)
//!     → dispatch initial path
//!     → loop: NavigationEvent (Navigate / Back) from channel
//!         → RouteTable::lookup
//!         → Controller::invoke(action, params)   or   fallback(path)
//!     → exit on channel close or shutdown
//! ```
//!
//! # Design Decisions
//! - One event at a time, in arrival order (single cooperative loop)
//! - Dispatch keeps no state between calls besides the history stack
//! - A controller error during the loop is logged and the loop continues

pub mod navigator;

pub use navigator::{Dispatch, DispatchError, NavigationEvent, Navigator};
