//! Browser implementations of the session crate's platform seams.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` backs the persisted session with `localStorage`, `transport`
//! sends auth requests with `fetch`. Both degrade to errors during SSR.

pub mod storage;
pub mod transport;
