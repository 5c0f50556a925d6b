//! Statusboard - live dashboard aggregator
//!
//! Pollers fetch heterogeneous home-lab sources on their own schedules, the
//! latest snapshot per channel is kept in memory, and every change is pushed
//! to connected browsers over WebSocket.

pub mod api;
pub mod cli;
pub mod config;
pub mod hub;
pub mod logging;
pub mod metrics;
pub mod poller;
pub mod source;
pub mod store;
