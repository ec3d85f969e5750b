//! # GS Bridge Library
//!
//! Ground-station bridge for a rocketry telemetry competition.
//!
//! The bridge decodes binary sensor frames arriving on two inbound serial
//! channels (avionics and payload) into a shared latest-value telemetry
//! table, and re-encodes that table every 200 ms into the fixed 78-byte
//! frame the HYI judging ground station expects on its own serial channel.

pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod protocol;
pub mod serial;
pub mod telemetry;
