//! Deterministic test harness for yaterm.
//!
//! In-memory implementations of the session collaborators, so the exact code
//! that runs against a serial device can be driven step by step in tests.
//!
//! # Invariant Testing
//!
//! The `invariants` module extracts a [`SessionSnapshot`] from a live session
//! and checks behavioral properties against it. Use
//! [`InvariantRegistry::standard()`] after every operation of a generated
//! sequence.
//!
//! # Generated Operations
//!
//! [`SessionOp`] is an `Arbitrary` description of one thing a user or the
//! device can do to a session, shared by property tests and the fuzz target.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod ops;
pub mod sim_ports;
pub mod sim_settings;
pub mod sim_transport;

pub use invariants::{
    ConnectionMatchesTransport, DisplayWithinBound, FramerIndexInRange, HistoryCursorInRange,
    HistoryWithinBound, Invariant, InvariantRegistry, InvariantResult, SegmentAccounting,
    SessionSnapshot, Violation,
};
pub use ops::{CommandOp, EomChoice, SIM_PORTS, SessionOp, port_name, sim_session};
pub use sim_ports::SimPorts;
pub use sim_settings::MemorySettings;
pub use sim_transport::{SimError, SimTransport};
