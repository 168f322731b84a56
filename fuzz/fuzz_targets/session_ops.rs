//! Fuzz target for the session state machine
//!
//! # Strategy
//!
//! - Arbitrary sequences of user input, commands, inbound bytes, port
//!   switches, delimiter changes, write failures and device unplugs, applied
//!   to a session over the simulated transport
//!
//! # Invariants
//!
//! - Every registered session invariant holds after every step
//! - Nothing is written to the transport while disconnected
//! - NEVER panic

#![no_main]

use libfuzzer_sys::fuzz_target;
use yaterm_harness::{InvariantRegistry, SessionOp, SessionSnapshot, sim_session};

const MAX_OPS: usize = 256;

fuzz_target!(|ops: Vec<SessionOp>| {
    let Ok(mut session) = sim_session() else {
        return;
    };
    let invariants = InvariantRegistry::standard();

    for op in ops.iter().take(MAX_OPS) {
        let writes_before = session.transport().write_calls();
        let was_connected = session.is_connected();

        op.apply(&mut session);

        if !was_connected && !session.is_connected() {
            let writes = session.transport().write_calls();
            assert_eq!(writes, writes_before, "wrote while closed: {op:?}");
        }

        let snapshot = SessionSnapshot::from_session(&session);
        invariants.assert_all(&snapshot, &format!("after {op:?}"));
    }
});
