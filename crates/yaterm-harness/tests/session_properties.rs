//! Property-based tests for the session state machine.
//!
//! Invariants must hold after every step of an arbitrary operation sequence:
//! typed input, commands, inbound bytes, port changes and device failures.

use proptest::prelude::*;
use yaterm_core::{ConnectionState, SegmentKind, Transport};
use yaterm_harness::{
    CommandOp, EomChoice, InvariantRegistry, SIM_PORTS, SessionOp, SessionSnapshot, sim_session,
};

/// Short printable lines, occasionally starting with `/` or `\/`.
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[ -~]{0,12}",
        1 => "/[a-z]{0,6}( [a-zA-Z0-9]{1,6})?",
        1 => "\\\\/[a-z]{0,6}",
    ]
}

/// Inbound chunks, biased towards delimiters and multi-byte characters.
fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        3 => "[a-z\r\n]{0,16}".prop_map(String::into_bytes),
        1 => "[é€😀\r\n]{0,4}".prop_map(String::into_bytes),
        1 => prop::collection::vec(any::<u8>(), 0..16),
    ]
}

fn command_strategy() -> impl Strategy<Value = CommandOp> {
    prop_oneof![
        Just(CommandOp::Clear),
        any::<u8>().prop_map(CommandOp::Connect),
        Just(CommandOp::ConnectNoPort),
        Just(CommandOp::Disconnect),
        prop::option::of("/?[a-z]{0,8}").prop_map(CommandOp::Help),
        Just(CommandOp::Quit),
        "[a-z]{0,4}".prop_map(CommandOp::Unknown),
    ]
}

fn eom_strategy() -> impl Strategy<Value = EomChoice> {
    prop_oneof![
        Just(EomChoice::Cr),
        Just(EomChoice::Lf),
        Just(EomChoice::CrLf),
        "[;#\r\n]{0,3}".prop_map(EomChoice::Custom),
    ]
}

fn op_strategy() -> impl Strategy<Value = SessionOp> {
    prop_oneof![
        4 => line_strategy().prop_map(SessionOp::Input),
        2 => command_strategy().prop_map(SessionOp::Command),
        6 => bytes_strategy().prop_map(SessionOp::Readable),
        2 => Just(SessionOp::Connect),
        1 => Just(SessionOp::Disconnect),
        1 => any::<u8>().prop_map(SessionOp::SelectPort),
        1 => eom_strategy().prop_map(SessionOp::SetEom),
        1 => "[<>]{0,2}".prop_map(SessionOp::SetSom),
        2 => Just(SessionOp::PrevHistory),
        2 => Just(SessionOp::NextHistory),
        1 => Just(SessionOp::ResetHistory),
        1 => Just(SessionOp::Unplug),
        1 => any::<bool>().prop_map(SessionOp::FailWrites),
        1 => (0u16..64).prop_map(SessionOp::SetMaxDisplay),
    ]
}

proptest! {
    /// Session invariants hold under arbitrary operation sequences.
    #[test]
    fn prop_session_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut session = sim_session().unwrap();
        let invariants = InvariantRegistry::standard();

        for op in ops {
            op.apply(&mut session);

            let snapshot = SessionSnapshot::from_session(&session);
            prop_assert!(
                invariants.check_all(&snapshot).is_ok(),
                "Invariant violated after {:?}: {:?}", op, invariants.check_all(&snapshot)
            );
        }
    }

    /// Nothing reaches the transport while disconnected.
    #[test]
    fn prop_no_writes_while_disconnected(lines in prop::collection::vec(line_strategy(), 1..20)) {
        let mut session = sim_session().unwrap();

        for line in &lines {
            if line.starts_with('/') {
                continue;
            }
            session.parse_input(line);
        }

        prop_assert_eq!(session.transport().write_calls(), 0);
        prop_assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    /// Every accepted write is SOM + line + EOM, in submission order.
    #[test]
    fn prop_writes_are_framed(lines in prop::collection::vec("[a-z0-9 ]{0,10}", 1..10)) {
        let mut session = sim_session().unwrap();
        session.set_som(">");
        session.connect().unwrap();

        for line in &lines {
            session.parse_input(line);
        }

        let expected: Vec<Vec<u8>> =
            lines.iter().map(|line| format!(">{line}\r\n").into_bytes()).collect();
        prop_assert_eq!(session.transport().writes(), expected.as_slice());
    }

    /// Inbound data is dropped while disconnected.
    #[test]
    fn prop_inbound_dropped_while_disconnected(chunks in prop::collection::vec(bytes_strategy(), 1..10)) {
        let mut session = sim_session().unwrap();

        for chunk in &chunks {
            session.on_readable(chunk);
        }

        prop_assert!(session.display().is_empty());
    }
}

#[test]
fn refused_port_reports_and_stays_disconnected() {
    let mut session = sim_session().unwrap();
    session.set_port(SIM_PORTS[2]).unwrap();

    assert!(session.connect().is_err());
    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert!(!session.transport().is_open());
    assert_eq!(session.display().last().map(|s| s.kind), Some(SegmentKind::Error));
    assert!(session.error_text().starts_with("Connect attempt failed"));
}

#[test]
fn unplug_disconnects_with_error() {
    let mut session = sim_session().unwrap();
    session.connect().unwrap();
    session.on_readable(b"partial\r");

    SessionOp::Unplug.apply(&mut session);

    assert_eq!(session.state(), ConnectionState::Disconnected);
    assert_eq!(session.error_text(), "Device disconnected");
    assert_eq!(session.framer().eom_index(), 0);
    InvariantRegistry::standard()
        .assert_all(&SessionSnapshot::from_session(&session), "after unplug");
}
