//! Error reporting tests.

use std::io;

use cachesim_core::{ConfigError, SimError, TraceError};

#[test]
fn config_errors_name_the_level() {
    let err = ConfigError::SetCount { level: 2, sets: 3 };
    assert_eq!(err.to_string(), "L2: number of sets (3) must be a power of two");

    let err = ConfigError::ZeroAssociativity { level: 1 };
    assert_eq!(err.to_string(), "L1: associativity must be at least 1");
}

#[test]
fn trace_errors_carry_their_line() {
    let err = TraceError::UnknownOp {
        line: 7,
        op: "x".to_owned(),
    };
    assert_eq!(err.line(), Some(7));
    assert_eq!(err.to_string(), "line 7: unknown request type \"x\"");

    let err = TraceError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
    assert_eq!(err.line(), None);
}

#[test]
fn sim_error_is_transparent() {
    let err = SimError::from(ConfigError::BlockSize(24));
    assert_eq!(err.to_string(), "block size must be a non-zero power of two, got 24");

    let err = SimError::from(TraceError::BadAddress {
        line: 3,
        text: "zz".to_owned(),
    });
    assert_eq!(err.to_string(), "line 3: invalid address \"zz\"");
}
