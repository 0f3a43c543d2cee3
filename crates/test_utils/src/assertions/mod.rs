// Path: crates/test_utils/src/assertions/mod.rs
//! Assertion utilities for testing

/// Assert that two byte strings are equal, printing both in hex on failure
#[macro_export]
macro_rules! assert_bytes_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                let (left, right): (&[u8], &[u8]) = (left_val.as_ref(), right_val.as_ref());
                assert!(
                    left == right,
                    "bytes differ:\n  left: {}\n right: {}",
                    $crate::hex::encode(left),
                    $crate::hex::encode(right)
                );
            }
        }
    }};
}

/// Assert that a result is OK and unwrap it
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?}", err),
        }
    };
}

/// Assert that a result is Err and unwrap the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?}", val),
            Err(err) => err,
        }
    };
}

/// Assert that a command verification ran and failed with exactly `$message`
#[macro_export]
macro_rules! assert_verify_fails {
    ($result:expr, $message:expr) => {
        match $result {
            Ok(result) => {
                assert!(!result.is_ok(), "Expected verification to fail with {:?}", $message);
                assert_eq!(result.error.as_deref(), Some($message));
            }
            Err(err) => panic!("Expected a verification result, got Err: {:?}", err),
        }
    };
}
