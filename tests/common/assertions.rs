//! Custom assertion macros

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an `ApiError::Http` with the given status,
/// returning its message
#[macro_export]
macro_rules! assert_http_error {
    ($result:expr, $status:expr) => {
        match $result {
            Err(bizdesk::desk_app::ApiError::Http { status, message, .. }) => {
                assert_eq!(status, $status, "unexpected status (message: {})", message);
                message
            }
            Err(e) => panic!("Expected HTTP {} error, got: {:?}", $status, e),
            Ok(value) => panic!("Expected HTTP {} error, got Ok: {:?}", $status, value),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
