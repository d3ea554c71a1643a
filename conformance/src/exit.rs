//! Semantic exit codes for testbed runs.
//!
//! Exit codes follow common conventions and are in the valid range (0-125).
//! Codes 126-255 are reserved by shells for special purposes.

/// Semantic exit codes.
///
/// These provide machine-readable run status. All codes are in the valid
/// range (0-125).
pub struct ExitCode;

impl ExitCode {
    /// Success - every case passed and the latency confirmation was given.
    pub const SUCCESS: i32 = 0;

    /// User error - invalid configuration.
    pub const USER_ERROR: i32 = 1;

    /// Internal error - report or progress output could not be written.
    pub const INTERNAL_ERROR: i32 = 3;

    // Application-specific codes (10-125)

    /// Test failure - an invariant did not hold.
    pub const TEST_FAILURE: i32 = 10;

    /// The operator declined the latency confirmation.
    pub const CONFIRMATION_DECLINED: i32 = 11;

    /// Setup failure - inputs for a case could not be built.
    pub const SETUP_FAILURE: i32 = 12;

    /// Get human-readable description of an exit code.
    #[must_use]
    pub const fn description(code: i32) -> &'static str {
        match code {
            0 => "success",
            1 => "user error (invalid configuration)",
            3 => "internal error (bug)",
            10 => "test failure",
            11 => "latency confirmation declined",
            12 => "setup failure",
            _ => "unknown",
        }
    }

    /// Check if an exit code indicates success (code 0).
    #[must_use]
    pub const fn is_success(code: i32) -> bool {
        code == Self::SUCCESS
    }

    /// Check if an exit code indicates any kind of failure (non-zero).
    #[must_use]
    pub const fn is_failure(code: i32) -> bool {
        code != Self::SUCCESS
    }
}
