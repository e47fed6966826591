// Exit codes for precise CI triage
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_GENERIC_FAIL: i32 = 1;
pub const EXIT_PARITY_FAIL: i32 = 3;
pub const EXIT_ENGINE_FAIL: i32 = 4;
