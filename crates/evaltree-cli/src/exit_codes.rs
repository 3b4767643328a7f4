//! Exit codes for the `evaltree` binary. Part of the public contract.

pub const SUCCESS: i32 = 0;
pub const DATA_ERROR: i32 = 1; // Input parsed but the request cannot be served (e.g. unknown record)
pub const CONFIG_ERROR: i32 = 2; // Config or input file missing/unreadable/invalid
