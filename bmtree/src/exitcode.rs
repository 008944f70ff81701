/// Exit codes of the bmtree binary, following the BSD `sysexits.h` convention.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// Command line usage error or a failed operation
pub const USAGE: i32 = 64;

/// The addressed folder, bookmark or path does not exist
pub const NOINPUT: i32 = 66;
