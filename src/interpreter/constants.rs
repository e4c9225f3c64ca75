// Constants for the interpreter

/// Starting address for heap allocations
/// Heap addresses start at 0x10000000 so they read as addresses, not counts
pub const HEAP_ADDRESS_START: u64 = 0x1000_0000;

/// Default maximum number of live heap objects
pub const DEFAULT_HEAP_LIMIT: usize = 64 * 1024;

/// Default maximum number of evaluation steps per execution
/// There is no tail-call optimization, so runaway recursion ends here
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Default snapshot history memory limit (256 MB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;
