/// Maximum number of keys held by a single probe set.
pub const PROBE_SIZE: usize = 8;

/// Below this size, an insertion into a bucket never triggers relocation.
pub const THRESHOLD: usize = PROBE_SIZE / 2;
