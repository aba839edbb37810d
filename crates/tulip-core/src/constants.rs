/// Hex prefix a sealed digest must start with unless the caller overrides it.
pub const DIFFICULTY_PREFIX: &str = "00";
/// Sentinel predecessor reference carried by the genesis block.
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";
pub const GENESIS_CREATOR: &str = "Elam";
pub const DEFAULT_CREATOR: &str = "Unknown";

pub const DIGEST_HEX_LEN: usize = 64;
