pub const BLOCK_DIM: usize = 8;
pub const BLOCK_SIZE: usize = 64;
