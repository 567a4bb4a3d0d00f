pub mod codec;
pub mod expression;
pub mod memory;
