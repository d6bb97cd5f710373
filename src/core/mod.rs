pub mod avm;
pub mod builder;
pub mod filter;
