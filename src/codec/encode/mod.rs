// Encode module for contract ABI values

pub mod basic;
pub mod nested;
pub mod top;
