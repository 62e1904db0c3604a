/// Decode, rebuild and deliver command.
pub mod build;
/// File-level summary command.
pub mod info;
/// Byte-level file map command.
pub mod map;
/// Object hierarchy command.
pub mod tree;

mod util;
