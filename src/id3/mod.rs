// ID3 metadata handling module
//
// Only the fixed 128-byte ID3v1 trailer is read.
pub mod v1;

pub use v1::Id3v1Tag;
