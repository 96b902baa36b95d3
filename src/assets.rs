//! Everything that touches image files: header probing, folder scans, decoding.

pub mod decode;
pub mod source;
