//! quill-storage
//!
//! S3 operations and the S3-backed artifact uploader.

pub mod client;
pub mod error;
pub mod objects;
pub mod uploader;

pub use uploader::S3Uploader;
