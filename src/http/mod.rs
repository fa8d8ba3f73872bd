//! HTTP protocol layer module
//!
//! Content-type table and response builders, independent of how files are found.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_500_response, build_501_response, build_file_response,
};
