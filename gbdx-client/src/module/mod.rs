pub mod catalog;
pub mod orders;
pub mod s3;
pub mod thumbnail;
pub mod workflow;
