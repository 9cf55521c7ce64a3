#![doc = "log-bucket: ships rotated log files to an S3-compatible bucket."]

//! The binary is meant to be wired as a post-rotation command: the rotation
//! tool passes the rotated file's path, directory and name, everything else
//! comes from the environment.
//!
//! The pipeline is strictly linear: validate the invocation, load the
//! [`config::HookConfig`], build an [`upload::Uploader`], then hand over to
//! [`hook::upload_rotated_file`].

pub mod cli;
pub mod config;
pub mod error;
pub mod hook;
pub mod invocation;
pub mod load_config;
pub mod object_key;
pub mod telemetry;
pub mod upload;

pub use cli::{run, Cli};
pub use error::HookError;
