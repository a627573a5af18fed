//! Generated types for `proto/echo.proto` (package `echo`).
#![allow(clippy::all)]

tonic::include_proto!("echo");

/// Encoded `FileDescriptorSet` of `echo.proto`, served through reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("echo_descriptor");
