//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - handing cheap clones of the device and queue to shader surfaces

mod gpu;
mod init;

pub use gpu::Gpu;
pub use init::GpuInit;
