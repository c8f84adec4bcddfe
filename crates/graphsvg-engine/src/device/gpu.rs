use anyhow::{Context, Result};

use super::GpuInit;

/// Owns the wgpu core objects used by offscreen shader surfaces.
///
/// There is no swapchain: every shader surface renders into its own texture,
/// which the host composites (or reads back) behind the vector output.
pub struct Gpu {
    /// Kept alive for the lifetime of the adapter/device.
    _instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a windowless GPU context, blocking on adapter/device acquisition.
    ///
    /// A missing adapter is a fatal configuration error for shader-backed
    /// layers; callers surface it once at startup.
    pub fn headless(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::headless_async(init))
    }

    /// Async variant of [`Gpu::headless`].
    pub async fn headless_async(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("graphsvg device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("headless gpu: {} ({:?})", info.name, info.backend);

        Ok(Gpu { _instance: instance, adapter, device, queue })
    }

    /// Returns a reference to the selected adapter.
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
