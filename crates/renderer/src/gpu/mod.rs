//! GPU presentation for the preview window.
//!
//! Pixels are never computed here; the GPU only displays frames that the
//! evaluator already produced on the CPU:
//! - `context` owns wgpu instance/device/surface wiring and reconfigures the
//!   swapchain when the window resizes.
//! - `pipeline` holds the full-screen blit pipeline and the streaming frame
//!   texture it samples.
//! - `state` glues both together and exposes the `GpuState` API used by
//!   `window`.

mod context;
mod pipeline;
mod state;

pub(crate) use state::GpuState;
