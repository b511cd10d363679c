//! Frame host and presentation for GraphicsWorld.
//!
//! The crate turns a [`shading::Variant`] into pixels and puts them somewhere:
//!
//! ```text
//!   CLI / graphicsworld
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──┬─▶ export_still ──▶ FrameHost ──▶ PNG on disk
//!                   │
//!                   └─▶ run_window ──▶ winit event loop ──▶ FrameHost::on_frame
//!                                                               │
//!                                              GpuState::render ◀┘ (texture upload + blit)
//! ```
//!
//! Every pixel is evaluated on the CPU by [`FrameHost`]; the GPU is only used
//! to present finished frames in the preview window. Export therefore needs
//! neither a display nor an adapter.

mod export;
mod frame;
mod gpu;
mod host;
mod runtime;
mod types;
mod window;

use anyhow::{bail, Result};
use tracing::info;

pub use export::{export_still, write_frame, ExportError, FileExportTarget};
pub use frame::{encode_channel, encode_color, Frame};
pub use host::{frame_size_for_surface, scaled_size, FrameHost};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, ExportFormat, FixedTimeSource, FrameScheduler,
    RenderPolicy, SystemTimeSource, TimeSource,
};
pub use shading::Variant;
pub use types::{ColorSpaceMode, RenderMode, RendererConfig, MIN_RENDER_SCALE};

/// High-level entry point that owns the chosen configuration.
///
/// `Renderer` only selects the presentation path; the frame host and the
/// window loop do the actual work.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Runs until the window is closed, or until the export has been written.
    ///
    /// Export policies always render headlessly regardless of `mode`.
    pub fn run(&mut self) -> Result<()> {
        if matches!(self.config.policy, RenderPolicy::Export { .. }) {
            let size = self.config.surface_size;
            let path = export_still(self.config.variant, size, &self.config.policy)?;
            info!(path = %path.display(), "export complete");
            return Ok(());
        }

        match self.config.mode {
            RenderMode::Headless => {
                bail!("headless mode requires an export target")
            }
            RenderMode::Windowed => window::run_window(self.config.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_without_export_is_rejected() {
        let mut renderer = Renderer::new(RendererConfig {
            mode: RenderMode::Headless,
            ..RendererConfig::default()
        });
        let err = renderer.run().unwrap_err();
        assert!(err.to_string().contains("export"));
    }

    #[test]
    fn export_policy_runs_without_window() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("frame.png");
        let mut renderer = Renderer::new(RendererConfig {
            surface_size: (12, 6),
            variant: Variant::Radial,
            mode: RenderMode::Windowed,
            policy: RenderPolicy::Export {
                time: Some(0.5),
                path: path.clone(),
                format: ExportFormat::Png,
            },
            ..RendererConfig::default()
        });
        renderer.run().unwrap();
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (12, 6));
    }
}
