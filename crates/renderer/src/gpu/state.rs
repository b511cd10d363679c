use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::frame::Frame;
use crate::types::ColorSpaceMode;

use super::context::GpuContext;
use super::pipeline::{BlitPipeline, FrameTexture};

/// Presents CPU-evaluated frames on a window surface.
///
/// Every frame is converted to RGBA8, streamed into a texture that matches
/// the frame's size, and stretched over the whole surface. The texture only
/// follows the frame, so a resize that has not been rendered yet keeps
/// showing the previous frame scaled to the new surface.
pub(crate) struct GpuState {
    context: GpuContext,
    blit: BlitPipeline,
    frame_texture: Option<FrameTexture>,
    scratch: Vec<u8>,
    frames_presented: u64,
    frames_since_last_update: u32,
    last_fps_update: Instant,
    frames_per_second: f32,
}

impl GpuState {
    pub(crate) fn new(
        window: Arc<Window>,
        initial_size: PhysicalSize<u32>,
        color_space: ColorSpaceMode,
    ) -> Result<Self> {
        let context = GpuContext::new(window, initial_size, color_space)?;
        let blit = BlitPipeline::new(&context.device, context.surface_format);
        Ok(Self {
            context,
            blit,
            frame_texture: None,
            scratch: Vec::new(),
            frames_presented: 0,
            frames_since_last_update: 0,
            last_fps_update: Instant::now(),
            frames_per_second: 0.0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reconfigures the swapchain; zero-area sizes are ignored.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Rebuilds the swapchain at its current size after it was lost.
    pub(crate) fn reconfigure(&mut self) {
        let size = self.context.size;
        self.context.resize(size);
    }

    /// Largest frame edge the device accepts as a texture.
    pub(crate) fn max_frame_dimension(&self) -> u32 {
        self.context.max_texture_dimension
    }

    pub(crate) fn render(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.context.surface.get_current_texture()?;
        self.upload(frame);

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        if let Some(texture) = &self.frame_texture {
            self.blit.encode(&mut encoder, &view, texture);
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();

        self.record_stats(frame);
        Ok(())
    }

    fn upload(&mut self, frame: &Frame) {
        let size = frame.size();
        let max = self.context.max_texture_dimension;
        if size.0 > max || size.1 > max {
            warn!(
                width = size.0,
                height = size.1,
                max,
                "frame exceeds device texture limits; keeping previous frame"
            );
            return;
        }

        let stale = self
            .frame_texture
            .as_ref()
            .map_or(true, |texture| texture.size() != size);
        if stale {
            debug!(width = size.0, height = size.1, "allocating frame texture");
            self.frame_texture = Some(FrameTexture::new(&self.context.device, &self.blit, size));
        }

        frame.write_rgba8(&mut self.scratch);
        if let Some(texture) = &self.frame_texture {
            texture.upload(&self.context.queue, &self.scratch);
        }
    }

    fn record_stats(&mut self, frame: &Frame) {
        let now = Instant::now();
        self.frames_presented += 1;
        self.frames_since_last_update += 1;
        let elapsed = now.saturating_duration_since(self.last_fps_update);
        if elapsed >= Duration::from_secs(1) {
            self.frames_per_second = self.frames_since_last_update as f32 / elapsed.as_secs_f32();
            self.frames_since_last_update = 0;
            self.last_fps_update = now;
            debug!(
                fps = self.frames_per_second.round(),
                frame_count = self.frames_presented,
                time = frame.time(),
                width = frame.width(),
                height = frame.height(),
                "render stats"
            );
        }
    }
}
