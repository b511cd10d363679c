use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use tracing::{debug, error, info, trace, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::host::{frame_size_for_surface, FrameHost};
use crate::runtime::{time_source_for_policy, BoxedTimeSource, FrameScheduler, RenderPolicy};
use crate::types::RendererConfig;

const WINDOW_TITLE: &str = "GraphicsWorld";

/// Aggregates GPU state and the frame host for the windowed preview path.
///
/// `gpu` is declared before `window` so the surface is released first.
struct WindowState {
    gpu: GpuState,
    window: Arc<Window>,
    host: FrameHost,
    render_scale: f32,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.clone(), size, config.color_space)?;
        let mut state = Self {
            gpu,
            window,
            host: FrameHost::new(config.variant),
            render_scale: config.effective_render_scale(),
        };
        state.resize(size);
        Ok(state)
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    /// Reports the new surface to the host; the swapchain only follows
    /// non-zero sizes.
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (width, height) = frame_size_for_surface(
            (new_size.width, new_size.height),
            self.render_scale,
            self.gpu.max_frame_dimension(),
        );
        self.host.on_resize(width, height);
        if new_size.width > 0 && new_size.height > 0 {
            self.gpu.resize(new_size);
        }
    }

    /// Returns `Ok(false)` when the host skipped the frame.
    fn render_frame(&mut self, time_seconds: f32) -> Result<bool, wgpu::SurfaceError> {
        let Some(frame) = self.host.on_frame(time_seconds) else {
            return Ok(false);
        };
        self.gpu.render(frame)?;
        Ok(true)
    }
}

/// Pairs the frame scheduler with the clock that feeds it.
struct RenderPolicyDriver {
    scheduler: FrameScheduler,
    time_source: BoxedTimeSource,
}

impl RenderPolicyDriver {
    fn new(policy: &RenderPolicy) -> Result<Self> {
        Ok(Self {
            scheduler: FrameScheduler::new(policy),
            time_source: time_source_for_policy(policy)?,
        })
    }

    fn seconds(&self) -> f32 {
        self.time_source.seconds()
    }

    fn mark_rendered(&mut self, now: Instant) {
        self.scheduler.mark_rendered(now);
    }

    fn ready_for_frame(&self, now: Instant) -> bool {
        self.scheduler.ready_for_frame(now)
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    fn invalidate(&mut self) {
        self.scheduler.invalidate();
    }

    fn suspend(&mut self) {
        if !self.scheduler.is_suspended() {
            debug!("surface has zero area; pausing frames until resized");
        }
        self.scheduler.suspend();
    }
}

/// Opens the preview window and drives it until the user closes it.
///
/// Blocks the calling thread; winit requires the event loop to live on the
/// main thread on most platforms.
pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, &config)
        .map_err(|err| anyhow!("failed to initialise window renderer: {err}"))?;
    let mut policy_driver = RenderPolicyDriver::new(&config.policy)?;
    info!(
        variant = %config.variant,
        width = config.surface_size.0,
        height = config.surface_size.1,
        render_scale = state.render_scale,
        "preview window opened"
    );
    if policy_driver.ready_for_frame(Instant::now()) {
        state.window().request_redraw();
    }

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed
                        && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                    {
                        elwt.exit();
                    }
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                    policy_driver.invalidate();
                    state.window().request_redraw();
                }
                WindowEvent::ScaleFactorChanged {
                    mut inner_size_writer,
                    ..
                } => {
                    let _ = inner_size_writer.request_inner_size(state.gpu.size());
                }
                WindowEvent::RedrawRequested => {
                    let time = policy_driver.seconds();
                    match state.render_frame(time) {
                        Ok(true) => policy_driver.mark_rendered(Instant::now()),
                        Ok(false) => policy_driver.suspend(),
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            state.gpu.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("surface out of memory; exiting preview");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            warn!("surface timeout; retrying next frame");
                        }
                        Err(other) => {
                            warn!("surface error: {other:?}; retrying next frame");
                        }
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            if policy_driver.ready_for_frame(now) {
                trace!("scheduler: issuing redraw now");
                state.window().request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = policy_driver.next_deadline() {
                let ms = deadline.saturating_duration_since(now).as_millis();
                trace!(deadline_ms = ms, "scheduler: waiting until next frame");
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                trace!("scheduler: idle (no redraw requested)");
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
