use shading::Variant;

use crate::runtime::RenderPolicy;

/// Smallest render scale accepted before frames become unusably blurry.
pub const MIN_RENDER_SCALE: f32 = 0.1;

/// Output color handling for the preview swapchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Present evaluated bytes untouched (gamma-encoded swapchain).
    #[default]
    Auto,
    /// Treat shader outputs as already gamma-encoded; use non-sRGB surfaces.
    Gamma,
    /// Treat shader outputs as linear and let an sRGB swapchain encode them.
    Linear,
}

impl std::fmt::Display for ColorSpaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorSpaceMode::Auto => f.write_str("auto"),
            ColorSpaceMode::Gamma => f.write_str("gamma"),
            ColorSpaceMode::Linear => f.write_str("linear"),
        }
    }
}

/// How the renderer should present frames.
///
/// * `Windowed` opens a desktop window driven by `winit` and presents every
///   frame through `wgpu`.
/// * `Headless` never touches a display; it is only meaningful together with
///   an export policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Windowed,
    Headless,
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags: which variant to evaluate, how large
/// the target surface should be, and how frames are paced or exported.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window or export size in physical pixels.
    pub surface_size: (u32, u32),
    /// Colour function evaluated for every pixel.
    pub variant: Variant,
    /// Presentation mode (window vs headless).
    pub mode: RenderMode,
    /// Fraction of the surface size the frame is evaluated at (0.1-1.0).
    pub render_scale: f32,
    /// Desired color handling for the swapchain.
    pub color_space: ColorSpaceMode,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
}

impl RendererConfig {
    /// Clamps `render_scale` into the supported range.
    pub fn effective_render_scale(&self) -> f32 {
        if self.render_scale.is_finite() {
            self.render_scale.clamp(MIN_RENDER_SCALE, 1.0)
        } else {
            1.0
        }
    }
}

impl Default for RendererConfig {
    /// Provides a 720p windowed configuration animating the kaleidoscope.
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            variant: Variant::default(),
            mode: RenderMode::Windowed,
            render_scale: 1.0,
            color_space: ColorSpaceMode::default(),
            policy: RenderPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scale_is_clamped() {
        let mut config = RendererConfig::default();
        config.render_scale = 4.0;
        assert_eq!(config.effective_render_scale(), 1.0);
        config.render_scale = 0.01;
        assert_eq!(config.effective_render_scale(), MIN_RENDER_SCALE);
        config.render_scale = f32::NAN;
        assert_eq!(config.effective_render_scale(), 1.0);
        config.render_scale = 0.5;
        assert_eq!(config.effective_render_scale(), 0.5);
    }
}
