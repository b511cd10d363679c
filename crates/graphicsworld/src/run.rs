use anyhow::{anyhow, Context, Result};
use renderer::{ColorSpaceMode, RenderMode, RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;
use viewconfig::{ColorSpaceSetting, ViewConfig};

use crate::cli::{parse_export_format, RunArgs};
use crate::paths::AppPaths;

pub fn run(args: RunArgs) -> Result<()> {
    let file_config = load_view_config(&args)?;
    let config = build_renderer_config(&args, file_config.as_ref())?;
    tracing::info!(
        variant = %config.variant,
        width = config.surface_size.0,
        height = config.surface_size.1,
        mode = ?config.mode,
        policy = ?config.policy,
        color_space = %config.color_space,
        "starting graphicsworld"
    );
    Renderer::new(config).run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// An explicit `--config` must exist; the default location is optional.
fn load_view_config(args: &RunArgs) -> Result<Option<ViewConfig>> {
    if let Some(path) = &args.config {
        let config = ViewConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded explicit configuration");
        return Ok(Some(config));
    }

    let paths = AppPaths::discover()?;
    let path = paths.config_file();
    let config = ViewConfig::load_optional(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    match &config {
        Some(_) => tracing::debug!(path = %path.display(), "loaded configuration"),
        None => tracing::debug!(path = %path.display(), "no configuration file; using defaults"),
    }
    Ok(config)
}

/// Merges command line flags over file settings over built-in defaults.
pub fn build_renderer_config(
    args: &RunArgs,
    file: Option<&ViewConfig>,
) -> Result<RendererConfig> {
    let defaults = RendererConfig::default();

    let variant = args
        .variant
        .or(file.and_then(|config| config.variant))
        .unwrap_or(defaults.variant);
    let surface_size = args
        .size
        .or(file.and_then(|config| config.size))
        .unwrap_or(defaults.surface_size);
    let render_scale = args
        .render_scale
        .or(file.and_then(|config| config.render_scale))
        .unwrap_or(defaults.render_scale);
    let color_space = args
        .color_space
        .or(file.and_then(|config| config.color_space.map(map_color_space)))
        .unwrap_or(defaults.color_space);
    let fps = args.fps.or(file.and_then(|config| config.fps));
    let still_time = args
        .still_time
        .or(file.and_then(ViewConfig::still_time_seconds));

    let (mode, policy) = if let Some(path) = &args.export {
        let format = parse_export_format(path).map_err(|err| anyhow!(err))?;
        (
            RenderMode::Headless,
            RenderPolicy::Export {
                time: still_time,
                path: path.clone(),
                format,
            },
        )
    } else if args.still {
        (RenderMode::Windowed, RenderPolicy::Still { time: still_time })
    } else {
        if args.still_time.is_some() {
            tracing::warn!("--still-time has no effect without --still or --export");
        }
        (
            RenderMode::Windowed,
            RenderPolicy::Animate {
                target_fps: fps.filter(|fps| *fps > 0.0),
            },
        )
    };

    Ok(RendererConfig {
        surface_size,
        variant,
        mode,
        render_scale,
        color_space,
        policy,
    })
}

fn map_color_space(setting: ColorSpaceSetting) -> ColorSpaceMode {
    match setting {
        ColorSpaceSetting::Auto => ColorSpaceMode::Auto,
        ColorSpaceSetting::Gamma => ColorSpaceMode::Gamma,
        ColorSpaceSetting::Linear => ColorSpaceMode::Linear,
    }
}
