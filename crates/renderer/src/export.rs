use std::fs;
use std::path::{Path, PathBuf};

use shading::Variant;
use tracing::info;

use crate::frame::Frame;
use crate::host::FrameHost;
use crate::runtime::{time_source_for_policy, ExportFormat, RenderPolicy};

/// Destination and format for a captured frame.
#[derive(Debug, Clone)]
pub struct FileExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("cannot export a {width}x{height} frame; both dimensions must be non-zero")]
    EmptySurface { width: u32, height: u32 },
    #[error("failed to create export directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode frame to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("frame buffer does not match its {width}x{height} dimensions")]
    FrameBuffer { width: u32, height: u32 },
    #[error("render policy does not request an export")]
    NotAnExport,
    #[error("invalid export time: {0}")]
    InvalidTime(String),
}

/// Writes an already rendered frame to disk.
pub fn write_frame(frame: &Frame, target: &FileExportTarget) -> Result<PathBuf, ExportError> {
    ensure_parent(&target.path)?;
    match target.format {
        ExportFormat::Png => frame
            .to_image()
            .ok_or(ExportError::FrameBuffer {
                width: frame.width(),
                height: frame.height(),
            })?
            .save_with_format(&target.path, image::ImageFormat::Png)
            .map_err(|source| ExportError::Encode {
                path: target.path.clone(),
                source,
            })?,
    }
    Ok(target.path.clone())
}

/// Renders a single frame headlessly and writes it to the policy's export path.
///
/// No window or GPU is involved; the frame goes straight from the evaluator
/// to the encoder.
pub fn export_still(
    variant: Variant,
    size: (u32, u32),
    policy: &RenderPolicy,
) -> Result<PathBuf, ExportError> {
    let RenderPolicy::Export { path, format, .. } = policy else {
        return Err(ExportError::NotAnExport);
    };
    let time = time_source_for_policy(policy)
        .map_err(|err| ExportError::InvalidTime(err.to_string()))?
        .seconds();

    let mut host = FrameHost::new(variant);
    host.on_resize(size.0, size.1);
    let frame = host
        .on_frame(time)
        .ok_or(ExportError::EmptySurface {
            width: size.0,
            height: size.1,
        })?;

    let target = FileExportTarget {
        path: path.clone(),
        format: *format,
    };
    let written = write_frame(frame, &target)?;
    info!(
        path = %written.display(),
        %variant,
        width = size.0,
        height = size.1,
        time,
        "exported still frame"
    );
    Ok(written)
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            fs::create_dir_all(dir).map_err(|source| ExportError::Directory {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn export_policy(path: PathBuf, time: Option<f32>) -> RenderPolicy {
        RenderPolicy::Export {
            time,
            path,
            format: ExportFormat::Png,
        }
    }

    #[test]
    fn exports_gradient_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/gradient.png");
        let written =
            export_still(Variant::Gradient, (64, 8), &export_policy(path.clone(), None)).unwrap();
        assert_eq!(written, path);

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (64, 8));
        let left = image.get_pixel(0, 4).0;
        let right = image.get_pixel(63, 4).0;
        assert!(left[0] < 5, "left edge {left:?}");
        assert!(right[0] > 250, "right edge {right:?}");
        assert_eq!(left[1], 0);
        assert_eq!(right[3], 255);
    }

    #[test]
    fn rejects_zero_area_export() {
        let dir = TempDir::new().unwrap();
        let err = export_still(
            Variant::Radial,
            (0, 10),
            &export_policy(dir.path().join("empty.png"), None),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::EmptySurface { .. }));
    }

    #[test]
    fn rejects_non_export_policy() {
        let err = export_still(Variant::Radial, (4, 4), &RenderPolicy::Still { time: None })
            .unwrap_err();
        assert!(matches!(err, ExportError::NotAnExport));
    }

    #[test]
    fn exported_time_controls_animation() {
        let dir = TempDir::new().unwrap();
        let early = dir.path().join("early.png");
        let late = dir.path().join("late.png");
        export_still(Variant::Kaleidoscope, (32, 32), &export_policy(early.clone(), Some(0.0)))
            .unwrap();
        export_still(Variant::Kaleidoscope, (32, 32), &export_policy(late.clone(), Some(2.0)))
            .unwrap();
        let early = image::open(early).unwrap().to_rgba8();
        let late = image::open(late).unwrap().to_rgba8();
        assert_ne!(early.as_raw(), late.as_raw());
    }
}
