use glam::Vec2;

use crate::Resolution;

/// Maps a fragment coordinate into `[0, 1]` along both axes.
#[inline]
pub fn normalized_uv(frag_coord: Vec2, resolution: Resolution) -> Vec2 {
    frag_coord / resolution.as_vec2()
}

/// Maps a fragment coordinate onto a centred, aspect-corrected plane.
///
/// The origin lands on the canvas centre, +y points up, and the shorter axis
/// spans `[-1, 1]`. The longer axis is stretched by the aspect ratio so that
/// circles stay round on non-square surfaces.
#[inline]
pub fn centered_uv(frag_coord: Vec2, resolution: Resolution) -> Vec2 {
    let uv = normalized_uv(frag_coord, resolution);
    // Fragment rows grow downward; flip so the bottom-left corner is (0, 0).
    let uv = uv * Vec2::new(1.0, -1.0) + Vec2::new(0.0, 1.0);
    let mut uv = (uv - 0.5) * 2.0;

    let (width, height) = (resolution.width(), resolution.height());
    if width > height {
        uv.x *= width / height;
    } else if width < height {
        uv.y *= height / width;
    }
    uv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(width: f32, height: f32) -> Resolution {
        Resolution::new(width, height).unwrap()
    }

    #[test]
    fn centre_maps_to_origin() {
        for (w, h) in [(100.0, 100.0), (200.0, 100.0), (100.0, 200.0)] {
            let r = res(w, h);
            let uv = centered_uv(r.center(), r);
            assert!(uv.length() < 1e-6, "{w}x{h} -> {uv:?}");
        }
    }

    #[test]
    fn corners_follow_flipped_axes_on_square_canvas() {
        let r = res(100.0, 100.0);
        let top_left = centered_uv(Vec2::new(0.0, 0.0), r);
        let bottom_right = centered_uv(Vec2::new(100.0, 100.0), r);
        assert!((top_left - Vec2::new(-1.0, 1.0)).length() < 1e-6);
        assert!((bottom_right - Vec2::new(1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn wide_canvas_stretches_x() {
        let r = res(200.0, 100.0);
        let right_edge = centered_uv(Vec2::new(200.0, 50.0), r);
        assert!((right_edge.x - 2.0).abs() < 1e-6);
        assert!(right_edge.y.abs() < 1e-6);
        let top_edge = centered_uv(Vec2::new(100.0, 0.0), r);
        assert!((top_edge.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tall_canvas_stretches_y() {
        let r = res(100.0, 200.0);
        let top_edge = centered_uv(Vec2::new(50.0, 0.0), r);
        assert!((top_edge.y - 2.0).abs() < 1e-6);
        let right_edge = centered_uv(Vec2::new(100.0, 100.0), r);
        assert!((right_edge.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalized_uv_spans_unit_square() {
        let r = res(320.0, 240.0);
        assert_eq!(normalized_uv(Vec2::ZERO, r), Vec2::ZERO);
        assert_eq!(normalized_uv(Vec2::new(320.0, 240.0), r), Vec2::ONE);
    }
}
