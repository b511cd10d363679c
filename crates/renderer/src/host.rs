use shading::Variant;
use tracing::{debug, trace};

use crate::frame::Frame;

/// Owns the only state that survives between frames: surface size and time.
///
/// Hosts call [`FrameHost::on_resize`] whenever the output surface changes
/// size and [`FrameHost::on_frame`] once per display refresh. A resize is
/// only recorded; it is picked up by the next `on_frame`, so the frame that
/// was already rendered keeps the dimensions it was evaluated at.
#[derive(Debug)]
pub struct FrameHost {
    variant: Variant,
    surface_size: Option<(u32, u32)>,
    time: f32,
    frame: Option<Frame>,
    frames_rendered: u64,
}

impl FrameHost {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            surface_size: None,
            time: 0.0,
            frame: None,
            frames_rendered: 0,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Swaps the colour function; takes effect on the next frame.
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    /// Records a new surface size for the next frame.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if self.surface_size != Some((width, height)) {
            debug!(width, height, "surface resized");
        }
        self.surface_size = Some((width, height));
    }

    /// Advances time and evaluates one full frame.
    ///
    /// Time never runs backwards: a sample earlier than the previous one (or a
    /// non-finite one) is replaced by the previous time. Returns `None` when
    /// no size has been reported yet or the surface has zero area.
    pub fn on_frame(&mut self, time_seconds: f32) -> Option<&Frame> {
        self.time = next_time(self.time, time_seconds);

        let (width, height) = self.surface_size?;
        if width == 0 || height == 0 {
            trace!(width, height, "skipping frame for zero-area surface");
            return None;
        }

        let reuse = self
            .frame
            .as_ref()
            .is_some_and(|frame| frame.size() == (width, height));
        if reuse {
            let frame = self.frame.as_mut()?;
            frame.rerender(self.variant, self.time);
        } else {
            self.frame = Frame::render(self.variant, width, height, self.time);
        }

        self.frames_rendered = self.frames_rendered.saturating_add(1);
        self.frame.as_ref()
    }

    /// Most recently rendered frame, untouched by any later resize.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Size that the next frame will be rendered at.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface_size
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

fn next_time(previous: f32, sample: f32) -> f32 {
    if sample.is_finite() && sample >= previous {
        sample
    } else {
        trace!(previous, sample, "time sample went backwards; holding previous time");
        previous
    }
}

/// Scales a surface size by `scale`, never collapsing a non-empty axis to zero.
pub fn scaled_size(size: (u32, u32), scale: f32) -> (u32, u32) {
    let scale_axis = |value: u32| {
        if value == 0 {
            0
        } else {
            ((value as f32 * scale).round() as u32).max(1)
        }
    };
    (scale_axis(size.0), scale_axis(size.1))
}

/// Frame size the host should evaluate for a surface of `surface` pixels.
///
/// Applies the render scale and caps each axis at `max_dimension`. A zero
/// axis stays zero so that minimised surfaces reach the host as zero-area.
pub fn frame_size_for_surface(surface: (u32, u32), scale: f32, max_dimension: u32) -> (u32, u32) {
    let (width, height) = scaled_size(surface, scale);
    (width.min(max_dimension), height.min(max_dimension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_frame_before_first_resize() {
        let mut host = FrameHost::new(Variant::Radial);
        assert!(host.on_frame(0.0).is_none());
        assert_eq!(host.frames_rendered(), 0);
    }

    #[test]
    fn resize_applies_on_next_frame_only() {
        let mut host = FrameHost::new(Variant::Gradient);
        host.on_resize(8, 4);
        assert_eq!(host.on_frame(0.0).unwrap().size(), (8, 4));

        host.on_resize(16, 2);
        assert_eq!(host.last_frame().unwrap().size(), (8, 4));
        assert_eq!(host.surface_size(), Some((16, 2)));

        assert_eq!(host.on_frame(0.1).unwrap().size(), (16, 2));
        assert_eq!(host.frames_rendered(), 2);
    }

    #[test]
    fn size_persists_without_resize() {
        let mut host = FrameHost::new(Variant::Kaleidoscope);
        host.on_resize(5, 5);
        for step in 0..3 {
            let frame = host.on_frame(step as f32).unwrap();
            assert_eq!(frame.size(), (5, 5));
            assert_eq!(frame.time(), step as f32);
        }
    }

    #[test]
    fn zero_area_surface_skips_frames() {
        let mut host = FrameHost::new(Variant::Radial);
        host.on_resize(4, 4);
        assert!(host.on_frame(0.0).is_some());
        host.on_resize(0, 4);
        assert!(host.on_frame(1.0).is_none());
        assert_eq!(host.last_frame().unwrap().size(), (4, 4));
        assert_eq!(host.frames_rendered(), 1);
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut host = FrameHost::new(Variant::Kaleidoscope);
        host.on_resize(2, 2);
        host.on_frame(3.0);
        assert_eq!(host.on_frame(1.0).unwrap().time(), 3.0);
        assert_eq!(host.on_frame(f32::NAN).unwrap().time(), 3.0);
        assert_eq!(host.on_frame(4.5).unwrap().time(), 4.5);
        assert!(FrameHost::new(Variant::Radial).time() == 0.0);
    }

    #[test]
    fn variant_swap_applies_to_next_frame() {
        let mut host = FrameHost::new(Variant::Radial);
        host.on_resize(4, 1);
        let radial_edge = host.on_frame(0.0).unwrap().pixel(0, 0).unwrap().x;
        host.set_variant(Variant::Gradient);
        let gradient_edge = host.on_frame(0.0).unwrap().pixel(0, 0).unwrap().x;
        assert!((gradient_edge - 0.125).abs() < 1e-6);
        assert!(radial_edge > gradient_edge);
    }

    #[test]
    fn scaled_size_never_collapses() {
        assert_eq!(scaled_size((1920, 1080), 0.5), (960, 540));
        assert_eq!(scaled_size((3, 1), 0.1), (1, 1));
        assert_eq!(scaled_size((0, 10), 0.5), (0, 5));
    }

    #[test]
    fn surface_size_maps_to_frame_size() {
        assert_eq!(frame_size_for_surface((1920, 1080), 0.5, 8192), (960, 540));
        assert_eq!(frame_size_for_surface((20000, 100), 1.0, 8192), (8192, 100));
        assert_eq!(frame_size_for_surface((0, 0), 0.5, 8192), (0, 0));
    }

    #[test]
    fn minimised_surface_skips_frames_until_restored() {
        let mut host = FrameHost::new(Variant::Kaleidoscope);
        host.on_resize(64, 32);
        assert!(host.on_frame(0.0).is_some());

        let (width, height) = frame_size_for_surface((0, 32), 1.0, 8192);
        host.on_resize(width, height);
        assert_eq!(host.surface_size(), Some((0, 32)));
        assert!(host.on_frame(0.5).is_none());
        assert_eq!(host.frames_rendered(), 1);

        let (width, height) = frame_size_for_surface((64, 32), 1.0, 8192);
        host.on_resize(width, height);
        assert_eq!(host.on_frame(1.0).unwrap().size(), (64, 32));
    }
}
