/// What the frame loop should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface reconfigured; the next frame may render.
    Reconfigured,
    /// Transient; drop this frame only.
    SkipFrame,
    /// Out of memory; stop the runtime.
    Fatal,
}

impl SurfaceErrorAction {
    pub(crate) fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

pub(crate) fn choose_format(caps: &wgpu::SurfaceCapabilities, prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    let srgb = caps.formats.iter().copied().find(|f| {
        matches!(
            f,
            wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
        )
    });
    match srgb {
        Some(f) if prefer_srgb => Some(f),
        _ => caps.formats.first().copied(),
    }
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Clear value for the surface. Straight sRGB colours are linearised when the
/// swapchain encodes sRGB on write.
pub(crate) fn clear_value(color: crate::paint::Color, format: wgpu::TextureFormat) -> wgpu::Color {
    let c = if format.is_srgb() { color.to_linear() } else { color };
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: c.a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn surface_errors_map_to_actions() {
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
    }

    #[test]
    fn clear_is_linearised_only_for_srgb_targets() {
        let c = Color::from_rgb8(0x24, 0x7b, 0xa0);
        let srgb = clear_value(c, wgpu::TextureFormat::Bgra8UnormSrgb);
        let unorm = clear_value(c, wgpu::TextureFormat::Bgra8Unorm);
        assert!(srgb.r < unorm.r);
        assert_eq!(unorm.b, c.b as f64);
    }
}
