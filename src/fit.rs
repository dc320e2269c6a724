// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Viewport fitting.
//!
//! Computes the translate and scale that place a document of a given
//! intrinsic size inside a target viewport.

use std::str::FromStr;

/// A scaling mode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ScalingMode {
    /// Scale width and height independently.
    ///
    /// The content may be distorted.
    Independent,
    /// Scale uniformly so the whole content fits inside the target.
    ///
    /// Leaves slack on one of the axes.
    #[default]
    AspectFit,
    /// Scale uniformly so the content covers the whole target.
    ///
    /// Overflows on one of the axes.
    AspectFill,
}

impl FromStr for ScalingMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "independent" => Ok(ScalingMode::Independent),
            "aspect-fit" => Ok(ScalingMode::AspectFit),
            "aspect-fill" => Ok(ScalingMode::AspectFill),
            _ => Err("invalid scaling mode"),
        }
    }
}

/// An alignment along a single axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Alignment {
    /// Left or top edge.
    Leading,
    /// Middle.
    #[default]
    Centre,
    /// Right or bottom edge.
    Trailing,
}

impl Alignment {
    /// An alternative spelling of `Centre`.
    pub const CENTER: Alignment = Alignment::Centre;

    /// Returns the part of `slack` that goes before the content.
    #[inline]
    fn offset(self, slack: f64) -> f64 {
        match self {
            Alignment::Leading => 0.0,
            Alignment::Centre => slack / 2.0,
            Alignment::Trailing => slack,
        }
    }
}

impl FromStr for Alignment {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leading" => Ok(Alignment::Leading),
            "centre" | "center" => Ok(Alignment::Centre),
            "trailing" => Ok(Alignment::Trailing),
            _ => Err("invalid alignment"),
        }
    }
}

/// A document size before any scaling.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct IntrinsicSize {
    /// Width in document units.
    pub width: f64,
    /// Height in document units.
    pub height: f64,
}

impl IntrinsicSize {
    /// Creates a new size.
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        IntrinsicSize { width, height }
    }
}

impl From<usvg::Size> for IntrinsicSize {
    fn from(size: usvg::Size) -> Self {
        IntrinsicSize::new(size.width() as f64, size.height() as f64)
    }
}

/// Describes how a document should be fitted into a viewport.
///
/// When `width` and/or `height` are set, `scale_x` and `scale_y` are ignored.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct FitRequest {
    /// Target width.
    pub width: Option<f64>,
    /// Target height.
    pub height: Option<f64>,
    /// Horizontal scaling factor.
    ///
    /// Default: 1
    pub scale_x: Option<f64>,
    /// Vertical scaling factor.
    ///
    /// Default: `scale_x`
    pub scale_y: Option<f64>,
    /// Scaling mode.
    pub scaling_mode: ScalingMode,
    /// Horizontal alignment.
    pub horizontal_alignment: Alignment,
    /// Vertical alignment.
    pub vertical_alignment: Alignment,
}

impl FitRequest {
    /// Keep the intrinsic size.
    pub fn original() -> Self {
        FitRequest::default()
    }

    /// Scale uniformly by a factor.
    pub fn scale(scale: f64) -> Self {
        FitRequest {
            scale_x: Some(scale),
            ..FitRequest::default()
        }
    }

    /// Scale each axis by its own factor.
    pub fn scale_xy(scale_x: f64, scale_y: f64) -> Self {
        FitRequest {
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            ..FitRequest::default()
        }
    }

    /// Scale to a target width.
    pub fn width(width: f64) -> Self {
        FitRequest {
            width: Some(width),
            ..FitRequest::default()
        }
    }

    /// Scale to a target height.
    pub fn height(height: f64) -> Self {
        FitRequest {
            height: Some(height),
            ..FitRequest::default()
        }
    }

    /// Scale to a target size.
    pub fn size(width: f64, height: f64) -> Self {
        FitRequest {
            width: Some(width),
            height: Some(height),
            ..FitRequest::default()
        }
    }

    /// Sets the scaling mode.
    pub fn with_mode(mut self, mode: ScalingMode) -> Self {
        self.scaling_mode = mode;
        self
    }

    /// Sets the horizontal and vertical alignment.
    pub fn with_alignment(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self
    }
}

/// The result of fitting a document into a viewport.
///
/// The translation must be applied to a context before the scale.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transformation {
    /// Scaled document width.
    pub width: f64,
    /// Scaled document height.
    pub height: f64,
    /// Horizontal scaling factor.
    pub scale_x: f64,
    /// Vertical scaling factor.
    pub scale_y: f64,
    /// Horizontal offset.
    pub dx: f64,
    /// Vertical offset.
    pub dy: f64,
    /// Viewport width.
    ///
    /// The requested width when both target dimensions were set,
    /// otherwise the same as `width`.
    pub viewport_width: f64,
    /// Viewport height.
    ///
    /// The requested height when both target dimensions were set,
    /// otherwise the same as `height`.
    pub viewport_height: f64,
}

impl Transformation {
    /// Converts into a `tiny_skia::Transform`.
    ///
    /// Translation comes first, so `dx` and `dy` are not affected by the scale.
    pub fn to_transform(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_translate(self.dx as f32, self.dy as f32)
            .pre_scale(self.scale_x as f32, self.scale_y as f32)
    }
}

/// Computes the transformation that fits `intrinsic` into the viewport described by `request`.
///
/// Never fails. A zero intrinsic dimension together with a target dimension
/// produces an infinite or NaN scale, which is returned as is.
pub fn compute_transformation(intrinsic: IntrinsicSize, request: &FitRequest) -> Transformation {
    let mut scale_x;
    let mut scale_y;
    let mut dx = 0.0;
    let mut dy = 0.0;
    let mut viewport = None;

    match (request.width, request.height) {
        (None, None) => {
            scale_x = request.scale_x.unwrap_or(1.0);
            scale_y = request.scale_y.unwrap_or(scale_x);
        }
        (Some(width), None) => {
            scale_x = width / intrinsic.width;
            scale_y = match request.scaling_mode {
                ScalingMode::Independent => 1.0,
                _ => scale_x,
            };
        }
        (None, Some(height)) => {
            scale_y = height / intrinsic.height;
            scale_x = match request.scaling_mode {
                ScalingMode::Independent => 1.0,
                _ => scale_y,
            };
        }
        (Some(width), Some(height)) => {
            scale_x = width / intrinsic.width;
            scale_y = height / intrinsic.height;

            let uniform = match request.scaling_mode {
                ScalingMode::Independent => None,
                ScalingMode::AspectFit => Some(scale_x.min(scale_y)),
                ScalingMode::AspectFill => Some(scale_x.max(scale_y)),
            };

            if let Some(scale) = uniform {
                scale_x = scale;
                scale_y = scale;
                dx = request
                    .horizontal_alignment
                    .offset(width - intrinsic.width * scale);
                dy = request
                    .vertical_alignment
                    .offset(height - intrinsic.height * scale);
            }

            viewport = Some((width, height));
        }
    }

    let width = intrinsic.width * scale_x;
    let height = intrinsic.height * scale_y;
    let (viewport_width, viewport_height) = viewport.unwrap_or((width, height));

    Transformation {
        width,
        height,
        scale_x,
        scale_y,
        dx,
        dy,
        viewport_width,
        viewport_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> IntrinsicSize {
        IntrinsicSize::new(100.0, 100.0)
    }

    #[test]
    fn original_size() {
        let ts = compute_transformation(IntrinsicSize::new(30.0, 40.0), &FitRequest::original());
        assert_eq!(ts.scale_x, 1.0);
        assert_eq!(ts.scale_y, 1.0);
        assert_eq!(ts.dx, 0.0);
        assert_eq!(ts.dy, 0.0);
        assert_eq!(ts.width, 30.0);
        assert_eq!(ts.height, 40.0);
    }

    #[test]
    fn uniform_scale() {
        for mode in [ScalingMode::AspectFit, ScalingMode::AspectFill] {
            let ts = compute_transformation(square(), &FitRequest::scale(2.5).with_mode(mode));
            assert_eq!(ts.scale_x, 2.5);
            assert_eq!(ts.scale_y, 2.5);
            assert_eq!(ts.width, 250.0);
            assert_eq!(ts.height, 250.0);
        }
    }

    #[test]
    fn independent_scale() {
        let ts = compute_transformation(square(), &FitRequest::scale_xy(2.0, 3.0));
        assert_eq!(ts.scale_x, 2.0);
        assert_eq!(ts.scale_y, 3.0);
        assert_eq!(ts.width, 200.0);
        assert_eq!(ts.height, 300.0);
        assert_eq!(ts.viewport_width, 200.0);
        assert_eq!(ts.viewport_height, 300.0);
    }

    #[test]
    fn only_scale_y() {
        let request = FitRequest {
            scale_y: Some(2.0),
            ..FitRequest::default()
        };
        let ts = compute_transformation(square(), &request);
        assert_eq!(ts.scale_x, 1.0);
        assert_eq!(ts.scale_y, 2.0);
    }

    #[test]
    fn width_only() {
        let ts = compute_transformation(IntrinsicSize::new(50.0, 20.0), &FitRequest::width(200.0));
        assert_eq!(ts.scale_x, 4.0);
        assert_eq!(ts.scale_y, 4.0);
        assert_eq!(ts.width, 200.0);
        assert_eq!(ts.height, 80.0);
        assert_eq!(ts.dx, 0.0);
        assert_eq!(ts.dy, 0.0);
    }

    #[test]
    fn width_only_independent() {
        let request = FitRequest::width(200.0).with_mode(ScalingMode::Independent);
        let ts = compute_transformation(IntrinsicSize::new(50.0, 20.0), &request);
        assert_eq!(ts.scale_x, 4.0);
        assert_eq!(ts.scale_y, 1.0);
        assert_eq!(ts.height, 20.0);
    }

    #[test]
    fn height_only() {
        let ts = compute_transformation(IntrinsicSize::new(50.0, 20.0), &FitRequest::height(10.0));
        assert_eq!(ts.scale_x, 0.5);
        assert_eq!(ts.scale_y, 0.5);
        assert_eq!(ts.width, 25.0);
        assert_eq!(ts.height, 10.0);
    }

    #[test]
    fn height_only_independent() {
        let request = FitRequest::height(10.0).with_mode(ScalingMode::Independent);
        let ts = compute_transformation(IntrinsicSize::new(50.0, 20.0), &request);
        assert_eq!(ts.scale_x, 1.0);
        assert_eq!(ts.scale_y, 0.5);
    }

    #[test]
    fn target_overrides_scale() {
        let request = FitRequest {
            scale_x: Some(7.0),
            scale_y: Some(9.0),
            ..FitRequest::width(300.0)
        };
        let ts = compute_transformation(square(), &request);
        assert_eq!(ts.scale_x, 3.0);
        assert_eq!(ts.scale_y, 3.0);
    }

    #[test]
    fn aspect_fit() {
        let ts = compute_transformation(square(), &FitRequest::size(200.0, 100.0));
        assert_eq!(ts.scale_x, 1.0);
        assert_eq!(ts.scale_y, 1.0);
        assert_eq!(ts.width, 100.0);
        assert_eq!(ts.height, 100.0);
        assert_eq!(ts.dx, 50.0);
        assert_eq!(ts.dy, 0.0);
        assert_eq!(ts.viewport_width, 200.0);
        assert_eq!(ts.viewport_height, 100.0);
    }

    #[test]
    fn aspect_fill() {
        let request = FitRequest::size(200.0, 100.0).with_mode(ScalingMode::AspectFill);
        let ts = compute_transformation(square(), &request);
        assert_eq!(ts.scale_x, 2.0);
        assert_eq!(ts.scale_y, 2.0);
        assert_eq!(ts.width, 200.0);
        assert_eq!(ts.height, 200.0);
        assert_eq!(ts.dx, 0.0);
        assert_eq!(ts.dy, -50.0);
        assert_eq!(ts.viewport_height, 100.0);
    }

    #[test]
    fn independent_size() {
        for h in [Alignment::Leading, Alignment::Centre, Alignment::Trailing] {
            for v in [Alignment::Leading, Alignment::Centre, Alignment::Trailing] {
                let request = FitRequest::size(200.0, 50.0)
                    .with_mode(ScalingMode::Independent)
                    .with_alignment(h, v);
                let ts = compute_transformation(square(), &request);
                assert_eq!(ts.scale_x, 2.0);
                assert_eq!(ts.scale_y, 0.5);
                assert_eq!(ts.dx, 0.0);
                assert_eq!(ts.dy, 0.0);
            }
        }
    }

    #[test]
    fn horizontal_alignment() {
        let offset = |h| {
            let request = FitRequest::size(200.0, 100.0).with_alignment(h, Alignment::Leading);
            compute_transformation(square(), &request).dx
        };

        assert_eq!(offset(Alignment::Leading), 0.0);
        assert_eq!(offset(Alignment::Centre), 50.0);
        assert_eq!(offset(Alignment::Trailing), 100.0);
    }

    #[test]
    fn vertical_alignment() {
        let offset = |v| {
            let request = FitRequest::size(100.0, 300.0).with_alignment(Alignment::Leading, v);
            compute_transformation(square(), &request).dy
        };

        assert_eq!(offset(Alignment::Leading), 0.0);
        assert_eq!(offset(Alignment::Centre), 100.0);
        assert_eq!(offset(Alignment::Trailing), 200.0);
    }

    #[test]
    fn fill_alignment_overflows() {
        let offset = |v| {
            let request = FitRequest::size(200.0, 100.0)
                .with_mode(ScalingMode::AspectFill)
                .with_alignment(Alignment::Centre, v);
            compute_transformation(square(), &request).dy
        };

        assert_eq!(offset(Alignment::Leading), 0.0);
        assert_eq!(offset(Alignment::Centre), -50.0);
        assert_eq!(offset(Alignment::Trailing), -100.0);
    }

    #[test]
    fn idempotent() {
        let request = FitRequest::size(123.0, 45.6)
            .with_mode(ScalingMode::AspectFill)
            .with_alignment(Alignment::Trailing, Alignment::Centre);
        let size = IntrinsicSize::new(17.3, 9.1);
        let a = compute_transformation(size, &request);
        let b = compute_transformation(size, &request);
        assert_eq!(a.scale_x.to_bits(), b.scale_x.to_bits());
        assert_eq!(a.scale_y.to_bits(), b.scale_y.to_bits());
        assert_eq!(a.dx.to_bits(), b.dx.to_bits());
        assert_eq!(a.dy.to_bits(), b.dy.to_bits());
        assert_eq!(a.width.to_bits(), b.width.to_bits());
        assert_eq!(a.height.to_bits(), b.height.to_bits());
    }

    #[test]
    fn zero_width_is_not_clamped() {
        let ts = compute_transformation(IntrinsicSize::new(0.0, 10.0), &FitRequest::width(100.0));
        assert!(ts.scale_x.is_infinite());
        assert!(ts.scale_y.is_infinite());
        // 0 * inf
        assert!(ts.width.is_nan());
    }

    #[test]
    fn zero_size_is_not_clamped() {
        let ts = compute_transformation(IntrinsicSize::new(0.0, 0.0), &FitRequest::size(0.0, 0.0));
        assert!(ts.scale_x.is_nan());
        assert!(ts.scale_y.is_nan());
    }

    #[test]
    fn to_transform_translates_first() {
        let request = FitRequest::size(200.0, 100.0).with_mode(ScalingMode::AspectFit);
        let ts = compute_transformation(IntrinsicSize::new(50.0, 50.0), &request).to_transform();
        assert_eq!(ts, tiny_skia::Transform::from_row(2.0, 0.0, 0.0, 2.0, 50.0, 0.0));
    }

    #[test]
    fn parse_mode() {
        assert_eq!("aspect-fill".parse::<ScalingMode>(), Ok(ScalingMode::AspectFill));
        assert_eq!("independent".parse::<ScalingMode>(), Ok(ScalingMode::Independent));
        assert!("fill".parse::<ScalingMode>().is_err());
    }

    #[test]
    fn parse_alignment() {
        assert_eq!("center".parse::<Alignment>(), Ok(Alignment::CENTER));
        assert_eq!("centre".parse::<Alignment>(), Ok(Alignment::Centre));
        assert_eq!("trailing".parse::<Alignment>(), Ok(Alignment::Trailing));
        assert!("middle".parse::<Alignment>().is_err());
    }
}
