// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::debug;

use crate::{
    compute_transformation, Canvas, Color, Context, Error, FitRequest, IntrinsicSize,
    Transformation,
};

/// A rendering engine that can draw a document onto a canvas.
pub trait Engine {
    /// A canvas type this engine renders onto.
    type Canvas: Canvas;

    /// Returns the document size before any scaling.
    fn intrinsic_size(&self) -> Result<IntrinsicSize, Error>;

    /// Renders the document using the current canvas state.
    fn render(&self, canvas: &mut Self::Canvas) -> Result<(), Error>;
}

/// Fits a document into a viewport and renders it onto the canvas.
///
/// Applies the translation, then the scale, then sets the source color
/// and calls the engine. The engine error is returned as is.
pub fn render_fitted<E: Engine>(
    engine: &E,
    canvas: &mut E::Canvas,
    request: &FitRequest,
    color: Color,
) -> Result<Transformation, Error> {
    let size = engine.intrinsic_size()?;
    let ts = compute_transformation(size, request);
    debug!(
        "Fitting {}x{} into {}x{}: scale {}x{}, offset {}x{}.",
        size.width,
        size.height,
        ts.viewport_width,
        ts.viewport_height,
        ts.scale_x,
        ts.scale_y,
        ts.dx,
        ts.dy
    );

    canvas.translate(ts.dx, ts.dy);
    canvas.scale(ts.scale_x, ts.scale_y);
    canvas.set_source_color(color);
    engine.render(canvas)?;
    Ok(ts)
}

/// Renders a document onto a new context sized to the fitted viewport.
///
/// See `Transformation::viewport_width` and `Transformation::viewport_height`.
pub fn render_to_context<E>(
    engine: &E,
    request: &FitRequest,
    color: Color,
) -> Result<(Context, Transformation), Error>
where
    E: Engine<Canvas = Context>,
{
    let size = engine.intrinsic_size()?;
    let mut ctx = create_context(&compute_transformation(size, request))?;
    let ts = render_fitted(engine, &mut ctx, request, color)?;
    Ok((ctx, ts))
}

/// Creates a cleared context sized to the transformation viewport.
///
/// The surface size is rounded to the nearest integer.
pub fn create_context(ts: &Transformation) -> Result<Context, Error> {
    let mut ctx = Context::new(round_len(ts.viewport_width), round_len(ts.viewport_height))?;
    ctx.clear();
    Ok(ctx)
}

/// Renders a document into a PNG file.
///
/// The image has the viewport size of the computed transformation:
/// the requested box when both target dimensions are set,
/// otherwise the scaled document size. Sizes are rounded to the nearest integer.
///
/// Nothing is written when rendering fails.
pub fn export_png<E, P>(
    engine: &E,
    path: P,
    request: &FitRequest,
    color: Color,
) -> Result<Transformation, Error>
where
    E: Engine<Canvas = Context>,
    P: AsRef<std::path::Path>,
{
    let (ctx, ts) = render_to_context(engine, request, color)?;
    ctx.save_png(path)?;
    Ok(ts)
}

// Negative and NaN values saturate to zero.
fn round_len(v: f64) -> u32 {
    (v + 0.5) as u32
}
