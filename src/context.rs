// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rgb::RGBA8;

use crate::{Color, Error};

/// Drawing primitives required to position a document.
pub trait Canvas {
    /// Translates the user-space origin by `dx` and `dy`.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Scales the user-space axes by `sx` and `sy`.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Sets the current source color.
    fn set_source_color(&mut self, color: Color);
}

/// A drawing context backed by a `tiny_skia::Pixmap`.
///
/// Keeps the current transform and source color,
/// the same way a cairo context does.
#[derive(Clone, Debug)]
pub struct Context {
    pixmap: tiny_skia::Pixmap,
    transform: tiny_skia::Transform,
    source: Color,
}

impl Context {
    /// Creates a new context with a transparent surface.
    ///
    /// Returns `Error::NoMemory` when the surface cannot be allocated,
    /// which includes a zero `width` or `height`.
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or(Error::NoMemory)?;
        Ok(Self::from_pixmap(pixmap))
    }

    /// Creates a new context that draws into an existing pixmap.
    pub fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        Context {
            pixmap,
            transform: tiny_skia::Transform::identity(),
            source: Color::WHITE,
        }
    }

    /// Surface width.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Surface height.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The current transform.
    pub fn transform(&self) -> tiny_skia::Transform {
        self.transform
    }

    /// Replaces the current transform.
    pub fn set_transform(&mut self, transform: tiny_skia::Transform) {
        self.transform = transform;
    }

    /// Resets the current transform to identity.
    pub fn reset_transform(&mut self) {
        self.transform = tiny_skia::Transform::identity();
    }

    /// The current source color.
    pub fn source_color(&self) -> Color {
        self.source
    }

    /// Fills the whole surface with transparent black.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Fills the whole surface with the source color.
    pub fn paint(&mut self) {
        self.pixmap.fill(self.source);
    }

    /// Returns the underlying pixmap.
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Returns the underlying pixmap.
    pub fn pixmap_mut(&mut self) -> &mut tiny_skia::Pixmap {
        &mut self.pixmap
    }

    /// Consumes the context and returns the surface.
    pub fn into_pixmap(self) -> tiny_skia::Pixmap {
        self.pixmap
    }

    /// Returns a copy of the surface with demultiplied alpha.
    pub fn to_rgba8(&self) -> Vec<RGBA8> {
        self.pixmap
            .pixels()
            .iter()
            .map(|p| {
                let c = p.demultiply();
                RGBA8::new(c.red(), c.green(), c.blue(), c.alpha())
            })
            .collect()
    }

    /// Encodes the surface into a PNG data.
    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        Ok(self.pixmap.encode_png()?)
    }

    /// Saves the surface as a PNG file.
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Error> {
        Ok(self.pixmap.save_png(path)?)
    }
}

impl Canvas for Context {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.pre_translate(dx as f32, dy as f32);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.pre_scale(sx as f32, sy as f32);
    }

    fn set_source_color(&mut self, color: Color) {
        self.source = color;
    }
}
