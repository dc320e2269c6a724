// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

/// Document parsing options.
///
/// A fresh `usvg::Options` is built from it on every parse.
#[derive(Clone, Debug)]
pub struct Options {
    /// Directory that will be used during relative paths resolving.
    ///
    /// Set to the file directory by `Document::parse_file` when `None`.
    ///
    /// Default: `None`
    pub resources_dir: Option<PathBuf>,

    /// Target DPI.
    ///
    /// Default: 96.0
    pub dpi: f32,

    /// A default font family.
    ///
    /// Default: Times New Roman
    pub font_family: String,

    /// A default font size.
    ///
    /// Default: 12
    pub font_size: f32,

    /// A list of languages used to resolve `systemLanguage`.
    ///
    /// Default: `[en]`
    pub languages: Vec<String>,

    /// Default shape rendering method.
    pub shape_rendering: usvg::ShapeRendering,

    /// Default text rendering method.
    pub text_rendering: usvg::TextRendering,

    /// Default image rendering method.
    pub image_rendering: usvg::ImageRendering,

    /// Viewport size to assume if there is no `viewBox` attribute and
    /// the `width` or `height` attributes are relative.
    ///
    /// Default: `(100, 100)`
    pub viewport_size: usvg::Size,
}

impl Default for Options {
    fn default() -> Options {
        let opt = usvg::Options::default();
        Options {
            resources_dir: None,
            dpi: opt.dpi,
            font_family: opt.font_family,
            font_size: opt.font_size,
            languages: opt.languages,
            shape_rendering: opt.shape_rendering,
            text_rendering: opt.text_rendering,
            image_rendering: opt.image_rendering,
            viewport_size: opt.default_size,
        }
    }
}

impl Options {
    /// Builds `usvg` options.
    pub fn to_usvg(&self) -> usvg::Options {
        let mut opt = usvg::Options::default();
        opt.resources_dir = self.resources_dir.clone();
        opt.dpi = self.dpi;
        opt.font_family = self.font_family.clone();
        opt.font_size = self.font_size;
        opt.languages = self.languages.clone();
        opt.shape_rendering = self.shape_rendering;
        opt.text_rendering = self.text_rendering;
        opt.image_rendering = self.image_rendering;
        opt.default_size = self.viewport_size;
        opt
    }
}
