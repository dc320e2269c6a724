// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgfit` renders SVG documents with [resvg](https://github.com/RazrFalcon/resvg)
and fits them into a target viewport.

```no_run
use svgfit::{Alignment, Color, Document, FitRequest, ScalingMode};

let mut doc = Document::new();
doc.parse_file("image.svg").unwrap();

let request = FitRequest::size(640.0, 480.0)
    .with_mode(ScalingMode::AspectFit)
    .with_alignment(Alignment::Centre, Alignment::Leading);
svgfit::export_png(&doc, "image.png", &request, Color::WHITE).unwrap();
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::uninlined_format_args)]

pub use resvg;
pub use tiny_skia;
pub use usvg;

/// A source color.
pub use tiny_skia::Color;

mod context;
mod document;
mod engine;
mod error;
mod fit;
mod options;

pub use context::{Canvas, Context};
pub use document::Document;
pub use engine::{create_context, export_png, render_fitted, render_to_context, Engine};
pub use error::Error;
pub use fit::{
    compute_transformation, Alignment, FitRequest, IntrinsicSize, ScalingMode, Transformation,
};
pub use options::Options;
