// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
#[cfg(feature = "text")]
use usvg::fontdb;

use crate::{Context, Engine, Error, IntrinsicSize, Options};

/// An SVG document.
///
/// Wraps a `usvg::Tree` and renders it with `resvg`.
pub struct Document {
    options: Options,
    #[cfg(feature = "text")]
    fontdb: fontdb::Database,
    tree: Option<usvg::Tree>,
    size: IntrinsicSize,
    // Kept to re-parse the document when the viewport size changes.
    source: Vec<u8>,
    source_dir: Option<PathBuf>,
    chunks: Option<Vec<u8>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates an empty document.
    ///
    /// The fonts database is empty.
    pub fn with_options(options: Options) -> Self {
        Document {
            options,
            #[cfg(feature = "text")]
            fontdb: fontdb::Database::new(),
            tree: None,
            size: IntrinsicSize::new(0.0, 0.0),
            source: Vec::new(),
            source_dir: None,
            chunks: None,
        }
    }

    /// Returns parsing options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns parsing options.
    ///
    /// Changes will affect only the next parse.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Returns the fonts database used during text to path conversion.
    #[cfg(feature = "text")]
    pub fn fontdb(&self) -> &fontdb::Database {
        &self.fontdb
    }

    /// Returns the fonts database used during text to path conversion.
    ///
    /// Fonts must be loaded before parsing.
    #[cfg(feature = "text")]
    pub fn fontdb_mut(&mut self) -> &mut fontdb::Database {
        &mut self.fontdb
    }

    /// Loads system fonts into the fonts database.
    ///
    /// Fonts must be loaded before parsing.
    #[cfg(all(feature = "text", feature = "system-fonts"))]
    pub fn load_system_fonts(&mut self) {
        self.fontdb.load_system_fonts();
        debug!("Loaded {} font faces.", self.fontdb.len());
    }

    /// Checks that a document was parsed successfully.
    pub fn is_loaded(&self) -> bool {
        self.tree.is_some()
    }

    /// Returns the parsed tree.
    pub fn tree(&self) -> Option<&usvg::Tree> {
        self.tree.as_ref()
    }

    /// Parses a file.
    ///
    /// Relative paths inside the document are resolved against the file directory,
    /// unless `Options::resources_dir` is set.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let dir = std::fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));
        self.load(data, dir)
    }

    /// Parses everything a reader provides.
    pub fn parse_reader<R: std::io::Read>(&mut self, mut reader: R) -> Result<(), Error> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(Error::IoError)?;
        self.load(data, None)
    }

    /// Parses an SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    pub fn parse_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.load(data.to_vec(), None)
    }

    /// Starts a chunked parsing.
    ///
    /// Discards chunks of a previous unfinished stream.
    pub fn parse_chunk_begin(&mut self) {
        self.chunks = Some(Vec::new());
    }

    /// Appends a chunk to the current stream.
    pub fn parse_chunk(&mut self, chunk: &[u8]) -> Result<(), Error> {
        let chunks = self.chunks.as_mut().ok_or(Error::InvalidCall)?;
        chunks.extend_from_slice(chunk);
        Ok(())
    }

    /// Finishes a chunked parsing and parses the collected data.
    pub fn parse_chunk_end(&mut self) -> Result<(), Error> {
        let data = self.chunks.take().ok_or(Error::InvalidCall)?;
        self.load(data, None)
    }

    /// Returns the document size.
    pub fn size(&self) -> Result<IntrinsicSize, Error> {
        if self.tree.is_none() {
            return Err(Error::InvalidCall);
        }

        Ok(self.size)
    }

    /// Returns the document width.
    pub fn width(&self) -> Result<f64, Error> {
        self.size().map(|s| s.width)
    }

    /// Returns the document height.
    pub fn height(&self) -> Result<f64, Error> {
        self.size().map(|s| s.height)
    }

    /// Sets the viewport size used to resolve relative `width` and `height`.
    ///
    /// A loaded document is parsed again.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) -> Result<(), Error> {
        let size = usvg::Size::from_wh(width, height).ok_or(Error::InvalidValue)?;
        self.options.viewport_size = size;

        if self.tree.is_some() {
            let (tree, size) = self.parse_tree(&self.source, self.source_dir.as_deref())?;
            self.tree = Some(tree);
            self.size = size;
        }

        Ok(())
    }

    /// Renders the document onto the context using its current transform.
    pub fn render(&self, ctx: &mut Context) -> Result<(), Error> {
        let tree = self.tree.as_ref().ok_or(Error::InvalidCall)?;
        let transform = ctx.transform();
        resvg::render(tree, transform, &mut ctx.pixmap_mut().as_mut());
        Ok(())
    }

    fn load(&mut self, data: Vec<u8>, dir: Option<PathBuf>) -> Result<(), Error> {
        if data.is_empty() {
            return Err(Error::InvalidCall);
        }

        let (tree, size) = self.parse_tree(&data, dir.as_deref())?;
        self.tree = Some(tree);
        self.size = size;
        self.source = data;
        self.source_dir = dir;
        Ok(())
    }

    fn parse_tree(
        &self,
        data: &[u8],
        dir: Option<&Path>,
    ) -> Result<(usvg::Tree, IntrinsicSize), Error> {
        let mut opt = self.options.to_usvg();
        if opt.resources_dir.is_none() {
            opt.resources_dir = dir.map(|d| d.to_path_buf());
        }

        let tree = usvg::Tree::from_data(
            data,
            &opt,
            #[cfg(feature = "text")]
            &self.fontdb,
        )?;

        let size = self.root_size(data, &tree);
        debug!("Parsed a {}x{} document.", size.width, size.height);

        Ok((tree, size))
    }

    // usvg resolves a percentage `width` and `height` of a root element
    // without `viewBox` against a fixed box, so they are resolved here
    // against the viewport size.
    fn root_size(&self, data: &[u8], tree: &usvg::Tree) -> IntrinsicSize {
        let mut size = IntrinsicSize::from(tree.size());

        let data = if data.starts_with(&[0x1f, 0x8b]) {
            match usvg::decompress_svgz(data) {
                Ok(v) => Cow::Owned(v),
                Err(_) => return size,
            }
        } else {
            Cow::Borrowed(data)
        };

        let text = match std::str::from_utf8(&data) {
            Ok(v) => v,
            Err(_) => return size,
        };

        let xml_opt = usvg::roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = match usvg::roxmltree::Document::parse_with_options(text, xml_opt) {
            Ok(v) => v,
            Err(_) => return size,
        };

        let root = xml.root_element();
        if root.has_attribute("viewBox") {
            return size;
        }

        let viewport = self.options.viewport_size;
        if let Some(k) = percentage(root.attribute("width")) {
            size.width = k * viewport.width() as f64;
        }
        if let Some(k) = percentage(root.attribute("height")) {
            size.height = k * viewport.height() as f64;
        }

        size
    }
}

// A missing length is `100%`.
fn percentage(value: Option<&str>) -> Option<f64> {
    let length = match value {
        Some(v) => svgtypes::Length::from_str(v).ok()?,
        None => return Some(1.0),
    };

    if length.unit == svgtypes::LengthUnit::Percent {
        Some(length.number / 100.0)
    } else {
        None
    }
}

impl Engine for Document {
    type Canvas = Context;

    fn intrinsic_size(&self) -> Result<IntrinsicSize, Error> {
        self.size()
    }

    fn render(&self, canvas: &mut Context) -> Result<(), Error> {
        Document::render(self, canvas)
    }
}
