// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! C bindings.

#![allow(non_camel_case_types)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]

use std::ffi::CStr;
use std::os::raw::c_char;

use svgfit::{Alignment, Color, Context, Document, Error, FitRequest, ScalingMode};

/// @brief List of possible statuses.
#[repr(C)]
#[derive(Copy, Clone)]
pub enum svgfit_status {
    /// Everything is ok.
    SUCCESS = 0,
    /// Failed to allocate a surface or a context.
    NO_MEMORY,
    /// Failed to read the source or to write the output.
    IO_ERROR,
    /// The provided file was not found.
    FILE_NOT_FOUND,
    /// A provided value was invalid.
    INVALID_VALUE,
    /// The call was not valid in the current state.
    INVALID_CALL,
    /// Failed to parse an SVG data.
    PARSE_ERROR,
}

/// @brief A scaling mode.
#[repr(C)]
#[derive(Copy, Clone)]
pub enum svgfit_scaling_mode {
    /// Scale width and height independently.
    INDEPENDENT = 0,
    /// Scale uniformly so the whole image fits inside the target.
    ASPECT_FIT,
    /// Scale uniformly so the image covers the whole target.
    ASPECT_FILL,
}

/// @brief An alignment along a single axis.
#[repr(C)]
#[derive(Copy, Clone)]
pub enum svgfit_alignment {
    /// Left or top edge.
    LEADING = 0,
    /// Middle.
    CENTRE,
    /// Right or bottom edge.
    TRAILING,
}

impl svgfit_alignment {
    #[inline]
    fn to_alignment(self) -> Alignment {
        match self {
            svgfit_alignment::LEADING => Alignment::Leading,
            svgfit_alignment::CENTRE => Alignment::Centre,
            svgfit_alignment::TRAILING => Alignment::Trailing,
        }
    }
}

/// @brief Describes how an image should be fitted into a viewport.
///
/// Fields with an unset `has_*` flag are ignored.
#[repr(C)]
#[allow(missing_docs)]
#[derive(Copy, Clone)]
pub struct svgfit_fit_request {
    pub has_width: bool,
    pub width: f64,
    pub has_height: bool,
    pub height: f64,
    pub has_scale_x: bool,
    pub scale_x: f64,
    pub has_scale_y: bool,
    pub scale_y: f64,
    pub scaling_mode: svgfit_scaling_mode,
    pub horizontal_alignment: svgfit_alignment,
    pub vertical_alignment: svgfit_alignment,
}

impl svgfit_fit_request {
    fn to_request(&self) -> FitRequest {
        let opt = |has: bool, v: f64| if has { Some(v) } else { None };

        FitRequest {
            width: opt(self.has_width, self.width),
            height: opt(self.has_height, self.height),
            scale_x: opt(self.has_scale_x, self.scale_x),
            scale_y: opt(self.has_scale_y, self.scale_y),
            scaling_mode: match self.scaling_mode {
                svgfit_scaling_mode::INDEPENDENT => ScalingMode::Independent,
                svgfit_scaling_mode::ASPECT_FIT => ScalingMode::AspectFit,
                svgfit_scaling_mode::ASPECT_FILL => ScalingMode::AspectFill,
            },
            horizontal_alignment: self.horizontal_alignment.to_alignment(),
            vertical_alignment: self.vertical_alignment.to_alignment(),
        }
    }
}

/// @brief A fitting result.
///
/// The offset must be applied before the scale.
#[repr(C)]
#[allow(missing_docs)]
#[derive(Copy, Clone)]
pub struct svgfit_transformation {
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub dx: f64,
    pub dy: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl From<svgfit::Transformation> for svgfit_transformation {
    fn from(ts: svgfit::Transformation) -> Self {
        svgfit_transformation {
            width: ts.width,
            height: ts.height,
            scale_x: ts.scale_x,
            scale_y: ts.scale_y,
            dx: ts.dx,
            dy: ts.dy,
            viewport_width: ts.viewport_width,
            viewport_height: ts.viewport_height,
        }
    }
}

/// @brief A source color.
///
/// Each component must be in a 0..1 range.
#[repr(C)]
#[allow(missing_docs)]
#[derive(Copy, Clone)]
pub struct svgfit_color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl svgfit_color {
    #[inline]
    fn to_color(self) -> Option<Color> {
        Color::from_rgba(self.red, self.green, self.blue, self.alpha)
    }
}

/// @brief Initializes the library log.
///
/// Use it if you want to see any warnings.
///
/// Must be called only once.
///
/// All warnings will be printed to the `stderr`.
#[no_mangle]
pub extern "C" fn svgfit_init_log() {
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

/// @brief Returns a request that keeps the original size.
///
/// Uses the aspect fit mode and centre alignment.
#[no_mangle]
pub extern "C" fn svgfit_fit_request_default() -> svgfit_fit_request {
    svgfit_fit_request {
        has_width: false,
        width: 0.0,
        has_height: false,
        height: 0.0,
        has_scale_x: false,
        scale_x: 1.0,
        has_scale_y: false,
        scale_y: 1.0,
        scaling_mode: svgfit_scaling_mode::ASPECT_FIT,
        horizontal_alignment: svgfit_alignment::CENTRE,
        vertical_alignment: svgfit_alignment::CENTRE,
    }
}

/// @brief Computes a transformation that fits an image into a viewport.
///
/// @param width Intrinsic image width.
/// @param height Intrinsic image height.
/// @param request Fitting request. Must not be NULL.
#[no_mangle]
pub extern "C" fn svgfit_compute_transformation(
    width: f64,
    height: f64,
    request: *const svgfit_fit_request,
) -> svgfit_transformation {
    let request = cast_request(request);
    let size = svgfit::IntrinsicSize::new(width, height);
    svgfit::compute_transformation(size, &request).into()
}

/// @brief An opaque pointer to an SVG document.
pub struct svgfit_document(Document);

/// @brief Creates an empty #svgfit_document.
///
/// Should be destroyed via #svgfit_document_destroy.
#[no_mangle]
pub extern "C" fn svgfit_document_create() -> *mut svgfit_document {
    Box::into_raw(Box::new(svgfit_document(Document::new())))
}

/// @brief Destroys the #svgfit_document.
#[no_mangle]
pub extern "C" fn svgfit_document_destroy(doc: *mut svgfit_document) {
    unsafe {
        assert!(!doc.is_null());
        drop(Box::from_raw(doc));
    };
}

#[inline]
fn cast_doc(doc: *mut svgfit_document) -> &'static mut Document {
    unsafe {
        assert!(!doc.is_null());
        &mut (*doc).0
    }
}

/// @brief Loads system fonts into the document fonts database.
///
/// Must be called before parsing.
///
/// Has no effect when the `text` or `system-fonts` features are not enabled.
#[no_mangle]
#[allow(unused_variables)]
pub extern "C" fn svgfit_document_load_system_fonts(doc: *mut svgfit_document) {
    #[cfg(all(feature = "text", feature = "system-fonts"))]
    {
        cast_doc(doc).load_system_fonts();
    }
}

/// @brief Parses a file.
///
/// .svg and .svgz files are supported.
///
/// @param path UTF-8 file path. Must not be NULL.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_parse_file(
    doc: *mut svgfit_document,
    path: *const c_char,
) -> i32 {
    let path = match cstr_to_str(path) {
        Some(v) => v,
        None => return svgfit_status::INVALID_VALUE as i32,
    };

    to_status(cast_doc(doc).parse_file(path))
}

/// @brief Parses an in-memory SVG.
///
/// @param data SVG data. Can be compressed. Must not be NULL.
/// @param len Data length in bytes.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_parse_buffer(
    doc: *mut svgfit_document,
    data: *const c_char,
    len: usize,
) -> i32 {
    let data = cast_bytes(data, len);
    to_status(cast_doc(doc).parse_data(data))
}

/// @brief Starts a chunked parsing.
///
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_parse_chunk_begin(doc: *mut svgfit_document) -> i32 {
    cast_doc(doc).parse_chunk_begin();
    svgfit_status::SUCCESS as i32
}

/// @brief Appends a chunk of an in-memory SVG.
///
/// @param data SVG chunk. Must not be NULL.
/// @param len Chunk length in bytes.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_parse_chunk(
    doc: *mut svgfit_document,
    data: *const c_char,
    len: usize,
) -> i32 {
    let data = cast_bytes(data, len);
    to_status(cast_doc(doc).parse_chunk(data))
}

/// @brief Finishes a chunked parsing.
///
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_parse_chunk_end(doc: *mut svgfit_document) -> i32 {
    to_status(cast_doc(doc).parse_chunk_end())
}

/// @brief Returns the document size.
///
/// @param width Document width. Must not be NULL.
/// @param height Document height. Must not be NULL.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_get_size(
    doc: *mut svgfit_document,
    width: *mut f64,
    height: *mut f64,
) -> i32 {
    assert!(!width.is_null());
    assert!(!height.is_null());

    match cast_doc(doc).size() {
        Ok(size) => {
            unsafe {
                *width = size.width;
                *height = size.height;
            }
            svgfit_status::SUCCESS as i32
        }
        Err(e) => convert_error(&e) as i32,
    }
}

/// @brief Sets the viewport size used to resolve relative `width` and `height`.
///
/// A loaded document is parsed again.
///
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_set_viewport_size(
    doc: *mut svgfit_document,
    width: f32,
    height: f32,
) -> i32 {
    to_status(cast_doc(doc).set_viewport_size(width, height))
}

/// @brief Fits the document into a viewport and renders it onto the context.
///
/// The context transform is translated and then scaled.
///
/// @param ctx Drawing context. Must not be NULL.
/// @param request Fitting request. Must not be NULL.
/// @param color Source color.
/// @param ts Applied transformation. Can be NULL.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_render(
    doc: *mut svgfit_document,
    ctx: *mut svgfit_context,
    request: *const svgfit_fit_request,
    color: svgfit_color,
    ts: *mut svgfit_transformation,
) -> i32 {
    let request = cast_request(request);
    let color = match color.to_color() {
        Some(v) => v,
        None => return svgfit_status::INVALID_VALUE as i32,
    };

    match svgfit::render_fitted(&*cast_doc(doc), cast_ctx(ctx), &request, color) {
        Ok(v) => {
            if !ts.is_null() {
                unsafe {
                    *ts = v.into();
                }
            }
            svgfit_status::SUCCESS as i32
        }
        Err(e) => convert_error(&e) as i32,
    }
}

/// @brief Renders the document into a PNG file.
///
/// The image size is the fitted viewport size rounded to the nearest integer.
///
/// @param path UTF-8 file path. Must not be NULL.
/// @param request Fitting request. Must not be NULL.
/// @param color Source color.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_document_export_png(
    doc: *mut svgfit_document,
    path: *const c_char,
    request: *const svgfit_fit_request,
    color: svgfit_color,
) -> i32 {
    let path = match cstr_to_str(path) {
        Some(v) => v,
        None => return svgfit_status::INVALID_VALUE as i32,
    };

    let request = cast_request(request);
    let color = match color.to_color() {
        Some(v) => v,
        None => return svgfit_status::INVALID_VALUE as i32,
    };

    to_status(svgfit::export_png(&*cast_doc(doc), path, &request, color).map(|_| ()))
}

/// @brief An opaque pointer to a drawing context.
pub struct svgfit_context(Context);

/// @brief Creates a transparent drawing context.
///
/// Should be destroyed via #svgfit_context_destroy.
///
/// @return A context or NULL when `width` or `height` are zero
///         or the surface cannot be allocated.
#[no_mangle]
pub extern "C" fn svgfit_context_create(width: u32, height: u32) -> *mut svgfit_context {
    match Context::new(width, height) {
        Ok(ctx) => Box::into_raw(Box::new(svgfit_context(ctx))),
        Err(_) => std::ptr::null_mut(),
    }
}

/// @brief Destroys the #svgfit_context.
#[no_mangle]
pub extern "C" fn svgfit_context_destroy(ctx: *mut svgfit_context) {
    unsafe {
        assert!(!ctx.is_null());
        drop(Box::from_raw(ctx));
    };
}

#[inline]
fn cast_ctx(ctx: *mut svgfit_context) -> &'static mut Context {
    unsafe {
        assert!(!ctx.is_null());
        &mut (*ctx).0
    }
}

/// @brief Returns the context width.
#[no_mangle]
pub extern "C" fn svgfit_context_width(ctx: *mut svgfit_context) -> u32 {
    cast_ctx(ctx).width()
}

/// @brief Returns the context height.
#[no_mangle]
pub extern "C" fn svgfit_context_height(ctx: *mut svgfit_context) -> u32 {
    cast_ctx(ctx).height()
}

/// @brief Copies the context pixels as non-premultiplied RGBA8.
///
/// @param data A buffer of at least `width * height * 4` bytes. Must not be NULL.
/// @param len Buffer length in bytes.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_context_read_pixels(
    ctx: *mut svgfit_context,
    data: *mut c_char,
    len: usize,
) -> i32 {
    let ctx = cast_ctx(ctx);
    let needed = ctx.width() as usize * ctx.height() as usize * 4;
    if len < needed {
        return svgfit_status::INVALID_VALUE as i32;
    }

    let data = unsafe {
        assert!(!data.is_null());
        std::slice::from_raw_parts_mut(data as *mut u8, needed)
    };

    for (chunk, p) in data.chunks_exact_mut(4).zip(ctx.to_rgba8()) {
        chunk.copy_from_slice(&[p.r, p.g, p.b, p.a]);
    }

    svgfit_status::SUCCESS as i32
}

/// @brief Saves the context surface as a PNG file.
///
/// @param path UTF-8 file path. Must not be NULL.
/// @return #svgfit_status
#[no_mangle]
pub extern "C" fn svgfit_context_save_png(ctx: *mut svgfit_context, path: *const c_char) -> i32 {
    let path = match cstr_to_str(path) {
        Some(v) => v,
        None => return svgfit_status::INVALID_VALUE as i32,
    };

    to_status(cast_ctx(ctx).save_png(path))
}

#[inline]
fn cast_request(request: *const svgfit_fit_request) -> FitRequest {
    unsafe {
        assert!(!request.is_null());
        (*request).to_request()
    }
}

#[inline]
fn cast_bytes(data: *const c_char, len: usize) -> &'static [u8] {
    unsafe {
        assert!(!data.is_null());
        std::slice::from_raw_parts(data as *const u8, len)
    }
}

fn cstr_to_str(text: *const c_char) -> Option<&'static str> {
    let text = unsafe {
        assert!(!text.is_null());
        CStr::from_ptr(text)
    };

    text.to_str().ok()
}

fn convert_error(e: &Error) -> svgfit_status {
    match e {
        Error::NoMemory => svgfit_status::NO_MEMORY,
        Error::IoError(_) => svgfit_status::IO_ERROR,
        Error::FileNotFound => svgfit_status::FILE_NOT_FOUND,
        Error::InvalidValue => svgfit_status::INVALID_VALUE,
        Error::InvalidCall => svgfit_status::INVALID_CALL,
        Error::ParseError(_) => svgfit_status::PARSE_ERROR,
    }
}

fn to_status(result: Result<(), Error>) -> i32 {
    match result {
        Ok(()) => svgfit_status::SUCCESS as i32,
        Err(e) => convert_error(&e) as i32,
    }
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
