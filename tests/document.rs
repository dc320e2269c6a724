use std::path::PathBuf;

use once_cell::sync::Lazy;
use rgb::RGBA8;
use svgfit::{Color, Context, Document, Engine, Error, FitRequest, IntrinsicSize, ScalingMode};

static OUT_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let dir = std::env::temp_dir().join("svgfit-tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir
});

const RED_SQUARE: &str = "
<svg width='10' height='10' viewBox='0 0 10 10' xmlns='http://www.w3.org/2000/svg'>
    <rect width='10' height='10' fill='#ff0000'/>
</svg>
";

const RELATIVE_SIZE: &str = "<svg width='50%' height='100%' xmlns='http://www.w3.org/2000/svg'/>";

const RED: RGBA8 = RGBA8::new(255, 0, 0, 255);

fn load(text: &str) -> Document {
    let mut doc = Document::new();
    doc.parse_data(text.as_bytes()).unwrap();
    doc
}

fn pixel(ctx: &Context, x: u32, y: u32) -> RGBA8 {
    ctx.to_rgba8()[(y * ctx.width() + x) as usize]
}

#[test]
fn size_before_parse() {
    let doc = Document::new();
    assert!(!doc.is_loaded());
    assert!(matches!(doc.size(), Err(Error::InvalidCall)));
    assert!(matches!(doc.width(), Err(Error::InvalidCall)));

    let mut ctx = Context::new(1, 1).unwrap();
    assert!(matches!(doc.render(&mut ctx), Err(Error::InvalidCall)));
}

#[test]
fn parse_data() {
    let doc = load(RED_SQUARE);
    assert!(doc.is_loaded());
    assert_eq!(doc.width().unwrap(), 10.0);
    assert_eq!(doc.height().unwrap(), 10.0);
}

#[test]
fn parse_empty_data() {
    let mut doc = Document::new();
    assert!(matches!(doc.parse_data(b""), Err(Error::InvalidCall)));
    assert!(!doc.is_loaded());
}

#[test]
fn parse_reader() {
    let mut doc = Document::new();
    doc.parse_reader(RED_SQUARE.as_bytes()).unwrap();
    assert_eq!(doc.width().unwrap(), 10.0);
}

#[test]
fn parse_malformed() {
    let mut doc = Document::new();
    let res = doc.parse_data(b"<svg xmlns='http://www.w3.org/2000/svg'");
    assert!(matches!(res, Err(Error::ParseError(_))));
    assert!(!doc.is_loaded());
}

#[test]
fn failed_parse_keeps_previous_tree() {
    let mut doc = load(RED_SQUARE);
    assert!(doc.parse_data(b"<svg").is_err());
    assert_eq!(doc.width().unwrap(), 10.0);
}

#[test]
fn parse_missing_file() {
    let mut doc = Document::new();
    let res = doc.parse_file("tests/missing.svg");
    assert!(matches!(res, Err(Error::FileNotFound)));
}

#[test]
fn parse_file() {
    let path = OUT_DIR.join("parse_file.svg");
    std::fs::write(&path, RED_SQUARE).unwrap();

    let mut doc = Document::new();
    doc.parse_file(&path).unwrap();
    assert_eq!(doc.height().unwrap(), 10.0);
}

#[test]
fn parse_chunks() {
    let mut doc = Document::new();
    doc.parse_chunk_begin();
    for chunk in RED_SQUARE.as_bytes().chunks(7) {
        doc.parse_chunk(chunk).unwrap();
    }
    doc.parse_chunk_end().unwrap();
    assert_eq!(doc.width().unwrap(), 10.0);
}

#[test]
fn chunk_without_begin() {
    let mut doc = Document::new();
    assert!(matches!(doc.parse_chunk(b"<svg"), Err(Error::InvalidCall)));
    assert!(matches!(doc.parse_chunk_end(), Err(Error::InvalidCall)));
}

#[test]
fn chunk_end_twice() {
    let mut doc = Document::new();
    doc.parse_chunk_begin();
    doc.parse_chunk(RED_SQUARE.as_bytes()).unwrap();
    doc.parse_chunk_end().unwrap();
    assert!(matches!(doc.parse_chunk_end(), Err(Error::InvalidCall)));
}

#[test]
fn empty_chunk_stream() {
    let mut doc = Document::new();
    doc.parse_chunk_begin();
    assert!(matches!(doc.parse_chunk_end(), Err(Error::InvalidCall)));
}

#[test]
fn viewport_size() {
    let mut doc = load(RELATIVE_SIZE);
    assert_eq!(doc.width().unwrap(), 50.0);
    assert_eq!(doc.height().unwrap(), 100.0);

    doc.set_viewport_size(400.0, 200.0).unwrap();
    assert_eq!(doc.width().unwrap(), 200.0);
    assert_eq!(doc.height().unwrap(), 200.0);
}

#[test]
fn viewport_size_before_parse() {
    let mut doc = Document::new();
    doc.set_viewport_size(400.0, 200.0).unwrap();
    doc.parse_data(RELATIVE_SIZE.as_bytes()).unwrap();
    assert_eq!(doc.width().unwrap(), 200.0);
}

#[test]
fn viewport_size_mixed_units() {
    let mut doc = load("<svg width='10' height='50%' xmlns='http://www.w3.org/2000/svg'/>");
    doc.set_viewport_size(400.0, 200.0).unwrap();
    assert_eq!(doc.width().unwrap(), 10.0);
    assert_eq!(doc.height().unwrap(), 100.0);
}

#[test]
fn viewport_size_with_view_box() {
    let mut doc = load(RED_SQUARE);
    doc.set_viewport_size(400.0, 200.0).unwrap();
    assert_eq!(doc.width().unwrap(), 10.0);
    assert_eq!(doc.height().unwrap(), 10.0);
}

#[test]
fn invalid_viewport_size() {
    let mut doc = Document::new();
    assert!(matches!(doc.set_viewport_size(0.0, 10.0), Err(Error::InvalidValue)));
    assert!(matches!(doc.set_viewport_size(10.0, -1.0), Err(Error::InvalidValue)));
}

#[test]
fn render_centered() {
    let doc = load(RED_SQUARE);
    let request = FitRequest::size(20.0, 10.0);
    let (ctx, ts) = svgfit::render_to_context(&doc, &request, Color::WHITE).unwrap();

    assert_eq!((ctx.width(), ctx.height()), (20, 10));
    assert_eq!(ts.dx, 5.0);
    assert_eq!(pixel(&ctx, 2, 5).a, 0);
    assert_eq!(pixel(&ctx, 10, 5), RED);
    assert_eq!(pixel(&ctx, 17, 5).a, 0);
}

#[test]
fn render_independent() {
    let doc = load(RED_SQUARE);
    let request = FitRequest::size(20.0, 10.0).with_mode(ScalingMode::Independent);
    let (ctx, _) = svgfit::render_to_context(&doc, &request, Color::WHITE).unwrap();

    assert_eq!(pixel(&ctx, 2, 5), RED);
    assert_eq!(pixel(&ctx, 17, 5), RED);
}

#[test]
fn source_color_does_not_tint() {
    let doc = load(RED_SQUARE);
    let blue = Color::from_rgba8(0, 0, 255, 255);
    let (ctx, _) = svgfit::render_to_context(&doc, &FitRequest::original(), blue).unwrap();
    assert_eq!(ctx.source_color(), blue);
    assert_eq!(pixel(&ctx, 5, 5), RED);
}

#[test]
fn render_zero_size() {
    let doc = load(RED_SQUARE);
    let res = svgfit::render_to_context(&doc, &FitRequest::scale(0.0), Color::WHITE);
    assert!(matches!(res, Err(Error::NoMemory)));
}

#[test]
fn export_png() {
    let doc = load(RED_SQUARE);
    let path = OUT_DIR.join("export.png");
    let request = FitRequest::size(40.0, 20.0);
    svgfit::export_png(&doc, &path, &request, Color::WHITE).unwrap();

    let decoder = png::Decoder::new(std::fs::File::open(&path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!((info.width, info.height), (40, 20));
    assert_eq!(info.color_type, png::ColorType::Rgba);

    let at = |x: usize, y: usize| {
        let i = (y * 40 + x) * 4;
        RGBA8::new(buf[i], buf[i + 1], buf[i + 2], buf[i + 3])
    };
    assert_eq!(at(5, 10).a, 0);
    assert_eq!(at(20, 10), RED);
    assert_eq!(at(35, 10).a, 0);
}

#[test]
fn export_png_into_missing_dir() {
    let doc = load(RED_SQUARE);
    let path = OUT_DIR.join("missing").join("export.png");
    let res = svgfit::export_png(&doc, &path, &FitRequest::original(), Color::WHITE);
    assert!(matches!(res, Err(Error::IoError(_))));
}

struct BrokenEngine;

impl Engine for BrokenEngine {
    type Canvas = Context;

    fn intrinsic_size(&self) -> Result<IntrinsicSize, Error> {
        Ok(IntrinsicSize::new(10.0, 10.0))
    }

    fn render(&self, _: &mut Context) -> Result<(), Error> {
        Err(Error::InvalidCall)
    }
}

#[test]
fn export_png_skips_failed_render() {
    let path = OUT_DIR.join("failed_render.png");
    let _ = std::fs::remove_file(&path);

    let res = svgfit::export_png(&BrokenEngine, &path, &FitRequest::original(), Color::WHITE);
    assert!(matches!(res, Err(Error::InvalidCall)));
    assert!(!path.exists());
}
