// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path;

use svgfit::usvg::fontdb;
use svgfit::{Alignment, Canvas, Color, Document, FitRequest, ScalingMode};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn timed<F, T>(perf: bool, name: &str, mut f: F) -> T
where
    F: FnMut() -> T,
{
    let now = std::time::Instant::now();
    let result = f();
    if perf {
        let elapsed = now.elapsed().as_micros() as f64 / 1000.0;
        println!("{}: {:.2}ms", name, elapsed);
    }

    result
}

fn process() -> Result<(), String> {
    let mut args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    let svg_data = timed(args.perf, "Reading", || -> Result<Vec<u8>, &str> {
        if let InputFrom::File(ref file) = args.in_svg {
            std::fs::read(file).map_err(|_| "failed to open the provided file")
        } else {
            use std::io::Read;
            let mut buf = Vec::new();
            let stdin = std::io::stdin();
            let mut handle = stdin.lock();
            handle
                .read_to_end(&mut buf)
                .map_err(|_| "failed to read stdin")?;
            Ok(buf)
        }
    })?;

    let mut doc = Document::with_options(args.options.clone());

    // fontdb initialization is pretty expensive, so perform it only when needed.
    if has_text_nodes(&svg_data) {
        timed(args.perf, "FontDB", || load_fonts(&mut args, doc.fontdb_mut()));
    }

    timed(args.perf, "SVG Parsing", || {
        doc.parse_data(&svg_data).map_err(|e| e.to_string())
    })?;

    let size = doc.size().map_err(|e| e.to_string())?;
    let ts = svgfit::compute_transformation(size, &args.request);

    if args.print_transform {
        println!(
            "{},{},{},{},{},{}",
            ts.scale_x, ts.scale_y, ts.dx, ts.dy, ts.width, ts.height
        );
    }

    let ctx = timed(args.perf, "Rendering", || -> Result<svgfit::Context, String> {
        let mut ctx = svgfit::create_context(&ts).map_err(|e| e.to_string())?;
        if let Some(background) = args.background {
            ctx.set_source_color(background);
            ctx.paint();
        }

        svgfit::render_fitted(&doc, &mut ctx, &args.request, args.color)
            .map_err(|e| e.to_string())?;
        Ok(ctx)
    })?;

    match args.out_png {
        OutputTo::Stdout => {
            use std::io::Write;
            let buf = ctx.encode_png().map_err(|e| e.to_string())?;
            std::io::stdout()
                .write_all(&buf)
                .map_err(|_| "failed to write to stdout")?;
        }
        OutputTo::File(ref file) => {
            timed(args.perf, "Saving", || {
                ctx.save_png(file).map_err(|e| e.to_string())
            })?;
        }
    };

    Ok(())
}

const HELP: &str = "\
svgfit renders an SVG into a PNG, fitted into a viewport.

USAGE:
  svgfit [OPTIONS] <in-svg> <out-png>  # from file to file
  svgfit [OPTIONS] <in-svg> -c         # from file to stdout
  svgfit [OPTIONS] - <out-png>         # from stdin to file
  svgfit [OPTIONS] - -c                # from stdin to stdout

  svgfit in.svg out.png
  svgfit -w 640 -h 480 --mode aspect-fill in.svg out.png
  svgfit -z 4 in.svg out.png

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version
  -c                            Prints the output PNG to the stdout

  -w, --width LENGTH            Sets the viewport width in pixels
  -h, --height LENGTH           Sets the viewport height in pixels
  -z, --zoom FACTOR             Zooms the image by a factor
      --scale-x FACTOR          Sets the horizontal scaling factor
      --scale-y FACTOR          Sets the vertical scaling factor
                                [default: the horizontal factor]
      --mode MODE               Selects how the image is fitted into the viewport
                                when both --width and --height are set
                                [default: aspect-fit]
                                [possible values: independent, aspect-fit, aspect-fill]
      --halign ALIGN            Sets the horizontal alignment
                                [default: centre]
                                [possible values: leading, centre, center, trailing]
      --valign ALIGN            Sets the vertical alignment
                                [default: centre]
                                [possible values: leading, centre, center, trailing]
      --color COLOR             Sets the source color of the drawing context.
                                The document is rendered with its own colors,
                                so this does not change the output image
                                [default: white]
      --background COLOR        Sets the background color
                                Examples: red, #fff, #fff000
      --print-transform         Prints the computed scale, offset and size as
                                'scale-x,scale-y,dx,dy,width,height'

      --dpi DPI                 Sets the resolution
                                [default: 96] [possible values: 10..4000 (inclusive)]
      --languages LANG          Sets a comma-separated list of languages that
                                will be used during the 'systemLanguage'
                                attribute resolving
                                Examples: 'en-US', 'en-US, ru-RU', 'en, ru'
                                [default: en]
      --resources-dir DIR       Sets a directory that will be used during
                                relative paths resolving.
                                [default: input file directory]

      --font-family FAMILY      Sets the default font family that will be
                                used when no 'font-family' is present
                                [default: Times New Roman]
      --font-size SIZE          Sets the default font size that will be
                                used when no 'font-size' is present
                                [default: 12] [possible values: 1..192 (inclusive)]
      --use-font-file PATH      Load a specified font file into the fonts database.
                                This option can be set multiple times
      --use-fonts-dir PATH      Loads all fonts from the specified directory
                                into the fonts database.
                                This option can be set multiple times
      --skip-system-fonts       Disables system fonts loading.

      --perf                    Prints performance stats
      --quiet                   Disables warnings

ARGS:
  <in-svg>                      Input file
  <out-png>                     Output file
";

#[derive(Debug)]
struct CliArgs {
    width: Option<u32>,
    height: Option<u32>,
    zoom: Option<f32>,
    scale_x: Option<f32>,
    scale_y: Option<f32>,
    mode: ScalingMode,
    halign: Alignment,
    valign: Alignment,
    color: Option<svgtypes::Color>,
    background: Option<svgtypes::Color>,
    print_transform: bool,

    dpi: u32,
    languages: Vec<String>,
    resources_dir: Option<path::PathBuf>,

    font_family: Option<String>,
    font_size: u32,
    font_files: Vec<path::PathBuf>,
    font_dirs: Vec<path::PathBuf>,
    skip_system_fonts: bool,

    perf: bool,
    quiet: bool,

    input: String,
    output: String,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(CliArgs {
        width: input.opt_value_from_fn(["-w", "--width"], parse_length)?,
        height: input.opt_value_from_fn(["-h", "--height"], parse_length)?,
        zoom: input.opt_value_from_fn(["-z", "--zoom"], parse_factor)?,
        scale_x: input.opt_value_from_fn("--scale-x", parse_factor)?,
        scale_y: input.opt_value_from_fn("--scale-y", parse_factor)?,
        mode: input.opt_value_from_str("--mode")?.unwrap_or_default(),
        halign: input.opt_value_from_str("--halign")?.unwrap_or_default(),
        valign: input.opt_value_from_str("--valign")?.unwrap_or_default(),
        color: input.opt_value_from_str("--color")?,
        background: input.opt_value_from_str("--background")?,
        print_transform: input.contains("--print-transform"),

        dpi: input.opt_value_from_fn("--dpi", parse_dpi)?.unwrap_or(96),
        languages: input
            .opt_value_from_fn("--languages", parse_languages)?
            .unwrap_or_else(|| vec!["en".to_string()]),
        resources_dir: input.opt_value_from_str("--resources-dir")?,

        font_family: input.opt_value_from_str("--font-family")?,
        font_size: input
            .opt_value_from_fn("--font-size", parse_font_size)?
            .unwrap_or(12),
        font_files: input.values_from_str("--use-font-file")?,
        font_dirs: input.values_from_str("--use-fonts-dir")?,
        skip_system_fonts: input.contains("--skip-system-fonts"),

        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),

        input: input.free_from_str()?,
        output: input.free_from_str()?,
    })
}

fn parse_dpi(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if (10..=4000).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

fn parse_length(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid length")?;

    if n > 0 {
        Ok(n)
    } else {
        Err("LENGTH cannot be zero".to_string())
    }
}

fn parse_factor(s: &str) -> Result<f32, String> {
    let n: f32 = s.parse().map_err(|_| "invalid factor")?;

    if n > 0.0 && n.is_finite() {
        Ok(n)
    } else {
        Err("FACTOR should be positive".to_string())
    }
}

fn parse_font_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| "invalid number")?;

    if n > 0 && n <= 192 {
        Ok(n)
    } else {
        Err("font size out of bounds".to_string())
    }
}

fn parse_languages(s: &str) -> Result<Vec<String>, String> {
    let mut langs = Vec::new();
    for lang in s.split(',') {
        langs.push(lang.trim().to_string());
    }

    if langs.is_empty() {
        return Err("languages list cannot be empty".to_string());
    }

    Ok(langs)
}

#[derive(Clone, PartialEq, Debug)]
enum InputFrom {
    Stdin,
    File(path::PathBuf),
}

#[derive(Clone, PartialEq, Debug)]
enum OutputTo {
    Stdout,
    File(path::PathBuf),
}

struct Args {
    in_svg: InputFrom,
    out_png: OutputTo,
    perf: bool,
    quiet: bool,
    options: svgfit::Options,
    request: FitRequest,
    color: Color,
    background: Option<Color>,
    print_transform: bool,

    font_files: Vec<path::PathBuf>,
    font_dirs: Vec<path::PathBuf>,
    skip_system_fonts: bool,
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    let in_svg = if args.input == "-" {
        InputFrom::Stdin
    } else if args.input == "-c" {
        return Err("-c should be set after input".to_string());
    } else {
        InputFrom::File(args.input.as_str().into())
    };

    let out_png = if args.output == "-c" {
        OutputTo::Stdout
    } else {
        OutputTo::File(args.output.as_str().into())
    };

    if args.input == "-" && args.resources_dir.is_none() {
        println!("Warning: Make sure to set --resources-dir when reading SVG from stdin.");
    }

    let has_target = args.width.is_some() || args.height.is_some();
    if has_target && (args.zoom.is_some() || args.scale_x.is_some() || args.scale_y.is_some()) {
        println!("Warning: --zoom, --scale-x and --scale-y have no effect with --width or --height.");
    }

    let request = FitRequest {
        width: args.width.map(f64::from),
        height: args.height.map(f64::from),
        scale_x: args.scale_x.or(args.zoom).map(f64::from),
        scale_y: args.scale_y.or(args.zoom).map(f64::from),
        scaling_mode: args.mode,
        horizontal_alignment: args.halign,
        vertical_alignment: args.valign,
    };

    let resources_dir = match args.resources_dir {
        Some(v) => Some(v),
        None if args.input != "-" => {
            // Get input file absolute directory.
            std::fs::canonicalize(&args.input)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        }
        None => None,
    };

    let mut options = svgfit::Options::default();
    options.resources_dir = resources_dir;
    options.dpi = args.dpi as f32;
    if let Some(family) = args.font_family {
        options.font_family = family;
    }
    options.font_size = args.font_size as f32;
    options.languages = args.languages;

    Ok(Args {
        in_svg,
        out_png,
        perf: args.perf,
        quiet: args.quiet,
        options,
        request,
        color: args.color.map(svg_to_skia_color).unwrap_or(Color::WHITE),
        background: args.background.map(svg_to_skia_color),
        print_transform: args.print_transform,
        font_files: args.font_files,
        font_dirs: args.font_dirs,
        skip_system_fonts: args.skip_system_fonts,
    })
}

fn has_text_nodes(data: &[u8]) -> bool {
    let data = if data.starts_with(&[0x1f, 0x8b]) {
        match svgfit::usvg::decompress_svgz(data) {
            Ok(v) => std::borrow::Cow::Owned(v),
            Err(_) => return false,
        }
    } else {
        std::borrow::Cow::Borrowed(data)
    };

    let text = match std::str::from_utf8(&data) {
        Ok(v) => v,
        Err(_) => return false,
    };

    let xml_opt = svgfit::usvg::roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };

    match svgfit::usvg::roxmltree::Document::parse_with_options(text, xml_opt) {
        Ok(tree) => tree
            .descendants()
            .any(|n| n.has_tag_name(("http://www.w3.org/2000/svg", "text"))),
        Err(_) => false,
    }
}

fn load_fonts(args: &mut Args, fontdb: &mut fontdb::Database) {
    if !args.skip_system_fonts {
        fontdb.load_system_fonts();
    }

    for path in &args.font_files {
        if let Err(e) = fontdb.load_font_file(path) {
            log::warn!("Failed to load '{}' cause {}.", path.display(), e);
        }
    }

    for path in &args.font_dirs {
        fontdb.load_fonts_dir(path);
    }
}

fn svg_to_skia_color(color: svgtypes::Color) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, color.alpha)
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
