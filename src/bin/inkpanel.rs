use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "inkpanel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a comic page to an image.
    Render(RenderArgs),
    /// Replay a drawing and export its coverage mask as a PNG.
    Mask(MaskArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image path (.png or .jpg).
    #[arg(long)]
    out: PathBuf,

    /// Directory image keys resolve against. Defaults to the page's directory.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Directory of .ttf/.otf files, registered under their file stems.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Stamp this text in the bottom-right corner.
    #[arg(long)]
    watermark: Option<String>,

    /// Output format; inferred from the extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Input drawing JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output mask PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the full composite (background included) here.
    #[arg(long)]
    composite: Option<PathBuf>,

    /// Directory of .ttf/.otf files for text ops.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

impl From<FormatChoice> for inkpanel::ExportFormat {
    fn from(f: FormatChoice) -> Self {
        match f {
            FormatChoice::Png => Self::Png,
            FormatChoice::Jpeg => Self::Jpeg,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Mask(args) => cmd_mask(args),
    }
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn output_format(
    path: &Path,
    choice: Option<FormatChoice>,
) -> anyhow::Result<inkpanel::ExportFormat> {
    if let Some(c) = choice {
        return Ok(c.into());
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    inkpanel::ExportFormat::from_extension(ext)
        .with_context(|| format!("cannot infer image format from '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn register_fonts(fonts: &mut inkpanel::FontBook, dir: &Path) -> anyhow::Result<usize> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("read font dir '{}'", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
        })
        .collect();
    paths.sort();
    for path in &paths {
        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("font file name '{}' is not utf-8", path.display()))?;
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        fonts
            .register(key, bytes)
            .with_context(|| format!("register font '{}'", path.display()))?;
    }
    Ok(paths.len())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let json = read_text(&args.in_path, "page")?;
    let page = inkpanel::Page::from_json(&json).context("parse page JSON")?;
    let format = output_format(&args.out, args.format)?;

    let mut assets = inkpanel::Assets::new();
    if let Some(dir) = &args.fonts {
        let n = register_fonts(&mut assets.fonts, dir)?;
        eprintln!("registered {n} font(s)");
    }

    let images_root = match &args.images {
        Some(dir) => dir.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    for key in page.image_keys() {
        assets.images.request(key);
        let path = images_root.join(key);
        let fetched = std::fs::read(&path)
            .map_err(|e| format!("read '{}': {e}", path.display()));
        assets.images.complete(key, fetched.as_deref().map_err(|e| e.clone()));
    }

    let settings = inkpanel::RenderSettings {
        show_selection: false,
        watermark: args.watermark,
        ..inkpanel::RenderSettings::default()
    };
    let bytes = inkpanel::export_image(
        &page,
        &inkpanel::Selection::default(),
        &mut assets,
        &settings,
        format,
    )?;
    write_output(&args.out, &bytes)
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let json = read_text(&args.in_path, "drawing")?;
    let doc = inkpanel::DrawingDocument::from_json(&json).context("parse drawing JSON")?;

    let mut engine = inkpanel::DrawingEngine::new(inkpanel::EditorConfig::from_env());
    if let Some(dir) = &args.fonts {
        register_fonts(engine.fonts_mut(), dir)?;
    }
    let layers = doc.replay(&mut engine)?;
    eprintln!("replayed {} op(s), {layers} layer(s)", doc.ops.len());

    if let Some(bg) = &doc.background {
        let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
        let path = root.join(bg);
        let fetched = std::fs::read(&path).map_err(|e| format!("read '{}': {e}", path.display()));
        engine.complete_background(fetched.as_deref().map_err(|e| e.clone()));
    }

    let mask = engine
        .export_mask()?
        .context("drawing surface was not attached")?;
    write_output(&args.out, &mask)?;

    if let Some(path) = &args.composite {
        let format = output_format(path, None)?;
        let bytes = engine
            .export_image(format)?
            .context("drawing surface was not attached")?;
        write_output(path, &bytes)?;
    }
    Ok(())
}
