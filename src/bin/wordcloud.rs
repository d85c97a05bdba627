use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use wordcloud::{
    BlockRasterizer, Canvas, CpuRasterizer, CpuSurface, DrawReport, FontResolver,
    GlyphRasterizer, Rng64, Settings, Surface, WordCloud, WordCloudOptions, WordList,
};

#[derive(Parser, Debug)]
#[command(name = "wordcloud", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a word list and write it as a PNG.
    Render(RenderArgs),
    /// Report rasterizer support and the detected minimum font size.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Word list JSON (`[["word", weight], ...]` or objects).
    #[arg(long)]
    words: PathBuf,

    /// Options JSON; missing keys take their defaults.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 500)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 500)]
    height: u32,

    /// Seed for rotation, shuffle and random colors (time-based when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Extra font files to load before system fonts are consulted.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Text backend.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,

    /// Write the draw report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Extra font files to load.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Text backend.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    /// Shaped glyphs through parley and vello_cpu.
    Cpu,
    /// Font-free em boxes.
    Block,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn font_resolver(fonts: &[PathBuf]) -> anyhow::Result<FontResolver> {
    let mut resolver = FontResolver::system();
    for path in fonts {
        resolver.load_font_file(path)?;
    }
    Ok(resolver)
}

fn read_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let opts = match path {
        Some(p) => WordCloudOptions::from_path(p)
            .with_context(|| format!("load options '{}'", p.display()))?,
        None => WordCloudOptions::default(),
    };
    Ok(Settings::from_options(&opts)?)
}

fn draw_with<R: GlyphRasterizer>(
    rasterizer: R,
    settings: Settings,
    list: WordList,
    seed: Option<u64>,
    surface: &mut dyn Surface,
) -> anyhow::Result<DrawReport> {
    let mut cloud = WordCloud::new(rasterizer, settings, list);
    if let Some(seed) = seed {
        cloud = cloud.with_rng(Rng64::new(seed));
    }
    if !cloud.is_supported() {
        anyhow::bail!("text backend cannot measure or rasterize text (no usable fonts?)");
    }
    Ok(cloud.draw(surface)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let canvas = Canvas::new(args.width, args.height)?;
    let list = WordList::from_path(&args.words)
        .with_context(|| format!("load word list '{}'", args.words.display()))?;
    let settings = read_settings(args.options.as_deref())?;
    let total = list.len();

    let (report, mut surface) = match args.backend {
        BackendChoice::Cpu => {
            let mut surface =
                CpuSurface::with_fonts(canvas.width, canvas.height, font_resolver(&args.fonts)?)?;
            let rasterizer = CpuRasterizer::with_fonts(font_resolver(&args.fonts)?);
            let report = draw_with(rasterizer, settings, list, args.seed, &mut surface)?;
            (report, surface)
        }
        BackendChoice::Block => {
            let mut surface = CpuSurface::with_block_text(canvas.width, canvas.height)?;
            let report = draw_with(
                BlockRasterizer::new(),
                settings,
                list,
                args.seed,
                &mut surface,
            )?;
            (report, surface)
        }
    };

    let frame = surface.render()?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    if let Some(path) = &args.report {
        let f = std::fs::File::create(path)
            .with_context(|| format!("create report '{}'", path.display()))?;
        serde_json::to_writer_pretty(f, &report).with_context(|| "write report JSON")?;
    }

    if report.aborted {
        eprintln!("aborted: time budget exceeded");
    }
    eprintln!("placed {}/{} words", report.placed_count(), total);
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let (supported, min_font_size) = match args.backend {
        BackendChoice::Cpu => {
            let rasterizer = CpuRasterizer::with_fonts(font_resolver(&args.fonts)?);
            eprintln!("font faces:    {}", rasterizer.face_count());
            probe_with(rasterizer)
        }
        BackendChoice::Block => probe_with(BlockRasterizer::new()),
    };
    eprintln!("supported:     {supported}");
    eprintln!("min font size: {min_font_size}");
    Ok(())
}

fn probe_with<R: GlyphRasterizer>(rasterizer: R) -> (bool, f64) {
    let cloud = WordCloud::new(rasterizer, Settings::default(), WordList::default());
    (cloud.is_supported(), cloud.min_font_size())
}
