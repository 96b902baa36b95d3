use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pagestack", version, about = "Stack product images into one detail page")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the planned layout as JSON without decoding pixels.
    Plan(PlanArgs),
    /// Compose the page image (and optionally a placement manifest).
    Compose(ComposeArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Folder of images (jpg/jpeg/png/webp/gif/bmp/tif/tiff), stacked in file-name order.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Job JSON with layout/footer overrides and an optional explicit image list.
    #[arg(long)]
    job: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<f64>,

    /// White space above the first image.
    #[arg(long)]
    top: Option<f64>,

    /// White space between images.
    #[arg(long)]
    gap: Option<f64>,

    /// White space below the content.
    #[arg(long)]
    bottom: Option<f64>,

    /// Drop the footer band.
    #[arg(long)]
    no_footer: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output image path; format follows the extension. Defaults to `<in>/pagestack_out/<name>.jpg`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write a placement manifest (JSON) here.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = pagestack::DEFAULT_JPEG_QUALITY)]
    quality: u8,
}

/// Everything resolved from the input flags.
struct Resolved {
    paths: Vec<PathBuf>,
    settings: pagestack::PageSettings,
    job: Option<pagestack::JobDescription>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_input(args: &InputArgs) -> anyhow::Result<Resolved> {
    let job = args
        .job
        .as_deref()
        .map(pagestack::JobDescription::from_path)
        .transpose()?;

    let mut settings = pagestack::PageSettings::default();
    if let Some(job) = &job {
        settings = job.effective_settings(&settings)?;
    }

    let flags = pagestack::LayoutOverrides {
        canvas_width: args.width,
        top_margin: args.top,
        gap: args.gap,
        bottom_margin: args.bottom,
        background: None,
    };
    let footer_flags = pagestack::FooterOverrides {
        enabled: args.no_footer.then_some(false),
        ..pagestack::FooterOverrides::default()
    };
    settings = settings.with_overrides(&flags, &footer_flags)?;

    let job_root = args
        .job
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(args.in_dir.as_path());
    let listed = match &job {
        Some(job) => job.image_paths(job_root)?,
        None => None,
    };
    let paths = match listed {
        Some(paths) => paths,
        None => pagestack::collect_images(&args.in_dir)?,
    };
    if paths.is_empty() {
        anyhow::bail!("no images found in '{}'", args.in_dir.display());
    }
    tracing::info!(images = paths.len(), "resolved inputs");

    Ok(Resolved {
        paths,
        settings,
        job,
    })
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let input = resolve_input(&args.input)?;
    let plan = pagestack::plan_paths(
        &pagestack::HeaderProbe,
        &input.paths,
        &input.settings.layout,
    )?;
    let json = serde_json::to_string_pretty(&plan).context("serialize layout")?;
    println!("{json}");
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let input = resolve_input(&args.input)?;

    let out = match args.out {
        Some(out) => out,
        None => {
            let stem = output_stem(input.job.as_ref(), &input.paths);
            pagestack::default_output_path(&args.input.in_dir, &stem)
        }
    };
    pagestack::check_output_path(&out, &input.paths)?;
    if let Some(manifest_path) = &args.manifest {
        pagestack::check_output_path(manifest_path, &input.paths)?;
    }

    let mut sink = pagestack::RasterSink::new(input.settings.background);
    let page = pagestack::compose_paths(&input.paths, &input.settings.layout, &mut sink)?;

    pagestack::save_page(&page.output, &out, args.quality)?;
    eprintln!("wrote {}", out.display());

    if let Some(manifest_path) = args.manifest {
        let created = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs());
        let manifest_dir = manifest_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        pagestack::JobManifest::from_plan(&page.plan, &page.names, &input.settings, created)?
            .with_product_name(input.job.and_then(|j| j.product_name))
            .with_source_paths(&input.paths, manifest_dir)?
            .write(&manifest_path)?;
        eprintln!("wrote {}", manifest_path.display());
    }
    Ok(())
}

fn output_stem(job: Option<&pagestack::JobDescription>, paths: &[PathBuf]) -> String {
    if let Some(stem) = job.and_then(pagestack::JobDescription::output_stem) {
        return stem;
    }
    paths
        .first()
        .and_then(|p| p.file_stem())
        .map(|s| pagestack::safe_name(&s.to_string_lossy()))
        .unwrap_or_else(|| pagestack::DEFAULT_OUTPUT_STEM.to_string())
}
