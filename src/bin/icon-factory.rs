//! Command-line front end: renders one icon file into a finished PNG.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use icon_factory::{
    FactoryConfig, IconFactory, OverlayBadger, OwnedIcon, RasterIcon, RenderFlags, SvgIcon,
    UserHandle,
};
use palette::{Srgb, WithAlpha};

/// Briefcase badge marking icons rendered for another user.
const WORK_BADGE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48"><circle cx="24" cy="24" r="22" fill="#ffffff"/><circle cx="24" cy="24" r="20" fill="#1565c0"/><path d="M19 15h10v4h6v15H13V19h6zm3 0v4h4v-4z" fill="#ffffff" fill-rule="evenodd"/></svg>"##;

#[derive(Parser)]
#[command(name = "icon-factory")]
#[command(about = "Render an app icon into a normalized, shadowed and badged PNG")]
struct Cli {
    /// Input icon (.svg, or any raster format the image crate decodes)
    input: PathBuf,

    /// Output PNG file
    output: PathBuf,

    /// JSON factory configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output size in pixels, overriding the configuration
    #[arg(long)]
    size: Option<u32>,

    /// Wrap non-adaptive icons into the adaptive mask
    #[arg(long)]
    shrink: bool,

    /// Draw the instant-app badge
    #[arg(long)]
    instant_app: bool,

    /// Render for this user; users other than the configured one get a badge
    #[arg(long)]
    user: Option<u32>,

    /// Wrapper background as #rrggbb
    #[arg(long)]
    background: Option<String>,

    /// Skip dominant color extraction
    #[arg(long)]
    no_color: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            FactoryConfig::from_json(&json).map_err(|e| e.to_string())?
        }
        None => FactoryConfig::default(),
    };
    if let Some(size) = cli.size {
        config.icon_bitmap_size = size;
        config.badge_size = config.badge_size.min(size);
    }

    let work_badge = SvgIcon::from_svg(WORK_BADGE_SVG).map_err(|e| e.to_string())?;
    let badge_size = config.badge_size;
    let mut factory = IconFactory::new(config)
        .map_err(|e| e.to_string())?
        .with_user_badger(OverlayBadger::new(work_badge, badge_size));

    if let Some(hex) = &cli.background {
        let rgb: Srgb<u8> = hex
            .parse()
            .map_err(|e| format!("Invalid background {hex:?}: {e}"))?;
        factory.set_wrapper_background_color(rgb.with_alpha(u8::MAX));
    }
    if cli.no_color {
        factory.disable_color_extraction();
    }

    let icon = load_icon(&cli.input)?;
    let mut flags = RenderFlags::new()
        .shrink_non_adaptive(cli.shrink)
        .instant_app(cli.instant_app);
    if let Some(user) = cli.user {
        flags = flags.for_user(UserHandle(user));
    }

    let info = factory.render_badged_icon(&icon.as_source(), &flags);
    info.save_png(&cli.output).map_err(|e| e.to_string())?;

    log::info!("wrote {}", cli.output.display());
    if let Some(color) = info.color() {
        println!("{}", color.to_hex());
    }
    Ok(())
}

fn load_icon(path: &Path) -> Result<OwnedIcon, String> {
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let icon = if is_svg {
        SvgIcon::open(path).map(OwnedIcon::from)
    } else {
        RasterIcon::open(path).map(OwnedIcon::from)
    };
    icon.map_err(|e| format!("Failed to load {}: {e}", path.display()))
}
