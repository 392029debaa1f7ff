//! # Covertone CLI
//!
//! Command-line interface for rendering halftone playlist covers.
//!
//! ## Usage
//!
//! ```bash
//! # Render a cover (writes my-mix-cover.jpg)
//! covertone render photo.jpg --title "My Mix" --color spotify-green
//!
//! # Rotated grid, neon title, PNG output
//! covertone render photo.jpg --title "Late Night" --rotation 45 --effect neon --png
//!
//! # Start from an options file, override one field
//! covertone render photo.jpg --options cover.json --invert
//!
//! # Run the HTTP preview service
//! covertone serve --listen 0.0.0.0:8080 --font-dir ./fonts
//!
//! # List fonts, effects and color presets
//! covertone list
//! ```

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use covertone::{
    CovertoneError, FontBook, FontFamily, OutputFormat, PRESETS, RenderOptions, TextEffect,
    color::parse_color_or_preset,
    render::{self, render_cover_as, suggested_filename},
    server::{self, ServerConfig},
};

/// Covertone - Halftone playlist cover renderer
#[derive(Parser, Debug)]
#[command(name = "covertone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a cover from a photo
    Render(RenderArgs),

    /// Run the HTTP preview service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: SocketAddr,

        /// Extra font directory (repeatable), searched before system fonts
        #[arg(long = "font-dir", value_name = "DIR")]
        font_dirs: Vec<PathBuf>,
    },

    /// List fonts, effects and color presets
    List {
        /// Extra font directory (repeatable)
        #[arg(long = "font-dir", value_name = "DIR")]
        font_dirs: Vec<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Source photo
    input: PathBuf,

    /// Output file (defaults to "{title}-cover.jpg")
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON options file; flags override its values
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    #[arg(short, long)]
    title: Option<String>,

    /// Accent color: hex (#1DB954) or preset name (spotify-green)
    #[arg(short, long)]
    color: Option<String>,

    #[arg(long)]
    contrast: Option<f32>,

    #[arg(long)]
    brightness: Option<f32>,

    /// Halftone cell size in pixels (minimum 4)
    #[arg(long)]
    dot_size: Option<f32>,

    #[arg(long)]
    black_point: Option<f32>,

    #[arg(long)]
    white_point: Option<f32>,

    /// Title font family
    #[arg(long)]
    font: Option<FontFamily>,

    /// Title size multiplier
    #[arg(long)]
    text_size: Option<f32>,

    /// Horizontal title anchor, 0..1
    #[arg(long)]
    text_x: Option<f32>,

    /// Vertical title anchor, 0..1
    #[arg(long)]
    text_y: Option<f32>,

    /// Grid rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    rotation: Option<i32>,

    /// Title effect id (see `covertone list`)
    #[arg(long)]
    effect: Option<String>,

    /// Swap paper and ink colors
    #[arg(long)]
    invert: bool,

    /// Upper-case the title
    #[arg(long)]
    all_caps: bool,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Write PNG instead of JPEG
    #[arg(long)]
    png: bool,

    /// Extra font directory (repeatable), searched before system fonts
    #[arg(long = "font-dir", value_name = "DIR")]
    font_dirs: Vec<PathBuf>,
}

impl RenderArgs {
    /// Options file (or defaults) with flags applied on top.
    fn render_options(&self) -> Result<RenderOptions, CovertoneError> {
        let mut opts = match &self.options {
            Some(path) => RenderOptions::from_json(&std::fs::read_to_string(path)?)?,
            None => RenderOptions::default(),
        };

        if let Some(title) = &self.title {
            opts.title = title.clone();
        }
        if let Some(color) = &self.color {
            opts.color = parse_color_or_preset(color)?;
        }
        if let Some(effect) = &self.effect {
            opts.text_effect = TextEffect::from_id(effect);
        }
        if let Some(font) = self.font {
            opts.font = font;
        }
        if let Some(v) = self.contrast {
            opts.contrast = v;
        }
        if let Some(v) = self.brightness {
            opts.brightness = v;
        }
        if let Some(v) = self.dot_size {
            opts.dot_size = v;
        }
        if let Some(v) = self.black_point {
            opts.black_point = v;
        }
        if let Some(v) = self.white_point {
            opts.white_point = v;
        }
        if let Some(v) = self.text_size {
            opts.text_size = v;
        }
        if let Some(v) = self.text_x {
            opts.text_x = v;
        }
        if let Some(v) = self.text_y {
            opts.text_y = v;
        }
        if let Some(v) = self.rotation {
            opts.rotation = v;
        }
        if let Some(v) = self.width {
            opts.width = v;
        }
        if let Some(v) = self.height {
            opts.height = v;
        }
        opts.invert |= self.invert;
        opts.all_caps |= self.all_caps;

        Ok(opts.prepared())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("covertone=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CovertoneError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => render_file(args),
        Commands::Serve { listen, font_dirs } => {
            let config = ServerConfig {
                listen_addr: listen,
                font_dirs,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))
        }
        Commands::List { font_dirs } => {
            list(&FontBook::discover(&font_dirs));
            Ok(())
        }
    }
}

fn render_file(args: RenderArgs) -> Result<(), CovertoneError> {
    let opts = args.render_options()?;
    let source = render::decode_source(&std::fs::read(&args.input)?)?;
    let fonts = FontBook::discover(&args.font_dirs);
    let format = if args.png { OutputFormat::Png } else { OutputFormat::default() };

    let cover = render_cover_as(&source, &opts, &fonts, format)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(suggested_filename(&opts.title, format)));
    std::fs::write(&output, &cover.bytes)?;

    println!(
        "Wrote {} ({}x{}, {} bytes)",
        output.display(),
        cover.width,
        cover.height,
        cover.bytes.len()
    );
    Ok(())
}

fn list(fonts: &FontBook) {
    let installed = fonts.families();

    println!("Fonts:");
    for family in FontFamily::ALL {
        let key = family.name().to_ascii_lowercase();
        let status = if installed.contains(&key) { "" } else { "  (not installed, falls back)" };
        println!("  {}{}", family, status);
    }

    println!();
    println!("Effects:");
    for effect in TextEffect::ALL {
        println!("  {:<10} {}", effect.id(), effect.label());
    }

    println!();
    println!("Color presets:");
    for preset in PRESETS {
        println!("  {:<15} {}  {}", preset.name, preset.color, preset.label);
    }
}
