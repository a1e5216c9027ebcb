use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rfcanvas::{
    draw_image_at, draw_noise_region, Canvas, CanvasConfig, HtmlImage, ImageLoader, NoiseMode,
    Surface,
};

#[derive(Parser)]
#[command(name = "rfcanvas", version, about = "Draw images and noise onto a headless canvas")]
struct Cli {
    /// JSON file with canvas and loader defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a canvas with random noise and write it as PNG
    Noise {
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Independent red/green/blue instead of gray
        #[arg(long)]
        color: bool,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Load an image, draw it onto a canvas and write it as PNG
    Draw {
        /// URL, data URL, or file path
        src: String,
        /// Canvas width (defaults to the image width)
        #[arg(long)]
        width: Option<u32>,
        /// Canvas height (defaults to the image height)
        #[arg(long)]
        height: Option<u32>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        y: i32,
        /// Fill the canvas with noise before drawing
        #[arg(long)]
        noise_first: bool,
        #[arg(long, requires = "noise_first")]
        color: bool,
        /// Load timeout in milliseconds (0 waits forever)
        #[arg(long)]
        timeout_ms: Option<u64>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn fill_noise_on(canvas: &mut Canvas, color: bool, seed: Option<u64>) -> rfcanvas::Result<()> {
    let extent = canvas.extent();
    let mode = NoiseMode::from(color);
    match seed {
        Some(seed) => draw_noise_region(canvas, extent, mode, &mut StdRng::seed_from_u64(seed)),
        None => rfcanvas::draw_noise_to_canvas(canvas, color),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CanvasConfig::from_json_file(path)?,
        None => CanvasConfig::default(),
    };

    match cli.command {
        Commands::Noise {
            width,
            height,
            color,
            seed,
            output,
        } => {
            config.width = width.unwrap_or(config.width);
            config.height = height.unwrap_or(config.height);
            let mut canvas = Canvas::with_config(&config)?;
            fill_noise_on(&mut canvas, color, seed)?;
            canvas
                .save_png(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{}", canvas.image_data().digest());
        }
        Commands::Draw {
            src,
            width,
            height,
            x,
            y,
            noise_first,
            color,
            timeout_ms,
            output,
        } => {
            if let Some(ms) = timeout_ms {
                config.loader.timeout_ms = ms;
            }
            let loader = ImageLoader::new(config.loader.clone())?;

            let canvas = match (width, height) {
                (Some(w), Some(h)) => {
                    config.width = w;
                    config.height = h;
                    let mut canvas = Canvas::with_config(&config)?;
                    if noise_first {
                        fill_noise_on(&mut canvas, color, None)?;
                    }
                    draw_image_at(&mut canvas, &src, x, y, &loader)
                        .await
                        .with_context(|| format!("loading {}", src))?;
                    canvas
                }
                (w, h) => {
                    // A missing dimension comes from the image itself
                    let mut image = HtmlImage::with_src(&src);
                    let bitmap = image
                        .load(&loader)
                        .await
                        .with_context(|| format!("loading {}", src))?;
                    config.width = w.unwrap_or(bitmap.width());
                    config.height = h.unwrap_or(bitmap.height());
                    let mut canvas = Canvas::with_config(&config)?;
                    if noise_first {
                        fill_noise_on(&mut canvas, color, None)?;
                    }
                    canvas.draw_image(bitmap, x, y)?;
                    canvas
                }
            };

            canvas
                .save_png(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {}x{} canvas to {}", canvas.width(), canvas.height(), output.display());
            println!("{}", canvas.image_data().digest());
        }
    }

    Ok(())
}
