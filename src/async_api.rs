use crate::bitmap::Bitmap;
use crate::loader::{HtmlImage, ImageLoader};
use crate::noise::{draw_noise_region, NoiseMode};
use crate::surface::{Canvas, ImageData, Surface};
use crate::{CanvasConfig, Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

enum Command {
    DrawBitmap(Bitmap, i32, i32, oneshot::Sender<Result<()>>),
    Noise(NoiseMode, Option<u64>, oneshot::Sender<Result<()>>),
    Snapshot(oneshot::Sender<Result<ImageData>>),
    Png(Option<String>, oneshot::Sender<Result<Vec<u8>>>),
    Size(oneshot::Sender<Result<(u32, u32)>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly canvas owned by a dedicated worker thread.
///
/// The worker plays the role of a browser's UI thread: it owns the `Canvas`
/// and runs every paint synchronously, one command at a time. Image loads
/// run on the calling task; only the decoded bitmap crosses to the worker.
#[derive(Clone)]
pub struct CanvasWorker {
    cmd_tx: Sender<Command>,
    loader: Arc<ImageLoader>,
}

impl CanvasWorker {
    /// Create a canvas worker (spawns a background thread that owns the canvas).
    pub async fn new(config: Option<CanvasConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        let loader = Arc::new(ImageLoader::new(config.loader.clone())?);

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let mut canvas = match Canvas::with_config(&config) {
                Ok(c) => c,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::DrawBitmap(bitmap, x, y, resp) => {
                        let res = canvas.draw_image(&bitmap, x, y);
                        let _ = resp.send(res);
                    }
                    Command::Noise(mode, seed, resp) => {
                        let extent = canvas.extent();
                        let res = match seed {
                            Some(seed) => {
                                let mut rng = StdRng::seed_from_u64(seed);
                                draw_noise_region(&mut canvas, extent, mode, &mut rng)
                            }
                            None => {
                                let mut rng = rand::thread_rng();
                                draw_noise_region(&mut canvas, extent, mode, &mut rng)
                            }
                        };
                        let _ = resp.send(res);
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(Ok(canvas.image_data().clone()));
                    }
                    Command::Png(path_opt, resp) => {
                        let res = canvas.to_png();
                        // If a path is provided, also write to disk
                        let res = match (res, path_opt) {
                            (Ok(data), Some(path)) => std::fs::write(&path, &data)
                                .map(|_| data)
                                .map_err(|e| Error::RenderError(format!("{}: {}", path, e))),
                            (res, _) => res,
                        };
                        let _ = resp.send(res);
                    }
                    Command::Size(resp) => {
                        let _ = resp.send(Ok((canvas.width(), canvas.height())));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report initialization success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx, loader })
    }

    async fn request<T>(
        &self,
        what: &str,
        make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(make(tx));
        rx.await
            .map_err(|e| Error::Other(format!("{} canceled: {}", what, e)))?
    }

    /// Load `src` and paint it at the canvas origin.
    pub async fn draw_image(&self, src: &str) -> Result<()> {
        self.draw_image_at(src, 0, 0).await
    }

    /// Load `src` and paint it with its top-left corner at `(x, y)`.
    pub async fn draw_image_at(&self, src: &str, x: i32, y: i32) -> Result<()> {
        let mut image = HtmlImage::with_src(src);
        image.load(&self.loader).await?;
        let bitmap = image
            .into_bitmap()
            .ok_or_else(|| Error::Other(format!("image {} has no bitmap", src)))?;
        self.draw_bitmap(bitmap, x, y).await
    }

    /// Paint an already decoded bitmap.
    pub async fn draw_bitmap(&self, bitmap: Bitmap, x: i32, y: i32) -> Result<()> {
        self.request("DrawBitmap", |tx| Command::DrawBitmap(bitmap, x, y, tx)).await
    }

    /// Fill the canvas with noise from the thread-local RNG.
    pub async fn draw_noise(&self, color: bool) -> Result<()> {
        let mode = NoiseMode::from(color);
        self.request("Noise", |tx| Command::Noise(mode, None, tx)).await
    }

    /// Fill the canvas with reproducible noise.
    pub async fn draw_noise_seeded(&self, mode: NoiseMode, seed: u64) -> Result<()> {
        self.request("Noise", |tx| Command::Noise(mode, Some(seed), tx)).await
    }

    /// Copy of the current pixels
    pub async fn image_data(&self) -> Result<ImageData> {
        self.request("Snapshot", Command::Snapshot).await
    }

    /// Encode the canvas as PNG; if `path` is Some, the bytes are also saved there.
    pub async fn png(&self, path: Option<&str>) -> Result<Vec<u8>> {
        let path_opt = path.map(|s| s.to_string());
        self.request("Png", |tx| Command::Png(path_opt, tx)).await
    }

    pub async fn size(&self) -> Result<(u32, u32)> {
        self.request("Size", Command::Size).await
    }

    /// Shutdown the background worker.
    pub async fn close(self) -> Result<()> {
        self.request("Close", Command::Close).await
    }
}
