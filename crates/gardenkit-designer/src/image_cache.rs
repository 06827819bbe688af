//! Asynchronous image cache.
//!
//! Drawing is synchronous, image loading is not. [`ImageCache::get_or_load`]
//! answers immediately with whatever is available and, on a miss, starts a
//! load on the tokio blocking pool. Finished loads are collected by
//! [`ImageCache::poll_completed`]; the editor then repaints the layers that
//! use images. Without a tokio runtime, loads run inline.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use gardenkit_core::ImageError;
use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// State of a cached image.
#[derive(Debug, Clone)]
pub enum ImageHandle {
    /// Decoded and ready to draw.
    Ready(Arc<Pixmap>),
    /// Still loading.
    Pending,
    /// Loading failed; not retried.
    Failed(ImageError),
}

impl ImageHandle {
    /// The pixmap, when ready.
    pub fn ready(&self) -> Option<&Arc<Pixmap>> {
        match self {
            ImageHandle::Ready(pixmap) => Some(pixmap),
            _ => None,
        }
    }
}

/// Produces decoded images by key.
pub trait ImageSource: Send + Sync {
    /// Loads and decodes one image. Called off the drawing thread.
    fn load(&self, key: &str) -> Result<RgbaImage, ImageError>;
}

/// Loads images from files, keys being paths relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    root: Option<PathBuf>,
}

impl FileImageSource {
    /// Resolves keys as paths as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves keys relative to `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl ImageSource for FileImageSource {
    fn load(&self, key: &str) -> Result<RgbaImage, ImageError> {
        let path = match &self.root {
            Some(root) => root.join(key),
            None => PathBuf::from(key),
        };
        let decoded = image::open(&path).map_err(|e| match e {
            image::ImageError::IoError(io) => ImageError::Read {
                key: key.to_string(),
                reason: io.to_string(),
            },
            other => ImageError::Decode {
                key: key.to_string(),
                reason: other.to_string(),
            },
        })?;
        Ok(decoded.to_rgba8())
    }
}

/// Converts straight RGBA into a premultiplied pixmap.
pub fn rgba_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

fn decode(source: &dyn ImageSource, key: &str) -> Result<Pixmap, ImageError> {
    let rgba = source.load(key)?;
    rgba_to_pixmap(&rgba).ok_or_else(|| ImageError::Decode {
        key: key.to_string(),
        reason: format!("empty image {}x{}", rgba.width(), rgba.height()),
    })
}

type Completed = (String, Result<Pixmap, ImageError>);

/// Cache of decoded images keyed by string.
pub struct ImageCache {
    source: Arc<dyn ImageSource>,
    runtime: Option<Handle>,
    entries: HashMap<String, ImageHandle>,
    sender: mpsc::UnboundedSender<Completed>,
    receiver: mpsc::UnboundedReceiver<Completed>,
}

impl ImageCache {
    /// Creates a cache loading on the current tokio runtime, if any.
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self::with_runtime(source, Handle::try_current().ok())
    }

    /// Creates a cache loading on `runtime`, or inline when `None`.
    pub fn with_runtime(source: Arc<dyn ImageSource>, runtime: Option<Handle>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            entries: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Returns the cached state of `key`, starting a load on a miss.
    pub fn get_or_load(&mut self, key: &str) -> ImageHandle {
        if let Some(handle) = self.entries.get(key) {
            return handle.clone();
        }

        let Some(runtime) = &self.runtime else {
            let handle = match decode(self.source.as_ref(), key) {
                Ok(pixmap) => ImageHandle::Ready(Arc::new(pixmap)),
                Err(e) => {
                    tracing::warn!("{}", e);
                    ImageHandle::Failed(e)
                }
            };
            self.entries.insert(key.to_string(), handle.clone());
            return handle;
        };

        tracing::debug!("Loading image {}", key);
        self.entries.insert(key.to_string(), ImageHandle::Pending);
        let source = self.source.clone();
        let sender = self.sender.clone();
        let key = key.to_string();
        runtime.spawn_blocking(move || {
            let result = decode(source.as_ref(), &key);
            // The cache may be gone by now; nothing to deliver to then.
            let _ = sender.send((key, result));
        });
        ImageHandle::Pending
    }

    /// Cached state of `key` without starting a load.
    pub fn peek(&self, key: &str) -> Option<&ImageHandle> {
        self.entries.get(key)
    }

    /// Stores finished loads. Returns the keys whose state changed.
    pub fn poll_completed(&mut self) -> Vec<String> {
        let mut finished = Vec::new();
        while let Ok((key, result)) = self.receiver.try_recv() {
            let handle = match result {
                Ok(pixmap) => ImageHandle::Ready(Arc::new(pixmap)),
                Err(e) => {
                    tracing::warn!("{}", e);
                    ImageHandle::Failed(e)
                }
            };
            self.entries.insert(key.clone(), handle);
            finished.push(key);
        }
        finished
    }

    /// Number of loads still running.
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|handle| matches!(handle, ImageHandle::Pending))
            .count()
    }

    /// Forgets every image.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .field("pending", &self.pending())
            .field("async", &self.runtime.is_some())
            .finish()
    }
}
