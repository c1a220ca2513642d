//! Uploaded images shown next to their predictions.
//!
//! Bytes come from the server's static route on short-lived worker threads;
//! decoding happens there too, the UI thread only creates textures.

use eframe::egui;
use predictor_core::PredictionService;
use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

const MAX_IMAGES: usize = 256;

/// What a card can show for its image right now.
#[derive(Debug, Clone, Copy)]
pub(super) enum ImageSlot {
    Loading,
    Ready(egui::TextureId, egui::Vec2),
    Unavailable,
}

enum Entry {
    Pending,
    Ready(egui::TextureHandle),
    Failed,
}

type Fetched = (String, Result<egui::ColorImage, String>);

pub(super) struct RemoteImages {
    service: Arc<dyn PredictionService>,
    entries: FrameLru<String, Entry>,
    tx: Sender<Fetched>,
    rx: Receiver<Fetched>,
}

impl RemoteImages {
    pub(super) fn new(service: Arc<dyn PredictionService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            service,
            entries: FrameLru::new(MAX_IMAGES),
            tx,
            rx,
        }
    }

    /// Look up the image for `url`, starting a download the first time.
    pub(super) fn slot(&mut self, ctx: &egui::Context, path: &str, url: &str) -> ImageSlot {
        match self.entries.get(url) {
            Some(Entry::Pending) => return ImageSlot::Loading,
            Some(Entry::Ready(tex)) => return ImageSlot::Ready(tex.id(), tex.size_vec2()),
            Some(Entry::Failed) => return ImageSlot::Unavailable,
            None => {}
        }

        self.entries.insert(url.to_string(), Entry::Pending);
        let service = self.service.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        let path = path.to_string();
        let key = url.to_string();
        let spawned = std::thread::Builder::new()
            .name("fetch-image".into())
            .spawn(move || {
                let decoded = service
                    .fetch_image(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| decode(&bytes));
                let _ = tx.send((key, decoded));
                ctx.request_repaint();
            });
        if let Err(e) = spawned {
            tracing::warn!("Could not start image download for {url}: {e}");
            self.entries.insert(url.to_string(), Entry::Failed);
            return ImageSlot::Unavailable;
        }
        ImageSlot::Loading
    }

    /// Turn finished downloads into textures.
    pub(super) fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((url, fetched)) = self.rx.try_recv() {
            let entry = match fetched {
                Ok(color) => {
                    let name = format!("upload:{url}");
                    Entry::Ready(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
                }
                Err(e) => {
                    tracing::warn!("Failed to load uploaded image {url}: {e}");
                    Entry::Failed
                }
            };
            self.entries.insert(url, entry);
        }
    }

    /// Call once per frame after all cards have asked for their image.
    pub(super) fn end_frame(&mut self) {
        self.entries.end_frame();
    }
}

fn decode(bytes: &[u8]) -> Result<egui::ColorImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Map that forgets its least recently used keys once it holds more than
/// `capacity`. Keys used during the current frame are never dropped, so every
/// card on screen keeps its entry however many there are.
struct FrameLru<K, V> {
    capacity: usize,
    frame: u64,
    values: HashMap<K, (V, u64)>,
    // Least recently used first.
    order: VecDeque<K>,
}

impl<K: Clone + Eq + Hash, V> FrameLru<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            frame: 0,
            values: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let frame = self.frame;
        let (_, used) = self.values.get_mut(key)?;
        *used = frame;
        self.touch(key);
        self.values.get(key).map(|(value, _)| value)
    }

    fn insert(&mut self, key: K, value: V) {
        if self
            .values
            .insert(key.clone(), (value, self.frame))
            .is_some()
        {
            self.touch(&key);
        } else {
            self.order.push_back(key);
        }
    }

    /// Drop entries unused this frame until back within capacity.
    fn end_frame(&mut self) {
        let frame = self.frame;
        while self.values.len() > self.capacity {
            let Some(oldest) = self.order.front() else {
                break;
            };
            if self
                .values
                .get(oldest)
                .is_some_and(|(_, used)| *used == frame)
            {
                break;
            }
            if let Some(old) = self.order.pop_front() {
                self.values.remove(&old);
            }
        }
        self.frame += 1;
    }

    fn touch<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if let Some(pos) = self.order.iter().position(|k| k.borrow() == key)
            && let Some(k) = self.order.remove(pos)
        {
            self.order.push_back(k);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.values.len()
    }
}
