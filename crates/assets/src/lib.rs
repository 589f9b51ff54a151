//! Texture assets: background loading, content-addressed handles.
//!
//! Loads run on worker threads and are collected by [`TileTextures::poll`],
//! which the frame loop calls once per frame. The renderer only ever sees an
//! [`AssetState`]; it never waits for a load to finish.
//!
//! # Invariants
//! - A slot moves `Pending -> Ready | Failed` exactly once per request.
//! - Only the latest request for a slot can settle it; older loads are dropped.
//! - Handles are identified by a hash of the file contents, not by path.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tileworld_kernel::TileKind;

/// Content-addressed texture id: the first 8 bytes of the SHA-256 of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        AssetId(u64::from_le_bytes(head))
    }
}

/// Encoded image data ready to hand to a drawing backend.
#[derive(Clone)]
pub struct TextureHandle {
    pub id: AssetId,
    pub name: String,
    pub format: ImageFormat,
    pub bytes: Arc<[u8]>,
}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

/// Image container formats recognized by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else {
            None
        }
    }
}

/// Errors from loading a texture file.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unrecognized image format: {0}")]
    UnknownFormat(PathBuf),
}

/// Load state of one asset.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetState<T> {
    Pending,
    Ready(T),
    /// Load failed, or nothing was ever requested. Carries the reason.
    Failed(String),
}

impl<T> AssetState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            AssetState::Ready(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetState::Pending)
    }
}

/// Read and identify a texture file. Blocking; runs on a loader thread.
pub fn load_texture(name: &str, path: &Path) -> Result<TextureHandle, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format =
        ImageFormat::sniff(&bytes).ok_or_else(|| AssetError::UnknownFormat(path.to_path_buf()))?;
    Ok(TextureHandle {
        id: AssetId::of(&bytes),
        name: name.to_string(),
        format,
        bytes: bytes.into(),
    })
}

/// A finished load, stamped with the slot generation it was requested under.
struct Completion {
    kind: TileKind,
    generation: u64,
    result: Result<TextureHandle, AssetError>,
}

/// Texture slots for the tile kinds that can be textured, plus the loader
/// that fills them.
///
/// Grass, water and cave take textures; walls always use their color. The
/// open-water border drawn outside the world reuses the water texture.
pub struct TileTextures {
    grass: AssetState<TextureHandle>,
    water: AssetState<TextureHandle>,
    cave: AssetState<TextureHandle>,
    /// Request counter per slot: grass, water, cave.
    generations: [u64; 3],
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for TileTextures {
    fn default() -> Self {
        Self::new()
    }
}

impl TileTextures {
    /// All slots failed with "not requested": everything renders as color.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let unset = || AssetState::Failed("not requested".into());
        Self {
            grass: unset(),
            water: unset(),
            cave: unset(),
            generations: [0; 3],
            tx,
            rx,
        }
    }

    fn slot_mut(&mut self, kind: TileKind) -> Option<&mut AssetState<TextureHandle>> {
        match kind {
            TileKind::Grass => Some(&mut self.grass),
            TileKind::Water => Some(&mut self.water),
            TileKind::Cave => Some(&mut self.cave),
            TileKind::Wall => None,
        }
    }

    fn generation_mut(&mut self, kind: TileKind) -> Option<&mut u64> {
        let index = match kind {
            TileKind::Grass => 0,
            TileKind::Water => 1,
            TileKind::Cave => 2,
            TileKind::Wall => return None,
        };
        Some(&mut self.generations[index])
    }

    /// Start loading a texture for `kind` in the background. Returns `false`
    /// for kinds that never take a texture.
    ///
    /// A new request supersedes any load still in flight for the same slot.
    pub fn request(&mut self, kind: TileKind, path: impl Into<PathBuf>) -> bool {
        let Some(counter) = self.generation_mut(kind) else {
            return false;
        };
        *counter += 1;
        let generation = *counter;
        if let Some(slot) = self.slot_mut(kind) {
            *slot = AssetState::Pending;
        }

        let path = path.into();
        let tx = self.tx.clone();
        tracing::debug!(%kind, generation, path = %path.display(), "texture requested");
        std::thread::spawn(move || {
            let result = load_texture(kind.as_str(), &path);
            // The receiver is gone only if the textures were dropped.
            let _ = tx.send(Completion {
                kind,
                generation,
                result,
            });
        });
        true
    }

    /// Collect finished loads. Never blocks. Returns how many slots settled.
    pub fn poll(&mut self) -> usize {
        let mut settled = 0;
        while let Ok(Completion {
            kind,
            generation,
            result,
        }) = self.rx.try_recv()
        {
            let current = self.generation_mut(kind).map(|g| *g);
            if current != Some(generation) {
                tracing::debug!(%kind, generation, "superseded texture load dropped");
                continue;
            }
            let Some(slot) = self.slot_mut(kind) else {
                continue;
            };
            *slot = match result {
                Ok(handle) => {
                    tracing::info!(%kind, id = handle.id.0, "texture loaded");
                    AssetState::Ready(handle)
                }
                Err(e) => {
                    tracing::error!(%kind, error = %e, "failed to load texture");
                    AssetState::Failed(e.to_string())
                }
            };
            settled += 1;
        }
        settled
    }

    pub fn state(&self, kind: TileKind) -> Option<&AssetState<TextureHandle>> {
        match kind {
            TileKind::Grass => Some(&self.grass),
            TileKind::Water => Some(&self.water),
            TileKind::Cave => Some(&self.cave),
            TileKind::Wall => None,
        }
    }

    /// Texture to draw for a tile kind, if one is ready.
    pub fn texture_for(&self, kind: TileKind) -> Option<&TextureHandle> {
        self.state(kind).and_then(AssetState::ready)
    }

    /// Texture for the open water drawn beyond the world edge.
    pub fn open_water(&self) -> Option<&TextureHandle> {
        self.water.ready()
    }

    pub fn pending_count(&self) -> usize {
        [&self.grass, &self.water, &self.cave]
            .iter()
            .filter(|s| s.is_pending())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{Duration, Instant};

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    fn settle(textures: &mut TileTextures) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while textures.pending_count() > 0 && Instant::now() < deadline {
            textures.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn sniff_formats() {
        assert_eq!(ImageFormat::sniff(PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xff, 0xd8, 0xff, 0xe0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"BM...."), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
    }

    #[test]
    fn asset_id_is_content_addressed() {
        assert_eq!(AssetId::of(b"abc"), AssetId::of(b"abc"));
        assert_ne!(AssetId::of(b"abc"), AssetId::of(b"abd"));
    }

    #[test]
    fn untouched_slots_fall_back_to_color() {
        let t = TileTextures::new();
        for kind in TileKind::ALL {
            assert!(t.texture_for(kind).is_none());
        }
        assert!(t.open_water().is_none());
        assert_eq!(t.pending_count(), 0);
    }

    #[test]
    fn walls_take_no_texture() {
        let mut t = TileTextures::new();
        assert!(!t.request(TileKind::Wall, "wall.png"));
        assert!(t.state(TileKind::Wall).is_none());
    }

    #[test]
    fn request_is_pending_until_polled() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "ground.png", PNG_HEADER);

        let mut t = TileTextures::new();
        assert!(t.request(TileKind::Grass, &path));
        assert!(t.state(TileKind::Grass).unwrap().is_pending());
        assert!(t.texture_for(TileKind::Grass).is_none());

        settle(&mut t);
        let handle = t.texture_for(TileKind::Grass).unwrap();
        assert_eq!(handle.format, ImageFormat::Png);
        assert_eq!(handle.id, AssetId::of(PNG_HEADER));
        assert_eq!(handle.name, "grass");
    }

    #[test]
    fn water_texture_doubles_as_open_water() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "water.png", PNG_HEADER);

        let mut t = TileTextures::new();
        t.request(TileKind::Water, &path);
        settle(&mut t);
        assert_eq!(t.open_water(), t.texture_for(TileKind::Water));
        assert!(t.open_water().is_some());
    }

    #[test]
    fn missing_and_bad_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = write_file(dir.path(), "cave.png", b"not an image");

        let mut t = TileTextures::new();
        t.request(TileKind::Grass, dir.path().join("missing.png"));
        t.request(TileKind::Cave, &bogus);
        settle(&mut t);

        assert!(matches!(
            t.state(TileKind::Grass),
            Some(AssetState::Failed(_))
        ));
        match t.state(TileKind::Cave) {
            Some(AssetState::Failed(reason)) => assert!(reason.contains("unrecognized")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    fn settle_all(textures: &mut TileTextures) {
        settle(textures);
        // Superseded loads arrive too.
        std::thread::sleep(Duration::from_millis(50));
        textures.poll();
    }

    #[test]
    fn latest_request_wins_over_earlier_load() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "grass.png", PNG_HEADER);
        let missing = dir.path().join("missing.png");

        let mut t = TileTextures::new();
        t.request(TileKind::Grass, &good);
        t.request(TileKind::Grass, &missing);
        settle_all(&mut t);
        assert!(matches!(
            t.state(TileKind::Grass),
            Some(AssetState::Failed(_))
        ));

        t.request(TileKind::Grass, &missing);
        t.request(TileKind::Grass, &good);
        settle_all(&mut t);
        assert_eq!(
            t.texture_for(TileKind::Grass).map(|h| h.id),
            Some(AssetId::of(PNG_HEADER))
        );
    }

    #[test]
    fn superseded_load_is_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "cave.png", PNG_HEADER);

        let mut t = TileTextures::new();
        t.request(TileKind::Cave, &good);
        t.request(TileKind::Cave, &good);
        std::thread::sleep(Duration::from_millis(50));
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut settled = 0;
        while settled == 0 && Instant::now() < deadline {
            settled += t.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        std::thread::sleep(Duration::from_millis(50));
        settled += t.poll();
        assert_eq!(settled, 1);
        assert_eq!(t.pending_count(), 0);
    }
}
