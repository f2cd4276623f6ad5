use super::{ImageOrigin, ImageRef, ImageSource};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://picsum.photos/seed";

/// Deterministic stand-in images: the same query always yields the same URLs.
#[derive(Debug, Clone)]
pub struct PlaceholderImages {
    base_url: String,
    width: u32,
    height: u32,
}

impl Default for PlaceholderImages {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// FNV-1a; stable across builds, unlike the std hasher.
fn seed_for(query: &str) -> u64 {
    query
        .trim()
        .to_lowercase()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

impl PlaceholderImages {
    pub fn new(base_url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            base_url: base_url.into(),
            width,
            height,
        }
    }

    /// Images `offset..offset + count` of the sequence for `query`.
    pub fn generate(&self, query: &str, offset: usize, count: usize) -> Vec<ImageRef> {
        let seed = seed_for(query);
        (offset..offset + count)
            .map(|index| ImageRef {
                url: format!(
                    "{}/{:016x}-{}/{}/{}",
                    self.base_url.trim_end_matches('/'),
                    seed,
                    index,
                    self.width,
                    self.height
                ),
                thumbnail_url: None,
                title: None,
                origin: ImageOrigin::Placeholder,
            })
            .collect()
    }
}

#[async_trait]
impl ImageSource for PlaceholderImages {
    async fn fetch(&self, query: &str, count: usize) -> anyhow::Result<Vec<ImageRef>> {
        Ok(self.generate(query, 0, count))
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}
