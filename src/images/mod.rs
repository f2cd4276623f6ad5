//! # Images for rendering
//!
//! Layouts never carry image URLs; the model only says how many images each
//! block wants. This module counts those slots, fetches images from a
//! pluggable [`ImageSource`], and hands a renderer one [`RenderPayload`].

pub mod placeholder;
pub mod search;

pub use placeholder::PlaceholderImages;
pub use search::SerperImageSearch;

use crate::generation::{Generation, LayoutSource};
use crate::layout::{Block, Design, LayoutDescription};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    Search,
    Placeholder,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub origin: ImageOrigin,
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Up to `count` images for `query`; fewer is not an error.
    async fn fetch(&self, query: &str, count: usize) -> anyhow::Result<Vec<ImageRef>>;

    fn name(&self) -> &'static str;
}

/// Image slots a single block renders.
pub fn images_for_block(block: &Block) -> usize {
    match block {
        Block::Hero(_) | Block::Location(_) => 1,
        Block::Gallery(gallery) => gallery.image_count as usize,
        Block::Timeline(timeline) => timeline.events.len(),
        _ => 0,
    }
}

pub fn images_required(layout: &LayoutDescription) -> usize {
    layout.blocks.iter().map(images_for_block).sum()
}

/// A block together with the images assigned to it, in layout order.
#[derive(Serialize, Debug, Clone)]
pub struct RenderedBlock {
    #[serde(flatten)]
    pub block: Block,
    pub images: Vec<ImageRef>,
}

/// Everything a renderer needs for one query.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub generation_id: Uuid,
    pub query: String,
    pub design: Design,
    pub blocks: Vec<RenderedBlock>,
    pub degraded: bool,
}

impl RenderPayload {
    /// Fetches images for `generation` and distributes them over its blocks.
    ///
    /// A failing or short source is topped up with placeholders so every slot
    /// is filled.
    #[instrument(skip_all, fields(generation_id = %generation.id, source = source.name()))]
    pub async fn assemble(generation: &Generation, source: &dyn ImageSource) -> Self {
        let needed = images_required(&generation.layout);
        let mut images = if needed == 0 {
            Vec::new()
        } else {
            match source.fetch(&generation.query, needed).await {
                Ok(images) => images,
                Err(e) => {
                    warn!(error = %e, "Image source failed; using placeholders");
                    Vec::new()
                }
            }
        };
        images.truncate(needed);

        if images.len() < needed {
            let missing = needed - images.len();
            let filler = PlaceholderImages::default().generate(&generation.query, images.len(), missing);
            images.extend(filler);
        }

        let mut remaining = images.into_iter();
        let blocks = generation
            .layout
            .blocks
            .iter()
            .map(|block| RenderedBlock {
                block: block.clone(),
                images: remaining.by_ref().take(images_for_block(block)).collect(),
            })
            .collect();

        Self {
            generation_id: generation.id,
            query: generation.query.clone(),
            design: generation.layout.design.clone(),
            blocks,
            degraded: matches!(generation.source, LayoutSource::Fallback { .. }),
        }
    }
}
