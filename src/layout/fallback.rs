//! Canned layout returned when generation runs out of attempts.

use super::blocks::*;
use super::{Design, LayoutDescription, Understanding};
use crate::config::LayoutPolicy;

const DEFAULT_TITLE: &str = "Image results";

/// A minimal layout that satisfies any valid [`LayoutPolicy`].
///
/// Normally a single hero block. When the policy demands more blocks, galleries
/// and text blocks are appended until `min_blocks` is met.
pub fn fallback_layout(query: &str, policy: &LayoutPolicy) -> LayoutDescription {
    let title = match query.trim() {
        "" => DEFAULT_TITLE.to_string(),
        trimmed => trimmed.to_string(),
    };

    let mut blocks = vec![Block::hero(
        title.clone(),
        Some("Showing image results".to_string()),
    )];

    let target = policy.min_blocks.max(1);
    while blocks.len() < target {
        let filler = if blocks.len() % 2 == 1 {
            Block::Gallery(GalleryBlock {
                title: None,
                style: GalleryStyle::Grid,
                columns: 3,
                image_count: 6,
                labels: Vec::new(),
            })
        } else {
            Block::Text(TextBlock {
                title: None,
                content: format!("More results for {}", title),
                style: TextStyle::Plain,
            })
        };
        blocks.push(filler);
    }

    LayoutDescription {
        understanding: Understanding {
            intent: format!("Show image results for \"{}\"", title),
            approach: "Default layout with a single hero image".to_string(),
        },
        design: Design::default(),
        blocks,
    }
}
