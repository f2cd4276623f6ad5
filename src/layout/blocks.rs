//! Typed block variants.
//!
//! A layout only becomes a `Block` after the JSON form passed validation, so
//! these types describe the renderer contract rather than what a model may emit.

use super::catalog::BlockKind;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Hero(HeroBlock),
    Gallery(GalleryBlock),
    Timeline(TimelineBlock),
    Steps(StepsBlock),
    Stats(StatsBlock),
    Comparison(ComparisonBlock),
    InteractiveList(InteractiveListBlock),
    Quote(QuoteBlock),
    Text(TextBlock),
    Location(LocationBlock),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Hero(_) => BlockKind::Hero,
            Block::Gallery(_) => BlockKind::Gallery,
            Block::Timeline(_) => BlockKind::Timeline,
            Block::Steps(_) => BlockKind::Steps,
            Block::Stats(_) => BlockKind::Stats,
            Block::Comparison(_) => BlockKind::Comparison,
            Block::InteractiveList(_) => BlockKind::InteractiveList,
            Block::Quote(_) => BlockKind::Quote,
            Block::Text(_) => BlockKind::Text,
            Block::Location(_) => BlockKind::Location,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Block::Hero(b) => Some(&b.title),
            Block::Gallery(b) => b.title.as_deref(),
            Block::Timeline(b) => Some(&b.title),
            Block::Steps(b) => Some(&b.title),
            Block::Stats(b) => b.title.as_deref(),
            Block::Comparison(b) => Some(&b.title),
            Block::InteractiveList(b) => b.title.as_deref(),
            Block::Quote(_) => None,
            Block::Text(b) => b.title.as_deref(),
            Block::Location(b) => Some(&b.title),
        }
    }

    pub fn hero(title: impl Into<String>, subtitle: Option<String>) -> Self {
        Block::Hero(HeroBlock {
            title: title.into(),
            subtitle,
            style: HeroStyle::default(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HeroBlock {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub style: HeroStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeroStyle {
    #[default]
    Fullscreen,
    Split,
    Minimal,
    Overlay,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub style: GalleryStyle,
    #[serde(default = "default_columns")]
    pub columns: u8,
    #[serde(default = "default_image_count")]
    pub image_count: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

fn default_columns() -> u8 {
    3
}

fn default_image_count() -> u8 {
    6
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GalleryStyle {
    #[default]
    Grid,
    Masonry,
    Carousel,
    Mosaic,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineBlock {
    pub title: String,
    pub events: Vec<TimelineEvent>,
    #[serde(default)]
    pub style: TimelineStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStyle {
    #[default]
    Vertical,
    Horizontal,
    Alternating,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepsBlock {
    pub title: String,
    pub steps: Vec<TitledItem>,
    #[serde(default)]
    pub style: StepsStyle,
}

/// Shared item shape for steps and interactive lists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TitledItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepsStyle {
    #[default]
    Numbered,
    Cards,
    Checklist,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatsBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<StatItem>,
    #[serde(default)]
    pub style: StatsStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsStyle {
    #[default]
    Cards,
    Inline,
    Bars,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComparisonBlock {
    pub title: String,
    pub columns: Vec<ComparisonColumn>,
    #[serde(default)]
    pub style: ComparisonStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComparisonColumn {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStyle {
    #[default]
    Cards,
    Table,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InteractiveListBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<TitledItem>,
    #[serde(default)]
    pub style: ListStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    Accordion,
    Tabs,
    Cards,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuoteBlock {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default)]
    pub style: QuoteStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Centered,
    Sidebar,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Plain,
    Callout,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocationBlock {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<String>,
    #[serde(default)]
    pub style: LocationStyle,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationStyle {
    #[default]
    Card,
    Map,
}
