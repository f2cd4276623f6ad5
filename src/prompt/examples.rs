//! Worked examples shown in the system prompt.
//!
//! Built from the typed blocks so every example is itself a valid layout.

use crate::layout::{
    Block, ComparisonBlock, ComparisonColumn, ComparisonStyle, Design, GalleryBlock, GalleryStyle,
    HeroBlock, HeroStyle, LayoutDescription, Mood, QuoteBlock, QuoteStyle, StatItem, StatsBlock,
    StatsStyle, StepsBlock, StepsStyle, TextBlock, TextStyle, Theme, TitledItem, Understanding,
};

pub const EXAMPLE_QUERY: &str = "pour-over coffee";

fn steps(items: &[(&str, &str)]) -> Vec<TitledItem> {
    items
        .iter()
        .map(|(title, description)| TitledItem {
            title: title.to_string(),
            description: Some(description.to_string()),
        })
        .collect()
}

/// Three different takes on the same query: a how-to, a visual mood board and a comparison.
pub fn worked_examples() -> Vec<LayoutDescription> {
    let tutorial = LayoutDescription {
        understanding: Understanding {
            intent: "Learn to brew pour-over coffee at home".into(),
            approach: "Short visual intro, then a numbered recipe with key ratios".into(),
        },
        design: Design {
            theme: Theme::Warm,
            accent_color: "#b45309".into(),
            mood: Mood::Cozy,
        },
        blocks: vec![
            Block::Hero(HeroBlock {
                title: "Pour-over coffee".into(),
                subtitle: Some("Slow, clean and surprisingly simple".into()),
                style: HeroStyle::Split,
            }),
            Block::Steps(StepsBlock {
                title: "Brew a cup".into(),
                steps: steps(&[
                    ("Heat water", "Around 94°C, just off the boil"),
                    ("Rinse the filter", "Removes paper taste and warms the cone"),
                    ("Bloom", "Pour twice the coffee's weight and wait 30 seconds"),
                    ("Pour slowly", "Spiral outwards until you reach the target weight"),
                ]),
                style: StepsStyle::Numbered,
            }),
            Block::Stats(StatsBlock {
                title: Some("The numbers".into()),
                items: vec![
                    StatItem { label: "Ratio".into(), value: "1:16".into() },
                    StatItem { label: "Grind".into(), value: "Medium-fine".into() },
                    StatItem { label: "Total time".into(), value: "3 min".into() },
                ],
                style: StatsStyle::Inline,
            }),
        ],
    };

    let mood_board = LayoutDescription {
        understanding: Understanding {
            intent: "Browse the look and ritual of pour-over coffee".into(),
            approach: "Image-led page with a single line of context".into(),
        },
        design: Design {
            theme: Theme::Dark,
            accent_color: "#d97706".into(),
            mood: Mood::Elegant,
        },
        blocks: vec![
            Block::Hero(HeroBlock {
                title: "The slow pour".into(),
                subtitle: None,
                style: HeroStyle::Fullscreen,
            }),
            Block::Gallery(GalleryBlock {
                title: None,
                style: GalleryStyle::Masonry,
                columns: 3,
                image_count: 9,
                labels: Vec::new(),
            }),
            Block::Quote(QuoteBlock {
                text: "Good coffee is patience you can drink.".into(),
                attribution: None,
                style: QuoteStyle::Centered,
            }),
        ],
    };

    let comparison = LayoutDescription {
        understanding: Understanding {
            intent: "Decide between pour-over drippers".into(),
            approach: "Side-by-side comparison with a short verdict".into(),
        },
        design: Design {
            theme: Theme::Light,
            accent_color: "#0f766e".into(),
            mood: Mood::Minimal,
        },
        blocks: vec![
            Block::Hero(HeroBlock {
                title: "Choosing a dripper".into(),
                subtitle: Some("V60, Kalita or Chemex".into()),
                style: HeroStyle::Minimal,
            }),
            Block::Comparison(ComparisonBlock {
                title: "How they differ".into(),
                columns: vec![
                    ComparisonColumn {
                        name: "V60".into(),
                        points: vec!["Fast flow".into(), "Bright cup".into()],
                    },
                    ComparisonColumn {
                        name: "Kalita Wave".into(),
                        points: vec!["Flat bed".into(), "Forgiving".into()],
                    },
                    ComparisonColumn {
                        name: "Chemex".into(),
                        points: vec!["Thick filters".into(), "Very clean".into()],
                    },
                ],
                style: ComparisonStyle::Table,
            }),
            Block::Text(TextBlock {
                title: Some("Verdict".into()),
                content: "Start with a Kalita if you want consistency; move to a V60 for control."
                    .into(),
                style: TextStyle::Callout,
            }),
        ],
    };

    vec![tutorial, mood_board, comparison]
}
