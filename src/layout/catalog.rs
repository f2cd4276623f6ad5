//! Field grammar for every block kind.
//!
//! `BLOCK_SPECS` is the one place the block grammar lives. The validator, the
//! auto-fixer and the system prompt all read it, so adding a field here updates
//! all three.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Hero,
    Gallery,
    Timeline,
    Steps,
    Stats,
    Comparison,
    InteractiveList,
    Quote,
    Text,
    Location,
}

impl BlockKind {
    pub const ALL: [BlockKind; 10] = [
        BlockKind::Hero,
        BlockKind::Gallery,
        BlockKind::Timeline,
        BlockKind::Steps,
        BlockKind::Stats,
        BlockKind::Comparison,
        BlockKind::InteractiveList,
        BlockKind::Quote,
        BlockKind::Text,
        BlockKind::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Gallery => "gallery",
            BlockKind::Timeline => "timeline",
            BlockKind::Steps => "steps",
            BlockKind::Stats => "stats",
            BlockKind::Comparison => "comparison",
            BlockKind::InteractiveList => "interactive-list",
            BlockKind::Quote => "quote",
            BlockKind::Text => "text",
            BlockKind::Location => "location",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    pub fn spec(&self) -> &'static BlockSpec {
        // Every kind has a row; covered by the schema closure tests.
        BLOCK_SPECS
            .iter()
            .find(|spec| spec.kind == *self)
            .unwrap_or(&BLOCK_SPECS[0])
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_valid_block_type(name: &str) -> bool {
    BlockKind::from_wire(name).is_some()
}

pub fn spec_for(name: &str) -> Option<&'static BlockSpec> {
    BlockKind::from_wire(name).map(|kind| kind.spec())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(i64),
}

impl DefaultValue {
    pub fn to_json(&self) -> Value {
        match self {
            DefaultValue::Text(text) => Value::from(*text),
            DefaultValue::Integer(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Text(text) => write!(f, "\"{}\"", text),
            DefaultValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemFieldKind {
    Text,
    TextList,
}

impl ItemFieldKind {
    /// Shape check only; emptiness of required text is judged by the caller.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ItemFieldKind::Text => value.is_string(),
            ItemFieldKind::TextList => value
                .as_array()
                .map_or(false, |values| values.iter().all(Value::is_string)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemField {
    pub name: &'static str,
    pub required: bool,
    pub kind: ItemFieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Integer {
        min: i64,
        max: i64,
        /// When set, only these values are accepted inside `min..=max`.
        allowed: Option<&'static [i64]>,
    },
    Choice(&'static [&'static str]),
    TextList {
        max_items: usize,
    },
    Items {
        fields: &'static [ItemField],
        min_items: usize,
        max_items: usize,
    },
}

impl FieldKind {
    /// Short grammar string used in prompts and error messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Text => "string".to_string(),
            FieldKind::Integer { allowed: Some(values), .. } => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("one of {}", values.join("|"))
            }
            FieldKind::Integer { min, max, .. } => format!("integer {}-{}", min, max),
            FieldKind::Choice(values) => values.join("|"),
            FieldKind::TextList { max_items } => format!("string[] (max {})", max_items),
            FieldKind::Items {
                fields,
                min_items,
                max_items,
            } => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        let kind = match field.kind {
                            ItemFieldKind::Text => "string",
                            ItemFieldKind::TextList => "string[]",
                        };
                        if field.required {
                            format!("{}: {}", field.name, kind)
                        } else {
                            format!("{}?: {}", field.name, kind)
                        }
                    })
                    .collect();
                format!("[{{{}}}] ({}-{} items)", inner.join(", "), min_items, max_items)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<DefaultValue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub summary: &'static str,
    pub fields: &'static [FieldSpec],
}

impl BlockSpec {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        required: true,
        kind,
        default: None,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
        kind,
        default: None,
    }
}

const fn defaulted(name: &'static str, kind: FieldKind, default: DefaultValue) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
        kind,
        default: Some(default),
    }
}

const fn item(name: &'static str, required: bool, kind: ItemFieldKind) -> ItemField {
    ItemField {
        name,
        required,
        kind,
    }
}

pub const HERO_STYLES: &[&str] = &["fullscreen", "split", "minimal", "overlay"];
pub const GALLERY_STYLES: &[&str] = &["grid", "masonry", "carousel", "mosaic"];
pub const TIMELINE_STYLES: &[&str] = &["vertical", "horizontal", "alternating"];
pub const STEPS_STYLES: &[&str] = &["numbered", "cards", "checklist"];
pub const STATS_STYLES: &[&str] = &["cards", "inline", "bars"];
pub const COMPARISON_STYLES: &[&str] = &["cards", "table"];
pub const LIST_STYLES: &[&str] = &["accordion", "tabs", "cards"];
pub const QUOTE_STYLES: &[&str] = &["centered", "sidebar"];
pub const TEXT_STYLES: &[&str] = &["plain", "callout"];
pub const LOCATION_STYLES: &[&str] = &["card", "map"];

pub const GALLERY_COLUMNS: &[i64] = &[2, 3, 4];
pub const MAX_IMAGE_COUNT: i64 = 12;

const TITLED_ITEM: &[ItemField] = &[
    item("title", true, ItemFieldKind::Text),
    item("description", false, ItemFieldKind::Text),
];

const TIMELINE_EVENT: &[ItemField] = &[
    item("date", true, ItemFieldKind::Text),
    item("title", true, ItemFieldKind::Text),
    item("description", false, ItemFieldKind::Text),
];

const STAT_ITEM: &[ItemField] = &[
    item("label", true, ItemFieldKind::Text),
    item("value", true, ItemFieldKind::Text),
];

const COMPARISON_COLUMN: &[ItemField] = &[
    item("name", true, ItemFieldKind::Text),
    item("points", false, ItemFieldKind::TextList),
];

pub static BLOCK_SPECS: &[BlockSpec] = &[
    BlockSpec {
        kind: BlockKind::Hero,
        summary: "Large opening banner with the main image",
        fields: &[
            required("title", FieldKind::Text),
            optional("subtitle", FieldKind::Text),
            defaulted("style", FieldKind::Choice(HERO_STYLES), DefaultValue::Text("fullscreen")),
        ],
    },
    BlockSpec {
        kind: BlockKind::Gallery,
        summary: "Grid of search result images",
        fields: &[
            optional("title", FieldKind::Text),
            defaulted("style", FieldKind::Choice(GALLERY_STYLES), DefaultValue::Text("grid")),
            defaulted(
                "columns",
                FieldKind::Integer {
                    min: 2,
                    max: 4,
                    allowed: Some(GALLERY_COLUMNS),
                },
                DefaultValue::Integer(3),
            ),
            defaulted(
                "imageCount",
                FieldKind::Integer {
                    min: 1,
                    max: MAX_IMAGE_COUNT,
                    allowed: None,
                },
                DefaultValue::Integer(6),
            ),
            optional("labels", FieldKind::TextList { max_items: 12 }),
        ],
    },
    BlockSpec {
        kind: BlockKind::Timeline,
        summary: "Chronological events, each paired with an image",
        fields: &[
            required("title", FieldKind::Text),
            required(
                "events",
                FieldKind::Items {
                    fields: TIMELINE_EVENT,
                    min_items: 1,
                    max_items: 10,
                },
            ),
            defaulted(
                "style",
                FieldKind::Choice(TIMELINE_STYLES),
                DefaultValue::Text("vertical"),
            ),
        ],
    },
    BlockSpec {
        kind: BlockKind::Steps,
        summary: "Ordered how-to instructions",
        fields: &[
            required("title", FieldKind::Text),
            required(
                "steps",
                FieldKind::Items {
                    fields: TITLED_ITEM,
                    min_items: 1,
                    max_items: 10,
                },
            ),
            defaulted("style", FieldKind::Choice(STEPS_STYLES), DefaultValue::Text("numbered")),
        ],
    },
    BlockSpec {
        kind: BlockKind::Stats,
        summary: "Key figures shown as label/value pairs",
        fields: &[
            optional("title", FieldKind::Text),
            required(
                "items",
                FieldKind::Items {
                    fields: STAT_ITEM,
                    min_items: 1,
                    max_items: 6,
                },
            ),
            defaulted("style", FieldKind::Choice(STATS_STYLES), DefaultValue::Text("cards")),
        ],
    },
    BlockSpec {
        kind: BlockKind::Comparison,
        summary: "Side-by-side comparison of two to four options",
        fields: &[
            required("title", FieldKind::Text),
            required(
                "columns",
                FieldKind::Items {
                    fields: COMPARISON_COLUMN,
                    min_items: 2,
                    max_items: 4,
                },
            ),
            defaulted(
                "style",
                FieldKind::Choice(COMPARISON_STYLES),
                DefaultValue::Text("cards"),
            ),
        ],
    },
    BlockSpec {
        kind: BlockKind::InteractiveList,
        summary: "Expandable list of related topics",
        fields: &[
            optional("title", FieldKind::Text),
            required(
                "items",
                FieldKind::Items {
                    fields: TITLED_ITEM,
                    min_items: 1,
                    max_items: 10,
                },
            ),
            defaulted("style", FieldKind::Choice(LIST_STYLES), DefaultValue::Text("accordion")),
        ],
    },
    BlockSpec {
        kind: BlockKind::Quote,
        summary: "Pull quote or notable fact",
        fields: &[
            required("text", FieldKind::Text),
            optional("attribution", FieldKind::Text),
            defaulted("style", FieldKind::Choice(QUOTE_STYLES), DefaultValue::Text("centered")),
        ],
    },
    BlockSpec {
        kind: BlockKind::Text,
        summary: "Short explanatory paragraph",
        fields: &[
            optional("title", FieldKind::Text),
            required("content", FieldKind::Text),
            defaulted("style", FieldKind::Choice(TEXT_STYLES), DefaultValue::Text("plain")),
        ],
    },
    BlockSpec {
        kind: BlockKind::Location,
        summary: "Place card with region and quick facts",
        fields: &[
            required("title", FieldKind::Text),
            optional("region", FieldKind::Text),
            optional("facts", FieldKind::TextList { max_items: 8 }),
            defaulted("style", FieldKind::Choice(LOCATION_STYLES), DefaultValue::Text("card")),
        ],
    },
];
