//! Toolkit-neutral page content.
//!
//! Page builders produce a [`PageView`]; the TUI and the text renderer each
//! know how to draw one. Nothing here does I/O.

use crate::chart::{Figure, Rgb};

/// Colour role of a card, callout, or panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Bot-side values, "significant"/"fair" outcomes.
    Success,
    /// Top-side values, "not significant" outcomes.
    Warning,
    /// Differences and neutral numbers.
    Info,
    /// Significant p-values, unfair outcomes.
    Danger,
    /// Not-significant p-values.
    Muted,
    /// Section accents and highlighted panels.
    Accent,
    Plain,
}

impl Tone {
    pub fn rgb(self) -> Rgb {
        match self {
            Tone::Success => Rgb(0x4C, 0xAF, 0x50),
            Tone::Warning => Rgb(0xFF, 0x98, 0x00),
            Tone::Info => Rgb(0x21, 0x96, 0xF3),
            Tone::Danger => Rgb(0xF4, 0x43, 0x36),
            Tone::Muted => Rgb(0x9E, 0x9E, 0x9E),
            Tone::Accent => Rgb(0x66, 0x7E, 0xEA),
            Tone::Plain => Rgb(0xE5, 0xE7, 0xEB),
        }
    }
}

/// Label / value / colour: the stat, metric, and result cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

impl Card {
    pub fn new(label: impl Into<String>, value: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One horizontal bar: `fraction` of full width, already clamped to `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    Quote(String),
    Bullets(Vec<String>),
    /// Label → description rows (the column glossary).
    Definitions(Vec<(String, String)>),
    Cards(Vec<Card>),
    /// A titled box with notes and label/value rows (model metric panels).
    Panel {
        title: String,
        notes: Vec<String>,
        rows: Vec<(String, String)>,
        tone: Tone,
    },
    Callout {
        tone: Tone,
        text: String,
    },
    Table {
        caption: Option<String>,
        table: Table,
    },
    Bars(Vec<Bar>),
    Chart {
        caption: Option<String>,
        figure: Figure,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            blocks: Vec::new(),
        }
    }

    pub fn untitled() -> Self {
        Self {
            heading: None,
            blocks: Vec::new(),
        }
    }

    pub fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Push only when the block's data is present.
    pub fn push_opt(mut self, block: Option<Block>) -> Self {
        if let Some(block) = block {
            self.blocks.push(block);
        }
        self
    }

    pub fn paragraph(self, text: impl Into<String>) -> Self {
        self.push(Block::Paragraph(text.into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    /// The page's primary resource has not arrived.
    Loading,
    Sections(Vec<Section>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub title: String,
    pub body: PageBody,
}

impl PageView {
    pub fn loading(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: PageBody::Loading,
        }
    }

    pub fn sections(title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            title: title.into(),
            body: PageBody::Sections(sections),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.body == PageBody::Loading
    }

    /// Every block on the page, in order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        let sections: &[Section] = match &self.body {
            PageBody::Loading => &[],
            PageBody::Sections(sections) => sections,
        };
        sections.iter().flat_map(|s| s.blocks.iter())
    }

    /// Every card on the page, in order (handy for assertions).
    pub fn cards(&self) -> Vec<&Card> {
        self.blocks()
            .filter_map(|b| match b {
                Block::Cards(cards) => Some(cards.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn card(&self, label: &str) -> Option<&Card> {
        self.cards().into_iter().find(|c| c.label == label)
    }
}
