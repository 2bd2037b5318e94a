//! Span allow-lists and the widget kinds that use them.

use std::fmt;

use crate::grid::Span;

/// The sizes a widget may be resized to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpanCatalog {
    /// Any positive span that fits the grid.
    #[default]
    Unrestricted,
    /// Only the listed spans. Order matters: the first entry is the default
    /// size and wins distance ties during resize.
    Allowed(Vec<Span>),
}

impl SpanCatalog {
    pub fn allowed(spans: impl IntoIterator<Item = Span>) -> Self {
        let spans: Vec<Span> = spans.into_iter().filter(|s| s.x > 0 && s.y > 0).collect();
        if spans.is_empty() {
            Self::Unrestricted
        } else {
            Self::Allowed(spans)
        }
    }

    pub fn contains(&self, span: Span) -> bool {
        match self {
            Self::Unrestricted => span.x > 0 && span.y > 0,
            Self::Allowed(spans) => spans.contains(&span),
        }
    }

    /// Size used when a widget is first created.
    pub fn default_span(&self) -> Span {
        match self {
            Self::Unrestricted => Span::new(1, 1),
            Self::Allowed(spans) => spans.first().copied().unwrap_or(Span::new(1, 1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidgetKind {
    AnalogClock,
    SemiDigitalClock,
    FlipClock,
    Calendar,
    Cat,
    Checklist,
    TestWidget,
    Note,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 8] = [
        WidgetKind::AnalogClock,
        WidgetKind::SemiDigitalClock,
        WidgetKind::FlipClock,
        WidgetKind::Calendar,
        WidgetKind::Cat,
        WidgetKind::Checklist,
        WidgetKind::TestWidget,
        WidgetKind::Note,
    ];

    pub fn catalog(self) -> SpanCatalog {
        let s = Span::new;
        match self {
            WidgetKind::AnalogClock
            | WidgetKind::SemiDigitalClock
            | WidgetKind::Calendar
            | WidgetKind::Cat => SpanCatalog::allowed([s(1, 1), s(2, 2)]),
            WidgetKind::FlipClock => SpanCatalog::allowed([s(2, 1), s(1, 2)]),
            WidgetKind::Checklist => SpanCatalog::allowed([s(2, 2)]),
            WidgetKind::TestWidget => {
                SpanCatalog::allowed([s(1, 1), s(2, 2), s(3, 3), s(1, 2), s(2, 1)])
            }
            WidgetKind::Note => SpanCatalog::Unrestricted,
        }
    }

    pub fn default_span(self) -> Span {
        self.catalog().default_span()
    }

    pub fn slug(self) -> &'static str {
        match self {
            WidgetKind::AnalogClock => "analog-clock",
            WidgetKind::SemiDigitalClock => "semi-digital-clock",
            WidgetKind::FlipClock => "flip-clock",
            WidgetKind::Calendar => "calendar",
            WidgetKind::Cat => "cat",
            WidgetKind::Checklist => "checklist",
            WidgetKind::TestWidget => "test-widget",
            WidgetKind::Note => "note",
        }
    }

    /// Next kind in [`WidgetKind::ALL`], wrapping.
    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        Self::ALL[next]
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
