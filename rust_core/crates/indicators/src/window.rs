//! Series window extractor.
//!
//! A window is the trailing slice of the series used for one analysis
//! horizon. Windows borrow from the series and are rebuilt per request.

use std::ops::Range;

use stockscope_types::{PriceBar, PriceSeries, WindowConfig, WindowTag};

/// Returns the last `len` bars, or all bars when fewer are available.
#[must_use]
pub fn trailing(bars: &[PriceBar], len: usize) -> &[PriceBar] {
    &bars[bars.len().saturating_sub(len)..]
}

/// A named trailing slice of a [`PriceSeries`].
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    tag: WindowTag,
    start: usize,
    bars: &'a [PriceBar],
    requested_len: usize,
}

impl<'a> Window<'a> {
    /// Extracts the trailing window of `requested_len` bars from `bars`.
    #[must_use]
    pub fn extract(bars: &'a [PriceBar], tag: WindowTag, requested_len: usize) -> Self {
        let slice = trailing(bars, requested_len);
        Self {
            tag,
            start: bars.len() - slice.len(),
            bars: slice,
            requested_len,
        }
    }

    /// Horizon of this window.
    #[must_use]
    pub fn tag(&self) -> WindowTag {
        self.tag
    }

    /// Index of the first window bar in the full series.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Bars inside the window, oldest first.
    #[must_use]
    pub fn bars(&self) -> &'a [PriceBar] {
        self.bars
    }

    /// Number of bars actually in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when the window holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Configured length before truncation.
    #[must_use]
    pub fn requested_len(&self) -> usize {
        self.requested_len
    }

    /// True when the series was shorter than the requested length.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.bars.len() < self.requested_len
    }

    /// Index range of the window in the full series.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.bars.len()
    }

    /// Slice of a series-aligned vector covering this window.
    ///
    /// `values` must have the length of the series the window came from.
    #[must_use]
    pub fn slice<'v>(&self, values: &'v [f64]) -> &'v [f64] {
        let range = self.range();
        let end = range.end.min(values.len());
        &values[range.start.min(end)..end]
    }
}

/// The long, medium and short windows of one series.
#[derive(Debug, Clone, Copy)]
pub struct WindowSet<'a> {
    long: Window<'a>,
    medium: Window<'a>,
    short: Window<'a>,
}

impl<'a> WindowSet<'a> {
    /// Builds all three windows from `series`.
    #[must_use]
    pub fn from_series(series: &'a PriceSeries, config: &WindowConfig) -> Self {
        let bars = series.bars();
        Self {
            long: Window::extract(bars, WindowTag::Long, config.long),
            medium: Window::extract(bars, WindowTag::Medium, config.medium),
            short: Window::extract(bars, WindowTag::Short, config.short),
        }
    }

    /// Window for `tag`.
    #[must_use]
    pub fn get(&self, tag: WindowTag) -> &Window<'a> {
        match tag {
            WindowTag::Long => &self.long,
            WindowTag::Medium => &self.medium,
            WindowTag::Short => &self.short,
        }
    }

    /// Iterates long, medium, short.
    pub fn iter(&self) -> impl Iterator<Item = &Window<'a>> {
        WindowTag::ALL.into_iter().map(|tag| self.get(tag))
    }
}
