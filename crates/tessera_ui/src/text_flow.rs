//! # Text Flow
//!
//! Greedy word wrap of a string into a rectangle, driven by a measurement
//! oracle so the engine never depends on a font backend.
//!
//! ## Rules
//!
//! - Lines break only on spaces and newlines, never inside a word.
//! - Every newline ends a line; consecutive newlines keep their empty lines.
//! - When the next line would not fit the rectangle's height, wrapping stops
//!   and only the lines that fit are returned.
//! - A single word wider than the rectangle gets a line of its own and
//!   overflows it; it is neither split nor truncated.

use crate::layout::Vec2;

/// Measures a single line of text.
///
/// Returns the pixel extent of `text` rendered at `font_size`. An empty
/// string should still report one line of height. Degenerate (zero)
/// extents are tolerated and simply contribute nothing.
pub trait TextMeasure {
    /// Pixel size of `text` at `font_size`.
    fn measure(&self, text: &str, font_size: f32) -> Vec2;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, f32) -> Vec2,
{
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        self(text, font_size)
    }
}

/// Fixed-advance measurement, sized for a reference font size.
///
/// Used when no font backend is attached: every character advances by the
/// same width and every line has the same height, both scaled linearly with
/// the requested font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance of one character at `reference_size`.
    pub glyph_width: f32,
    /// Height of one line at `reference_size`.
    pub line_height: f32,
    /// Font size the metrics above were taken at.
    pub reference_size: f32,
}

impl MonospaceMeasure {
    /// Creates a measure from metrics taken at `reference_size`.
    #[must_use]
    pub const fn new(glyph_width: f32, line_height: f32, reference_size: f32) -> Self {
        Self {
            glyph_width,
            line_height,
            reference_size,
        }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(8.0, 16.0, 16.0)
    }
}

impl TextMeasure for MonospaceMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font_size: f32) -> Vec2 {
        let scale = if self.reference_size > 0.0 {
            font_size / self.reference_size
        } else {
            1.0
        };

        let mut lines = 0_usize;
        let mut widest = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }

        Vec2::new(
            widest as f32 * self.glyph_width * scale,
            lines as f32 * self.line_height * scale,
        )
    }
}

/// A unit consumed by the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment<'a> {
    /// A run of characters without spaces or newlines.
    Word(&'a str),
    /// An explicit line break.
    Break,
}

fn fragments(text: &str) -> impl Iterator<Item = Fragment<'_>> {
    text.split('\n').enumerate().flat_map(|(index, segment)| {
        let brk = (index > 0).then_some(Fragment::Break);
        brk.into_iter().chain(
            segment
                .split(' ')
                .filter(|word| !word.is_empty())
                .map(Fragment::Word),
        )
    })
}

/// Lines committed so far and the height they use.
struct Flow<'m, M: ?Sized> {
    measure: &'m M,
    font_size: f32,
    area: Vec2,
    lines: Vec<String>,
    used_height: f32,
}

impl<M: TextMeasure + ?Sized> Flow<'_, M> {
    fn size_of(&self, text: &str) -> Vec2 {
        self.measure.measure(text, self.font_size)
    }

    fn fits_height(&self, size: Vec2) -> bool {
        self.used_height + size.y <= self.area.y
    }

    /// Commits `line`; returns false if it does not fit below the committed ones.
    fn commit(&mut self, line: String) -> bool {
        let size = self.size_of(&line);
        if !self.fits_height(size) {
            return false;
        }
        self.used_height += size.y;
        self.lines.push(line);
        true
    }
}

/// Wraps `text` into lines that fit `area` (width, height).
///
/// # Example
///
/// ```rust
/// use tessera_ui::layout::Vec2;
/// use tessera_ui::text_flow::wrap_text;
///
/// let measure = |text: &str, _size: f32| Vec2::new(text.len() as f32 * 10.0, 10.0);
/// let lines = wrap_text("hello world", &measure, 10.0, Vec2::new(60.0, 999.0));
/// assert_eq!(lines, ["hello", "world"]);
/// ```
#[must_use]
pub fn wrap_text<M>(text: &str, measure: &M, font_size: f32, area: Vec2) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut flow = Flow {
        measure,
        font_size,
        area,
        lines: Vec::new(),
        used_height: 0.0,
    };
    let mut current = String::new();

    for fragment in fragments(text) {
        match fragment {
            Fragment::Break => {
                if !flow.commit(std::mem::take(&mut current)) {
                    return flow.lines;
                }
            }
            Fragment::Word(word) => {
                let candidate = if current.is_empty() {
                    word.to_owned()
                } else {
                    format!("{current} {word}")
                };

                let size = flow.size_of(&candidate);
                if !flow.fits_height(size) {
                    return flow.lines;
                }

                if size.x <= area.x || current.is_empty() {
                    current = candidate;
                    continue;
                }

                // Too wide: the line without this word is finished.
                if !flow.commit(std::mem::take(&mut current)) {
                    return flow.lines;
                }
                if !flow.fits_height(flow.size_of(word)) {
                    return flow.lines;
                }
                current = word.to_owned();
            }
        }
    }

    if !current.is_empty() {
        flow.commit(current);
    }
    flow.lines
}

/// Extent of a block of lines: widest line by summed height.
#[must_use]
pub fn block_size<M>(lines: &[String], measure: &M, font_size: f32) -> Vec2
where
    M: TextMeasure + ?Sized,
{
    lines.iter().fold(Vec2::ZERO, |block, line| {
        let size = measure.measure(line, font_size);
        Vec2::new(block.x.max(size.x), block.y + size.y)
    })
}
