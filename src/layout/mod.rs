use crate::metrics::TextMeasure;
use crate::token::{all_tokens, contains_sigil_marker, Token};

/// Page geometry and layout knobs. Defaults are US letter with one inch
/// margins, 18pt line pitch and Courier 10.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub line_pitch: f32,
    pub font_size: f32,
    pub tokens_per_line: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 72.0,
            line_pitch: 18.0,
            font_size: 10.0,
            tokens_per_line: 3,
        }
    }
}

impl LayoutConfig {
    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    pub fn lines_per_page(&self) -> usize {
        (self.usable_height() / self.line_pitch) as usize
    }

    /// Baseline of the first line on a page.
    pub fn top_baseline(&self) -> f32 {
        self.page_height - self.margin
    }
}

/// Layout mode, decided once per input and threaded through the composer.
/// Token runs must stay machine-parseable on decode (no reflow inside a
/// group); prose runs must respect the visual width limit.
#[derive(Debug, Clone, PartialEq)]
pub enum TextRun {
    Tokens(Vec<Token>),
    Prose(String),
}

impl TextRun {
    /// The presence of any bracket-sigil substring selects token mode.
    pub fn classify(text: &str) -> TextRun {
        if contains_sigil_marker(text) {
            TextRun::Tokens(all_tokens(text))
        } else {
            TextRun::Prose(text.to_string())
        }
    }
}

/// One positioned line of output text. `x`/`y` are page coordinates of the
/// line's baseline start, already centered.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// A composed destination page. `cached_text` carries the page's extractable
/// text so later verification never depends on re-extracting from a rendered
/// artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub lines: Vec<Line>,
    pub cached_text: String,
}

/// Breaks a run into unpositioned line texts.
pub fn compose_lines(run: &TextRun, config: &LayoutConfig, measure: &dyn TextMeasure) -> Vec<String> {
    match run {
        TextRun::Tokens(tokens) => token_lines(tokens, config.tokens_per_line),
        TextRun::Prose(text) => prose_lines(text, config, measure),
    }
}

/// Groups consecutive tokens into fixed-size lines with no separator. Width
/// is not checked here: token groups are assumed to fit.
fn token_lines(tokens: &[Token], tokens_per_line: usize) -> Vec<String> {
    tokens
        .chunks(tokens_per_line.max(1))
        .map(|group| group.iter().map(Token::as_str).collect())
        .collect()
}

/// Greedy word wrap against the usable width. A single word wider than the
/// usable width gets its own line; words are never split.
fn prose_lines(text: &str, config: &LayoutConfig, measure: &dyn TextMeasure) -> Vec<String> {
    let max_width = config.usable_width();
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = measure.width(&format!("{word} "), config.font_size);
        if current_width + word_width > max_width {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
            current_width = word_width;
        } else {
            current.push(word);
            current_width += word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}

/// Partitions lines into pages and positions each line: horizontally centered
/// by its measured width, advancing one line pitch per line from the top
/// margin, restarting at the top on every new page. An empty line sequence
/// yields zero pages.
pub fn paginate(lines: Vec<String>, config: &LayoutConfig, measure: &dyn TextMeasure) -> Vec<RenderedPage> {
    let per_page = config.lines_per_page().max(1);
    lines
        .chunks(per_page)
        .map(|page_lines| {
            let positioned: Vec<Line> = page_lines
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let width = measure.width(text, config.font_size);
                    Line {
                        text: text.clone(),
                        x: (config.page_width - width) / 2.0,
                        y: config.top_baseline() - i as f32 * config.line_pitch,
                    }
                })
                .collect();
            let cached_text = page_lines.join("\n");
            RenderedPage {
                lines: positioned,
                cached_text,
            }
        })
        .collect()
}

/// Full composition: mode detection, line breaking, pagination, positioning.
pub fn compose_pages(text: &str, config: &LayoutConfig, measure: &dyn TextMeasure) -> Vec<RenderedPage> {
    let run = TextRun::classify(text);
    paginate(compose_lines(&run, config, measure), config, measure)
}
