use colored::{Color, Colorize};
use creatorscore_core::{StatsSection, Weight};

use crate::format::format_percentage;

/// Cycled per segment so neighbours stay apart within a single color
const SEGMENT_GLYPHS: &[char] = &['█', '▓', '▒', '░'];

pub type ValueFormatter = fn(f64) -> String;

#[derive(Debug, Clone)]
pub struct BarSegment {
    pub name: String,
    pub value: f64,
    pub percentage: f64,
    pub url: Option<String>,
}

/// Everything a segmented bar needs: title, total, slices, color, value
/// formatting, and the loading/error state of its data.
#[derive(Debug, Clone)]
pub struct BarView {
    pub title: String,
    pub total: f64,
    pub segments: Vec<BarSegment>,
    pub color: Color,
    pub format_value: ValueFormatter,
    pub loading: bool,
    pub error: Option<String>,
}

impl BarView {
    pub fn from_section<W: Weight>(
        title: &str,
        section: &StatsSection<W>,
        color: Color,
        format_value: ValueFormatter,
    ) -> Self {
        let segments = section
            .breakdown
            .segments
            .iter()
            .map(|s| BarSegment {
                name: s.name.clone(),
                value: s.value.as_f64(),
                percentage: s.percentage,
                url: s.url.clone(),
            })
            .collect();

        Self {
            title: title.to_string(),
            total: section.breakdown.grand_total.as_f64(),
            segments,
            color,
            format_value,
            loading: false,
            error: section.error.clone(),
        }
    }
}

pub fn render_segmented_bar(view: &BarView, width: usize) -> String {
    let heading = view.title.as_str().bold();

    if view.loading {
        return format!("{}\n  {}\n", heading, "Loading...".bright_black());
    }
    if let Some(error) = &view.error {
        return format!("{}\n  {}\n", heading, error.as_str().red());
    }

    let mut out = format!(
        "{}  {}\n",
        heading,
        (view.format_value)(view.total).as_str().color(view.color).bold()
    );

    if view.segments.is_empty() {
        out.push_str(&format!("  {}\n", "No data".bright_black()));
        return out;
    }

    let percentages: Vec<f64> = view.segments.iter().map(|s| s.percentage).collect();
    let cells = allocate_cells(&percentages, width);

    let mut bar = String::with_capacity(width * 3);
    for (i, count) in cells.iter().enumerate() {
        let glyph = SEGMENT_GLYPHS[i % SEGMENT_GLYPHS.len()];
        bar.extend(std::iter::repeat(glyph).take(*count));
    }
    out.push_str(&format!("  {}\n", bar.as_str().color(view.color)));

    let name_width = view
        .segments
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);

    for (i, segment) in view.segments.iter().enumerate() {
        let glyph = SEGMENT_GLYPHS[i % SEGMENT_GLYPHS.len()].to_string();
        out.push_str(&format!(
            "  {} {:<name_width$}  {:>10}  {:>6}",
            glyph.as_str().color(view.color),
            segment.name,
            (view.format_value)(segment.value),
            format_percentage(segment.percentage),
        ));
        if let Some(url) = &segment.url {
            out.push_str(&format!("  {}", url.as_str().bright_black()));
        }
        out.push('\n');
    }

    out
}

/// Split `width` cells across percentages by largest remainder, so the
/// cells always add up to `width` when the percentages add up to 100.
pub fn allocate_cells(percentages: &[f64], width: usize) -> Vec<usize> {
    if percentages.is_empty() || width == 0 {
        return vec![0; percentages.len()];
    }

    let exact: Vec<f64> = percentages
        .iter()
        .map(|p| (p.max(0.0) / 100.0) * width as f64)
        .collect();
    let mut cells: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();

    let assigned: usize = cells.iter().sum();
    let leftover = width.saturating_sub(assigned).min(cells.len());

    let mut order: Vec<usize> = (0..exact.len()).collect();
    // Stable: equal remainders favour earlier (larger) segments
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    for &i in order.iter().take(leftover) {
        cells[i] += 1;
    }

    cells
}
