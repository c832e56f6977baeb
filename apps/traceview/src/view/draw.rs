use crossterm::style::{style, Color, Stylize};
use traceview_model::{format_ms, ActiveView, SeverityTier, Summary};
use traceview_results::{
    exceeds_threshold, ChartPoint, LookupLinker, Presentation, ResultsView, TableRow,
    TimelineEntry,
};

#[derive(Debug, Clone, Copy)]
pub struct DrawOpts {
    pub plain: bool,
    pub width: usize,
    pub chart_height: usize,
    pub cursor: Option<usize>,
}

impl Default for DrawOpts {
    fn default() -> Self {
        Self {
            plain: false,
            width: 80,
            chart_height: 10,
            cursor: None,
        }
    }
}

pub fn render_results(view: &ResultsView, linker: &dyn LookupLinker, opts: &DrawOpts) -> String {
    let lines = match view.presentation() {
        Presentation::NoResults => render_notice(
            "No Results Found",
            "There are no traceroute results to display. Please run a new analysis.",
            opts,
        ),
        Presentation::Unavailable(err) => {
            render_notice("Unable to load results", &err.to_string(), opts)
        }
        Presentation::Results(_) => {
            let mut lines = vec![center_line("Traceroute Results", opts.width), String::new()];
            lines.push(render_tabs(view.active_view()));
            lines.push(String::new());
            lines.extend(render_summary(&view.summary(), opts));
            lines.push(String::new());
            match view.active_view() {
                ActiveView::Timeline => {
                    lines.extend(render_timeline(&view.timeline(), view, linker, opts))
                }
                ActiveView::Chart => lines.extend(render_chart(&view.chart(), opts)),
                ActiveView::Table => lines.extend(render_table(&view.table(), opts)),
            }
            lines
        }
    };

    lines.join("\n")
}

pub fn render_summary(summary: &Summary, opts: &DrawOpts) -> Vec<String> {
    let mut hops = format!("Hops: {}", summary.hop_count);
    if let Some(badge) = summary.anomaly_badge() {
        hops.push_str("  ");
        hops.push_str(&paint(&format!("[{badge}]"), Color::Red, opts));
    }

    vec![
        format!("Average Response Time: {}", format_ms(summary.average_time_ms)),
        format!("Max Response Time:     {}", format_ms(summary.max_time_ms)),
        hops,
    ]
}

fn render_notice(title: &str, body: &str, opts: &DrawOpts) -> Vec<String> {
    vec![
        center_line(title, opts.width),
        center_line(body, opts.width),
        String::new(),
        center_line("Run a new analysis and try again.", opts.width),
    ]
}

fn render_tabs(active: ActiveView) -> String {
    ActiveView::ALL
        .iter()
        .map(|view| {
            if *view == active {
                format!("[{}]", view.title())
            } else {
                format!(" {} ", view.title())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_timeline(
    entries: &[TimelineEntry<'_>],
    view: &ResultsView,
    linker: &dyn LookupLinker,
    opts: &DrawOpts,
) -> Vec<String> {
    let mut lines = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let expanded = view.interaction().is_expanded(index);
        let marker = cursor_marker(index, opts);
        let badge = paint(&format!("({:>2})", entry.hop_number), tier_color(entry.tier), opts);
        let toggle = if expanded { "[-]" } else { "[+]" };

        let mut line = format!(
            "{marker}{badge} Hop {}  IP: {}  {}",
            entry.hop_number,
            entry.record.address,
            paint_time(entry.record.time_ms, opts)
        );
        if entry.tier == SeverityTier::Anomalous {
            line.push_str("  ");
            line.push_str(&paint("! Anomaly", Color::Red, opts));
        }
        line.push_str("  ");
        line.push_str(toggle);
        lines.push(line);

        if expanded {
            lines.push(format!(
                "       Response Time: {}   Status: {}",
                format_ms(entry.record.time_ms),
                paint(entry.tier.status_label(), tier_color(entry.tier), opts)
            ));
            match linker.lookup_ref(&entry.record.address) {
                Some(reference) => lines.push(format!("       Lookup IP Info: {reference}")),
                None => lines.push("       Lookup IP Info: (no address)".to_string()),
            }
        }
    }

    lines
}

fn render_chart(points: &[ChartPoint], opts: &DrawOpts) -> Vec<String> {
    let height = opts.chart_height.max(2);
    let max = points.iter().map(|point| point.time_ms).fold(0.0, f64::max);
    let rows: Vec<usize> = points
        .iter()
        .map(|point| plot_row(point.time_ms, max, height))
        .collect();

    let top_label = format!("{max:.2}");
    let label_width = top_label.len().max(4);

    let mut lines = vec!["Response Time by Hop (ms)".to_string(), String::new()];
    for level in (0..height).rev() {
        let label = if level == height - 1 {
            top_label.as_str()
        } else if level == 0 {
            "0.00"
        } else {
            ""
        };
        let mut line = format!("{label:>label_width$} |");
        for (index, (point, row)) in points.iter().zip(&rows).enumerate() {
            if *row == level {
                let dot = if opts.cursor == Some(index) { "@" } else { "*" };
                let color = if exceeds_threshold(point.time_ms) {
                    Color::Yellow
                } else {
                    Color::Cyan
                };
                line.push_str("  ");
                line.push_str(&paint(dot, color, opts));
            } else {
                line.push_str("   ");
            }
        }
        lines.push(line.trim_end().to_string());
    }

    lines.push(format!("{:>label_width$} +{}", "", "-".repeat(points.len() * 3)));
    let hop_axis: String = points
        .iter()
        .map(|point| format!("{:>3}", point.hop_number))
        .collect();
    lines.push(format!("{:>label_width$}  {hop_axis}", ""));
    lines.push(format!("{:>label_width$}  Hop Number", ""));

    if let Some(point) = opts.cursor.and_then(|index| points.get(index)) {
        lines.push(String::new());
        lines.push(format!(
            "Hop {}  IP: {}  Time: {}",
            point.hop_number,
            point.address,
            format_ms(point.time_ms)
        ));
    }

    lines
}

fn render_table(rows: &[TableRow], opts: &DrawOpts) -> Vec<String> {
    const HEADERS: [&str; 4] = ["Hop", "IP Address", "Response Time", "Status"];

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.hop_number.to_string(),
                row.address.clone(),
                format_ms(row.time_ms),
                row.tier.badge().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(text_width);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(text_width(cell));
        }
    }

    let mut lines = vec!["Detailed Results".to_string(), String::new()];
    lines.push(format!(
        "  {:<w0$}  {:<w1$}  {:<w2$}  {}",
        HEADERS[0],
        HEADERS[1],
        HEADERS[2],
        HEADERS[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    ));
    lines.push(format!("  {}", "-".repeat(widths.iter().sum::<usize>() + 6)));

    for (index, (row, cell)) in rows.iter().zip(&cells).enumerate() {
        let time = format!("{:<w$}", cell[2], w = widths[2]);
        let time = if exceeds_threshold(row.time_ms) {
            paint(&time, Color::Yellow, opts)
        } else {
            time
        };
        lines.push(format!(
            "{}{:<w0$}  {:<w1$}  {}  {}",
            cursor_marker(index, opts),
            cell[0],
            cell[1],
            time,
            paint(&cell[3], tier_color(row.tier), opts),
            w0 = widths[0],
            w1 = widths[1],
        ));
    }

    lines
}

fn plot_row(time_ms: f64, max: f64, height: usize) -> usize {
    if max <= 0.0 {
        return 0;
    }
    let scaled = (time_ms / max) * (height - 1) as f64;
    (scaled.round() as usize).min(height - 1)
}

fn cursor_marker(index: usize, opts: &DrawOpts) -> &'static str {
    if opts.cursor == Some(index) {
        "> "
    } else {
        "  "
    }
}

fn tier_color(tier: SeverityTier) -> Color {
    match tier {
        SeverityTier::Normal => Color::Green,
        SeverityTier::Elevated => Color::Yellow,
        SeverityTier::Anomalous => Color::Red,
    }
}

fn paint_time(time_ms: f64, opts: &DrawOpts) -> String {
    let text = format_ms(time_ms);
    if exceeds_threshold(time_ms) {
        paint(&text, Color::Yellow, opts)
    } else {
        text
    }
}

fn paint(text: &str, color: Color, opts: &DrawOpts) -> String {
    if opts.plain {
        text.to_string()
    } else {
        style(text).with(color).to_string()
    }
}

fn center_line(text: &str, width: usize) -> String {
    let len = text_width(text);
    if len >= width {
        return text.to_string();
    }
    let pad = (width - len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Column width in characters, matching how `format!` pads.
fn text_width(text: &str) -> usize {
    text.chars().count()
}
