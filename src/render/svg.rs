use super::calendar::{CalendarGrid, DAYS_PER_WEEK, PALETTE};
use chrono::Datelike;

const CELL_SIZE: usize = 11;
const CELL_GAP: usize = 3;
const PITCH: usize = CELL_SIZE + CELL_GAP;
const MARGIN_LEFT: usize = 35;
const MARGIN_TOP: usize = 25;
const MARGIN_BOTTOM: usize = 20;
const MIN_WIDTH: usize = 420;

const TITLE: &str = "Azure DevOps Contributions";
const FONT: &str = r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif"#;
const DAY_LABELS: [&str; DAYS_PER_WEEK] = ["", "Mon", "", "Wed", "", "Fri", ""];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn dimensions(weeks: usize) -> (usize, usize) {
    let width = (MARGIN_LEFT + weeks * PITCH + 10).max(MIN_WIDTH);
    let height = MARGIN_TOP + DAYS_PER_WEEK * PITCH + MARGIN_BOTTOM + 30;
    (width, height)
}

/// Static SVG markup for `grid`. Output depends only on the grid.
pub fn render_svg(grid: &CalendarGrid) -> String {
    let (width, height) = dimensions(grid.weeks);
    let mut parts: Vec<String> = Vec::with_capacity(grid.cells.len() + 32);

    parts.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
    ));
    parts.push("<style>".to_string());
    parts.push(format!("  .month {{ font-size: 10px; fill: #8b949e; font-family: {FONT}; }}"));
    parts.push(format!("  .day {{ font-size: 9px; fill: #8b949e; font-family: {FONT}; }}"));
    parts.push(format!(
        "  .title {{ font-size: 12px; fill: #c9d1d9; font-family: {FONT}; font-weight: 600; }}"
    ));
    parts.push(format!("  .stats {{ font-size: 10px; fill: #8b949e; font-family: {FONT}; }}"));
    parts.push("  rect.day-cell { rx: 2; ry: 2; }".to_string());
    parts.push("  rect.day-cell:hover { stroke: #8b949e; stroke-width: 1; }".to_string());
    parts.push("</style>".to_string());
    parts.push(format!(r##"<rect width="{width}" height="{height}" fill="#0d1117"/>"##));
    parts.push(format!(r#"<text x="{MARGIN_LEFT}" y="15" class="title">{TITLE}</text>"#));

    for (row, label) in DAY_LABELS.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        let y = MARGIN_TOP + row * PITCH + 9;
        parts.push(format!(r#"<text x="5" y="{y}" class="day">{label}</text>"#));
    }

    for (week, date) in grid.month_labels() {
        let x = MARGIN_LEFT + week * PITCH;
        let name = MONTH_NAMES[date.month0() as usize];
        parts.push(format!(
            r#"<text x="{x}" y="{}" class="month">{name}</text>"#,
            MARGIN_TOP - 5
        ));
    }

    for cell in &grid.cells {
        let x = MARGIN_LEFT + cell.week * PITCH;
        let y = MARGIN_TOP + cell.weekday * PITCH;
        let color = PALETTE[cell.level];
        let tooltip = format!(
            "{}: {} commit{}",
            cell.date.format("%Y-%m-%d"),
            cell.count,
            if cell.count == 1 { "" } else { "s" }
        );
        parts.push(format!(
            r#"<rect class="day-cell" x="{x}" y="{y}" width="{CELL_SIZE}" height="{CELL_SIZE}" fill="{color}" data-level="{}"><title>{tooltip}</title></rect>"#,
            cell.level
        ));
    }

    let legend_x = width - 150;
    let legend_y = height - 20;
    parts.push(format!(
        r#"<text x="{}" y="{}" class="day">Less</text>"#,
        legend_x - 30,
        legend_y + 9
    ));
    for (i, color) in PALETTE.iter().enumerate() {
        parts.push(format!(
            r#"<rect x="{}" y="{legend_y}" width="{CELL_SIZE}" height="{CELL_SIZE}" fill="{color}" rx="2" ry="2"/>"#,
            legend_x + i * PITCH
        ));
    }
    parts.push(format!(
        r#"<text x="{}" y="{}" class="day">More</text>"#,
        legend_x + 75,
        legend_y + 9
    ));

    let total = grid.total();
    parts.push(format!(
        r#"<text x="{MARGIN_LEFT}" y="{}" class="stats">{total} contribution{} in {}</text>"#,
        height - 10,
        if total == 1 { "" } else { "s" },
        period_label(grid.window.days())
    ));
    parts.push("</svg>".to_string());

    let mut svg = parts.join("\n");
    svg.push('\n');
    svg
}

fn period_label(days: u32) -> String {
    match days {
        365 => "the last year".to_string(),
        1 => "the last day".to_string(),
        n => format!("the last {n} days"),
    }
}
