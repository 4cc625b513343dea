pub mod calendar;
pub mod svg;

pub use calendar::{bucket, CalendarGrid, Cell, PALETTE};
pub use svg::render_svg;

use crate::config::Scale;
use crate::model::{DateWindow, DayTally};

/// Lays out `tally` over `window` and renders the heatmap document.
pub fn render_heatmap(tally: &DayTally, window: &DateWindow, scale: Scale) -> String {
    render_svg(&CalendarGrid::build(tally, window, scale))
}
