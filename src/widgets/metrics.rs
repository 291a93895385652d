use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::metrics::Metrics;

/// Six read-only metric tiles in a 2x3 grid.
pub struct MetricTiles<'a> {
    metrics: &'a Metrics,
}

impl<'a> MetricTiles<'a> {
    /// Height the grid needs: two rows of bordered 3-line tiles.
    pub const HEIGHT: u16 = 6;

    pub fn new(metrics: &'a Metrics) -> Self {
        Self { metrics }
    }
}

impl Widget for &MetricTiles<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::new(
            Direction::Vertical,
            [Constraint::Length(3), Constraint::Length(3)],
        )
        .split(area);
        let tiles = self.metrics.tiles();

        for (row_idx, row_area) in rows.iter().enumerate() {
            let columns = Layout::new(
                Direction::Horizontal,
                [
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ],
            )
            .split(*row_area);

            for (col_idx, cell) in columns.iter().enumerate() {
                let (label, value) = tiles[row_idx * 3 + col_idx];
                let block = Block::default().borders(Borders::ALL).title(label);
                let inner = block.inner(*cell);
                block.render(*cell, buf);
                Paragraph::new(value.to_string())
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .centered()
                    .render(inner, buf);
            }
        }
    }
}
