use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use super::{Dashboard, SessionVisual, WidgetId, to_cell_rect};
use crate::catalog::WidgetKind;
use crate::grid::{Span, WidgetPlacement};
use crate::theme;
use crate::ui::UiFrame;

const MOUSE_HELP: &str = indoc! {"
    Drag a widget by its body to move it; it snaps to the free cell it
    overlaps most. Drag the corner handle to resize. Click [x] to remove.
"};

const HELP_WIDTH: u16 = 64;

fn glyph(kind: WidgetKind) -> &'static str {
    match kind {
        WidgetKind::AnalogClock | WidgetKind::SemiDigitalClock => "( 12:00 )",
        WidgetKind::FlipClock => "[1][2]:[0][0]",
        WidgetKind::Calendar => "Mo Tu We Th Fr",
        WidgetKind::Cat => "=^.^=",
        WidgetKind::Checklist => "[ ] todo",
        WidgetKind::TestWidget => "test",
        WidgetKind::Note => "...",
    }
}

impl Dashboard {
    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let grid_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let status_area = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };

        {
            let mut grid_frame = UiFrame::from_parts(grid_area, frame.buffer_mut());
            if self.flags.show_grid() {
                self.render_grid_cells(&mut grid_frame);
            }
            self.render_widgets(&mut grid_frame);
            self.render_drag(&mut grid_frame);
        }

        self.render_status(frame, status_area);
        if self.flags.help_visible() {
            self.render_help(frame, area);
        }
    }

    fn render_grid_cells(&self, frame: &mut UiFrame<'_>) {
        let one = Span::new(1, 1);
        for row in 1..=i32::from(self.grid.rows()) {
            for col in 1..=i32::from(self.grid.cols()) {
                if let Some(rect) = to_cell_rect(self.grid.cell_rect(row, col, one)) {
                    frame.render_widget(
                        Block::bordered()
                            .border_type(BorderType::Plain)
                            .border_style(theme::grid_cell()),
                        rect,
                    );
                }
            }
        }
    }

    fn render_widgets(&self, frame: &mut UiFrame<'_>) {
        let idle = self.session.is_idle();
        for placement in self.placements.iter() {
            match self.visual {
                SessionVisual::Drag { id, .. } if id == placement.id => continue,
                SessionVisual::Resize { id, span, valid } if id == placement.id => {
                    let style = if valid {
                        theme::resize_valid()
                    } else {
                        theme::resize_invalid()
                    };
                    let rect = self.grid.placement_rect(placement.pos, span);
                    if let Some(area) = to_cell_rect(rect) {
                        let preview = WidgetPlacement::new(placement.id, placement.pos, span);
                        self.render_widget_box(frame, &preview, area, style, false);
                    }
                }
                _ => {
                    if let Some(area) = self.widget_area(placement.id) {
                        self.render_widget_box(frame, placement, area, theme::widget_border(), idle);
                    }
                }
            }
        }
    }

    fn render_widget_box(
        &self,
        frame: &mut UiFrame<'_>,
        placement: &WidgetPlacement<WidgetId>,
        area: Rect,
        border: Style,
        chrome: bool,
    ) {
        let kind = self.kind_of(placement.id);
        let title = kind.map(WidgetKind::slug).unwrap_or("widget");
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::styled(format!(" {title} "), theme::widget_title()));
        if chrome && Self::remove_control_cells(area).is_some() {
            block = block.title(Line::styled("[x]", theme::remove_control()).right_aligned());
        }
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let body = vec![
            Line::from(kind.map(glyph).unwrap_or_default()),
            Line::from(format!(
                "{}x{} @ {},{}",
                placement.span.x, placement.span.y, placement.pos.row, placement.pos.col
            )),
        ];
        frame.render_widget(
            Paragraph::new(body).style(theme::widget_body()).centered(),
            inner,
        );

        if chrome && self.flags.resize_enabled() {
            let (x, y) = Self::handle_cell(area);
            frame.set_string(area, x, y, "◢", theme::resize_handle());
        }
    }

    fn render_drag(&self, frame: &mut UiFrame<'_>) {
        let SessionVisual::Drag {
            id,
            floating,
            preview,
        } = self.visual
        else {
            return;
        };
        if let Some((_, rect)) = preview
            && let Some(area) = to_cell_rect(rect)
        {
            frame.render_widget(
                Block::bordered()
                    .border_type(BorderType::Double)
                    .border_style(theme::drop_preview()),
                area,
            );
        }
        if let (Some(placement), Some(area)) = (self.placements.get(id), to_cell_rect(floating)) {
            self.render_widget_box(frame, &placement, area, theme::floating_border(), false);
        }
    }

    fn render_status(&self, frame: &mut UiFrame<'_>, area: Rect) {
        frame.render_widget(Block::new().style(theme::status_bar()), area);
        let on_off = |b: bool| if b { "on" } else { "off" };
        let left = format!(
            " kind: {} | drag: {} | resize: {} | widgets: {}",
            self.selected_kind,
            on_off(self.flags.drag_enabled()),
            on_off(self.flags.resize_enabled()),
            self.placements.len()
        );
        frame.set_string(area, area.x, area.y, &left, theme::status_bar());

        let right = format!("{} ", self.status);
        let width = right.chars().count() as u16;
        let left_width = left.chars().count() as u16;
        if width + left_width < area.width {
            let x = area.x + area.width - width;
            frame.set_string(area, x, area.y, &right, theme::status_bar());
        }
    }

    fn render_help(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let rows = self.keys.help_rows();
        let mut lines: Vec<Line> = MOUSE_HELP.lines().map(Line::from).collect();
        lines.push(Line::from(""));
        let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        for (keys, description) in rows {
            lines.push(Line::from(format!("{keys:<key_width$}  {description}")));
        }

        let width = HELP_WIDTH.min(area.width);
        let height = (lines.len() as u16 + 2).min(area.height);
        let rect = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines)
                .style(theme::dialog())
                .block(Block::bordered().title(" Help ")),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use crate::config::{Cli, DashboardConfig};

    fn dashboard() -> Dashboard {
        let cli = Cli::parse_from(["widget-grid"]);
        let config = DashboardConfig::try_from(&cli).unwrap();
        let mut dash = Dashboard::new(&config);
        dash.set_viewport(Rect::new(0, 0, 100, 30));
        dash
    }

    fn draw(dash: &Dashboard) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| {
                let mut ui = UiFrame::new(f);
                dash.render(&mut ui);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn widget_title_and_chrome_are_drawn() {
        let mut dash = dashboard();
        dash.select_kind(WidgetKind::Cat);
        dash.add_widget().unwrap();
        let buffer = draw(&dash);
        let top = row_text(&buffer, 0);
        assert!(top.contains("cat"));
        assert!(top.contains("[x]"));
        assert_eq!(buffer[(20, 5)].symbol(), "◢");
    }

    #[test]
    fn status_bar_reports_counts_and_flags() {
        let mut dash = dashboard();
        dash.add_widget().unwrap();
        let buffer = draw(&dash);
        let status = row_text(&buffer, 29);
        assert!(status.contains("widgets: 1"));
        assert!(status.contains("drag: on"));
    }

    #[test]
    fn help_overlay_lists_bindings() {
        let mut dash = dashboard();
        dash.flags.toggle_help();
        let buffer = draw(&dash);
        let text: String = (0..buffer.area.height)
            .map(|y| row_text(&buffer, y))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Toggle dragging"));
        assert!(text.contains("Ctrl+c"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut dash = dashboard();
        dash.add_widget().unwrap();
        dash.flags.toggle_help();
        let mut terminal = Terminal::new(TestBackend::new(5, 2)).unwrap();
        terminal
            .draw(|f| {
                let mut ui = UiFrame::new(f);
                dash.render(&mut ui);
            })
            .unwrap();
    }
}
