use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

static BINDINGS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous day"),
    ("l, RIGHT", "Next day"),
    ("k, UP", "Same day last week"),
    ("j, DOWN", "Same day next week"),
    ("w, PAGE UP", "Scroll up one page"),
    ("z, PAGE DOWN", "Scroll down one page"),
    ("0, HOME", "Scroll back to the top"),
    ("ENTER, SPACE", "Pick the highlighted date"),
    ("p", "Allow/forbid past dates"),
    ("x", "Enable/disable highlighted date"),
    ("?", "Show this help"),
    ("q, ESC", "Quit without picking"),
];

const DISMISS: &str = "Press the Any Key to dismiss.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = help_text();
        let popup = popup_area(area, &text);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(Line::raw(" Commands ").centered())
                    .padding(Padding::horizontal(1)),
            )
            .style(self.0)
            .render(popup, buf);
    }
}

fn help_text() -> Text<'static> {
    BINDINGS
        .iter()
        .map(|(keys, action)| Line::from(format!("{keys:<15} {action}")))
        .chain([Line::default(), Line::raw(DISMISS)])
        .collect()
}

// Centers a box big enough for `text`, its border, and a column of padding on
// either side
fn popup_area(area: Rect, text: &Text<'_>) -> Rect {
    let width = u16::try_from(text.width())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width);
    let height = u16::try_from(text.height())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.height);
    let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
    popup
}
