pub mod detail_panel;
pub mod dex_list;
pub mod evolution_panel;
pub mod footer;

pub use tui_dispatch::Component;

pub use detail_panel::{DetailPanel, DetailPanelProps};
pub use dex_list::{DexList, DexListProps};
pub use evolution_panel::{EvolutionPanel, EvolutionPanelProps};
pub use footer::{Footer, FooterProps};

use ratatui::style::{Color, Modifier, Style};
use tui_dispatch_components::{BaseStyle, Padding, SelectListStyle, SelectionStyle};

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

pub(crate) fn focus_border(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

pub(crate) fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}
