//! Pure projection of [`SessionState`] onto a ratatui frame.

use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::ui::components::theme::ThemePalette;
use crate::ui::data::{FormBuffers, FormField, Mode};
use crate::ui::session::SessionState;
use crate::ui::shortcuts;

pub const APP_TITLE: &str = "git-user";
pub const FILTER_PLACEHOLDER: &str = "fuzzy filter (/, esc)";
pub const NAME_PLACEHOLDER: &str = "Full Name";
pub const EMAIL_PLACEHOLDER: &str = "name@example.com";

pub fn render(f: &mut Frame, state: &SessionState, palette: ThemePalette) {
    f.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // title + status
            Constraint::Length(1), // error
            Constraint::Min(0),    // list or form
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    let header = Line::from(vec![
        Span::styled(APP_TITLE, palette.title()),
        Span::raw("  "),
        Span::styled(state.status().to_string(), palette.status_style()),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    if let Some(err) = state.error() {
        f.render_widget(
            Paragraph::new(Span::styled(format!("! {err}"), palette.error_style())),
            chunks[1],
        );
    }

    match state.mode() {
        Mode::Browse { filtering } => render_browse(f, chunks[2], state, *filtering, palette),
        Mode::AddForm { form } | Mode::EditForm { form, .. } => {
            render_form(f, chunks[2], state.mode().title(), form, palette)
        }
    }

    let footer = Paragraph::new(shortcuts::footer_legend(state.mode()))
        .style(palette.hint_style())
        .wrap(Wrap { trim: true });
    f.render_widget(footer, chunks[3]);
}

fn render_browse(
    f: &mut Frame,
    area: Rect,
    state: &SessionState,
    filtering: bool,
    palette: ThemePalette,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let query = state.filter_query();
    let filter_line = if query.is_empty() && !filtering {
        Line::from(Span::styled(FILTER_PLACEHOLDER, palette.hint_style()))
    } else {
        let mut spans = vec![Span::styled(query.to_string(), Style::default().fg(palette.fg))];
        if filtering {
            spans.push(Span::styled("▏", Style::default().fg(palette.accent)));
        }
        Line::from(spans)
    };
    let filter_border = if filtering {
        palette.border_focus_style()
    } else {
        palette.border_style()
    };
    let filter = Paragraph::new(filter_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(filter_border)
            .title(Span::styled("Filter", palette.hint_style())),
    );
    f.render_widget(filter, rows[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(Span::styled(
            format!(
                "{} ({}/{})",
                state.mode().title(),
                state.visible_len(),
                state.all_identities().len()
            ),
            palette.title(),
        ));

    if state.visible_len() == 0 {
        let empty = if state.all_identities().is_empty() {
            "no identities yet, press a to add one".to_string()
        } else {
            format!("no matches for \"{query}\"")
        };
        f.render_widget(
            Paragraph::new(Span::styled(empty, palette.hint_style())).block(block),
            rows[1],
        );
        return;
    }

    let items: Vec<ListItem> = state
        .visible()
        .map(|identity| {
            ListItem::new(Line::from(vec![
                Span::styled(identity.name.clone(), Style::default().fg(palette.fg)),
                Span::raw(" "),
                Span::styled(format!("<{}>", identity.email), palette.hint_style()),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.selected_style())
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    list_state.select(state.selection());
    f.render_stateful_widget(list, rows[1], &mut list_state);
}

fn render_form(f: &mut Frame, area: Rect, title: &str, form: &FormBuffers, palette: ThemePalette) {
    let field = |label: &'static str, value: &str, placeholder: &'static str, which: FormField| {
        let focused = form.focus == which;
        let marker = if focused {
            Span::styled("> ", Style::default().fg(palette.accent_alt))
        } else {
            Span::raw("  ")
        };
        let label_style = if focused {
            palette.title()
        } else {
            palette.hint_style()
        };
        let value = if value.is_empty() {
            Span::styled(placeholder, palette.hint_style())
        } else {
            Span::styled(value.to_string(), Style::default().fg(palette.fg))
        };
        Line::from(vec![marker, Span::styled(label, label_style), value])
    };

    let lines = vec![
        field("Name: ", &form.name, NAME_PLACEHOLDER, FormField::Name),
        Line::raw(""),
        field("Email: ", &form.email, EMAIL_PLACEHOLDER, FormField::Email),
    ];
    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_focus_style())
            .style(Style::default().bg(palette.surface))
            .title(Span::styled(title.to_string(), palette.title())),
    );
    f.render_widget(body, area);
}
