use super::Frame;
use crate::api::EntityType;
use crate::state::{Focus, SearchPhase, State};
use crate::ui::widgets::{spinner, styling};
use crate::utils::text_processing::match_ranges;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

/// Render the entity type tabs.
///
pub fn type_bar(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let active = state.picker().active();
    let focused = state.current_focus() == Focus::TypeBar;

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(&theme));
    if focused {
        block = block
            .border_style(styling::active_block_border_style(&theme))
            .title(Span::styled("Entity type", styling::active_block_title_style()));
    } else {
        block = block.title("Entity type");
    }

    let titles: Vec<Line> = EntityType::ALL
        .iter()
        .enumerate()
        .map(|(i, entity)| Line::from(format!("{} {}", i + 1, entity.title())))
        .collect();
    let selected = EntityType::ALL
        .iter()
        .position(|entity| *entity == active)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(styling::dim_text_style(&theme))
        .highlight_style(styling::active_list_item_style(&theme))
        .block(block);
    frame.render_widget(tabs, size);
}

/// Render the query input for the active entity type.
///
pub fn search_input(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let focused = state.current_focus() == Focus::Search;
    let record = state.picker().active_state();

    let title = format!("Search {}", state.picker().active().title().to_lowercase());
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(&theme));
    if focused {
        block = block
            .border_style(styling::active_block_border_style(&theme))
            .title(Span::styled(title, styling::active_block_title_style()));
    } else {
        block = block.title(title);
    }

    let mut spans = vec![Span::styled(
        record.query().to_owned(),
        styling::normal_text_style(&theme),
    )];
    if focused {
        spans.push(Span::styled("█", styling::dim_text_style(&theme)));
    }
    if record.is_loading() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            spinner::frame(state.get_spinner_index()),
            styling::active_list_item_style(&theme),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, size);
}

/// Render the results list for the active entity type.
///
pub fn results(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let focused = state.current_focus() == Focus::Results;
    let picker = state.picker();
    let record = picker.active_state();

    let title = match record.phase() {
        SearchPhase::Populated | SearchPhase::LoadingMore => {
            format!("Results ({})", record.hits().len())
        }
        _ => "Results".to_string(),
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(&theme));
    if focused {
        block = block
            .border_style(styling::active_block_border_style(&theme))
            .title(Span::styled(title, styling::active_block_title_style()));
    } else {
        block = block.title(title);
    }

    // Phases without rows render a single placeholder line.
    let placeholder = match record.phase() {
        SearchPhase::Idle => Some(Line::from(Span::styled(
            "Type at least 2 characters to search",
            styling::dim_text_style(&theme),
        ))),
        SearchPhase::Searching if record.hits().is_empty() => Some(Line::from(vec![
            Span::styled(
                spinner::frame(state.get_spinner_index()),
                styling::active_list_item_style(&theme),
            ),
            Span::styled(" Searching…", styling::dim_text_style(&theme)),
        ])),
        SearchPhase::Empty => Some(Line::from(Span::styled(
            "No results found",
            styling::dim_text_style(&theme),
        ))),
        SearchPhase::Errored => Some(Line::from(Span::styled(
            record.error().unwrap_or("Loading error").to_owned(),
            styling::error_text_style(&theme),
        ))),
        _ => None,
    };
    if let Some(line) = placeholder {
        let paragraph = Paragraph::new(line).block(block);
        frame.render_widget(paragraph, size);
        return;
    }

    let query = record.query().trim().to_owned();
    let mut items: Vec<ListItem> = record
        .hits()
        .iter()
        .map(|hit| {
            let marker = if picker.is_selected(hit.id) {
                Span::styled("● ", styling::active_list_item_style(&theme))
            } else {
                Span::raw("  ")
            };
            let mut spans = vec![marker];
            spans.extend(highlighted_spans(&hit.name, &query, &theme));

            let mut lines = vec![Line::from(spans)];
            if let Some(detail) = organization_detail(hit) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", detail),
                    styling::dim_text_style(&theme),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    // Trailing row mirrors the source widget's load-more button.
    if record.phase() == SearchPhase::LoadingMore {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                spinner::frame(state.get_spinner_index()),
                styling::active_list_item_style(&theme),
            ),
            Span::styled(" Loading more…", styling::dim_text_style(&theme)),
        ])));
    } else if record.has_more() {
        items.push(ListItem::new(Line::from(Span::styled(
            "m: load more",
            styling::dim_text_style(&theme),
        ))));
    }
    if let Some(error) = record.error() {
        items.push(ListItem::new(Line::from(Span::styled(
            error.to_owned(),
            styling::error_text_style(&theme),
        ))));
    }

    let list = List::new(items)
        .style(styling::normal_text_style(&theme))
        .highlight_style(if focused {
            styling::active_list_item_style(&theme)
        } else {
            styling::current_list_item_style(&theme)
        })
        .block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(record.cursor()));
    frame.render_stateful_widget(list, size, &mut list_state);
}

/// Split a name into styled spans with query matches highlighted.
///
fn highlighted_spans<'a>(
    name: &'a str,
    query: &str,
    theme: &crate::ui::Theme,
) -> Vec<Span<'a>> {
    let base = styling::normal_text_style(theme);
    let highlight = styling::highlight_text_style(theme);
    spans_for_ranges(name, match_ranges(name, query), base, highlight)
}

fn spans_for_ranges(
    text: &str,
    ranges: Vec<(usize, usize)>,
    base: Style,
    highlight: Style,
) -> Vec<Span<'_>> {
    if ranges.is_empty() {
        return vec![Span::styled(text, base)];
    }
    let mut spans = vec![];
    let mut position = 0;
    for (start, end) in ranges {
        if start > position {
            spans.push(Span::styled(&text[position..start], base));
        }
        spans.push(Span::styled(&text[start..end], highlight));
        position = end;
    }
    if position < text.len() {
        spans.push(Span::styled(&text[position..], base));
    }
    spans
}

/// Secondary line for organization rows: codes and owning ministry.
///
fn organization_detail(hit: &crate::api::EntityHit) -> Option<String> {
    let mut parts = vec![];
    if let Some(okpo) = &hit.okpo {
        parts.push(format!("OKPO {}", okpo));
    }
    if let Some(ynp) = &hit.ynp {
        parts.push(format!("YNP {}", ynp));
    }
    if let Some(ministry) = &hit.ministry {
        parts.push(ministry.clone());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}
