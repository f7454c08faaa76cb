//! Interactive board configurator. One event loop owns the terminal: key
//! events mutate the store, the store is re-rendered every frame, and a
//! single background advice request at a time reports back over a channel.

use std::io::{self, stdout, Stdout};
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color as TuiColor, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::advisor::client::{spawn_advice_request, AdviceOutcome, AdvisorClient};
use crate::advisor::protocol::AdvisorRequest;
use crate::cli::board_display::{
    color_char_lower, render_board, RECOMMENDED_EDGE_CHAR, ROBBER_CHAR,
};
use crate::coords::CubeCoord;
use crate::scenario;
use crate::store::{BoardStore, TileKind};
use crate::types::{BuildingKind, Color, DevelopmentCard, Resource};

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Number tokens in cycling order; 7 never appears on a tile.
const TOKENS: [u8; 10] = [2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Tiles,
    Ports,
    Nodes,
    Edges,
    Hands,
}

impl Pane {
    const ORDER: [Pane; 5] = [Pane::Tiles, Pane::Ports, Pane::Nodes, Pane::Edges, Pane::Hands];

    fn next(self) -> Pane {
        let idx = Self::ORDER.iter().position(|p| *p == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Pane {
        let idx = Self::ORDER.iter().position(|p| *p == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn title(self) -> &'static str {
        match self {
            Pane::Tiles => "Tiles",
            Pane::Ports => "Ports",
            Pane::Nodes => "Nodes",
            Pane::Edges => "Edges",
            Pane::Hands => "Hands",
        }
    }
}

/// Rows of the hands pane: five resources, five dev cards, played knights.
const HAND_ROWS: usize = Resource::ALL.len() + DevelopmentCard::ALL.len() + 1;

pub struct App {
    store: BoardStore,
    client: AdvisorClient,
    pane: Pane,
    tile_idx: usize,
    port_idx: usize,
    node_idx: usize,
    edge_idx: usize,
    hand_color_idx: usize,
    hand_row: usize,
    piece_color_idx: usize,
    piece_kind: BuildingKind,
    loading: bool,
    next_seq: u64,
    pending: Option<(u64, mpsc::Receiver<AdviceOutcome>)>,
    error: Option<String>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    pub fn new(store: BoardStore, client: AdvisorClient) -> Self {
        Self {
            store,
            client,
            pane: Pane::Tiles,
            tile_idx: 0,
            port_idx: 0,
            node_idx: 0,
            edge_idx: 0,
            hand_color_idx: 0,
            hand_row: 0,
            piece_color_idx: 0,
            piece_kind: BuildingKind::Settlement,
            loading: false,
            next_seq: 0,
            pending: None,
            error: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = loop {
            if self.should_quit {
                break Ok(());
            }

            self.poll_pending();
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        };

        let _ = terminal.clear();
        let _ = disable_raw_mode();
        let _ = terminal.show_cursor();
        result
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Tab => self.pane = self.pane.next(),
            KeyCode::BackTab => self.pane = self.pane.prev(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left if self.pane == Pane::Hands => self.shift_hand_color(-1),
            KeyCode::Right if self.pane == Pane::Hands => self.shift_hand_color(1),
            KeyCode::Char('c') => {
                self.piece_color_idx = (self.piece_color_idx + 1) % self.store.active_colors().len();
            }
            KeyCode::Char('k') => {
                self.piece_kind = match self.piece_kind {
                    BuildingKind::Settlement => BuildingKind::City,
                    BuildingKind::City => BuildingKind::Settlement,
                };
            }
            KeyCode::Char('a') => self.request_advice(),
            KeyCode::Char('x') => {
                scenario::generate(&mut self.store, &mut rand::thread_rng());
                self.error = None;
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selection(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_selection(1),
            KeyCode::Char('-') | KeyCode::Char('_') => self.adjust_selection(-1),
            KeyCode::Delete | KeyCode::Backspace => self.clear_selection(),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let (idx, len) = match self.pane {
            Pane::Tiles => (&mut self.tile_idx, self.store.template().land_coords().len()),
            Pane::Ports => (&mut self.port_idx, self.store.template().port_coords().len()),
            Pane::Nodes => (&mut self.node_idx, self.store.template().nodes.len()),
            Pane::Edges => (&mut self.edge_idx, self.store.template().edges.len()),
            Pane::Hands => (&mut self.hand_row, HAND_ROWS),
        };
        if len == 0 {
            return;
        }
        let next = (*idx as i32 + delta).rem_euclid(len as i32) as usize;
        *idx = next;
    }

    fn shift_hand_color(&mut self, delta: i32) {
        let len = self.store.active_colors().len() as i32;
        self.hand_color_idx = (self.hand_color_idx as i32 + delta).rem_euclid(len) as usize;
    }

    fn piece_color(&self) -> Color {
        self.store.active_colors()[self.piece_color_idx % self.store.active_colors().len()]
    }

    fn hand_color(&self) -> Color {
        self.store.active_colors()[self.hand_color_idx % self.store.active_colors().len()]
    }

    fn selected_tile(&self) -> Option<CubeCoord> {
        self.store.template().land_coords().get(self.tile_idx).copied()
    }

    /// Enter/Space: cycle the tile or port value, or toggle the piece.
    fn activate_selection(&mut self) {
        match self.pane {
            Pane::Tiles => {
                if let Some(coord) = self.selected_tile() {
                    let config = self.store.tile(coord);
                    let next = next_tile_kind(config.kind);
                    self.store.set_tile(coord, next, config.number);
                }
            }
            Pane::Ports => {
                if let Some(coord) = self.store.template().port_coords().get(self.port_idx).copied()
                {
                    let next = next_port_resource(self.store.port(coord));
                    self.store.set_port(coord, next);
                }
            }
            Pane::Nodes => {
                if let Some(node) = self.store.template().nodes.get(self.node_idx) {
                    let (id, color, kind) = (node.id, self.piece_color(), self.piece_kind);
                    self.store.toggle_node(id, color, kind);
                }
            }
            Pane::Edges => {
                if let Some(edge) = self.store.template().edges.get(self.edge_idx) {
                    let (a, b) = edge.node_ids;
                    let color = self.piece_color();
                    self.store.toggle_edge(a, b, color);
                }
            }
            Pane::Hands => self.adjust_selection(1),
        }
    }

    /// +/-: number token on tiles, count deltas on hands.
    fn adjust_selection(&mut self, delta: i32) {
        match self.pane {
            Pane::Tiles => {
                if let Some(coord) = self.selected_tile() {
                    let config = self.store.tile(coord);
                    if let Some(TileKind::Resource(_)) = config.kind {
                        let number = step_token(config.number, delta);
                        self.store.set_tile(coord, config.kind, Some(number));
                    }
                }
            }
            Pane::Hands => {
                let color = self.hand_color();
                let row = self.hand_row;
                if row < Resource::ALL.len() {
                    self.store.adjust_resource(color, Resource::ALL[row], delta);
                } else if row < Resource::ALL.len() + DevelopmentCard::ALL.len() {
                    let card = DevelopmentCard::ALL[row - Resource::ALL.len()];
                    self.store.adjust_dev_card(color, card, delta);
                } else {
                    self.store.adjust_knights(color, delta);
                }
            }
            _ => {}
        }
    }

    fn clear_selection(&mut self) {
        match self.pane {
            Pane::Tiles => {
                if let Some(coord) = self.selected_tile() {
                    self.store.set_tile(coord, None, None);
                }
            }
            Pane::Ports => {
                if let Some(coord) = self.store.template().port_coords().get(self.port_idx).copied()
                {
                    self.store.set_port(coord, None);
                }
            }
            _ => {}
        }
    }

    /// Kick off one background advice request. Refused while incomplete or
    /// while another request is in flight.
    fn request_advice(&mut self) {
        if self.loading {
            return;
        }
        if !self.store.is_complete() {
            self.error = Some("board is incomplete: assign every tile, one desert, all numbers".into());
            return;
        }
        match AdvisorRequest::from_store(&self.store) {
            Ok(request) => {
                self.next_seq += 1;
                info!(seq = self.next_seq, "submitting advice request");
                let rx = spawn_advice_request(self.client.clone(), request, self.next_seq);
                self.pending = Some((self.next_seq, rx));
                self.loading = true;
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Drain the worker channel. A result tagged with a superseded sequence
    /// number is discarded instead of overwriting newer state.
    fn poll_pending(&mut self) {
        let Some((seq, rx)) = self.pending.take() else {
            return;
        };
        match rx.try_recv() {
            Ok(AdviceOutcome { seq: got, result }) => {
                self.loading = false;
                if got != seq {
                    info!(expected = seq, got, "dropping stale advice result");
                    return;
                }
                match result {
                    Ok(advice) => {
                        self.store.set_advice(advice);
                        self.error = None;
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            Err(mpsc::TryRecvError::Empty) => self.pending = Some((seq, rx)),
            Err(mpsc::TryRecvError::Disconnected) => {
                self.loading = false;
                self.error = Some("advice request was abandoned".into());
            }
        }
    }

    fn render(&mut self, f: &mut Frame<'_>) {
        let area = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(20), Constraint::Length(3)])
            .split(area);

        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(chunks[0]);

        self.render_board_panel(f, main[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Percentage(55),
                Constraint::Min(8),
            ])
            .split(main[1]);
        self.render_config_summary(f, right[0]);
        self.render_pane_list(f, right[1]);
        self.render_advice_panel(f, right[2]);

        self.render_status_bar(f, chunks[1]);
    }

    fn render_board_panel(&self, f: &mut Frame<'_>, area: Rect) {
        let selected = (self.pane == Pane::Tiles).then(|| self.selected_tile()).flatten();
        let rendered = render_board(&self.store, selected);

        let mut span_lookup = std::collections::HashMap::new();
        for (node_id, span) in &rendered.node_spans {
            span_lookup.insert((span.row, span.col_start), (*node_id, *span));
        }
        let recommended = self.store.recommended_node();

        let lines: Vec<Line<'_>> = rendered
            .text
            .lines()
            .enumerate()
            .map(|(row_idx, line)| {
                let chars: Vec<char> = line.chars().collect();
                let mut spans: Vec<Span<'_>> = Vec::new();
                let mut col = 0;
                while col < chars.len() {
                    if let Some((node_id, span)) = span_lookup.get(&(row_idx, col)) {
                        if let Some(style) = self.node_style(*node_id, recommended) {
                            let segment: String = chars[col..col + span.len].iter().collect();
                            spans.push(Span::styled(segment, style));
                            col += span.len;
                            continue;
                        }
                    }
                    let ch = chars[col];
                    spans.push(Span::styled(ch.to_string(), board_char_style(ch)));
                    col += 1;
                }
                Line::from(spans)
            })
            .collect();

        let block = Block::default().borders(Borders::ALL).title("Board").title_style(
            Style::default().fg(TuiColor::Yellow).add_modifier(Modifier::BOLD),
        );
        f.render_widget(
            Paragraph::new(lines).block(block).alignment(Alignment::Left).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn node_style(&self, node_id: u16, recommended: Option<u16>) -> Option<Style> {
        if recommended == Some(node_id) {
            return Some(
                Style::default()
                    .fg(TuiColor::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            );
        }
        let building = self.store.building_at(node_id)?;
        let mut style = Style::default().fg(player_color(building.color));
        if building.kind == BuildingKind::City {
            style = style.add_modifier(Modifier::BOLD);
        }
        Some(style)
    }

    fn render_config_summary(&self, f: &mut Frame<'_>, area: Rect) {
        let piece_color = self.piece_color();
        let lines = vec![
            Line::from(vec![
                Span::raw("Placing: "),
                Span::styled(
                    format!("{} {}", piece_color, self.piece_kind),
                    Style::default()
                        .fg(player_color(piece_color))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw("Board: "),
                if self.store.is_complete() {
                    Span::styled("complete", Style::default().fg(TuiColor::Green))
                } else {
                    Span::styled("incomplete", Style::default().fg(TuiColor::Red))
                },
                Span::raw(format!("   Players: {}", self.store.num_players())),
                Span::raw(format!("   Advising: {}", self.store.advised())),
            ]),
        ];
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Setup")),
            area,
        );
    }

    fn render_pane_list(&self, f: &mut Frame<'_>, area: Rect) {
        let (items, selected) = match self.pane {
            Pane::Tiles => (self.tile_items(), self.tile_idx),
            Pane::Ports => (self.port_items(), self.port_idx),
            Pane::Nodes => (self.node_items(), self.node_idx),
            Pane::Edges => (self.edge_items(), self.edge_idx),
            Pane::Hands => (self.hand_items(), self.hand_row),
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} (Tab to switch)", self.pane.title())),
            )
            .highlight_style(
                Style::default().fg(TuiColor::Yellow).add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(selected));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn tile_items(&self) -> Vec<ListItem<'static>> {
        self.store
            .template()
            .land_coords()
            .iter()
            .enumerate()
            .map(|(idx, coord)| {
                let config = self.store.tile(*coord);
                let kind = match config.kind {
                    Some(TileKind::Resource(resource)) => resource.to_string(),
                    Some(TileKind::Desert) => "DESERT".to_string(),
                    None => "-".to_string(),
                };
                let number = config
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let robber = if self.store.robber() == Some(*coord) {
                    "  [robber]"
                } else {
                    ""
                };
                ListItem::new(format!("T{idx:02} {coord}  {kind} {number}{robber}"))
            })
            .collect()
    }

    fn port_items(&self) -> Vec<ListItem<'static>> {
        self.store
            .template()
            .port_tiles()
            .map(|port| {
                let trade = match self.store.port(port.coordinate) {
                    Some(resource) => format!("{resource} 2:1"),
                    None => "Any 3:1".to_string(),
                };
                ListItem::new(format!(
                    "P{} {} {}  {trade}",
                    port.id, port.coordinate, port.direction
                ))
            })
            .collect()
    }

    fn node_items(&self) -> Vec<ListItem<'static>> {
        self.store
            .template()
            .nodes
            .iter()
            .map(|node| {
                let occupancy = match self.store.building_at(node.id) {
                    Some(building) => format!("  {} {}", building.color, building.kind),
                    None => String::new(),
                };
                let marker = if self.store.recommended_node() == Some(node.id) {
                    "  << advised"
                } else {
                    ""
                };
                ListItem::new(format!("Node {:2}{occupancy}{marker}", node.id))
            })
            .collect()
    }

    fn edge_items(&self) -> Vec<ListItem<'static>> {
        let recommended = self.store.recommended_edge();
        self.store
            .template()
            .edges
            .iter()
            .map(|edge| {
                let (a, b) = edge.node_ids;
                let occupancy = match self.store.road_at(a, b) {
                    Some(color) => format!("  {color} road"),
                    None => String::new(),
                };
                let marker = match recommended {
                    Some((ra, rb))
                        if (ra, rb) == (a, b) || (rb, ra) == (a, b) =>
                    {
                        "  << advised"
                    }
                    _ => "",
                };
                ListItem::new(format!("Edge {a:2}-{b:2}{occupancy}{marker}"))
            })
            .collect()
    }

    fn hand_items(&self) -> Vec<ListItem<'static>> {
        let color = self.hand_color();
        let hand = self.store.hand(color);
        let mut items: Vec<ListItem<'static>> = Vec::with_capacity(HAND_ROWS);
        for resource in Resource::ALL {
            items.push(ListItem::new(format!(
                "{color} {resource}: {}",
                hand.resources.get(resource)
            )));
        }
        for card in DevelopmentCard::ALL {
            items.push(ListItem::new(format!(
                "{color} {card}: {}",
                hand.dev_cards.get(card)
            )));
        }
        items.push(ListItem::new(format!(
            "{color} knights played: {}",
            hand.knights_played
        )));
        items
    }

    fn render_advice_panel(&self, f: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line<'_>> = Vec::new();

        if self.loading {
            lines.push(Line::from(Span::styled(
                "Waiting for the advisor...",
                Style::default().fg(TuiColor::Cyan),
            )));
        }
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(TuiColor::Red),
            )));
        }
        if let Some(advice) = self.store.advice() {
            if let Some(action) = &advice.action_type {
                lines.push(Line::from(vec![
                    Span::raw("Action: "),
                    Span::styled(
                        action.clone(),
                        Style::default().fg(TuiColor::Yellow).add_modifier(Modifier::BOLD),
                    ),
                ]));
            }
            if let Some(explanation) = &advice.explanation {
                lines.push(Line::from(explanation.clone()));
            }
            if let Some(points) = &advice.victory_points {
                let tally = points
                    .iter()
                    .map(|(color, vp)| format!("{color} {vp}"))
                    .collect::<Vec<_>>()
                    .join("  ");
                lines.push(Line::from(format!("Victory points: {tally}")));
            }
            if let Some(all) = &advice.all_actions {
                lines.push(Line::from(format!("{} legal actions considered", all.len())));
            }
        }
        if lines.is_empty() {
            lines.push(Line::from(
                "Press 'a' for advice once the board is complete.",
            ));
        }

        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Advice"))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_status_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let text = if self.show_help {
            "Tab: pane | Up/Down: select | Enter: cycle/toggle | +/-: number or count | Del: unset | c: color | k: settlement/city | x: random scenario | a: advice | q: quit"
        } else {
            "Press 'h' for help"
        };
        f.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            area,
        );
    }
}

fn next_tile_kind(current: Option<TileKind>) -> Option<TileKind> {
    match current {
        None => Some(TileKind::Resource(Resource::Wood)),
        Some(TileKind::Resource(resource)) => {
            let idx = Resource::ALL.iter().position(|r| *r == resource).unwrap_or(0);
            if idx + 1 < Resource::ALL.len() {
                Some(TileKind::Resource(Resource::ALL[idx + 1]))
            } else {
                Some(TileKind::Desert)
            }
        }
        Some(TileKind::Desert) => None,
    }
}

fn next_port_resource(current: Option<Resource>) -> Option<Resource> {
    match current {
        None => Some(Resource::ALL[0]),
        Some(resource) => {
            let idx = Resource::ALL.iter().position(|r| *r == resource).unwrap_or(0);
            if idx + 1 < Resource::ALL.len() {
                Some(Resource::ALL[idx + 1])
            } else {
                None
            }
        }
    }
}

/// Step through the valid tokens, wrapping at either end.
fn step_token(current: Option<u8>, delta: i32) -> u8 {
    let len = TOKENS.len() as i32;
    match current.and_then(|n| TOKENS.iter().position(|t| *t == n)) {
        Some(idx) => TOKENS[(idx as i32 + delta).rem_euclid(len) as usize],
        None => {
            if delta >= 0 {
                TOKENS[0]
            } else {
                TOKENS[TOKENS.len() - 1]
            }
        }
    }
}

fn player_color(color: Color) -> TuiColor {
    match color {
        Color::Red => TuiColor::Red,
        Color::Blue => TuiColor::Blue,
        Color::Orange => TuiColor::Magenta,
        Color::White => TuiColor::White,
    }
}

fn board_char_style(ch: char) -> Style {
    match ch {
        'W' => Style::default().fg(TuiColor::Green),
        'B' => Style::default().fg(TuiColor::LightRed),
        'S' => Style::default().fg(TuiColor::White),
        'H' => Style::default().fg(TuiColor::Yellow),
        'O' => Style::default().fg(TuiColor::Magenta),
        'D' => Style::default().fg(TuiColor::DarkGray),
        ROBBER_CHAR => Style::default().fg(TuiColor::Red).add_modifier(Modifier::BOLD),
        RECOMMENDED_EDGE_CHAR => Style::default()
            .fg(TuiColor::Yellow)
            .add_modifier(Modifier::BOLD),
        c if c == color_char_lower(Color::Red) => {
            Style::default().fg(TuiColor::Red).add_modifier(Modifier::BOLD)
        }
        c if c == color_char_lower(Color::Blue) => {
            Style::default().fg(TuiColor::Blue).add_modifier(Modifier::BOLD)
        }
        c if c == color_char_lower(Color::Orange) => Style::default()
            .fg(TuiColor::Magenta)
            .add_modifier(Modifier::BOLD),
        c if c == color_char_lower(Color::White) => {
            Style::default().fg(TuiColor::White).add_modifier(Modifier::BOLD)
        }
        _ => Style::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_kind_cycle_visits_every_state() {
        let mut kind = None;
        let mut seen = 0;
        loop {
            kind = next_tile_kind(kind);
            seen += 1;
            if kind.is_none() {
                break;
            }
            assert!(seen <= Resource::ALL.len() + 1);
        }
        // Five resources, desert, then back to unset.
        assert_eq!(seen, Resource::ALL.len() + 2);
    }

    #[test]
    fn token_stepping_skips_seven() {
        assert_eq!(step_token(Some(6), 1), 8);
        assert_eq!(step_token(Some(8), -1), 6);
        assert_eq!(step_token(Some(12), 1), 2);
        assert_eq!(step_token(None, 1), 2);
        assert_eq!(step_token(None, -1), 12);
    }

    #[test]
    fn port_cycle_returns_to_generic() {
        let mut current = None;
        for _ in 0..Resource::ALL.len() {
            current = next_port_resource(current);
            assert!(current.is_some());
        }
        assert_eq!(next_port_resource(current), None);
    }
}
