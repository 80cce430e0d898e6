use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        BarChart, Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row,
        Sparkline, Table, Wrap,
    },
    Frame,
};
use slotscope_core::{
    calculators::BonusOutcome,
    filter::Feature,
    models::GameRecord,
    stats::{
        self, bet_range_win_probabilities, hourly_bet_summaries, top_winners,
        winning_amounts_over_time, CatalogSummary, NamedCount, TOP_WINNER_COUNT,
    },
};

use super::{
    wager_results, Form, GamesPanel, ListCursor, LoadState, Screen, SlotscopeApp,
    BONUS_AMOUNT, BONUS_BASE, BONUS_MULTIPLIER, BONUS_RTP, MENU_ITEMS,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const FIELD_LABEL_WIDTH: usize = 18;
const MARKER_WIDTH: u16 = 2;

impl SlotscopeApp {
    pub(super) fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Menu => self.draw_menu(frame),
            Screen::Games => self.draw_games(frame),
            Screen::Provider => self.draw_provider(frame),
            Screen::Dashboard => self.draw_dashboard(frame),
            Screen::Pots => self.draw_pots(frame),
            Screen::Bonus => self.draw_bonus(frame),
        }
        if self.wager.is_some() {
            self.render_wager_modal(frame);
        }
    }

    fn split_status(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);
        (chunks[0], chunks[1])
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let (body, status) = Self::split_status(frame.size());
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(body);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "S L O T S C O P E",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::raw("games: "),
                self.load_span(&self.games_state, self.catalog.games().len()),
                Span::raw("   pots: "),
                self.load_span(&self.pots_state, self.catalog.pots().len()),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let menu_height = (MENU_ITEMS.len() as u16 * 2 + 2).min(layout[1].height);
        let menu_area = centered_rect(30.min(layout[1].width.max(1)), menu_height, layout[1]);
        let lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .flat_map(|(idx, (item, _))| {
                let line = if idx == self.menu_cursor {
                    Line::from(Span::styled(
                        format!("▶ {item}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {item}"),
                        Style::default().fg(self.theme.primary_fg),
                    ))
                };
                [line, Line::from("")]
            })
            .collect();
        let menu = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .alignment(Alignment::Center);
        frame.render_widget(menu, menu_area);
        self.render_status(frame, status, "j/k move  Enter open  q quit");
    }

    fn load_span(&self, state: &LoadState, count: usize) -> Span<'static> {
        match state {
            LoadState::Loading => Span::styled(
                format!("loading {}", SPINNER[self.tick % SPINNER.len()]),
                Style::default().fg(self.theme.warning),
            ),
            LoadState::Ready => Span::styled(
                format!("{count} loaded"),
                Style::default().fg(self.theme.success),
            ),
            LoadState::Failed(_) => {
                Span::styled("failed", Style::default().fg(self.theme.danger))
            }
        }
    }

    fn draw_games(&mut self, frame: &mut Frame) {
        let (body, status) = Self::split_status(frame.size());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(40),
                Constraint::Percentage(35),
            ])
            .split(body);
        let pickers = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),
                Constraint::Length(Feature::ALL.len() as u16 + 2),
            ])
            .split(columns[0]);

        self.render_tag_picker(frame, pickers[0]);
        self.render_feature_picker(frame, pickers[1]);
        self.render_game_list(frame, columns[1]);
        let detail = Block::default().borders(Borders::ALL).title("Game Details");
        match self.current_game() {
            Some(game) => self.render_game_details(frame, columns[2], game, detail),
            None => frame.render_widget(
                Paragraph::new(self.empty_games_message()).block(detail),
                columns[2],
            ),
        }
        let hints = match self.panel {
            GamesPanel::List => {
                "j/k move  m more  s sort  c clear  t tags  f features  p provider  w wager  Esc back"
            }
            GamesPanel::Tags | GamesPanel::Features => "j/k move  Space toggle  Tab next  Esc list",
        };
        self.render_status(frame, status, hints);
    }

    fn empty_games_message(&self) -> String {
        match &self.games_state {
            LoadState::Loading => "Loading games...".to_string(),
            LoadState::Failed(err) => format!("Games unavailable: {err}"),
            LoadState::Ready if self.catalog.games().is_empty() => "No games available".to_string(),
            LoadState::Ready => "No games match the current filter".to_string(),
        }
    }

    fn panel_block(&self, title: String, focused: bool) -> Block<'static> {
        let style = if focused {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title)
    }

    fn render_tag_picker(&mut self, frame: &mut Frame, area: Rect) {
        self.tag_list.height = area.height.saturating_sub(2) as usize;
        self.tag_list.ensure_visible(self.tags.len());
        let focused = self.panel == GamesPanel::Tags;
        let range = self.tag_list.visible_range(self.tags.len());
        let items: Vec<ListItem> = self.tags[range.clone()]
            .iter()
            .enumerate()
            .map(|(idx, tag)| {
                let checked = if self.filter.selected_tags.contains(tag) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let style = if focused && range.start + idx == self.tag_list.cursor {
                    Style::default().bg(self.theme.selection_bg)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(format!("{checked}{tag}"))).style(style)
            })
            .collect();
        let title = format!("Tags ({} selected)", self.filter.selected_tags.len());
        frame.render_widget(List::new(items).block(self.panel_block(title, focused)), area);
    }

    fn render_feature_picker(&self, frame: &mut Frame, area: Rect) {
        let focused = self.panel == GamesPanel::Features;
        let items: Vec<ListItem> = Feature::ALL
            .iter()
            .enumerate()
            .map(|(idx, feature)| {
                let checked = if self.filter.selected_features.contains(feature) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let style = if focused && idx == self.feature_cursor {
                    Style::default().bg(self.theme.selection_bg)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(format!("{checked}{}", feature.label()))).style(style)
            })
            .collect();
        frame.render_widget(
            List::new(items).block(self.panel_block("Features (all of)".to_string(), focused)),
            area,
        );
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        let len = self.visible_game_count();
        self.game_list.height = area.height.saturating_sub(2) as usize;
        self.game_list.ensure_visible(len);
        let title = format!(
            "Games {}/{} · sort: {}",
            len,
            self.filtered.len(),
            self.filter.sort_option
        );
        let block = self.panel_block(title, self.panel == GamesPanel::List);
        let games = self.filtered_games();
        render_games(
            frame,
            area,
            &games[..len],
            self.game_list,
            block,
            &self.theme,
        );
    }

    fn render_game_details(&self, frame: &mut Frame, area: Rect, game: &GameRecord, block: Block) {
        let mut lines = vec![
            Line::from(Span::styled(
                game.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} · {}", game.provider.name, game.category.name),
                Style::default().fg(self.theme.muted),
            )),
            Line::from(""),
        ];
        let rtp = match game.rtp() {
            Some(rtp) => format!("RTP: {rtp:.2}% ({})", game.rtp_rating()),
            None => "RTP: unknown".to_string(),
        };
        lines.push(Line::from(rtp));
        lines.push(Line::from(game.volatility_description()));
        let features = game.feature_labels();
        if !features.is_empty() {
            lines.push(Line::from(""));
            lines.extend(features.into_iter().map(|label| Line::from(format!("• {label}"))));
        }
        if !game.tags.is_empty() {
            lines.push(Line::from(""));
            let tags: Vec<&str> = game.tags.iter().map(|tag| tag.name.as_str()).collect();
            lines.push(Line::from(format!("Tags: {}", tags.join(", "))));
        }
        if game.is_new {
            lines.push(Line::from(Span::styled(
                "New release",
                Style::default().fg(self.theme.success),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }

    fn draw_provider(&mut self, frame: &mut Frame) {
        let (body, status) = Self::split_status(frame.size());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body);
        let name = self.provider.clone().unwrap_or_default();

        self.provider_list.height = columns[0].height.saturating_sub(2) as usize;
        self.provider_list.ensure_visible(self.provider_games.len());
        render_games(
            frame,
            columns[0],
            &self.provider_games,
            self.provider_list,
            Block::default().borders(Borders::ALL).title(name.clone()),
            &self.theme,
        );

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(5)])
            .split(columns[1]);
        let summary = stats::average_rtp_by_provider(&self.provider_games);
        let rtp_line = match summary.first() {
            Some(provider) if provider.has_rtp() => format!(
                "Average RTP {:.2}% over {} of {} games",
                provider.average_rtp, provider.rtp_count, provider.count
            ),
            _ => "No published RTP".to_string(),
        };
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                name,
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{} games", self.provider_games.len())),
            Line::from(rtp_line),
        ])
        .block(Block::default().borders(Borders::ALL).title("Provider"));
        frame.render_widget(header, right[0]);

        let detail = Block::default().borders(Borders::ALL).title("Game Details");
        match self.provider_games.get(self.provider_list.cursor) {
            Some(game) => self.render_game_details(frame, right[1], game, detail),
            None => frame.render_widget(Paragraph::new("No games").block(detail), right[1]),
        }
        self.render_status(frame, status, "j/k move  w wager  Esc back");
    }

    fn draw_dashboard(&mut self, frame: &mut Frame) {
        let (body, status) = Self::split_status(frame.size());
        let games = self.scoped_games();
        let summary = CatalogSummary::from_games(&games);
        let providers = stats::average_rtp_by_provider(games.iter().copied());

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Percentage(50),
                Constraint::Min(6),
            ])
            .split(body);

        let overview = Paragraph::new(vec![
            Line::from(format!(
                "{} games · scope: {}",
                summary.total_games,
                self.scope.label()
            )),
            Line::from(format!("Average RTP: {:.2}%", summary.average_rtp)),
        ])
        .block(Block::default().borders(Borders::ALL).title("Overview"));
        frame.render_widget(overview, rows[0]);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        self.render_bar_chart(frame, charts[0], "Top providers", &summary.top_providers);
        self.render_bar_chart(frame, charts[1], "Volatility", &summary.volatility);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[2]);
        let categories: Vec<Row> = summary
            .categories
            .iter()
            .map(|entry| Row::new(vec![entry.name.clone(), entry.count.to_string()]))
            .collect();
        let categories = Table::new(categories, [Constraint::Min(12), Constraint::Length(8)])
            .header(self.table_header(&["Category", "Games"]))
            .block(Block::default().borders(Borders::ALL).title("Categories"));
        frame.render_widget(categories, lower[0]);

        let provider_rows: Vec<Row> = providers
            .iter()
            .map(|provider| {
                let average = if provider.has_rtp() {
                    format!("{:.2}%", provider.average_rtp)
                } else {
                    "n/a".to_string()
                };
                Row::new(vec![
                    provider.name.clone(),
                    provider.count.to_string(),
                    average,
                ])
            })
            .collect();
        let provider_table = Table::new(
            provider_rows,
            [
                Constraint::Min(16),
                Constraint::Length(8),
                Constraint::Length(10),
            ],
        )
        .header(self.table_header(&["Provider", "Games", "Avg RTP"]))
        .block(Block::default().borders(Borders::ALL).title("RTP by provider"));
        frame.render_widget(provider_table, lower[1]);

        self.render_status(frame, status, "a toggle scope (all / filtered)  Esc back");
    }

    fn render_bar_chart(&self, frame: &mut Frame, area: Rect, title: &str, counts: &[NamedCount]) {
        let data: Vec<(&str, u64)> = counts
            .iter()
            .map(|entry| (entry.name.as_str(), entry.count as u64))
            .collect();
        let bar_width = if counts.is_empty() {
            1
        } else {
            (area.width.saturating_sub(2) / counts.len() as u16)
                .saturating_sub(1)
                .clamp(3, 12)
        };
        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .data(data.as_slice())
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(self.theme.accent))
            .value_style(
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent),
            );
        frame.render_widget(chart, area);
    }

    fn table_header(&self, titles: &[&'static str]) -> Row<'static> {
        Row::new(titles.iter().map(|title| Cell::from(*title))).style(
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    }

    fn draw_pots(&mut self, frame: &mut Frame) {
        let (body, status) = Self::split_status(frame.size());
        let hints = "o toggle outliers  c toggle win criterion  Esc back";
        if self.pots_state != LoadState::Ready {
            let message = match &self.pots_state {
                LoadState::Failed(err) => format!("Pot data unavailable: {err}"),
                _ => format!("Loading pot data {}", SPINNER[self.tick % SPINNER.len()]),
            };
            frame.render_widget(
                Paragraph::new(message)
                    .block(Block::default().borders(Borders::ALL).title("Pots"))
                    .wrap(Wrap { trim: true }),
                body,
            );
            self.render_status(frame, status, hints);
            return;
        }

        let pots = self.catalog.pots();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Length(7),
                Constraint::Min(6),
            ])
            .split(body);
        let upper = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        let winners: Vec<Row> = top_winners(pots, TOP_WINNER_COUNT)
            .into_iter()
            .map(|winner| {
                Row::new(vec![
                    winner.username,
                    format!("{:.2}", winner.total_won),
                    format!("{:.2}", winner.total_contribution),
                    winner.bet_count.to_string(),
                ])
            })
            .collect();
        let winners = Table::new(
            winners,
            [
                Constraint::Min(12),
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(6),
            ],
        )
        .header(self.table_header(&["User", "Won (USD)", "Contributed", "Bets"]))
        .block(Block::default().borders(Borders::ALL).title("Top winners"));
        frame.render_widget(winners, upper[0]);

        let report = bet_range_win_probabilities(pots, self.criterion);
        let ranges: Vec<Row> = report
            .buckets
            .iter()
            .map(|bucket| {
                Row::new(vec![
                    bucket.label.to_string(),
                    bucket.bets.to_string(),
                    format!("{:.1}%", bucket.probability),
                ])
            })
            .collect();
        let title = format!(
            "Win rate by bet ({}, {} bets, {} skipped)",
            report.criterion.label(),
            report.total_bets,
            report.skipped
        );
        let ranges = Table::new(
            ranges,
            [
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        )
        .header(self.table_header(&["Range", "Bets", "Win %"]))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(ranges, upper[1]);

        let payouts = winning_amounts_over_time(pots);
        let amounts: Vec<u64> = payouts
            .iter()
            .map(|point| point.amount.max(0.0).round() as u64)
            .collect();
        let span = match (payouts.first(), payouts.last()) {
            (Some(first), Some(last)) => format!(
                "Pot payouts {} to {}",
                first.finished_at.format("%Y-%m-%d"),
                last.finished_at.format("%Y-%m-%d")
            ),
            _ => "Pot payouts".to_string(),
        };
        let sparkline = Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(span))
            .data(&amounts)
            .style(Style::default().fg(self.theme.accent));
        frame.render_widget(sparkline, rows[1]);

        let hourly: Vec<Row> = hourly_bet_summaries(pots, self.include_outliers)
            .into_iter()
            .map(|(hour, summary)| {
                Row::new(vec![
                    format!("{hour:02}:00"),
                    summary.count.to_string(),
                    format!("{:.0}", summary.min),
                    format!("{:.0}", summary.q1),
                    format!("{:.0}", summary.median),
                    format!("{:.0}", summary.q3),
                    format!("{:.0}", summary.max),
                ])
            })
            .collect();
        let title = if self.include_outliers {
            "Bets by hour (UTC, all bets)"
        } else {
            "Bets by hour (UTC, top 5% removed)"
        };
        let hourly = Table::new(hourly, [Constraint::Length(9); 7])
            .header(self.table_header(&["Hour", "Bets", "Min", "Q1", "Median", "Q3", "Max"]))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(hourly, rows[2]);

        self.render_status(frame, status, hints);
    }

    fn draw_bonus(&mut self, frame: &mut Frame) {
        let (body, status) = Self::split_status(frame.size());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(body);

        let form_area = columns[0];
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Bonus wagering");
        frame.render_widget(
            Paragraph::new(self.form_lines(&self.bonus.form)).block(block),
            form_area,
        );
        set_form_cursor(frame, form_area, &self.bonus.form);

        let form = &self.bonus.form;
        let outcome = BonusOutcome::from_form(
            form.value(BONUS_BASE),
            form.value(BONUS_AMOUNT),
            form.value(BONUS_MULTIPLIER),
            form.value(BONUS_RTP),
        );
        let lines = match outcome {
            Some(outcome) => {
                let net_style = if outcome.net_result >= 0.0 {
                    Style::default().fg(self.theme.success)
                } else {
                    Style::default().fg(self.theme.danger)
                };
                vec![
                    Line::from(format!("Wager required: {:.2}", outcome.wager_required)),
                    Line::from(format!("Expected loss:  {:.2}", outcome.expected_loss)),
                    Line::from(Span::styled(
                        format!("Net result:     {:.2}", outcome.net_result),
                        net_style,
                    )),
                    Line::from(match outcome.factor_loss {
                        Some(factor) => format!("Factor on base: {factor:.3}"),
                        None => "Factor on base: n/a".to_string(),
                    }),
                ]
            }
            None => vec![Line::from(Span::styled(
                "Enter bonus, multiplier and RTP",
                Style::default().fg(self.theme.muted),
            ))],
        };
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Result")),
            columns[1],
        );

        let saved_len = self.bonus.saved.len();
        self.bonus.saved_list.height = columns[2].height.saturating_sub(2) as usize;
        self.bonus.saved_list.ensure_visible(saved_len);
        let range = self.bonus.saved_list.visible_range(saved_len);
        let items: Vec<ListItem> = self.bonus.saved[range.clone()]
            .iter()
            .enumerate()
            .map(|(idx, calc)| {
                let index = range.start + idx;
                let style = if index == self.bonus.saved_list.cursor {
                    Style::default().bg(self.theme.selection_bg)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(format!(
                    "#{} {} + {} ×{} @ {}%",
                    index + 1,
                    calc.base_amount,
                    calc.bonus_amount,
                    calc.multiplier,
                    calc.rtp
                )))
                .style(style)
            })
            .collect();
        frame.render_widget(
            List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Saved ({saved_len})")),
            ),
            columns[2],
        );

        self.render_status(
            frame,
            status,
            "Tab field  Enter save  ↑/↓ saved  Ctrl-L load  Ctrl-X clear  Esc back",
        );
    }

    fn form_lines(&self, form: &Form) -> Vec<Line<'static>> {
        form.fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let focused = idx == form.focus;
                let marker = if focused { "▶ " } else { "  " };
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                Line::from(vec![
                    Span::styled(
                        format!("{marker}{:<width$}", field.label, width = FIELD_LABEL_WIDTH),
                        label_style,
                    ),
                    Span::raw(field.input.clone()),
                ])
            })
            .collect()
    }

    fn render_wager_modal(&self, frame: &mut Frame) {
        let Some(modal) = self.wager.as_ref() else {
            return;
        };
        let frame_area = frame.size();
        let width = 56_u16.min(frame_area.width.saturating_sub(4)).max(24);
        let height = 10_u16.min(frame_area.height.saturating_sub(2)).max(6);
        let area = centered_rect(width, height, frame_area);
        frame.render_widget(Clear, area);

        let mut lines = self.form_lines(&modal.form);
        lines.push(Line::from(""));
        let (inverter, wager, bet) = wager_results(&modal.form);
        match inverter {
            Ok(_) => {
                lines.push(Line::from(match wager {
                    Some(wager) => format!("Wager needed for bet: {wager:.2}"),
                    None => "Wager needed for bet: -".to_string(),
                }));
                lines.push(Line::from(match bet {
                    Some(bet) => format!("Bet covered by wager: {bet:.2}"),
                    None => "Bet covered by wager: -".to_string(),
                }));
            }
            Err(message) => lines.push(Line::from(Span::styled(
                message,
                Style::default().fg(self.theme.warning),
            ))),
        }
        lines.push(Line::from(Span::styled(
            "Tab next field  Esc close",
            Style::default().fg(self.theme.muted),
        )));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("RTP wager · {}", modal.game_name)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        set_form_cursor(frame, area, &modal.form);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, hints: &str) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let line = Line::from(vec![
            Span::raw(self.status.clone()),
            Span::raw("  "),
            Span::styled(hints.to_string(), Style::default().fg(self.theme.muted)),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn render_games<G: AsRef<GameRecord>>(
    frame: &mut Frame,
    area: Rect,
    games: &[G],
    cursor: ListCursor,
    block: Block,
    theme: &super::Theme,
) {
    let range = cursor.visible_range(games.len());
    let mut list_state = ListState::default();
    if !games.is_empty() {
        list_state.select(Some(cursor.cursor.saturating_sub(range.start)));
    }
    let items: Vec<ListItem> = games[range.clone()]
        .iter()
        .enumerate()
        .map(|(idx, game)| {
            let game = game.as_ref();
            let marker = if range.start + idx == cursor.cursor {
                Span::styled(
                    "▶ ",
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("  ")
            };
            let rtp = game
                .rtp()
                .map(|rtp| format!(" · {rtp:.2}%"))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(
                    game.name.clone(),
                    Style::default()
                        .fg(theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" · {}{rtp}", game.provider.name),
                    Style::default().fg(theme.muted),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection_bg));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn set_form_cursor(frame: &mut Frame, area: Rect, form: &Form) {
    let Some(field) = form.fields.get(form.focus) else {
        return;
    };
    let x = area.x + 1 + MARKER_WIDTH + FIELD_LABEL_WIDTH as u16 + field.cursor as u16;
    let y = area.y + 1 + form.focus as u16;
    if x < area.x + area.width.saturating_sub(1) && y < area.y + area.height.saturating_sub(1) {
        frame.set_cursor(x, y);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
