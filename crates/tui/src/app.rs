use std::{io, ops::Range, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, style::Color, Terminal};
use slotscope_core::{
    calculators::{parse_amount, BonusCalculation, RtpWagerInverter},
    config::AppConfig,
    filter::{filtered_indices, Feature, FilterState},
    models::{GameRecord, PotRecord},
    resource::Catalog,
    saved::SavedCalculations,
    stats::WinCriterion,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::form::{Form, InputField};

mod view;

const TICK_RATE: Duration = Duration::from_millis(250);

const BONUS_BASE: usize = 0;
const BONUS_AMOUNT: usize = 1;
const BONUS_MULTIPLIER: usize = 2;
const BONUS_RTP: usize = 3;

const WAGER_RTP: usize = 0;
const WAGER_BET: usize = 1;
const WAGER_AMOUNT: usize = 2;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
    on_accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            on_accent: Color::Black,
        }
    }
}

/// Results of the background dataset fetches.
pub enum DataEvent {
    Games(Result<Vec<GameRecord>>),
    Pots(Result<Vec<PotRecord>>),
}

enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Games,
    Provider,
    Dashboard,
    Pots,
    Bonus,
}

const MENU_ITEMS: [(&str, Option<Screen>); 5] = [
    ("Games", Some(Screen::Games)),
    ("Statistics", Some(Screen::Dashboard)),
    ("Pot analysis", Some(Screen::Pots)),
    ("Bonus calculator", Some(Screen::Bonus)),
    ("Quit", None),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GamesPanel {
    List,
    Tags,
    Features,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashboardScope {
    All,
    Filtered,
}

impl DashboardScope {
    fn label(self) -> &'static str {
        match self {
            DashboardScope::All => "all games",
            DashboardScope::Filtered => "current filter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Cursor and scroll offset over a list of `len` rows.
#[derive(Debug, Clone, Copy)]
struct ListCursor {
    cursor: usize,
    offset: usize,
    height: usize,
}

impl Default for ListCursor {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            height: 1,
        }
    }
}

impl ListCursor {
    fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = idx as usize;
        self.ensure_visible(len);
    }

    fn move_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        self.cursor = index.min(len - 1);
        self.ensure_visible(len);
    }

    fn page(&mut self, direction: isize, len: usize) {
        let delta = self.height.max(1).min(len.max(1)) as isize;
        self.move_by(direction * delta, len);
    }

    fn ensure_visible(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            self.reset();
            return;
        }
        if self.cursor >= len {
            self.cursor = len - 1;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
        self.offset = self.offset.min(len.saturating_sub(self.height));
    }

    fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        start..(start + self.height).min(len)
    }
}

/// RTP-wager inverter opened for one game.
struct WagerModal {
    game_name: String,
    form: Form,
}

impl WagerModal {
    fn new(game: &GameRecord) -> Self {
        let rtp = game.rtp().map(|rtp| rtp.to_string()).unwrap_or_default();
        Self {
            game_name: game.name.clone(),
            form: Form::new(vec![
                InputField::new("RTP %", rtp),
                InputField::new("Bet", ""),
                InputField::new("Wager", ""),
            ]),
        }
    }
}

struct BonusState {
    form: Form,
    saved: Vec<BonusCalculation>,
    saved_list: ListCursor,
}

impl BonusState {
    fn new(default_rtp: f64) -> Self {
        Self {
            form: Form::new(vec![
                InputField::new("Base amount", ""),
                InputField::new("Bonus amount", ""),
                InputField::new("Wager multiplier", ""),
                InputField::new("RTP %", default_rtp.to_string()),
            ]),
            saved: Vec::new(),
            saved_list: ListCursor::default(),
        }
    }

    fn current(&self) -> Option<BonusCalculation> {
        BonusCalculation::parse(
            self.form.value(BONUS_BASE),
            self.form.value(BONUS_AMOUNT),
            self.form.value(BONUS_MULTIPLIER),
            self.form.value(BONUS_RTP),
        )
    }

    fn fill(&mut self, calculation: &BonusCalculation) {
        let values = [
            calculation.base_amount,
            calculation.bonus_amount,
            calculation.multiplier,
            calculation.rtp,
        ];
        for (field, value) in self.form.fields.iter_mut().zip(values) {
            field.set(value.to_string());
        }
    }
}

/// Terminal dashboard over the games and pot datasets.
pub struct SlotscopeApp {
    config: AppConfig,
    catalog: Catalog,
    games_state: LoadState,
    pots_state: LoadState,
    filter: FilterState,
    filtered: Vec<usize>,
    revealed: usize,
    tags: Vec<String>,
    panel: GamesPanel,
    game_list: ListCursor,
    tag_list: ListCursor,
    feature_cursor: usize,
    provider: Option<String>,
    provider_games: Vec<GameRecord>,
    provider_list: ListCursor,
    scope: DashboardScope,
    include_outliers: bool,
    criterion: WinCriterion,
    bonus: BonusState,
    store: SavedCalculations,
    wager: Option<WagerModal>,
    menu_cursor: usize,
    screen: Screen,
    status: String,
    tick: usize,
    should_quit: bool,
    data_rx: Option<mpsc::Receiver<DataEvent>>,
    theme: Theme,
}

impl SlotscopeApp {
    pub fn new(config: AppConfig) -> Self {
        let store = SavedCalculations::new(config.data_dir.clone());
        let revealed = config.page_size.max(1);
        let bonus = BonusState::new(config.default_rtp);
        Self {
            config,
            catalog: Catalog::default(),
            games_state: LoadState::Loading,
            pots_state: LoadState::Loading,
            filter: FilterState::default(),
            filtered: Vec::new(),
            revealed,
            tags: Vec::new(),
            panel: GamesPanel::List,
            game_list: ListCursor::default(),
            tag_list: ListCursor::default(),
            feature_cursor: 0,
            provider: None,
            provider_games: Vec::new(),
            provider_list: ListCursor::default(),
            scope: DashboardScope::All,
            include_outliers: false,
            criterion: WinCriterion::default(),
            bonus,
            store,
            wager: None,
            menu_cursor: 0,
            screen: Screen::Menu,
            status: "Loading datasets".to_string(),
            tick: 0,
            should_quit: false,
            data_rx: None,
            theme: Theme::default(),
        }
    }

    pub fn attach_data(&mut self, receiver: mpsc::Receiver<DataEvent>) {
        self.data_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        self.bonus.saved = self.store.entries_or_empty();

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let mut data_rx = self.data_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            if let Some(rx) = data_rx.as_mut() {
                let mut data_closed = false;
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_data = rx.recv() => {
                        match maybe_data {
                            Some(event) => self.handle_data_event(event),
                            None => data_closed = true,
                        }
                    }
                }
                if data_closed {
                    data_rx = None;
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }
        }

        restore_terminal(&mut terminal)
    }

    fn handle_data_event(&mut self, event: DataEvent) {
        match event {
            DataEvent::Games(Ok(games)) => {
                self.catalog = self.catalog.with_games(games);
                self.tags = self.catalog.all_tags();
                self.games_state = LoadState::Ready;
                self.refilter();
                self.status = format!("Loaded {} games", self.catalog.games().len());
            }
            DataEvent::Games(Err(err)) => {
                error!("Games dataset failed to load: {err:#}");
                self.games_state = LoadState::Failed(format!("{err:#}"));
                self.status = format!("Failed to load games: {err}");
            }
            DataEvent::Pots(Ok(pots)) => {
                info!(count = pots.len(), "Pot dataset ready");
                self.catalog = self.catalog.with_pots(pots);
                self.pots_state = LoadState::Ready;
            }
            DataEvent::Pots(Err(err)) => {
                error!("Pot dataset failed to load: {err:#}");
                self.pots_state = LoadState::Failed(format!("{err:#}"));
                self.status = format!("Failed to load pots: {err}");
            }
        }
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if let Err(err) = self.handle_key(key) {
                    self.status = format!("Error: {err}");
                }
                true
            }
            Some(AppEvent::Input(_)) => true,
            Some(AppEvent::Tick) => {
                self.tick = self.tick.wrapping_add(1);
                true
            }
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }
        if self.wager.is_some() {
            self.handle_wager_key(key);
            return Ok(());
        }
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Games => self.handle_games_key(key),
            Screen::Provider => self.handle_provider_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Pots => self.handle_pots_key(key),
            Screen::Bonus => self.handle_bonus_key(key)?,
        }
        Ok(())
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.menu_cursor = (self.menu_cursor + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            KeyCode::Enter => match MENU_ITEMS.get(self.menu_cursor) {
                Some((_, Some(screen))) => self.screen = *screen,
                Some((_, None)) => self.should_quit = true,
                None => {}
            },
            _ => {}
        }
    }

    fn handle_games_key(&mut self, key: KeyEvent) {
        match self.panel {
            GamesPanel::Tags => self.handle_tag_picker_key(key),
            GamesPanel::Features => self.handle_feature_picker_key(key),
            GamesPanel::List => self.handle_game_list_key(key),
        }
    }

    fn handle_game_list_key(&mut self, key: KeyEvent) {
        let len = self.visible_game_count();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Menu,
            KeyCode::Char('j') | KeyCode::Down => self.game_list.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.game_list.move_by(-1, len),
            KeyCode::Char('g') | KeyCode::Home => self.game_list.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => self.game_list.move_to(usize::MAX, len),
            KeyCode::PageDown => self.game_list.page(1, len),
            KeyCode::PageUp => self.game_list.page(-1, len),
            KeyCode::Char('m') => self.load_more(),
            KeyCode::Char('s') => {
                let next = self.filter.sort_option.next();
                self.filter.set_sort(next);
                self.refilter();
                self.status = self.filter_status();
            }
            KeyCode::Char('c') => {
                self.filter.clear_selection();
                self.refilter();
                self.status = self.filter_status();
            }
            KeyCode::Char('t') => self.panel = GamesPanel::Tags,
            KeyCode::Char('f') => self.panel = GamesPanel::Features,
            KeyCode::Tab => self.panel = GamesPanel::Tags,
            KeyCode::Char('p') | KeyCode::Enter => self.open_provider(),
            KeyCode::Char('w') => self.open_wager(),
            _ => {}
        }
    }

    fn handle_tag_picker_key(&mut self, key: KeyEvent) {
        let len = self.tags.len();
        match key.code {
            KeyCode::Esc => self.panel = GamesPanel::List,
            KeyCode::Tab => self.panel = GamesPanel::Features,
            KeyCode::Char('j') | KeyCode::Down => self.tag_list.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.tag_list.move_by(-1, len),
            KeyCode::PageDown => self.tag_list.page(1, len),
            KeyCode::PageUp => self.tag_list.page(-1, len),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(tag) = self.tags.get(self.tag_list.cursor).cloned() {
                    let selected = self.filter.toggle_tag(&tag);
                    self.refilter();
                    self.status = format!(
                        "{} tag {tag}: {} games",
                        if selected { "Selected" } else { "Removed" },
                        self.filtered.len()
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_feature_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.panel = GamesPanel::List,
            KeyCode::Tab => self.panel = GamesPanel::List,
            KeyCode::Char('j') | KeyCode::Down => {
                self.feature_cursor = (self.feature_cursor + 1).min(Feature::ALL.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.feature_cursor = self.feature_cursor.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(feature) = Feature::ALL.get(self.feature_cursor).copied() {
                    let selected = self.filter.toggle_feature(feature);
                    self.refilter();
                    self.status = format!(
                        "{} {}: {} games",
                        if selected { "Requiring" } else { "Dropped" },
                        feature.label(),
                        self.filtered.len()
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_provider_key(&mut self, key: KeyEvent) {
        let len = self.provider_games.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Games,
            KeyCode::Char('j') | KeyCode::Down => self.provider_list.move_by(1, len),
            KeyCode::Char('k') | KeyCode::Up => self.provider_list.move_by(-1, len),
            KeyCode::PageDown => self.provider_list.page(1, len),
            KeyCode::PageUp => self.provider_list.page(-1, len),
            KeyCode::Char('w') => {
                if let Some(game) = self.provider_games.get(self.provider_list.cursor) {
                    self.wager = Some(WagerModal::new(game));
                }
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Menu,
            KeyCode::Char('a') => {
                self.scope = match self.scope {
                    DashboardScope::All => DashboardScope::Filtered,
                    DashboardScope::Filtered => DashboardScope::All,
                };
                self.status = format!("Statistics over {}", self.scope.label());
            }
            _ => {}
        }
    }

    fn handle_pots_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Menu,
            KeyCode::Char('o') => {
                self.include_outliers = !self.include_outliers;
                self.status = if self.include_outliers {
                    "Showing all bets".to_string()
                } else {
                    "Top 5% of bets hidden".to_string()
                };
            }
            KeyCode::Char('c') => {
                self.criterion = self.criterion.toggled();
                self.status = format!("Win criterion: {}", self.criterion.label());
            }
            _ => {}
        }
    }

    fn handle_bonus_key(&mut self, key: KeyEvent) -> Result<()> {
        let saved_len = self.bonus.saved.len();
        if key.modifiers == KeyModifiers::CONTROL {
            match key.code {
                KeyCode::Char('l') => {
                    if let Some(calculation) = self.store.load(self.bonus.saved_list.cursor)? {
                        self.bonus.fill(&calculation);
                        self.status = "Loaded saved calculation".to_string();
                    }
                }
                KeyCode::Char('x') => {
                    self.store.clear()?;
                    self.bonus.saved.clear();
                    self.bonus.saved_list.reset();
                    self.status = "Saved calculations cleared".to_string();
                }
                _ => {}
            }
            return Ok(());
        }
        match key.code {
            KeyCode::Esc => self.screen = Screen::Menu,
            KeyCode::Tab => self.bonus.form.focus_next(),
            KeyCode::BackTab => self.bonus.form.focus_prev(),
            KeyCode::Down => self.bonus.saved_list.move_by(1, saved_len),
            KeyCode::Up => self.bonus.saved_list.move_by(-1, saved_len),
            KeyCode::Enter => match self.bonus.current() {
                Some(calculation) => {
                    self.bonus.saved = self.store.save(calculation)?;
                    let len = self.bonus.saved.len();
                    self.bonus.saved_list.move_to(len.saturating_sub(1), len);
                    self.status = format!("Saved calculation #{len}");
                }
                None => self.status = "Fill in every field before saving".to_string(),
            },
            _ => {
                if let Some(field) = self.bonus.form.focused_mut() {
                    field.handle_key(&key);
                }
            }
        }
        Ok(())
    }

    fn handle_wager_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.wager.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.wager = None,
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => modal.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => modal.form.focus_prev(),
            _ => {
                if let Some(field) = modal.form.focused_mut() {
                    field.handle_key(&key);
                }
            }
        }
    }

    fn refilter(&mut self) {
        self.filtered = filtered_indices(self.catalog.games(), &self.filter);
        self.revealed = self.config.page_size.max(1);
        self.game_list.reset();
    }

    fn visible_game_count(&self) -> usize {
        self.revealed.min(self.filtered.len())
    }

    fn load_more(&mut self) {
        if self.revealed >= self.filtered.len() {
            self.status = "All games shown".to_string();
            return;
        }
        self.revealed += self.config.page_size.max(1);
        self.status = format!(
            "Showing {} of {} games",
            self.visible_game_count(),
            self.filtered.len()
        );
    }

    fn filter_status(&self) -> String {
        format!("{} games · {}", self.filtered.len(), self.filter.summary())
    }

    /// Filtered games in display order, resolved against the catalog.
    fn filtered_games(&self) -> Vec<&GameRecord> {
        let games = self.catalog.games();
        self.filtered
            .iter()
            .filter_map(|index| games.get(*index))
            .collect()
    }

    fn current_game(&self) -> Option<&GameRecord> {
        self.filtered[..self.visible_game_count()]
            .get(self.game_list.cursor)
            .and_then(|index| self.catalog.games().get(*index))
    }

    fn open_provider(&mut self) {
        let Some(name) = self.current_game().map(|game| game.provider.name.clone()) else {
            return;
        };
        self.provider_games = self
            .catalog
            .provider_games(&name)
            .into_iter()
            .cloned()
            .collect();
        self.provider_list.reset();
        self.status = format!("{} games by {name}", self.provider_games.len());
        self.provider = Some(name);
        self.screen = Screen::Provider;
    }

    fn open_wager(&mut self) {
        if let Some(game) = self.current_game() {
            self.wager = Some(WagerModal::new(game));
        }
    }

    /// Games the dashboard summarises under the current scope.
    fn scoped_games(&self) -> Vec<&GameRecord> {
        match self.scope {
            DashboardScope::All => self.catalog.games().iter().collect(),
            DashboardScope::Filtered => self.filtered_games(),
        }
    }
}

/// Wager and bet implied by the modal's fields.
fn wager_results(form: &Form) -> (Result<RtpWagerInverter, String>, Option<f64>, Option<f64>) {
    let inverter = match parse_amount(form.value(WAGER_RTP)) {
        Some(rtp) => RtpWagerInverter::new(rtp).map_err(|err| err.to_string()),
        None => Err("enter the game's RTP".to_string()),
    };
    let (wager, bet) = match &inverter {
        Ok(inverter) => (
            parse_amount(form.value(WAGER_BET)).and_then(|bet| inverter.wager_for_bet(bet)),
            parse_amount(form.value(WAGER_AMOUNT)).and_then(|wager| inverter.bet_for_wager(wager)),
        ),
        Err(_) => (None, None),
    };
    (inverter, wager, bet)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotscope_core::models::{Category, GameAttributes, Provider, Tag};
    use tempfile::tempdir;

    fn game(slug: &str, provider: &str, rtp: Option<f64>, tags: &[&str]) -> GameRecord {
        GameRecord {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            provider: Provider {
                name: provider.to_string(),
                ..Provider::default()
            },
            category: Category::default(),
            is_wagering_bonus_allowed: false,
            is_new: false,
            attributes: GameAttributes {
                rtp,
                ..GameAttributes::default()
            },
            tags: tags
                .iter()
                .map(|name| Tag {
                    name: name.to_string(),
                    slug: None,
                })
                .collect(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_games(dir: &std::path::Path) -> SlotscopeApp {
        let config = AppConfig {
            data_dir: dir.to_path_buf(),
            page_size: 2,
            ..AppConfig::default()
        };
        let mut app = SlotscopeApp::new(config);
        app.handle_data_event(DataEvent::Games(Ok(vec![
            game("a", "P1", Some(94.0), &["Popular"]),
            game("b", "P2", Some(97.0), &["New"]),
            game("c", "P1", None, &["Popular"]),
        ])));
        app.screen = Screen::Games;
        app
    }

    #[test]
    fn list_cursor_scrolls_with_selection() {
        let mut list = ListCursor {
            height: 3,
            ..ListCursor::default()
        };
        list.move_by(4, 10);
        assert_eq!((list.cursor, list.offset), (4, 2));
        list.move_to(usize::MAX, 10);
        assert_eq!((list.cursor, list.offset), (9, 7));
        assert_eq!(list.visible_range(10), 7..10);
        list.move_by(-20, 10);
        assert_eq!((list.cursor, list.offset), (0, 0));
        list.move_by(1, 0);
        assert_eq!(list.cursor, 0);
    }

    #[test]
    fn load_more_reveals_next_page() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_with_games(dir.path());
        assert_eq!(app.visible_game_count(), 2);
        app.handle_key(key(KeyCode::Char('m')))?;
        assert_eq!(app.visible_game_count(), 3);
        Ok(())
    }

    #[test]
    fn picker_and_sort_keys_update_filter() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_with_games(dir.path());
        app.handle_key(key(KeyCode::Char('t')))?;
        app.handle_key(key(KeyCode::Enter))?;
        assert!(app.filter.selected_tags.contains("Popular"));
        let slugs: Vec<&str> = app
            .filtered_games()
            .iter()
            .map(|game| game.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["a", "c"]);

        app.handle_key(key(KeyCode::Esc))?;
        app.handle_key(key(KeyCode::Char('c')))?;
        app.handle_key(key(KeyCode::Char('s')))?;
        let slugs: Vec<&str> = app
            .filtered_games()
            .iter()
            .map(|game| game.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["b", "a", "c"]);
        assert_eq!(app.filtered, vec![1, 0, 2]);
        assert_eq!(
            app.status,
            "3 games · tags: any  features: any  sort: rtp"
        );
        Ok(())
    }

    #[test]
    fn provider_view_lists_catalog_games() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_with_games(dir.path());
        app.handle_key(key(KeyCode::Char('p')))?;
        assert_eq!(app.screen, Screen::Provider);
        assert_eq!(app.provider.as_deref(), Some("P1"));
        assert_eq!(app.provider_games.len(), 2);
        Ok(())
    }

    #[test]
    fn wager_modal_inverts_selected_game_rtp() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_with_games(dir.path());
        app.filter.set_sort(slotscope_core::sort::SortOption::Rtp);
        app.refilter();
        app.handle_key(key(KeyCode::Char('w')))?;
        app.handle_key(key(KeyCode::Tab))?;
        for ch in "10".chars() {
            app.handle_key(key(KeyCode::Char(ch)))?;
        }
        let modal = app.wager.as_ref().map(|modal| &modal.form);
        let (inverter, wager, _) = wager_results(modal.ok_or_else(|| anyhow::anyhow!("no modal"))?);
        assert!(inverter.is_ok());
        let wager = wager.ok_or_else(|| anyhow::anyhow!("no wager"))?;
        assert!((wager - 10.0 / 0.03).abs() < 1e-6);

        app.handle_key(key(KeyCode::Esc))?;
        assert!(app.wager.is_none());
        Ok(())
    }

    #[test]
    fn bonus_save_load_and_clear() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_with_games(dir.path());
        app.screen = Screen::Bonus;
        for (index, value) in ["30", "54", "67"].iter().enumerate() {
            app.bonus.form.fields[index].set(*value);
        }
        app.handle_key(key(KeyCode::Enter))?;
        assert_eq!(app.bonus.saved.len(), 1);

        app.bonus.form.fields[BONUS_AMOUNT].set("");
        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL))?;
        assert_eq!(app.bonus.form.value(BONUS_AMOUNT), "54");

        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL))?;
        assert!(app.bonus.saved.is_empty());
        assert!(app.store.entries()?.is_empty());
        Ok(())
    }

    #[test]
    fn failed_load_is_reported() {
        let mut app = SlotscopeApp::new(AppConfig::default());
        app.handle_data_event(DataEvent::Pots(Err(anyhow::anyhow!("HTTP 404"))));
        assert!(matches!(app.pots_state, LoadState::Failed(_)));
        assert!(app.status.contains("HTTP 404"));
    }
}
