//! TUI application state and event loop.
//!
//! Design: strict message passing. A background worker owns the sampler and
//! performs every blocking OS query; each tick it sends an immutable
//! [`WorkerUpdate`] over a channel. The UI thread is the only mutator of
//! dashboard state, so there are no locks on the render path and the UI
//! never blocks on process enumeration.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use taskmon_core::{
    DashboardConfig, DashboardState, FrameComposer, MetricSampler, ProcessRecord, SampleSnapshot,
    StartupEntry, Tab, Theme, hostname, store_show_sidebar,
};

/// Results of one worker tick. Tables are present only when the matching
/// tab was visible; building them off-tab is wasted work.
pub struct WorkerUpdate {
    pub snapshot: SampleSnapshot,
    pub processes: Option<Vec<ProcessRecord>>,
    pub startup: Option<Vec<StartupEntry>>,
}

fn spawn_sampler(
    interval: Duration,
    stop: Arc<AtomicBool>,
    visible_tab: Arc<AtomicU8>,
    tx: Sender<WorkerUpdate>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut sampler = MetricSampler::new();
        // Stop flag is polled once per tick (cooperative teardown).
        while !stop.load(Ordering::Relaxed) {
            let snapshot = sampler.sample();
            let tab = visible_tab.load(Ordering::Relaxed);
            let processes =
                (tab == Tab::Processes.index() as u8).then(|| sampler.processes());
            let startup =
                (tab == Tab::Startup.index() as u8).then(|| sampler.startup_entries());
            if tx
                .send(WorkerUpdate {
                    snapshot,
                    processes,
                    startup,
                })
                .is_err()
            {
                break;
            }
            thread::sleep(interval);
        }
    })
}

pub struct App {
    state: DashboardState,
    composer: FrameComposer,
    config_path: PathBuf,
    show_sidebar: bool,
    refresh_rate: Duration,
    running: bool,
    force_clear: bool,
    hostname: String,
    visible_tab: Arc<AtomicU8>,
    /// Visible table rows, set by the renderer from the real viewport.
    page_size: usize,
}

impl App {
    pub fn new(config: DashboardConfig, config_path: PathBuf, refresh_secs: f64) -> Self {
        let show_sidebar = config.show_sidebar();
        let state = DashboardState::new(config.layout_blueprints);
        let visible_tab = Arc::new(AtomicU8::new(state.tab().index() as u8));
        Self {
            state,
            composer: FrameComposer::new(Theme::default()),
            config_path,
            show_sidebar,
            refresh_rate: Duration::from_secs_f64(refresh_secs),
            running: true,
            force_clear: false,
            hostname: hostname(),
            visible_tab,
            page_size: 20,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook that restores the terminal before printing.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        // Always restore the terminal, even if the loop returned an error.
        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;
        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let worker = spawn_sampler(
            self.refresh_rate,
            Arc::clone(&stop),
            Arc::clone(&self.visible_tab),
            tx,
        );

        while self.running {
            self.apply_layout(terminal.size()?.width);

            if self.force_clear {
                terminal.clear()?;
                self.force_clear = false;
            }
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code);
                    }
                    Event::Resize(_, _) => {
                        // Stale cells can survive a resize; start clean.
                        self.force_clear = true;
                    }
                    _ => {}
                }
            }

            self.drain_updates(&rx);
        }

        stop.store(true, Ordering::Relaxed);
        let _ = worker.join();
        Ok(())
    }

    /// Recompute the layout mode for the current width; on a transition
    /// edge, schedule one full clear and persist the sidebar preference.
    fn apply_layout(&mut self, term_width: u16) {
        let change = self.state.select_mode(term_width);
        if change.changed {
            self.force_clear = true;
        }
        let should_show = change.mode.shows_sidebar();
        if should_show != self.show_sidebar {
            self.show_sidebar = should_show;
            store_show_sidebar(&self.config_path, should_show);
        }
    }

    /// Apply pending worker updates. Runs on the UI thread only.
    fn drain_updates(&mut self, rx: &Receiver<WorkerUpdate>) {
        while let Ok(update) = rx.try_recv() {
            self.state.apply_snapshot(update.snapshot);
            if let Some(rows) = update.processes {
                self.state.set_processes(rows);
            }
            if let Some(rows) = update.startup {
                self.state.set_startup(rows);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Right | KeyCode::Tab => {
                self.state.cycle_tab_forward();
                self.sync_visible_tab();
            }
            KeyCode::Left => {
                self.state.cycle_tab_back();
                self.sync_visible_tab();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.move_selection(-1, self.page_size);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection(1, self.page_size);
            }
            KeyCode::PageUp => {
                self.state.move_selection(-(self.page_size as isize), self.page_size);
            }
            KeyCode::PageDown => {
                self.state.move_selection(self.page_size as isize, self.page_size);
            }
            _ => {}
        }
    }

    fn sync_visible_tab(&self) {
        self.visible_tab
            .store(self.state.tab().index() as u8, Ordering::Relaxed);
    }

    // --- Accessors for the renderer ---

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn composer(&self) -> &FrameComposer {
        &self.composer
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn refresh_rate_secs(&self) -> f64 {
        self.refresh_rate.as_secs_f64()
    }

    /// The renderer reports how many table rows actually fit.
    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }
}
