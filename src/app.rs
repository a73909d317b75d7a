use crate::config::{save_settings_atomic, Paths, Settings};
use crate::dice::SeededDice;
use crate::input::{collect_input_nonblocking, map_event_to_command, Command, Scene};
use crate::model::GameState;
use crate::render::{draw_pet, ui_overlay, Terminal};
use crate::storage::{load_or_init_save, save_atomic};
use chrono::Utc;
use std::time::{Duration, Instant};

pub(crate) struct App {
    settings: Settings,
    state: GameState,
    paths: Paths,
    dice: SeededDice,
    term: Terminal,
    scene: Scene,
    should_quit: bool,
    autosave_at: Instant,
}

impl App {
    fn init(paths: Paths, settings: Settings) -> anyhow::Result<Self> {
        let state = load_or_init_save(&paths.save_path, &settings.rules, Utc::now());
        let dice = SeededDice::new(settings.seed);
        let term = Terminal::begin()?;
        let autosave_at = Instant::now() + Duration::from_secs(settings.autosave_secs.max(1));

        Ok(Self {
            settings,
            state,
            paths,
            dice,
            term,
            scene: Scene::Main,
            should_quit: false,
            autosave_at,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(5, 120);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);
        let tick_step = Duration::from_millis(self.settings.rules.tick_interval_ms.max(1));

        let mut last_frame = Instant::now();
        let mut tick_accum = Duration::ZERO;

        while !self.should_quit {
            self.term.resize_if_needed()?;

            // input
            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(cmd) = map_event_to_command(self.scene, self.state.is_dead(), ev) {
                    self.handle(cmd);
                }
                if self.should_quit {
                    break;
                }
            }

            // deferred hides and clip resets
            let now = Utc::now();
            self.state.fire_due_timers(&self.settings.rules, now);

            // scheduler
            let frame_start = Instant::now();
            tick_accum = tick_accum.saturating_add(frame_start.saturating_duration_since(last_frame));
            last_frame = frame_start;
            while tick_accum >= tick_step {
                self.state.tick(&self.settings.rules, now, &mut self.dice);
                tick_accum = tick_accum.saturating_sub(tick_step);
            }

            self.render_frame()?;

            if Instant::now() >= self.autosave_at {
                self.save_now();
                self.autosave_at = Instant::now() + Duration::from_secs(self.settings.autosave_secs.max(1));
            }

            spin_sleep(frame_dt, frame_start);
        }

        self.save_now();
        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        Ok(())
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::Back => self.scene = Scene::Main,
            Command::Open(scene) => self.scene = scene,
            Command::Act(action) => {
                let res = self
                    .state
                    .apply(action, &self.settings.rules, Utc::now(), &mut self.dice);
                if let Err(refusal) = res {
                    tracing::debug!(?action, %refusal, "interaction refused");
                }
                self.scene = Scene::Main;
            }
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let color = self.settings.enable_color;
        self.term.cur.clear();

        let cols = self.term.cols as i32;
        let rows = self.term.rows as i32;
        let panel_w = (cols / 3).max(40).min(cols - 10);
        let cx = panel_w + (cols - panel_w) / 2;
        let cy = rows / 2 - 2;
        draw_pet(&mut self.term.cur, &self.state, cx, cy, color);

        ui_overlay(
            &mut self.term.cur,
            &self.state,
            self.scene,
            &self.settings.rules,
            Utc::now(),
            color,
        );

        self.term.present()?;
        Ok(())
    }

    /// Best effort: a failed save is logged and play goes on.
    fn save_now(&self) {
        if let Err(err) = save_atomic(&self.paths.save_path, &self.state, Utc::now()) {
            tracing::warn!(error = %format!("{err:#}"), "autosave failed");
        }
    }
}

pub(crate) fn run(paths: Paths, settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(paths, settings)?;
    app.run()?;
    Ok(())
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
