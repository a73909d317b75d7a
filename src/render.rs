use crate::anim::Clip;
use crate::input::Scene;
use crate::model::{ActivityKind, GameState};
use crate::rules::{Food, Rules, Treatment, SESSION_CHOICES};
use chrono::{DateTime, Utc};
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Writes the cells that changed since the last frame.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_bold = false;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                if c.bold != last_bold {
                    let attr = if c.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    queue!(self.out, SetAttribute(attr))?;
                    last_bold = c.bold;
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

/* -----------------------------
   Text helpers
------------------------------ */

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                ..Cell::default()
            },
        );
    }
}

fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn meter_color(v: f32, color: bool) -> Color {
    if !color {
        Color::White
    } else if v < 20.0 {
        Color::Red
    } else if v < 40.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        let needed = line.chars().count() + usize::from(!line.is_empty()) + word.chars().count();
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/* -----------------------------
   Pet
------------------------------ */

fn pose(clip: Clip) -> [&'static str; 5] {
    match clip {
        Clip::Egg => [
            "   ___   ",
            "  /   \\  ",
            " | . . | ",
            " |  .  | ",
            "  \\___/  ",
        ],
        Clip::Tombstone => [
            "  _____  ",
            " /     \\ ",
            " | RIP | ",
            " |     | ",
            "_|_____|_",
        ],
        Clip::Hidden => [
            "         ",
            "         ",
            "         ",
            "         ",
            "         ",
        ],
        Clip::Sick => [
            "   .-.   ",
            "  (x x)  ",
            " /( ~ )\\ ",
            "  (   )  ",
            "   ^ ^   ",
        ],
        Clip::Hungry => [
            "   .-.   ",
            "  (o o)  ",
            " /( O )\\ ",
            "  ( ~ )  ",
            "   ^ ^   ",
        ],
        Clip::Itchy => [
            "   .-.   ",
            "  (> <)  ",
            " \\( v )/ ",
            "  ( * )  ",
            "   ^ ^   ",
        ],
        Clip::Snack
        | Clip::FastFood
        | Clip::Feast
        | Clip::Water
        | Clip::Coffee
        | Clip::ColdDrink => [
            "   .-.   ",
            "  (^ ^)  ",
            " /( o )\\ ",
            "  (   )= ",
            "   ^ ^   ",
        ],
        Clip::Bath => [
            "  o O o  ",
            "  (- -)  ",
            " /( v )\\ ",
            " ~(   )~ ",
            " ~~^~^~~ ",
        ],
        Clip::LevelUp | Clip::Kiss | Clip::Play => [
            " \\ .-. / ",
            "  (^ ^)  ",
            " \\( v )/ ",
            "  (   )  ",
            "   ^ ^   ",
        ],
        _ => [
            "   .-.   ",
            "  (o o)  ",
            " /( v )\\ ",
            "  (   )  ",
            "   ^ ^   ",
        ],
    }
}

pub(crate) fn draw_pet(buf: &mut CellBuffer, st: &GameState, cx: i32, cy: i32, color: bool) {
    let rows = pose(st.anim.clip);
    let fg = if !color {
        Color::White
    } else if st.is_dead() {
        Color::DarkGrey
    } else if st.anim.clip.is_condition() {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let w = rows[0].chars().count() as i32;
    let x0 = cx - w / 2;
    let y0 = cy - rows.len() as i32 / 2;
    for (yy, line) in rows.iter().enumerate() {
        let y = y0 + yy as i32;
        if y < 0 || y >= buf.h as i32 {
            continue;
        }
        for (xx, ch) in line.chars().enumerate() {
            let x = x0 + xx as i32;
            if x >= 0 && x < buf.w as i32 {
                buf.set(
                    x as u16,
                    y as u16,
                    Cell {
                        ch,
                        fg,
                        ..Cell::default()
                    },
                );
            }
        }
    }

    let caption = st.anim.clip.label();
    let cap_x = cx - caption.chars().count() as i32 / 2;
    let cap_y = y0 + rows.len() as i32 + 1;
    if cap_x >= 0 && cap_y >= 0 {
        draw_text(buf, cap_x as u16, cap_y as u16, caption, Color::DarkGrey);
    }
}

/* -----------------------------
   Status panel and overlays
------------------------------ */

pub(crate) fn ui_overlay(
    buf: &mut CellBuffer,
    st: &GameState,
    scene: Scene,
    rules: &Rules,
    now: DateTime<Utc>,
    color: bool,
) {
    let fg = Color::White;

    let title = if st.is_egg {
        format!("Pengotchi  |  egg ({} knocks)", st.egg_clicks)
    } else {
        format!(
            "Pengotchi  |  Lv {}  exp {}/{}  |  {} coins  |  day {}",
            st.level,
            st.exp,
            rules.max_exp,
            st.coins,
            st.age_days()
        )
    };
    draw_text(buf, 1, 0, &title, fg);

    let s = st.stats;
    let lines = [
        ("Health", s.health),
        ("Hunger", s.hunger),
        ("Mood  ", s.mood),
        ("Hyg   ", s.hygiene),
    ];
    for (i, (name, val)) in lines.iter().enumerate() {
        let line = format!("{name}: {} {:>5.1}", bar(*val / 100.0, 14), val);
        draw_text(buf, 1, 2 + i as u16, &line, meter_color(*val, color));
    }
    draw_text(buf, 1, 6, &format!("Smarts: {:.0}", s.intelligence), fg);

    if let Some(activity) = st.activity {
        let left = (activity.ends_at - now).num_seconds().max(0);
        let what = match activity.kind {
            ActivityKind::Work => "Working hard",
            ActivityKind::Study => "Studying",
        };
        let line = format!("{what}... {}:{:02}", left / 60, left % 60);
        draw_text(buf, 1, 8, &line, if color { Color::Magenta } else { fg });
    }

    if st.dialogue.visible {
        // dim during the last quarter before auto-hide
        let fading = st
            .dialogue
            .shown_at
            .is_some_and(|at| (now - at).num_milliseconds() * 4 >= rules.dialogue_ms * 3);
        let tone = match (color, fading) {
            (false, _) => fg,
            (true, false) => Color::Yellow,
            (true, true) => Color::DarkYellow,
        };
        let width = (buf.w as usize).saturating_sub(4).min(60);
        for (i, line) in wrap(&st.dialogue.text, width).iter().take(3).enumerate() {
            let y = buf.h.saturating_sub(5) + i as u16;
            draw_text(buf, 2, y, line, tone);
        }
    }

    let help = if st.is_dead() {
        "n new game | q quit"
    } else if st.is_egg {
        "space knock on the egg | q quit"
    } else {
        match scene {
            Scene::Main => {
                "f feed | c clean | p play | t treat | w work | s study | x come home | r/a/z duel | h help | q quit"
            }
            Scene::Help => "h/esc close | q quit",
            _ => "number to choose | esc back",
        }
    };
    draw_text(buf, 1, buf.h.saturating_sub(1), help, fg);

    match scene {
        Scene::FeedMenu => {
            let items: Vec<String> = Food::ALL
                .iter()
                .map(|f| match f.cost() {
                    0 => format!("{} (free)", f.name()),
                    c => format!("{} (-{c})", f.name()),
                })
                .collect();
            draw_menu(buf, "Feed", &items);
        }
        Scene::TreatMenu => {
            let items: Vec<String> = Treatment::ALL
                .iter()
                .map(|t| format!("{} (-{})", t.name(), t.cost()))
                .collect();
            draw_menu(buf, "Treat", &items);
        }
        Scene::WorkMenu => {
            let items: Vec<String> = SESSION_CHOICES
                .iter()
                .map(|s| format!("work {s}s ({:.1} game h)", rules.game_hours(*s)))
                .collect();
            draw_menu(buf, "Work", &items);
        }
        Scene::StudyMenu => {
            let items: Vec<String> = SESSION_CHOICES
                .iter()
                .map(|s| format!("study {s}s (-{})", rules.tuition(*s)))
                .collect();
            draw_menu(buf, "Study", &items);
        }
        Scene::Help => draw_center_box(
            buf,
            "How to play",
            "Knock on the egg until it hatches.\n\
             Food, baths and medicine cost coins.\n\
             Play is free but makes it hungry.\n\
             From level 3 with 30 smarts it can work for coins.\n\
             Studying costs tuition and builds smarts.\n\
             While away, stats do not decay.\n\
             Hunger below 20 for 30 min or mood below 20\n\
             for an hour slowly drains health.\n\n\
             r/a/z: rock, paper, scissors for 20 coins.",
        ),
        Scene::Main => {}
    }

    if st.is_dead() {
        draw_center_box(
            buf,
            "Your penguin has passed on.",
            "Press N for a new egg, or Q to quit.",
        );
    }
}

fn draw_menu(buf: &mut CellBuffer, title: &str, items: &[String]) {
    let x = 1;
    let y0 = 10;
    draw_text(buf, x, y0, title, Color::White);
    for (i, item) in items.iter().enumerate() {
        let line = format!("{} {}", i + 1, item);
        draw_text(buf, x + 1, y0 + 1 + i as u16, &line, Color::White);
    }
}

pub(crate) fn draw_center_box(buf: &mut CellBuffer, title: &str, body: &str) {
    let w = buf.w;
    let h = buf.h;

    let bw = 60.min(w.saturating_sub(4));
    let bh = 16.min(h.saturating_sub(4));
    if bw < 4 || bh < 4 {
        return;
    }

    let x0 = (w - bw) / 2;
    let y0 = (h - bh) / 2;

    let put = |buf: &mut CellBuffer, x: u16, y: u16, ch: char| {
        buf.set(
            x,
            y,
            Cell {
                ch,
                ..Cell::default()
            },
        );
    };

    for y in y0..y0 + bh {
        for x in x0..x0 + bw {
            put(buf, x, y, ' ');
        }
    }
    for x in x0..x0 + bw {
        put(buf, x, y0, '─');
        put(buf, x, y0 + bh - 1, '─');
    }
    for y in y0..y0 + bh {
        put(buf, x0, y, '│');
        put(buf, x0 + bw - 1, y, '│');
    }
    put(buf, x0, y0, '┌');
    put(buf, x0 + bw - 1, y0, '┐');
    put(buf, x0, y0 + bh - 1, '└');
    put(buf, x0 + bw - 1, y0 + bh - 1, '┘');

    draw_text(buf, x0 + 2, y0 + 1, title, Color::White);

    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line.trim_start(), Color::White);
        yy += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &CellBuffer, y: u16) -> String {
        (0..buf.w).map(|x| buf.cells[buf.idx(x, y)].ch).collect()
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.5, 4), "[██  ]");
        assert_eq!(bar(2.0, 2), "[██]");
        assert_eq!(bar(-1.0, 2), "[  ]");
    }

    #[test]
    fn draw_text_clips_at_the_edge() {
        let mut buf = CellBuffer::new(5, 1);
        draw_text(&mut buf, 3, 0, "hello", Color::White);
        assert_eq!(row(&buf, 0), "   he");
    }

    #[test]
    fn dialogue_and_countdown_show_up() {
        let rules = Rules::default();
        let now = Utc::now();
        let mut st = GameState::default();
        st.is_egg = false;
        st.show_dialogue("hi there", &rules, now);
        st.activity = Some(crate::model::Activity {
            kind: ActivityKind::Work,
            ends_at: now + chrono::Duration::seconds(75),
            duration_secs: 120,
        });
        let mut buf = CellBuffer::new(100, 30);
        ui_overlay(&mut buf, &st, Scene::Main, &rules, now, false);
        let screen: Vec<String> = (0..buf.h).map(|y| row(&buf, y)).collect();
        assert!(screen.iter().any(|l| l.contains("hi there")));
        assert!(screen.iter().any(|l| l.contains("Working hard... 1:15")));
    }
}
