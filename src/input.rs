use crate::rules::{Food, Hand, Treatment, SESSION_CHOICES};
use crate::sim::PlayerAction;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Which overlay the keyboard is currently talking to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    FeedMenu,
    TreatMenu,
    WorkMenu,
    StudyMenu,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    Act(PlayerAction),
    Open(Scene),
    Back,
    Quit,
}

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

fn menu_index(key: KeyCode, len: usize) -> Option<usize> {
    match key {
        KeyCode::Char(ch) => {
            let n = ch.to_digit(10)? as usize;
            (1..=len).contains(&n).then(|| n - 1)
        }
        _ => None,
    }
}

pub(crate) fn map_event_to_command(scene: Scene, dead: bool, ev: InputEvent) -> Option<Command> {
    // Global
    if matches!(ev.key, KeyCode::Char('c')) && ev.mods.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }
    match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Command::Quit),
        KeyCode::Esc => return Some(Command::Back),
        _ => {}
    }

    if dead {
        return match ev.key {
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Act(PlayerAction::NewGame)),
            _ => None,
        };
    }

    match scene {
        Scene::Main => match ev.key {
            KeyCode::Char(' ') => Some(Command::Act(PlayerAction::ClickEgg)),
            KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::Open(Scene::FeedMenu)),
            KeyCode::Char('t') | KeyCode::Char('T') => Some(Command::Open(Scene::TreatMenu)),
            KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Open(Scene::WorkMenu)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Open(Scene::StudyMenu)),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Act(PlayerAction::Clean)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Act(PlayerAction::Play)),
            KeyCode::Char('x') | KeyCode::Char('X') => Some(Command::Act(PlayerAction::CancelWork)),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Act(PlayerAction::Duel(Hand::Rock))),
            KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(Command::Act(PlayerAction::Duel(Hand::Paper)))
            }
            KeyCode::Char('z') | KeyCode::Char('Z') => {
                Some(Command::Act(PlayerAction::Duel(Hand::Scissors)))
            }
            KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::Open(Scene::Help)),
            _ => None,
        },
        Scene::FeedMenu => menu_index(ev.key, Food::ALL.len())
            .map(|i| Command::Act(PlayerAction::Feed(Food::ALL[i]))),
        Scene::TreatMenu => menu_index(ev.key, Treatment::ALL.len())
            .map(|i| Command::Act(PlayerAction::Treat(Treatment::ALL[i]))),
        Scene::WorkMenu => menu_index(ev.key, SESSION_CHOICES.len())
            .map(|i| Command::Act(PlayerAction::StartWork(SESSION_CHOICES[i]))),
        Scene::StudyMenu => menu_index(ev.key, SESSION_CHOICES.len())
            .map(|i| Command::Act(PlayerAction::StartStudy(SESSION_CHOICES[i]))),
        Scene::Help => match ev.key {
            KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::Back),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ch: char) -> InputEvent {
        InputEvent {
            key: KeyCode::Char(ch),
            mods: KeyModifiers::NONE,
        }
    }

    #[test]
    fn menus_pick_by_number() {
        assert_eq!(
            map_event_to_command(Scene::FeedMenu, false, key('3')),
            Some(Command::Act(PlayerAction::Feed(Food::Feast)))
        );
        assert_eq!(
            map_event_to_command(Scene::WorkMenu, false, key('1')),
            Some(Command::Act(PlayerAction::StartWork(1)))
        );
        assert_eq!(map_event_to_command(Scene::TreatMenu, false, key('4')), None);
        assert_eq!(map_event_to_command(Scene::StudyMenu, false, key('0')), None);
    }

    #[test]
    fn death_screen_only_offers_a_new_game() {
        assert_eq!(map_event_to_command(Scene::Main, true, key('f')), None);
        assert_eq!(
            map_event_to_command(Scene::Main, true, key('n')),
            Some(Command::Act(PlayerAction::NewGame))
        );
        assert_eq!(map_event_to_command(Scene::Main, true, key('q')), Some(Command::Quit));
    }

    #[test]
    fn space_knocks_on_the_egg() {
        assert_eq!(
            map_event_to_command(Scene::Main, false, key(' ')),
            Some(Command::Act(PlayerAction::ClickEgg))
        );
    }
}
