//! Navigation controller: which single screen is active.

use std::fmt;

use tracing::{debug, info};

use crate::progress::ModuleId;
use crate::store::{ProgressStore, Storage};

/// Longest accepted display name, in characters.
pub const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen
{
    Welcome,
    Menu,
    Module(ModuleId),
    Rewards,
    Achievements,
    Settings,
}

impl Screen
{
    /// Resolve a screen identifier. Anything unrecognised is the menu.
    pub fn parse(id: &str) -> Screen
    {
        match id.trim().to_ascii_lowercase().as_str() {
            "welcome" => Screen::Welcome,
            "rewards" => Screen::Rewards,
            "achievements" => Screen::Achievements,
            "settings" => Screen::Settings,
            other => other
                .parse::<ModuleId>()
                .map(Screen::Module)
                .unwrap_or(Screen::Menu),
        }
    }

    pub fn id(self) -> &'static str
    {
        match self {
            Screen::Welcome => "welcome",
            Screen::Menu => "menu",
            Screen::Module(module) => module.as_str(),
            Screen::Rewards => "rewards",
            Screen::Achievements => "achievements",
            Screen::Settings => "settings",
        }
    }

    /// Whether the menu can select this screen directly.
    pub fn is_menu_target(self) -> bool
    {
        !matches!(self, Screen::Welcome | Screen::Menu)
    }
}

impl fmt::Display for Screen
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.id())
    }
}

/// Normalise a submitted name. `None` when nothing usable is left.
pub fn clean_name(raw: &str) -> Option<String>
{
    let trimmed: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    let trimmed = trimmed.trim_end().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Single-active-screen state machine.
///
/// There is no history: every transition picks the next screen from the
/// current one and the event alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator
{
    screen: Screen,
}

impl Navigator
{
    /// `Welcome` until a name is on record, otherwise `Menu`.
    pub fn start<S: Storage>(store: &ProgressStore<S>) -> Self
    {
        let screen = if store.name().is_some() {
            Screen::Menu
        } else {
            Screen::Welcome
        };
        debug!(%screen, "Navigation started");
        Self { screen }
    }

    pub fn screen(&self) -> Screen
    {
        self.screen
    }

    /// Welcome form submitted. Blank names keep the welcome screen.
    pub fn submit_name<S: Storage>(&mut self, store: &mut ProgressStore<S>, raw: &str) -> bool
    {
        if self.screen != Screen::Welcome {
            return false;
        }
        let Some(name) = clean_name(raw) else {
            return false;
        };
        store.set_name(&name);
        self.go(Screen::Menu);
        true
    }

    /// Menu selection by identifier. Unknown identifiers resolve to the menu.
    pub fn select(&mut self, id: &str) -> Screen
    {
        self.select_screen(Screen::parse(id))
    }

    pub fn select_screen(&mut self, target: Screen) -> Screen
    {
        if self.screen != Screen::Menu {
            debug!(from = %self.screen, to = %target, "Selection ignored outside the menu");
            return self.screen;
        }
        if target.is_menu_target() {
            self.go(target);
        }
        self.screen
    }

    /// The single `back` action every non-welcome screen exposes.
    pub fn back(&mut self)
    {
        if self.screen != Screen::Welcome {
            self.go(Screen::Menu);
        }
    }

    /// Settings confirmed a reset: wipe everything and start over.
    pub fn confirm_reset<S: Storage>(&mut self, store: &mut ProgressStore<S>) -> bool
    {
        if self.screen != Screen::Settings {
            return false;
        }
        store.reset();
        self.go(Screen::Welcome);
        true
    }

    fn go(&mut self, next: Screen)
    {
        if next != self.screen {
            info!(from = %self.screen, to = %next, "Navigate");
        }
        self.screen = next;
    }
}
