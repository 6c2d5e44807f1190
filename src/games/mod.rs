pub mod choice;
pub mod learn;
pub mod logic;
pub mod math;
pub mod questions;
pub mod rewards;
pub mod timer;
pub mod typing;
mod words;

use std::io;

use tracing::warn;

use crate::nav::Screen;
use crate::progress::{ModuleId, ModuleRecord};
use crate::term::TerminalGuard;

const MIN_SPEED: f32 = 0.5;
const MAX_SPEED: f32 = 2.0;

/// Process-lifetime preferences every module can read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prefs
{
    pub sound: bool,
    pub typing_speed: f32,
}

impl Default for Prefs
{
    fn default() -> Self
    {
        Self {
            sound: true,
            typing_speed: 1.0,
        }
    }
}

impl Prefs
{
    /// The bell marks mistakes only: a wrong answer or a lost life.
    pub fn rings_for(&self, mistake: bool) -> bool
    {
        self.sound && mistake
    }
}

/// Duration multiplier for a speed setting: faster means shorter.
pub fn speed_scale(speed: f32) -> f32
{
    let speed = if speed.is_finite() { speed } else { 1.0 };
    1.0 / speed.clamp(MIN_SPEED, MAX_SPEED)
}

pub struct GameDescriptor
{
    pub screen: Screen,
    pub key: char,
    pub title: &'static str,
    pub description: &'static str,
}

/// Everything the menu can open, in display order.
pub fn registry() -> Vec<GameDescriptor>
{
    vec![
        GameDescriptor {
            screen: Screen::Module(ModuleId::Typing),
            key: '1',
            title: "Typing Adventure",
            description: "Catch falling words!",
        },
        GameDescriptor {
            screen: Screen::Module(ModuleId::Learn),
            key: '2',
            title: "Computer Explorer",
            description: "Learn computer basics!",
        },
        GameDescriptor {
            screen: Screen::Module(ModuleId::Math),
            key: '3',
            title: "Math Playground",
            description: "Fun with numbers!",
        },
        GameDescriptor {
            screen: Screen::Module(ModuleId::Quiz),
            key: '4',
            title: "Quiz Corner",
            description: "Test your knowledge!",
        },
        GameDescriptor {
            screen: Screen::Module(ModuleId::Science),
            key: '5',
            title: "Science Zone",
            description: "Explore the world around you!",
        },
        GameDescriptor {
            screen: Screen::Module(ModuleId::Reading),
            key: '6',
            title: "Reading Room",
            description: "Read stories and answer questions!",
        },
        GameDescriptor {
            screen: Screen::Module(ModuleId::Logic),
            key: '7',
            title: "Logic Lab",
            description: "What comes next?",
        },
        GameDescriptor {
            screen: Screen::Rewards,
            key: 'r',
            title: "Rewards & Shop",
            description: "Spend your points!",
        },
        GameDescriptor {
            screen: Screen::Achievements,
            key: 'a',
            title: "Achievements",
            description: "See your badges!",
        },
        GameDescriptor {
            screen: Screen::Settings,
            key: 's',
            title: "Settings",
            description: "For grown-ups",
        },
    ]
}

/// Run one module.
///
/// The module gets a copy of its own record and reports every finished
/// session through `on_update` with a record that already satisfies the
/// merge rules. Returning means the child pressed back.
pub fn run_module(
    term: &mut TerminalGuard,
    module: ModuleId,
    record: ModuleRecord,
    prefs: &Prefs,
    on_update: &mut dyn FnMut(ModuleRecord),
) -> io::Result<()>
{
    match (module, record) {
        (ModuleId::Learn, ModuleRecord::Learn(learn)) => {
            learn::run(term, &learn, &mut |record| on_update(ModuleRecord::Learn(record)))
        }
        (ModuleId::Typing, ModuleRecord::Scored(scored)) => {
            typing::run(term, &scored, prefs, &mut |record| {
                on_update(ModuleRecord::Scored(record))
            })
        }
        (ModuleId::Math, ModuleRecord::Scored(scored)) => {
            math::run(term, &scored, prefs, &mut |record| {
                on_update(ModuleRecord::Scored(record))
            })
        }
        (ModuleId::Logic, ModuleRecord::Scored(scored)) => {
            logic::run(term, &scored, prefs, &mut |record| {
                on_update(ModuleRecord::Scored(record))
            })
        }
        (ModuleId::Quiz | ModuleId::Science | ModuleId::Reading, ModuleRecord::Scored(scored)) => {
            choice::run(term, module, &scored, prefs, &mut |record| {
                on_update(ModuleRecord::Scored(record))
            })
        }
        (module, _) => {
            warn!(%module, "Record shape does not match module, not starting it");
            Ok(())
        }
    }
}
