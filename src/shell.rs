//! Interactive loop: draws whatever screen the navigator says is active.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::AppConfig;
use crate::games::{self, rewards};
use crate::nav::{Navigator, Screen};
use crate::progress::badges::catalog;
use crate::progress::{LESSON_COUNT, ModuleId};
use crate::screens::menu::{self, MenuAction};
use crate::screens::settings::{self, SettingsExit};
use crate::screens::{achievements, welcome};
use crate::store::{ProgressStore, Storage};
use crate::term::TerminalGuard;

const FALLBACK_NAME: &str = "friend";

pub fn run<S: Storage>(
    term: &mut TerminalGuard,
    store: &mut ProgressStore<S>,
    config: &AppConfig,
) -> Result<()>
{
    let mut prefs = config.prefs();
    let mut nav = Navigator::start(store);

    loop {
        match nav.screen() {
            Screen::Welcome => match welcome::run(term).context("welcome screen")? {
                Some(raw) => {
                    nav.submit_name(store, &raw);
                }
                None => break,
            },
            Screen::Menu => {
                let warning = store.take_warning();
                let name = store.name().unwrap_or(FALLBACK_NAME).to_string();
                let action = menu::run(term, &name, store.progress(), warning.as_deref())
                    .context("menu")?;
                match action {
                    MenuAction::Open(target) => {
                        nav.select_screen(target);
                    }
                    MenuAction::Quit => break,
                }
            }
            Screen::Module(module) => {
                let record = store.record(module);
                let mut on_update = |record| store.update(module, record);
                games::run_module(term, module, record, &prefs, &mut on_update)
                    .with_context(|| format!("module {module}"))?;
                nav.back();
            }
            Screen::Rewards => {
                rewards::run(term, store.progress()).context("rewards screen")?;
                nav.back();
            }
            Screen::Achievements => {
                achievements::run(term, store.progress()).context("achievements screen")?;
                nav.back();
            }
            Screen::Settings => {
                let exit = settings::run(term, &mut prefs, &config.parent_password)
                    .context("settings screen")?;
                match exit {
                    SettingsExit::Back => nav.back(),
                    SettingsExit::Reset => {
                        nav.confirm_reset(store);
                    }
                }
            }
        }
    }

    info!("Leaving");
    Ok(())
}

/// Plain-text summary of the stored progress.
pub fn status_lines<S: Storage>(store: &ProgressStore<S>) -> Vec<String>
{
    let progress = store.progress();
    let mut lines = vec![
        format!("Name:          {}", store.name().unwrap_or("(not set)")),
        format!("Total points:  {}", progress.total_score()),
        format!("Highest level: {}", progress.highest_level()),
        format!("Badges:        {}", progress.total_badges()),
        format!("Lessons:       {}/{}", progress.lessons_completed(), LESSON_COUNT),
        String::new(),
    ];
    for module in ModuleId::SCORED {
        if let Some(record) = progress.scored(module) {
            lines.push(format!(
                "{:<8} level {:<3} score {:<5} {}",
                module.as_str(),
                record.level,
                record.score,
                record.badges.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
    }
    let unlocked: Vec<&str> = catalog(progress)
        .into_iter()
        .filter(|(_, earned)| *earned)
        .map(|(badge, _)| badge.name())
        .collect();
    lines.push(String::new());
    let achievements = if unlocked.is_empty() {
        "none yet".to_string()
    } else {
        unlocked.join(", ")
    };
    lines.push(format!("Achievements:  {achievements}"));
    lines
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::progress::{ModuleRecord, ScoredRecord};
    use crate::store::MemoryStorage;

    #[test]
    fn status_reports_name_and_totals()
    {
        let mut store = ProgressStore::open(MemoryStorage::new());
        store.set_name("Mia");
        store.update(
            ModuleId::Math,
            ModuleRecord::Scored(ScoredRecord {
                level: 3,
                score: 210,
                badges: ["math-master".to_string()].into_iter().collect(),
            }),
        );

        let lines = status_lines(&store);
        assert!(lines[0].ends_with("Mia"));
        assert!(lines[1].ends_with("210"));
        assert!(lines.iter().any(|line| line.starts_with("math") && line.contains("math-master")));
        assert!(lines.last().is_some_and(|line| line.contains("Math Master")));
    }

    #[test]
    fn status_without_name()
    {
        let store = ProgressStore::open(MemoryStorage::new());
        let lines = status_lines(&store);
        assert!(lines[0].ends_with("(not set)"));
        assert!(lines.last().is_some_and(|line| line.ends_with("none yet")));
    }
}
