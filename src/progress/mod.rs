//! Persisted progress shapes and the aggregate views computed from them.

pub mod badges;
pub mod merge;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ProgressError;

/// Number of lessons offered by the learn module.
pub const LESSON_COUNT: u32 = 4;

/// Identifier of every module that owns a progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleId
{
    Typing,
    Learn,
    Math,
    Quiz,
    Science,
    Reading,
    Logic,
}

impl ModuleId
{
    pub const ALL: [ModuleId; 7] = [
        ModuleId::Typing,
        ModuleId::Learn,
        ModuleId::Math,
        ModuleId::Quiz,
        ModuleId::Science,
        ModuleId::Reading,
        ModuleId::Logic,
    ];

    /// Modules whose record has the `{level, score, badges}` shape.
    pub const SCORED: [ModuleId; 6] = [
        ModuleId::Typing,
        ModuleId::Math,
        ModuleId::Quiz,
        ModuleId::Science,
        ModuleId::Reading,
        ModuleId::Logic,
    ];

    pub fn as_str(self) -> &'static str
    {
        match self {
            ModuleId::Typing => "typing",
            ModuleId::Learn => "learn",
            ModuleId::Math => "math",
            ModuleId::Quiz => "quiz",
            ModuleId::Science => "science",
            ModuleId::Reading => "reading",
            ModuleId::Logic => "logic",
        }
    }
}

impl fmt::Display for ModuleId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId
{
    type Err = ProgressError;

    fn from_str(value: &str) -> Result<Self, Self::Err>
    {
        ModuleId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ProgressError::UnknownModule(value.to_string()))
    }
}

/// Best score, level and earned badges for one scored module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoredRecord
{
    pub level: u32,
    pub score: u32,
    pub badges: BTreeSet<String>,
}

impl Default for ScoredRecord
{
    fn default() -> Self
    {
        Self {
            level: 1,
            score: 0,
            badges: BTreeSet::new(),
        }
    }
}

impl ScoredRecord
{
    pub fn has_badge(&self, id: &str) -> bool
    {
        self.badges.contains(id)
    }
}

/// Lesson completion for the learn module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LearnRecord
{
    pub completed_lessons: BTreeSet<u32>,
    pub current_lesson: u32,
}

/// A single module's record, as handed to a module and returned by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRecord
{
    Scored(ScoredRecord),
    Learn(LearnRecord),
}

/// The full persisted mapping from module id to record.
///
/// The shape is fixed: every module always has a record. Keys missing from
/// persisted JSON are filled with their zero state on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressMap
{
    pub typing: ScoredRecord,
    pub learn: LearnRecord,
    pub math: ScoredRecord,
    pub quiz: ScoredRecord,
    pub science: ScoredRecord,
    pub reading: ScoredRecord,
    pub logic: ScoredRecord,
}

impl Default for ProgressMap
{
    fn default() -> Self
    {
        Self {
            typing: ScoredRecord::default(),
            learn: LearnRecord::default(),
            math: ScoredRecord::default(),
            quiz: ScoredRecord::default(),
            science: ScoredRecord::default(),
            reading: ScoredRecord::default(),
            logic: ScoredRecord::default(),
        }
    }
}

impl ProgressMap
{
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error>
    {
        let progress: ProgressMap = serde_json::from_str(raw)?;
        Ok(progress.normalized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error>
    {
        serde_json::to_string(self)
    }

    /// Copy of the record owned by `module`.
    pub fn record(&self, module: ModuleId) -> ModuleRecord
    {
        match self.scored(module) {
            Some(scored) => ModuleRecord::Scored(scored.clone()),
            None => ModuleRecord::Learn(self.learn.clone()),
        }
    }

    pub fn scored(&self, module: ModuleId) -> Option<&ScoredRecord>
    {
        match module {
            ModuleId::Typing => Some(&self.typing),
            ModuleId::Math => Some(&self.math),
            ModuleId::Quiz => Some(&self.quiz),
            ModuleId::Science => Some(&self.science),
            ModuleId::Reading => Some(&self.reading),
            ModuleId::Logic => Some(&self.logic),
            ModuleId::Learn => None,
        }
    }

    fn scored_mut(&mut self, module: ModuleId) -> Option<&mut ScoredRecord>
    {
        match module {
            ModuleId::Typing => Some(&mut self.typing),
            ModuleId::Math => Some(&mut self.math),
            ModuleId::Quiz => Some(&mut self.quiz),
            ModuleId::Science => Some(&mut self.science),
            ModuleId::Reading => Some(&mut self.reading),
            ModuleId::Logic => Some(&mut self.logic),
            ModuleId::Learn => None,
        }
    }

    /// Replace the record owned by `module`. Other modules are untouched.
    pub fn replace(&mut self, module: ModuleId, record: ModuleRecord) -> Result<(), ProgressError>
    {
        match record {
            ModuleRecord::Learn(learn) if module == ModuleId::Learn => {
                self.learn = learn;
                Ok(())
            }
            ModuleRecord::Scored(scored) => match self.scored_mut(module) {
                Some(slot) => {
                    *slot = scored;
                    Ok(())
                }
                None => Err(ProgressError::RecordMismatch(module)),
            },
            ModuleRecord::Learn(_) => Err(ProgressError::RecordMismatch(module)),
        }
    }

    fn scored_records(&self) -> impl Iterator<Item = &ScoredRecord>
    {
        ModuleId::SCORED.into_iter().filter_map(|id| self.scored(id))
    }

    /// Sum of every module's score.
    pub fn total_score(&self) -> u32
    {
        self.scored_records().map(|record| record.score).sum()
    }

    /// Size of the union of every module's badge set.
    pub fn total_badges(&self) -> usize
    {
        self.earned_badges().len()
    }

    pub fn earned_badges(&self) -> BTreeSet<&str>
    {
        self.scored_records()
            .flat_map(|record| record.badges.iter().map(String::as_str))
            .collect()
    }

    /// Highest level over the modules that expose one.
    pub fn highest_level(&self) -> u32
    {
        self.scored_records()
            .map(|record| record.level)
            .max()
            .unwrap_or(1)
    }

    pub fn lessons_completed(&self) -> usize
    {
        self.learn
            .completed_lessons
            .iter()
            .filter(|idx| **idx < LESSON_COUNT)
            .count()
    }

    fn normalized(mut self) -> Self
    {
        for id in ModuleId::SCORED {
            if let Some(record) = self.scored_mut(id) {
                record.level = record.level.max(1);
            }
        }
        self.learn.current_lesson = self.learn.current_lesson.min(LESSON_COUNT.saturating_sub(1));
        self
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn record(level: u32, score: u32, badges: &[&str]) -> ScoredRecord
    {
        ScoredRecord {
            level,
            score,
            badges: badges.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn default_map_has_zero_state_for_every_module()
    {
        let progress = ProgressMap::default();
        for id in ModuleId::SCORED {
            let scored = progress.scored(id).unwrap();
            assert_eq!(scored.level, 1);
            assert_eq!(scored.score, 0);
            assert!(scored.badges.is_empty());
        }
        assert!(progress.learn.completed_lessons.is_empty());
        assert_eq!(progress.learn.current_lesson, 0);
    }

    #[test]
    fn json_uses_module_ids_and_camel_case_learn_fields()
    {
        let json = ProgressMap::default().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for id in ModuleId::ALL {
            assert!(value.get(id.as_str()).is_some(), "missing key {id}");
        }
        assert!(value["learn"].get("completedLessons").is_some());
        assert!(value["learn"].get("currentLesson").is_some());
    }

    #[test]
    fn legacy_json_is_filled_with_defaults()
    {
        let raw = r#"{
            "typing": {"level": 2, "score": 120, "badges": []},
            "learn": {"completedLessons": [0, 1], "currentLesson": 2},
            "math": {"level": 1, "score": 40, "badges": ["math-streak"]},
            "quiz": {"score": 70, "badges": ["quiz-master", "quiz-master"]}
        }"#;
        let progress = ProgressMap::from_json(raw).unwrap();
        assert_eq!(progress.quiz.level, 1);
        assert_eq!(progress.quiz.badges.len(), 1);
        assert_eq!(progress.reading, ScoredRecord::default());
        assert_eq!(progress.logic, ScoredRecord::default());
        assert_eq!(progress.learn.current_lesson, 2);
    }

    #[test]
    fn populated_map_survives_json_unchanged()
    {
        let progress = ProgressMap {
            typing: record(4, 540, &["speed-demon", "typing-master"]),
            learn: LearnRecord {
                completed_lessons: [0, 1, 3].into_iter().collect(),
                current_lesson: 2,
            },
            math: record(3, 230, &["math-master", "math-streak"]),
            quiz: record(2, 80, &["perfect-score", "quiz-master"]),
            science: record(2, 40, &["science-star"]),
            reading: record(2, 20, &["reading-star"]),
            logic: record(3, 50, &["logic-star"]),
        };

        let restored = ProgressMap::from_json(&progress.to_json().unwrap()).unwrap();
        assert_eq!(restored, progress);
        for id in ModuleId::ALL {
            assert_eq!(restored.record(id), progress.record(id), "{id}");
        }
    }

    #[test]
    fn zero_level_is_normalized()
    {
        let raw = r#"{"math": {"level": 0, "score": 5, "badges": []}}"#;
        let progress = ProgressMap::from_json(raw).unwrap();
        assert_eq!(progress.math.level, 1);
    }

    #[test]
    fn replace_only_touches_the_named_module()
    {
        let mut progress = ProgressMap::default();
        let math = record(3, 220, &["math-master"]);
        progress
            .replace(ModuleId::Math, ModuleRecord::Scored(math.clone()))
            .unwrap();
        assert_eq!(progress.math, math);
        assert_eq!(progress.quiz, ScoredRecord::default());
        assert_eq!(progress.learn, LearnRecord::default());
    }

    #[test]
    fn replace_rejects_wrong_record_shape()
    {
        let mut progress = ProgressMap::default();
        let err = progress
            .replace(ModuleId::Learn, ModuleRecord::Scored(ScoredRecord::default()))
            .unwrap_err();
        assert!(matches!(err, ProgressError::RecordMismatch(ModuleId::Learn)));
        assert!(
            progress
                .replace(ModuleId::Quiz, ModuleRecord::Learn(LearnRecord::default()))
                .is_err()
        );
    }

    #[test]
    fn aggregate_views()
    {
        let mut progress = ProgressMap::default();
        progress.math = record(3, 220, &["math-master", "math-streak"]);
        progress.quiz = record(2, 80, &["quiz-master", "perfect-score"]);
        progress.typing = record(4, 300, &[]);
        progress.learn.completed_lessons = [0, 2].into_iter().collect();

        assert_eq!(progress.total_score(), 600);
        assert_eq!(progress.total_badges(), 4);
        assert_eq!(progress.highest_level(), 4);
        assert_eq!(progress.lessons_completed(), 2);
    }

    #[test]
    fn badge_total_counts_shared_ids_once()
    {
        let mut progress = ProgressMap::default();
        progress.quiz = record(1, 80, &["perfect-score"]);
        progress.science = record(1, 40, &["perfect-score"]);
        assert_eq!(progress.total_badges(), 1);
    }

    #[test]
    fn module_id_parses_case_insensitively()
    {
        assert_eq!("Math".parse::<ModuleId>().unwrap(), ModuleId::Math);
        assert!("chess".parse::<ModuleId>().is_err());
    }
}
