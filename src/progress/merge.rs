//! Folding a finished session into a module's stored record.
//!
//! Every function here is pure: the result depends only on the arguments,
//! and merging one module never reads another module's record.

use std::collections::BTreeSet;

use super::badges::Badge;
use super::{LearnRecord, ModuleId, ScoredRecord};

const TYPING_MASTER_SCORE: u32 = 500;
const SPEED_DEMON_WORDS: u32 = 20;
const MATH_STREAK: u32 = 5;
const MATH_MASTER_SCORE: u32 = 200;
const QUIZ_MASTER_PERCENT: u32 = 60;
const SCIENCE_STAR_SCORE: u32 = 30;
const READING_STAR_SCORE: u32 = 10;
const LOGIC_STAR_SCORE: u32 = 40;

/// Points per level for each scored module.
pub fn level_step(module: ModuleId) -> u32
{
    match module {
        ModuleId::Typing => 200,
        ModuleId::Math => 100,
        ModuleId::Quiz => 40,
        ModuleId::Science => 20,
        ModuleId::Reading => 10,
        ModuleId::Logic => 20,
        ModuleId::Learn => 1,
    }
}

/// Level reached by a single session score.
pub fn level_for(module: ModuleId, score: u32) -> u32
{
    score / level_step(module).max(1) + 1
}

/// Terminal metrics of one play session.
pub trait SessionOutcome
{
    fn module(&self) -> ModuleId;

    fn score(&self) -> u32;

    /// Badges whose threshold this session met, regardless of history.
    fn earned_badges(&self) -> Vec<Badge>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypingOutcome
{
    pub score: u32,
    pub words_typed: u32,
}

impl SessionOutcome for TypingOutcome
{
    fn module(&self) -> ModuleId
    {
        ModuleId::Typing
    }

    fn score(&self) -> u32
    {
        self.score
    }

    fn earned_badges(&self) -> Vec<Badge>
    {
        let mut earned = Vec::new();
        if self.score > TYPING_MASTER_SCORE {
            earned.push(Badge::TypingMaster);
        }
        if self.words_typed > SPEED_DEMON_WORDS {
            earned.push(Badge::SpeedDemon);
        }
        earned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MathOutcome
{
    pub score: u32,
    pub best_streak: u32,
}

impl SessionOutcome for MathOutcome
{
    fn module(&self) -> ModuleId
    {
        ModuleId::Math
    }

    fn score(&self) -> u32
    {
        self.score
    }

    fn earned_badges(&self) -> Vec<Badge>
    {
        let mut earned = Vec::new();
        if self.best_streak >= MATH_STREAK {
            earned.push(Badge::MathStreak);
        }
        if self.score >= MATH_MASTER_SCORE {
            earned.push(Badge::MathMaster);
        }
        earned
    }
}

/// Outcome of a multiple-choice round (quiz, science, reading).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOutcome
{
    pub module: ModuleId,
    pub score: u32,
    pub max_score: u32,
}

impl ChoiceOutcome
{
    /// Rounded percentage of the attainable score.
    pub fn percentage(&self) -> u32
    {
        if self.max_score == 0 {
            return 0;
        }
        (self.score * 100 + self.max_score / 2) / self.max_score
    }
}

impl SessionOutcome for ChoiceOutcome
{
    fn module(&self) -> ModuleId
    {
        self.module
    }

    fn score(&self) -> u32
    {
        self.score
    }

    fn earned_badges(&self) -> Vec<Badge>
    {
        let mut earned = Vec::new();
        match self.module {
            ModuleId::Quiz => {
                if self.percentage() >= QUIZ_MASTER_PERCENT {
                    earned.push(Badge::QuizMaster);
                }
                if self.max_score > 0 && self.score == self.max_score {
                    earned.push(Badge::PerfectScore);
                }
            }
            ModuleId::Science => {
                if self.score >= SCIENCE_STAR_SCORE {
                    earned.push(Badge::ScienceStar);
                }
            }
            ModuleId::Reading => {
                if self.score >= READING_STAR_SCORE {
                    earned.push(Badge::ReadingStar);
                }
            }
            _ => {}
        }
        earned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicOutcome
{
    pub score: u32,
}

impl SessionOutcome for LogicOutcome
{
    fn module(&self) -> ModuleId
    {
        ModuleId::Logic
    }

    fn score(&self) -> u32
    {
        self.score
    }

    fn earned_badges(&self) -> Vec<Badge>
    {
        if self.score >= LOGIC_STAR_SCORE {
            vec![Badge::LogicStar]
        } else {
            Vec::new()
        }
    }
}

/// Record describing a single session on its own.
pub fn session_record(outcome: &impl SessionOutcome) -> ScoredRecord
{
    ScoredRecord {
        level: level_for(outcome.module(), outcome.score()),
        score: outcome.score(),
        badges: outcome
            .earned_badges()
            .into_iter()
            .map(|badge| badge.as_str().to_string())
            .collect(),
    }
}

/// Max of scores, max of levels, union of badges.
pub fn merge(old: &ScoredRecord, session: &ScoredRecord) -> ScoredRecord
{
    let badges: BTreeSet<String> = old.badges.union(&session.badges).cloned().collect();
    ScoredRecord {
        level: old.level.max(session.level).max(1),
        score: old.score.max(session.score),
        badges,
    }
}

/// Shorthand for `merge(old, &session_record(outcome))`.
pub fn merge_outcome(old: &ScoredRecord, outcome: &impl SessionOutcome) -> ScoredRecord
{
    merge(old, &session_record(outcome))
}

/// Mark `completed` as done and move the cursor forward, clamped to the
/// last lesson. Out-of-range indices leave the record unchanged.
pub fn merge_lesson(old: &LearnRecord, completed: u32, lesson_count: u32) -> LearnRecord
{
    if completed >= lesson_count {
        return old.clone();
    }
    let mut completed_lessons = old.completed_lessons.clone();
    completed_lessons.insert(completed);
    LearnRecord {
        completed_lessons,
        current_lesson: old
            .current_lesson
            .max(completed + 1)
            .min(lesson_count - 1),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::progress::LESSON_COUNT;

    fn badges(record: &ScoredRecord) -> Vec<&str>
    {
        record.badges.iter().map(String::as_str).collect()
    }

    #[test]
    fn math_session_of_220_with_streak_6()
    {
        let outcome = MathOutcome {
            score: 220,
            best_streak: 6,
        };
        let merged = merge_outcome(&ScoredRecord::default(), &outcome);
        assert_eq!(merged.score, 220);
        assert!(merged.level >= 3);
        assert!(merged.has_badge("math-streak"));
        assert!(merged.has_badge("math-master"));
    }

    #[test]
    fn perfect_quiz_earns_both_quiz_badges()
    {
        let outcome = ChoiceOutcome {
            module: ModuleId::Quiz,
            score: 80,
            max_score: 80,
        };
        let merged = merge_outcome(&ScoredRecord::default(), &outcome);
        assert_eq!(badges(&merged), vec!["perfect-score", "quiz-master"]);
    }

    #[test]
    fn quiz_master_threshold_is_sixty_percent()
    {
        let pass = ChoiceOutcome {
            module: ModuleId::Quiz,
            score: 50,
            max_score: 80,
        };
        let fail = ChoiceOutcome {
            module: ModuleId::Quiz,
            score: 40,
            max_score: 80,
        };
        assert_eq!(pass.percentage(), 63);
        assert_eq!(pass.earned_badges(), vec![Badge::QuizMaster]);
        assert!(fail.earned_badges().is_empty());
    }

    #[test]
    fn weaker_session_never_lowers_score_or_level()
    {
        let old = ScoredRecord {
            level: 4,
            score: 350,
            badges: ["math-master".to_string()].into_iter().collect(),
        };
        let merged = merge_outcome(
            &old,
            &MathOutcome {
                score: 30,
                best_streak: 1,
            },
        );
        assert_eq!(merged, old);
    }

    fn assert_never_lowers(old: &ScoredRecord, outcome: &impl SessionOutcome) -> ScoredRecord
    {
        let merged = merge_outcome(old, outcome);
        let module = outcome.module();
        assert!(merged.score >= old.score, "{module} score dropped");
        assert!(merged.level >= old.level, "{module} level dropped");
        assert!(merged.badges.is_superset(&old.badges), "{module} lost a badge");
        merged
    }

    #[test]
    fn weaker_sessions_keep_every_scored_module_record()
    {
        let strong = |score: u32, badge: &str| ScoredRecord {
            level: 5,
            score,
            badges: [badge.to_string()].into_iter().collect(),
        };

        let typing = strong(640, "typing-master");
        let merged = assert_never_lowers(
            &typing,
            &TypingOutcome {
                score: 90,
                words_typed: 24,
            },
        );
        assert_eq!(merged.score, 640);
        assert_eq!(badges(&merged), vec!["speed-demon", "typing-master"]);

        for (module, badge) in [
            (ModuleId::Quiz, "quiz-master"),
            (ModuleId::Science, "science-star"),
            (ModuleId::Reading, "reading-star"),
        ] {
            let old = strong(80, badge);
            let weak = ChoiceOutcome {
                module,
                score: 0,
                max_score: 80,
            };
            assert_eq!(assert_never_lowers(&old, &weak), old);
        }

        let logic = strong(50, "logic-star");
        assert_eq!(assert_never_lowers(&logic, &LogicOutcome { score: 10 }), logic);
    }

    #[test]
    fn remerging_the_same_session_is_idempotent()
    {
        let session = session_record(&TypingOutcome {
            score: 620,
            words_typed: 25,
        });
        let once = merge(&ScoredRecord::default(), &session);
        let twice = merge(&once, &session);
        assert_eq!(once, twice);
        assert_eq!(once.badges.len(), 2);
    }

    #[test]
    fn old_unknown_badges_survive_a_merge()
    {
        let mut old = ScoredRecord::default();
        old.badges.insert("legacy-badge".to_string());
        let merged = merge_outcome(&old, &LogicOutcome { score: 50 });
        assert!(merged.has_badge("legacy-badge"));
        assert!(merged.has_badge("logic-star"));
    }

    #[test]
    fn threshold_edges()
    {
        assert!(TypingOutcome { score: 500, words_typed: 20 }.earned_badges().is_empty());
        assert_eq!(
            TypingOutcome { score: 510, words_typed: 21 }.earned_badges(),
            vec![Badge::TypingMaster, Badge::SpeedDemon]
        );
        let science = ChoiceOutcome {
            module: ModuleId::Science,
            score: 30,
            max_score: 40,
        };
        assert_eq!(science.earned_badges(), vec![Badge::ScienceStar]);
        let reading = ChoiceOutcome {
            module: ModuleId::Reading,
            score: 0,
            max_score: 20,
        };
        assert!(reading.earned_badges().is_empty());
    }

    #[test]
    fn levels_follow_module_step()
    {
        assert_eq!(level_for(ModuleId::Math, 0), 1);
        assert_eq!(level_for(ModuleId::Math, 199), 2);
        assert_eq!(level_for(ModuleId::Typing, 400), 3);
        assert_eq!(level_for(ModuleId::Quiz, 80), 3);
    }

    #[test]
    fn completing_last_lesson_clamps_cursor()
    {
        let merged = merge_lesson(&LearnRecord::default(), 3, LESSON_COUNT);
        assert!(merged.completed_lessons.contains(&3));
        assert_eq!(merged.current_lesson, 3);
    }

    #[test]
    fn lesson_cursor_never_moves_back()
    {
        let old = LearnRecord {
            completed_lessons: [0, 1, 2].into_iter().collect(),
            current_lesson: 3,
        };
        let merged = merge_lesson(&old, 0, LESSON_COUNT);
        assert_eq!(merged, old);
    }

    #[test]
    fn out_of_range_lesson_is_ignored()
    {
        let old = LearnRecord::default();
        assert_eq!(merge_lesson(&old, 9, LESSON_COUNT), old);
    }
}
