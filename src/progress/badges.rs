//! Badge catalog
//!
//! Every badge a child can earn, with the text shown on the achievements
//! screen. Module badges are stored in their module's record; derived
//! achievements are recomputed from the whole mapping and never stored.

use super::{LESSON_COUNT, ModuleId, ProgressMap};

/// Unique identifier for each badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Badge
{
    // Typing
    TypingMaster,
    SpeedDemon,

    // Math
    MathStreak,
    MathMaster,

    // Quiz
    QuizMaster,
    PerfectScore,

    // Other zones
    ScienceStar,
    ReadingStar,
    LogicStar,

    // Derived
    ComputerExplorer,
    LearningChampion,
}

impl Badge
{
    pub const ALL: [Badge; 11] = [
        Badge::TypingMaster,
        Badge::SpeedDemon,
        Badge::MathStreak,
        Badge::MathMaster,
        Badge::QuizMaster,
        Badge::PerfectScore,
        Badge::ScienceStar,
        Badge::ReadingStar,
        Badge::LogicStar,
        Badge::ComputerExplorer,
        Badge::LearningChampion,
    ];

    /// Stable id used in persisted records
    pub fn as_str(self) -> &'static str
    {
        match self {
            Self::TypingMaster => "typing-master",
            Self::SpeedDemon => "speed-demon",
            Self::MathStreak => "math-streak",
            Self::MathMaster => "math-master",
            Self::QuizMaster => "quiz-master",
            Self::PerfectScore => "perfect-score",
            Self::ScienceStar => "science-star",
            Self::ReadingStar => "reading-star",
            Self::LogicStar => "logic-star",
            Self::ComputerExplorer => "computer-explorer",
            Self::LearningChampion => "learning-champion",
        }
    }

    pub fn name(self) -> &'static str
    {
        match self {
            Self::TypingMaster => "Typing Master",
            Self::SpeedDemon => "Speed Demon",
            Self::MathStreak => "Math Streak",
            Self::MathMaster => "Math Master",
            Self::QuizMaster => "Quiz Master",
            Self::PerfectScore => "Perfect Score",
            Self::ScienceStar => "Science Star",
            Self::ReadingStar => "Reading Star",
            Self::LogicStar => "Logic Star",
            Self::ComputerExplorer => "Computer Explorer",
            Self::LearningChampion => "Learning Champion",
        }
    }

    pub fn description(self) -> &'static str
    {
        match self {
            Self::TypingMaster => "Score over 500 points in the typing game",
            Self::SpeedDemon => "Type more than 20 words in one game",
            Self::MathStreak => "Get 5 math problems correct in a row",
            Self::MathMaster => "Score 200 points in math games",
            Self::QuizMaster => "Score 60% or higher on a quiz",
            Self::PerfectScore => "Get 100% on a quiz",
            Self::ScienceStar => "Answer 3 science questions correctly",
            Self::ReadingStar => "Answer a story question correctly",
            Self::LogicStar => "Solve 4 logic puzzles in one game",
            Self::ComputerExplorer => "Complete all computer lessons",
            Self::LearningChampion => "Play all game modes",
        }
    }
}

/// Whether `badge` is unlocked for this mapping.
pub fn is_unlocked(progress: &ProgressMap, badge: Badge) -> bool
{
    match badge {
        Badge::ComputerExplorer => {
            progress.lessons_completed() >= LESSON_COUNT as usize
        }
        Badge::LearningChampion => {
            ModuleId::SCORED
                .into_iter()
                .filter_map(|id| progress.scored(id))
                .all(|record| record.score > 0)
                && progress.lessons_completed() > 0
        }
        stored => progress.earned_badges().contains(stored.as_str()),
    }
}

/// Catalog entries paired with their unlocked state, in catalog order.
pub fn catalog(progress: &ProgressMap) -> Vec<(Badge, bool)>
{
    Badge::ALL
        .into_iter()
        .map(|badge| (badge, is_unlocked(progress, badge)))
        .collect()
}
