use std::collections::BTreeSet;
use std::fs;

use safelearn_junior::progress::merge::{
    ChoiceOutcome, MathOutcome, TypingOutcome, merge_lesson, merge_outcome,
};
use safelearn_junior::progress::{LESSON_COUNT, badges};
use safelearn_junior::store::{NAME_KEY, PROGRESS_KEY};
use safelearn_junior::{
    FileStorage, LearnRecord, ModuleId, ModuleRecord, ProgressMap, ProgressStore, ScoredRecord,
    Storage,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> ProgressStore<FileStorage>
{
    ProgressStore::open(FileStorage::new(dir.path()))
}

#[test]
fn progress_survives_a_restart()
{
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.set_name("Sam");
        let typing = merge_outcome(
            &store.progress().typing,
            &TypingOutcome {
                score: 520,
                words_typed: 21,
            },
        );
        store.update(ModuleId::Typing, ModuleRecord::Scored(typing));
        let learn = merge_lesson(&store.progress().learn, 0, LESSON_COUNT);
        store.update(ModuleId::Learn, ModuleRecord::Learn(learn));
    }

    let store = open(&dir);
    assert_eq!(store.name(), Some("Sam"));
    let typing = &store.progress().typing;
    assert_eq!(typing.score, 520);
    assert_eq!(typing.level, 3);
    assert!(typing.has_badge("typing-master"));
    assert!(typing.has_badge("speed-demon"));
    assert_eq!(store.progress().learn.completed_lessons, BTreeSet::from([0]));
    assert_eq!(store.progress().learn.current_lesson, 1);
}

#[test]
fn first_math_session_from_zero_state()
{
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let merged = merge_outcome(
        &store.progress().math,
        &MathOutcome {
            score: 120,
            best_streak: 6,
        },
    );
    store.update(ModuleId::Math, ModuleRecord::Scored(merged));

    let math = open(&dir).progress().math.clone();
    assert_eq!(math.score, 120);
    assert_eq!(math.level, 2);
    assert_eq!(math.badges, BTreeSet::from(["math-streak".to_string()]));
}

#[test]
fn weaker_session_does_not_regress_stored_record()
{
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let strong = ScoredRecord {
        level: 4,
        score: 350,
        badges: BTreeSet::from(["math-master".to_string()]),
    };
    store.update(ModuleId::Math, ModuleRecord::Scored(strong.clone()));

    let weak = merge_outcome(
        &store.progress().math,
        &MathOutcome {
            score: 30,
            best_streak: 1,
        },
    );
    store.update(ModuleId::Math, ModuleRecord::Scored(weak));
    assert_eq!(open(&dir).progress().math, strong);
}

#[test]
fn perfect_quiz_is_stored_with_both_badges()
{
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let quiz = merge_outcome(
        &store.progress().quiz,
        &ChoiceOutcome {
            module: ModuleId::Quiz,
            score: 80,
            max_score: 80,
        },
    );
    store.update(ModuleId::Quiz, ModuleRecord::Scored(quiz));

    let progress = open(&dir).progress().clone();
    assert!(progress.quiz.has_badge("quiz-master"));
    assert!(progress.quiz.has_badge("perfect-score"));
    assert_eq!(progress.total_badges(), 2);
}

#[test]
fn corrupt_progress_file_loads_defaults_and_keeps_name()
{
    let dir = TempDir::new().unwrap();
    {
        let mut storage = FileStorage::new(dir.path());
        storage.set(NAME_KEY, "Lee").unwrap();
        storage.set(PROGRESS_KEY, "{{{ not json").unwrap();
    }
    let store = open(&dir);
    assert_eq!(store.name(), Some("Lee"));
    assert_eq!(store.progress(), &ProgressMap::default());
}

#[test]
fn legacy_save_is_filled_in()
{
    let dir = TempDir::new().unwrap();
    let legacy = r#"{
        "typing": {"level": 2, "score": 210, "badges": []},
        "learn": {"completedLessons": [0, 1], "currentLesson": 2},
        "math": {"level": 0, "score": 40, "badges": []},
        "quiz": {"score": 60, "badges": ["quiz-master"]}
    }"#;
    FileStorage::new(dir.path()).set(PROGRESS_KEY, legacy).unwrap();

    let progress = open(&dir).progress().clone();
    assert_eq!(progress.typing.score, 210);
    assert_eq!(progress.math.level, 1);
    assert_eq!(progress.quiz.level, 1);
    assert!(progress.quiz.has_badge("quiz-master"));
    assert_eq!(progress.science, ScoredRecord::default());
    assert_eq!(progress.logic, ScoredRecord::default());
    assert_eq!(progress.lessons_completed(), 2);
}

#[test]
fn reset_is_idempotent_on_disk()
{
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.set_name("Ari");
    store.update(
        ModuleId::Reading,
        ModuleRecord::Scored(ScoredRecord {
            level: 2,
            score: 20,
            badges: BTreeSet::from(["reading-star".to_string()]),
        }),
    );

    store.reset();
    store.reset();

    assert!(store.take_warning().is_none());
    let reopened = open(&dir);
    assert_eq!(reopened.name(), None);
    assert_eq!(reopened.progress(), &ProgressMap::default());
    let leftovers = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "entry"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn all_lessons_and_modules_unlock_derived_achievements()
{
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);

    let mut learn = LearnRecord::default();
    for lesson in 0..LESSON_COUNT {
        learn = merge_lesson(&learn, lesson, LESSON_COUNT);
    }
    store.update(ModuleId::Learn, ModuleRecord::Learn(learn));
    for module in ModuleId::SCORED {
        store.update(
            module,
            ModuleRecord::Scored(ScoredRecord {
                level: 1,
                score: 10,
                badges: BTreeSet::new(),
            }),
        );
    }

    let progress = open(&dir).progress().clone();
    assert!(badges::is_unlocked(&progress, badges::Badge::ComputerExplorer));
    assert!(badges::is_unlocked(&progress, badges::Badge::LearningChampion));
    assert_eq!(progress.learn.current_lesson, LESSON_COUNT - 1);
}
