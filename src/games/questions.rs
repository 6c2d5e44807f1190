use crate::progress::ModuleId;

/// A short story shown above a reading question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passage
{
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question
{
    pub passage: Option<Passage>,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub correct: usize,
    pub explanation: &'static str,
}

pub const QUIZ: &[Question] = &[
    Question {
        passage: None,
        prompt: "What do you use to type on a computer?",
        options: &["Mouse", "Keyboard", "Monitor", "Speaker"],
        correct: 1,
        explanation: "The keyboard has letters and numbers for typing!",
    },
    Question {
        passage: None,
        prompt: "What part of the computer shows you pictures and text?",
        options: &["CPU", "Keyboard", "Monitor", "Mouse"],
        correct: 2,
        explanation: "The monitor is like a TV screen for your computer!",
    },
    Question {
        passage: None,
        prompt: "What color do you get when you mix red and yellow?",
        options: &["Purple", "Green", "Orange", "Blue"],
        correct: 2,
        explanation: "Red + Yellow = Orange, like a beautiful sunset!",
    },
    Question {
        passage: None,
        prompt: "How many legs does a cat have?",
        options: &["2", "3", "4", "6"],
        correct: 2,
        explanation: "Cats have 4 legs, just like dogs and many other animals!",
    },
    Question {
        passage: None,
        prompt: "What do you click to select things on the computer?",
        options: &["Keyboard", "Monitor", "Mouse", "Speaker"],
        correct: 2,
        explanation: "The mouse helps you point and click on things!",
    },
    Question {
        passage: None,
        prompt: "What shape has 3 sides?",
        options: &["Circle", "Square", "Triangle", "Rectangle"],
        correct: 2,
        explanation: "A triangle has exactly 3 sides and 3 corners!",
    },
    Question {
        passage: None,
        prompt: "Where do deleted files go on a computer?",
        options: &["Desktop", "Recycle Bin", "Keyboard", "Mouse"],
        correct: 1,
        explanation: "The Recycle Bin keeps deleted files safe until you empty it!",
    },
    Question {
        passage: None,
        prompt: "What should you do before downloading something online?",
        options: &[
            "Download immediately",
            "Ask a grown-up",
            "Close the computer",
            "Delete everything",
        ],
        correct: 1,
        explanation: "Always ask a trusted adult before downloading anything!",
    },
];

pub const SCIENCE: &[Question] = &[
    Question {
        passage: None,
        prompt: "What do plants need to grow?",
        options: &["Sunlight", "Chocolate", "Plastic", "Sand"],
        correct: 0,
        explanation: "Plants need sunlight, water, and soil to grow!",
    },
    Question {
        passage: None,
        prompt: "Which animal can fly?",
        options: &["Dog", "Cat", "Bird", "Fish"],
        correct: 2,
        explanation: "Birds have wings and can fly!",
    },
    Question {
        passage: None,
        prompt: "What do we breathe in to live?",
        options: &["Water", "Oxygen", "Juice", "Milk"],
        correct: 1,
        explanation: "We breathe in oxygen from the air!",
    },
    Question {
        passage: None,
        prompt: "Which is a source of water?",
        options: &["River", "Book", "Shoe", "Pencil"],
        correct: 0,
        explanation: "Rivers, lakes, and rain are sources of water!",
    },
];

pub const STORIES: &[Question] = &[
    Question {
        passage: Some(Passage {
            title: "The Lost Kitten",
            text: "Once upon a time, a little kitten got lost in the garden. She looked for her \
                   mother and meowed loudly. Soon, her mother heard her and came running. The \
                   kitten was happy again!",
        }),
        prompt: "Who got lost in the garden?",
        options: &["A puppy", "A kitten", "A bird", "A rabbit"],
        correct: 1,
        explanation: "The story is about a kitten who got lost!",
    },
    Question {
        passage: Some(Passage {
            title: "The Big Red Ball",
            text: "Tom had a big red ball. He loved to play with it every day. One day, the ball \
                   rolled under the bed. Tom found it and was happy!",
        }),
        prompt: "What color was Tom's ball?",
        options: &["Blue", "Green", "Red", "Yellow"],
        correct: 2,
        explanation: "Tom's ball was red!",
    },
];

/// Question bank for a multiple-choice module, empty for anything else.
pub fn bank(module: ModuleId) -> &'static [Question]
{
    match module {
        ModuleId::Quiz => QUIZ,
        ModuleId::Science => SCIENCE,
        ModuleId::Reading => STORIES,
        _ => &[],
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn every_correct_index_points_at_an_option()
    {
        for question in QUIZ.iter().chain(SCIENCE).chain(STORIES) {
            assert!(question.correct < question.options.len(), "{}", question.prompt);
            assert!(question.options.len() <= 9);
        }
    }

    #[test]
    fn bank_sizes()
    {
        assert_eq!(bank(ModuleId::Quiz).len(), 8);
        assert_eq!(bank(ModuleId::Science).len(), 4);
        assert_eq!(bank(ModuleId::Reading).len(), 2);
        assert!(bank(ModuleId::Typing).is_empty());
        assert!(STORIES.iter().all(|story| story.passage.is_some()));
    }
}
