pub const WORDS: &[&str] = &[
    "cat", "dog", "sun", "moon", "tree", "book", "car", "fish", "bird", "star", "house", "apple",
    "water", "happy", "smile", "jump", "play", "learn", "fun", "game",
];
