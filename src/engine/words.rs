//! Playable vocabulary.

use crate::engine::EngineError;
use crate::engine::embedding::normalize_word;
use rand::Rng;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const BUILTIN_WORDS: &[&str] = &[
    "animal", "apple", "army", "art", "baby", "bag", "ball", "band", "bank", "bath", "beach",
    "bear", "bed", "bee", "bell", "bird", "boat", "body", "bone", "book", "bottle", "box", "boy",
    "bread", "brick", "bridge", "brother", "bus", "butter", "cake", "camera", "candle", "car",
    "card", "cat", "chair", "cheese", "chicken", "child", "church", "city", "clock", "cloud",
    "coat", "coffee", "coin", "cold", "computer", "cow", "crown", "cup", "dance", "desert", "desk",
    "doctor", "dog", "door", "dream", "dress", "drum", "duck", "eagle", "earth", "egg", "engine",
    "eye", "face", "farm", "father", "feather", "field", "fire", "fish", "flag", "flower",
    "forest", "fork", "friend", "frog", "fruit", "game", "garden", "ghost", "gift", "girl",
    "glass", "gold", "grass", "guitar", "hair", "hammer", "hand", "hat", "heart", "hill", "horse",
    "hospital", "hotel", "house", "ice", "island", "jacket", "jungle", "key", "king", "kitchen",
    "kitten", "knife", "lake", "lamp", "leaf", "letter", "light", "lion", "lock", "machine",
    "map", "market", "milk", "money", "monkey", "moon", "mother", "mountain", "mouse", "music",
    "nail", "needle", "nest", "night", "nurse", "ocean", "office", "oil", "orange", "paint",
    "paper", "park", "party", "pen", "pencil", "pet", "piano", "picture", "pig", "pillow",
    "pilot", "plane", "plant", "plate", "pocket", "police", "pond", "puppy", "queen", "rabbit",
    "rain", "ring", "river", "road", "robot", "rock", "roof", "room", "rope", "rose", "salt",
    "school", "sea", "seed", "sheep", "ship", "shirt", "shoe", "shop", "silver", "singer", "sister",
    "sky", "snake", "snow", "soap", "soldier", "song", "soup", "space", "spoon", "star", "stone",
    "storm", "street", "sugar", "summer", "sun", "table", "tea", "teacher", "tiger", "tooth",
    "town", "toy", "train", "tree", "truck", "umbrella", "vehicle", "village", "violin", "wall",
    "war", "watch", "water", "wave", "whale", "wheel", "wind", "window", "wine", "winter", "wolf",
    "wood", "world", "writer", "yard",
];

#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
    index: HashSet<String>,
}

impl WordList {
    /// Builds a list from arbitrary words; normalised and de-duplicated,
    /// first occurrence order kept.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            words: Vec::new(),
            index: HashSet::new(),
        };
        for word in words {
            let word = normalize_word(word.as_ref());
            if !word.is_empty() && list.index.insert(word.clone()) {
                list.words.push(word);
            }
        }
        list
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_WORDS)
    }

    /// One word per line; blank lines and `#` comments are ignored.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&content);
        log::info!("ENGINE: Loaded {} words from {:?}", list.len(), path);
        Ok(list)
    }

    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(&normalize_word(word))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Two distinct words, or `None` with fewer than two words.
    pub fn random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(String, String)> {
        let n = self.words.len();
        if n < 2 {
            return None;
        }
        let first = rng.random_range(0..n);
        // Draw from the remaining n - 1 slots so the second index never equals the first.
        let mut second = rng.random_range(0..n - 1);
        if second >= first {
            second += 1;
        }
        Some((self.words[first].clone(), self.words[second].clone()))
    }
}
