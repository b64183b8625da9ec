//! Undirected graph linking words whose vectors are similar enough.

use crate::engine::embedding::{Embedder, cosine_similarity, normalize_word};
use std::collections::{BTreeSet, HashMap, VecDeque};

pub const DEFAULT_THRESHOLD: f32 = 0.49;

pub struct SemanticGraph {
    embedder: Box<dyn Embedder>,
    threshold: f32,
    embeddings: HashMap<String, Vec<f32>>,
    // BTreeSet keeps neighbor order, and therefore BFS results, deterministic.
    edges: HashMap<String, BTreeSet<String>>,
}

impl SemanticGraph {
    pub fn new(embedder: Box<dyn Embedder>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
            embeddings: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Adds one word. Returns `false` when the embedder does not know it.
    pub fn add_word(&mut self, word: &str) -> bool {
        self.add_words([word]) == 1 || self.word_exists(word)
    }

    /// Adds a batch and links each new word against every known word.
    /// Returns how many words were newly inserted.
    pub fn add_words<'a, I>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = Vec::new();
        for word in words {
            let word = normalize_word(word);
            if word.is_empty() || self.embeddings.contains_key(&word) {
                continue;
            }
            match self.embedder.embed(&word) {
                Some(vector) => {
                    self.embeddings.insert(word.clone(), vector);
                    self.edges.entry(word.clone()).or_default();
                    added.push(word);
                }
                None => log::debug!("ENGINE: No embedding for {:?}, skipped", word),
            }
        }

        for word in &added {
            let vector = &self.embeddings[word];
            let linked: Vec<String> = self
                .embeddings
                .iter()
                .filter(|(other, other_vec)| {
                    *other != word && cosine_similarity(vector, other_vec) >= self.threshold
                })
                .map(|(other, _)| other.clone())
                .collect();

            for other in linked {
                self.edges.entry(word.clone()).or_default().insert(other.clone());
                self.edges.entry(other).or_default().insert(word.clone());
            }
        }

        added.len()
    }

    pub fn word_exists(&self, word: &str) -> bool {
        self.embeddings.contains_key(&normalize_word(word))
    }

    /// Every word in the graph, sorted.
    pub fn words(&self) -> Vec<String> {
        let mut words: Vec<String> = self.embeddings.keys().cloned().collect();
        words.sort();
        words
    }

    /// Similarity of two words; words outside the graph are embedded on the fly.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        let va = self.vector(a)?;
        let vb = self.vector(b)?;
        Some(cosine_similarity(&va, &vb))
    }

    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        if normalize_word(a) == normalize_word(b) {
            return false;
        }
        self.similarity(a, b)
            .is_some_and(|s| s >= self.threshold)
    }

    pub fn neighbors(&self, word: &str) -> BTreeSet<String> {
        self.edges
            .get(&normalize_word(word))
            .cloned()
            .unwrap_or_default()
    }

    /// Breadth-first shortest path with at most `max_steps` edges.
    ///
    /// The returned path includes both endpoints; `[start]` when they match.
    pub fn shortest_path(&self, start: &str, target: &str, max_steps: usize) -> Option<Vec<String>> {
        let start = normalize_word(start);
        let target = normalize_word(target);
        if !self.embeddings.contains_key(&start) || !self.embeddings.contains_key(&target) {
            return None;
        }
        if start == target {
            return Some(vec![start]);
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        parents.insert(start.as_str(), start.as_str());
        queue.push_back((start.as_str(), 0));

        while let Some((word, depth)) = queue.pop_front() {
            if depth == max_steps {
                continue;
            }
            let Some(next) = self.edges.get(word) else {
                continue;
            };
            for neighbor in next {
                if parents.contains_key(neighbor.as_str()) {
                    continue;
                }
                parents.insert(neighbor.as_str(), word);
                if *neighbor == target {
                    return Some(Self::rebuild(&parents, &start, &target));
                }
                queue.push_back((neighbor.as_str(), depth + 1));
            }
        }

        None
    }

    fn rebuild(parents: &HashMap<&str, &str>, start: &str, target: &str) -> Vec<String> {
        let mut path = vec![target.to_string()];
        let mut current = target;
        while current != start {
            current = parents[current];
            path.push(current.to_string());
        }
        path.reverse();
        path
    }

    fn vector(&self, word: &str) -> Option<Vec<f32>> {
        let word = normalize_word(word);
        match self.embeddings.get(&word) {
            Some(v) => Some(v.clone()),
            None => self.embedder.embed(&word),
        }
    }
}
