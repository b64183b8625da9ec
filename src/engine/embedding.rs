//! Word vectors used to decide which words are semantically linked.

use crate::engine::EngineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Source of unit-length word vectors.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;

    /// Short label for the vector source, reported by the stats route.
    fn model(&self) -> &str;

    /// Vector for a word, `None` when the word is unknown to this source.
    fn embed(&self, word: &str) -> Option<Vec<f32>>;
}

/// Lower-cases and trims a word the way every lookup expects it.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Scales a vector to unit length. Zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity in [-1, 1]; 0 when either side is a zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na * nb)).clamp(-1.0, 1.0)
}

/// Precomputed vectors, typically loaded from a GloVe-style text file.
#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    dim: usize,
    model: String,
    vectors: HashMap<String, Vec<f32>>,
}

impl VectorTable {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            model: "vectors".to_string(),
            vectors: HashMap::new(),
        }
    }

    /// Adds or replaces a word. The vector is normalised on insert.
    pub fn insert(&mut self, word: &str, mut vector: Vec<f32>) -> Result<(), EngineError> {
        if vector.len() != self.dim {
            return Err(EngineError::Dimension {
                word: word.to_string(),
                expected: self.dim,
                found: vector.len(),
            });
        }
        normalize(&mut vector);
        self.vectors.insert(normalize_word(word), vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let file = File::open(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut table = Self::from_reader(BufReader::new(file))?;
        if let Some(stem) = path.file_stem() {
            table.model = stem.to_string_lossy().into_owned();
        }
        log::info!(
            "ENGINE: Loaded {} vectors ({} dims) from {:?}",
            table.len(),
            table.dim,
            path
        );
        Ok(table)
    }

    /// Parses `word f1 f2 ... fn` lines. The first row fixes the dimension.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, EngineError> {
        let mut table: Option<VectorTable> = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| EngineError::Parse {
                line: index + 1,
                reason: e.to_string(),
            })?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };

            let vector = parts
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| EngineError::Parse {
                    line: index + 1,
                    reason: e.to_string(),
                })?;

            table
                .get_or_insert_with(|| VectorTable::new(vector.len()))
                .insert(word, vector)?;
        }

        Ok(table.unwrap_or_default())
    }
}

impl Embedder for VectorTable {
    fn dim(&self) -> usize {
        self.dim
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn embed(&self, word: &str) -> Option<Vec<f32>> {
        self.vectors.get(&normalize_word(word)).cloned()
    }
}

/// Deterministic pseudo-random vectors keyed by the word's MD5 digest.
///
/// Every word is embeddable; similarity carries no meaning beyond being
/// stable across runs.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn model(&self) -> &str {
        "md5-hash"
    }

    fn embed(&self, word: &str) -> Option<Vec<f32>> {
        let word = normalize_word(word);
        if word.is_empty() {
            return None;
        }
        let digest = md5::compute(word.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest.0[..8]);

        let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed));
        let mut vector: Vec<f32> = (0..self.dim).map(|_| rng.random_range(-1.0..1.0)).collect();
        normalize(&mut vector);
        Some(vector)
    }
}
