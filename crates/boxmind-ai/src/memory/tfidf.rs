//! Sparse TF and TF-IDF vectors with cosine similarity.

use std::collections::{HashMap, HashSet};

/// Term -> weight.
pub type SparseVector = HashMap<String, f64>;

/// Raw term counts divided by the largest count.
pub fn term_frequency(tokens: &[String]) -> SparseVector {
    let mut tf = SparseVector::new();
    for token in tokens {
        *tf.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    let max = tf.values().copied().fold(1.0_f64, f64::max);
    for value in tf.values_mut() {
        *value /= max;
    }
    tf
}

/// Cosine of the angle between two sparse vectors; 0 when either is empty.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, v)| large.get(term).map(|w| v * w))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    let denom = norm_a * norm_b;
    if denom == 0.0 { 0.0 } else { dot / denom }
}

/// Inverse document frequency over a set of token lists.
#[derive(Debug, Clone, Default)]
pub struct IdfTable {
    weights: HashMap<String, f64>,
}

impl IdfTable {
    /// `ln(N / df)` for every term; a term present in every document weighs 0.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a [String]>) -> Self {
        let mut doc_count = 0usize;
        let mut df: HashMap<&str, usize> = HashMap::new();
        for tokens in documents {
            doc_count += 1;
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let weights = df
            .into_iter()
            .map(|(term, freq)| (term.to_string(), (doc_count as f64 / freq as f64).ln()))
            .collect();
        Self { weights }
    }

    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// TF x IDF; terms with zero weight are left out.
    pub fn vector(&self, tokens: &[String]) -> SparseVector {
        term_frequency(tokens)
            .into_iter()
            .filter_map(|(term, tf)| {
                let idf = self.weight(&term);
                (idf > 0.0).then(|| (term, tf * idf))
            })
            .collect()
    }
}
