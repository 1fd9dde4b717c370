use crate::vectorizer::TermVector;

/// Cosine similarity of two term vectors. Returns exactly 0.0 when they share no token.
pub fn cosine_similarity(left: &TermVector, right: &TermVector) -> f64 {
    let (smaller, larger) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };

    let mut has_common = false;
    let mut dot = 0.0;
    for (token, count) in smaller {
        if let Some(other) = larger.get(token) {
            has_common = true;
            dot += (*count as f64) * (*other as f64);
        }
    }

    if !has_common {
        return 0.0;
    }

    let norm = magnitude(left) * magnitude(right);
    if norm == 0.0 {
        0.0
    } else {
        dot / norm
    }
}

fn magnitude(vector: &TermVector) -> f64 {
    vector
        .values()
        .map(|count| (*count as f64) * (*count as f64))
        .sum::<f64>()
        .sqrt()
}
