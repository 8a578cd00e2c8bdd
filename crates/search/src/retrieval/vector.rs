//! Sparse term-weight vectors
//!
//! Document vectors over a 10k-term vocabulary are almost entirely zero, so
//! only the non-zero weights are stored, sorted by term index.

use paperlens_common::errors::{AppError, Result};

/// Fixed-dimension vector holding only its non-zero entries
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    /// (term index, weight), strictly increasing by index
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Build from unordered (index, weight) pairs.
    ///
    /// Zero weights are dropped and repeated indices are summed.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f32)>) -> Result<Self> {
        if let Some(&(index, _)) = entries.iter().find(|(index, _)| *index >= dim) {
            return Err(AppError::DimensionMismatch {
                expected: dim,
                actual: index + 1,
            });
        }

        entries.sort_by_key(|(index, _)| *index);

        let mut merged: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
        for (index, weight) in entries {
            match merged.last_mut() {
                Some((last, total)) if *last == index => *total += weight,
                _ => merged.push((index, weight)),
            }
        }
        merged.retain(|(_, weight)| *weight != 0.0);

        Ok(Self {
            dim,
            entries: merged,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f32 {
        self.entries
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f32>()
            .sqrt()
    }

    /// Scale to unit length. The zero vector stays zero.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> Result<f32> {
        if self.dim != other.dim {
            return Err(AppError::DimensionMismatch {
                expected: self.dim,
                actual: other.dim,
            });
        }

        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        Ok(sum)
    }

    /// Cosine similarity. Zero when either vector is zero.
    pub fn cosine(&self, other: &SparseVector) -> Result<f32> {
        let dot = self.dot(other)?;
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return Ok(0.0);
        }
        Ok(dot / denom)
    }
}

#[cfg(test)]
impl SparseVector {
    fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    fn get(&self, index: usize) -> f32 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}
