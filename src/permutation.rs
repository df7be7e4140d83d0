use std::ops::Index;
use itertools::Itertools;
use thiserror::Error;

/// Errors of permutation construction and application
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Permutation and container lengths do not match")]
    LengthMismatch,
    #[error("Not a permutation of 0..n")]
    InvalidSigma,
}

/// Permutation in one-line representation
///
/// `sigma[i]` is the image of `i`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct Permutation {
    pub sigma: Vec<usize>
}

impl std::fmt::Display for Permutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.sigma.iter().format(", "))
    }
}

impl Permutation {
    /// Initialize an identity permutation of specific size
    pub fn identity(n: usize) -> Permutation {
        Permutation {sigma: (0..n).collect()}
    }

    /// Reversal of `n` elements
    pub fn reversal(n: usize) -> Permutation {
        Permutation {sigma: (0..n).rev().collect()}
    }

    /// Find a permutation listing a container's indices in sorted order
    ///
    /// The sort is stable, so equal elements keep their relative order. The
    /// result is an index list: `sigma[k]` is the index of the k-th smallest
    /// element.
    ///
    /// ```
    /// # use zmatrix::permutation::Permutation;
    /// let p = Permutation::ordering_by(&[2.0, -1.0, 0.5], |a, b| a.total_cmp(b));
    /// assert_eq!(p.sigma, vec![1, 2, 0]);
    /// ```
    pub fn ordering_by<T, F>(container: &[T], mut compare: F) -> Permutation
        where F: FnMut(&T, &T) -> std::cmp::Ordering
    {
        let mut p = Permutation::identity(container.len());
        p.sigma.sort_by(|&i, &j| compare(&container[i], &container[j]));
        p
    }

    /// Number of elements permuted
    pub fn set_size(&self) -> usize {
        self.sigma.len()
    }

    pub fn is_identity(&self) -> bool {
        self.sigma.iter().enumerate().all(|(i, &s)| i == s)
    }

    /// Invert the permutation
    ///
    /// ```
    /// # use zmatrix::permutation::Permutation;
    /// let p = Permutation::ordering_by(&[3, 1, 2], |a, b| a.cmp(b));
    /// assert_eq!(p.inverse().gather(&p.sigma).unwrap(), vec![0, 1, 2]);
    /// ```
    pub fn inverse(&self) -> Permutation {
        let mut inverse = Permutation::identity(self.set_size());
        for (i, &s) in self.sigma.iter().enumerate() {
            inverse.sigma[s] = i;
        }
        inverse
    }

    /// Apply the permutation to a slice
    ///
    /// Post-condition is `result[sigma[i]] == other[i]`.
    pub fn apply<T: Clone>(&self, other: &[T]) -> Result<Vec<T>, PermutationError> {
        if other.len() != self.set_size() {
            return Err(PermutationError::LengthMismatch);
        }

        let mut permuted = other.to_vec();
        for (i, item) in other.iter().enumerate() {
            permuted[self.sigma[i]] = item.clone();
        }
        Ok(permuted)
    }

    /// Gather a slice by index: `result[k] == other[sigma[k]]`
    pub fn gather<T: Clone>(&self, other: &[T]) -> Result<Vec<T>, PermutationError> {
        if other.len() != self.set_size() {
            return Err(PermutationError::LengthMismatch);
        }

        Ok(self.sigma.iter().map(|&s| other[s].clone()).collect())
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = PermutationError;

    fn try_from(sigma: Vec<usize>) -> Result<Permutation, PermutationError> {
        let n = sigma.len();
        if sigma.iter().any(|&s| s >= n) || sigma.iter().unique().count() != n {
            return Err(PermutationError::InvalidSigma);
        }

        Ok(Permutation {sigma})
    }
}

/// Implements indexing, letting Permutation behave as a container directly
impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, i: usize) -> &Self::Output {
        &self.sigma[i]
    }
}
