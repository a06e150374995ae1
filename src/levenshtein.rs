//! Weighted edit distance with adjacent transpositions.
//!
//! Costs are per operation and measured as edits turning the typed string
//! into the candidate: an *insertion* adds a candidate character the typed
//! string lacks, a *deletion* drops an extra typed character. Comparison is
//! bytewise.

/// Per-operation costs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EditWeights {
    /// Swapping two adjacent characters.
    pub swap: u32,
    pub substitution: u32,
    pub insertion: u32,
    pub deletion: u32,
}

/// Weights used when ranking command names.
///
/// Transposed characters are free and a missing character is cheap, while a
/// stray typed character is the most expensive edit.
pub const COMMAND_WEIGHTS: EditWeights = EditWeights {
    swap: 0,
    substitution: 2,
    insertion: 1,
    deletion: 3,
};

/// Edit distance from `typed` to `candidate` under `weights`.
pub fn levenshtein(typed: &str, candidate: &str, weights: EditWeights) -> u32 {
    let s1 = typed.as_bytes();
    let s2 = candidate.as_bytes();
    let len2 = s2.len();

    // row0 is two rows back (for swaps), row1 the previous row, row2 current.
    let mut row0 = vec![0u32; len2 + 1];
    let mut row1: Vec<u32> = (0..=len2 as u32).map(|j| j * weights.insertion).collect();
    let mut row2 = vec![0u32; len2 + 1];

    for i in 0..s1.len() {
        row2[0] = (i as u32 + 1) * weights.deletion;
        for j in 0..len2 {
            let mut cost = row1[j] + if s1[i] != s2[j] { weights.substitution } else { 0 };
            if i > 0
                && j > 0
                && s1[i - 1] == s2[j]
                && s1[i] == s2[j - 1]
                && cost > row0[j - 1] + weights.swap
            {
                cost = row0[j - 1] + weights.swap;
            }
            cost = cost.min(row1[j + 1] + weights.deletion);
            cost = cost.min(row2[j] + weights.insertion);
            row2[j + 1] = cost;
        }

        std::mem::swap(&mut row0, &mut row1);
        std::mem::swap(&mut row1, &mut row2);
    }

    row1[len2]
}
