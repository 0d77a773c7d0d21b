//! Small helpers shared by several modules
pub mod errors;

/// Merges overlapping or book-ended intervals
///
/// The intervals must be sorted by their start position and use
/// 1-based, inclusive coordinates.
///
/// ```text
/// Input     ----XXXXXX----XXXX------------
///           -------XXXXX--------XXXX------
/// Merged    ----OOOOOOOO--OOOO--OOOO------
/// ```
///
/// # Examples
///
/// ```rust
/// use genechunk::utils::merge;
///
/// let merged = merge(&[(1, 10), (5, 12), (13, 15), (20, 25)]);
/// assert_eq!(merged, vec![(1, 15), (20, 25)]);
/// ```
pub fn merge(intervals: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if *start <= last.1 + 1 => {
                if *end > last.1 {
                    last.1 = *end
                }
            }
            _ => merged.push((*start, *end)),
        }
    }
    merged
}

/// Returns the number of positions shared by two 1-based, inclusive intervals
pub fn overlap_len(a: (u32, u32), b: (u32, u32)) -> u32 {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    if start > end {
        0
    } else {
        end - start + 1
    }
}

/// Jaccard index of two interval sets
///
/// Both sets are merged first, so they do not need to be sorted or disjoint.
/// Returns `0.0` when both sets are empty.
pub fn jaccard(a: &[(u32, u32)], b: &[(u32, u32)]) -> f64 {
    let a = sorted_merge(a);
    let b = sorted_merge(b);

    let mut intersection: u64 = 0;
    for x in &a {
        for y in &b {
            intersection += overlap_len(*x, *y) as u64;
        }
    }
    let total: u64 = a
        .iter()
        .chain(b.iter())
        .map(|iv| (iv.1 - iv.0 + 1) as u64)
        .sum();
    let union = total - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

fn sorted_merge(intervals: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();
    merge(&sorted)
}
