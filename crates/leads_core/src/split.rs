use std::ops::Range;

/// Number of leads (from the front of the shuffled list) that go to team A.
///
/// Ceiling rounding means team A never gets less than its proportional
/// share when the count does not divide evenly.
pub fn split_index(total: usize, ratio: f64) -> usize {
    if total == 0 || ratio <= 0.0 {
        return 0;
    }
    let raw = (total as f64 * ratio).ceil();
    if raw >= total as f64 {
        total
    } else {
        raw as usize
    }
}

/// Contiguous index ranges for each team over a shuffled candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub team_a: Range<usize>,
    pub team_b: Range<usize>,
}

impl SplitPlan {
    pub fn compute(total: usize, ratio: f64) -> Self {
        let index = split_index(total, ratio);
        Self {
            team_a: 0..index,
            team_b: index..total,
        }
    }

    pub fn total(&self) -> usize {
        self.team_a.len() + self.team_b.len()
    }
}
