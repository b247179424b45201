//! Allen relations between closed, 1-based integer intervals.
//!
//! Every relation is named from the point of view of interval A relative to
//! interval B. Two intervals that share no base either "precede" each other
//! (at least one base between them) or "meet" (A ends on the base right before
//! B starts). The remaining nine relations all share at least one base.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllenRelation {
    /// A ends at least one base before B starts.
    Precedes,
    /// A ends on the base immediately before B starts.
    Meets,
    /// A starts first and ends inside B.
    Overlaps,
    /// Same start, A ends first.
    Starts,
    /// A strictly surrounds B on both sides.
    Contains,
    Equals,
    /// Same end, A starts first.
    IsFinishedBy,
    /// Same start, A ends last.
    IsStartedBy,
    /// Same end, A starts last.
    Finishes,
    IsContainedBy,
    IsOverlappedBy,
    IsMetBy,
    IsPrecededBy,
}

impl AllenRelation {
    ///
    /// Classify the relation of interval A (`a_start..=a_end`) to interval B
    /// (`b_start..=b_end`).
    ///
    /// Both intervals are expected to satisfy `start <= end`; callers that accept
    /// external coordinates validate that first.
    ///
    pub fn classify(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> Self {
        if a_end < b_start {
            return if a_end + 1 == b_start {
                AllenRelation::Meets
            } else {
                AllenRelation::Precedes
            };
        }
        if b_end < a_start {
            return if b_end + 1 == a_start {
                AllenRelation::IsMetBy
            } else {
                AllenRelation::IsPrecededBy
            };
        }

        match (a_start.cmp(&b_start), a_end.cmp(&b_end)) {
            (Ordering::Equal, Ordering::Equal) => AllenRelation::Equals,
            (Ordering::Equal, Ordering::Less) => AllenRelation::Starts,
            (Ordering::Equal, Ordering::Greater) => AllenRelation::IsStartedBy,
            (Ordering::Greater, Ordering::Equal) => AllenRelation::Finishes,
            (Ordering::Less, Ordering::Equal) => AllenRelation::IsFinishedBy,
            (Ordering::Less, Ordering::Greater) => AllenRelation::Contains,
            (Ordering::Greater, Ordering::Less) => AllenRelation::IsContainedBy,
            (Ordering::Less, Ordering::Less) => AllenRelation::Overlaps,
            (Ordering::Greater, Ordering::Greater) => AllenRelation::IsOverlappedBy,
        }
    }

    /// True when A and B share no base.
    pub fn is_disjoint(self) -> bool {
        matches!(
            self,
            AllenRelation::Precedes
                | AllenRelation::Meets
                | AllenRelation::IsMetBy
                | AllenRelation::IsPrecededBy
        )
    }

    /// True for the relations that can only arise when A starts after B.
    pub fn is_out_of_order(self) -> bool {
        matches!(
            self,
            AllenRelation::Finishes
                | AllenRelation::IsContainedBy
                | AllenRelation::IsOverlappedBy
                | AllenRelation::IsMetBy
                | AllenRelation::IsPrecededBy
        )
    }

    /// The relation of B to A.
    pub fn inverse(self) -> Self {
        match self {
            AllenRelation::Precedes => AllenRelation::IsPrecededBy,
            AllenRelation::Meets => AllenRelation::IsMetBy,
            AllenRelation::Overlaps => AllenRelation::IsOverlappedBy,
            AllenRelation::Starts => AllenRelation::IsStartedBy,
            AllenRelation::Contains => AllenRelation::IsContainedBy,
            AllenRelation::Equals => AllenRelation::Equals,
            AllenRelation::IsFinishedBy => AllenRelation::Finishes,
            AllenRelation::IsStartedBy => AllenRelation::Starts,
            AllenRelation::Finishes => AllenRelation::IsFinishedBy,
            AllenRelation::IsContainedBy => AllenRelation::Contains,
            AllenRelation::IsOverlappedBy => AllenRelation::Overlaps,
            AllenRelation::IsMetBy => AllenRelation::Meets,
            AllenRelation::IsPrecededBy => AllenRelation::Precedes,
        }
    }
}

/// Anything with closed, 1-based start and end coordinates.
pub trait GenomicInterval {
    fn start(&self) -> u64;
    fn end(&self) -> u64;

    fn relation_to<T: GenomicInterval + ?Sized>(&self, other: &T) -> AllenRelation {
        AllenRelation::classify(self.start(), self.end(), other.start(), other.end())
    }

    fn is_valid_interval(&self) -> bool {
        self.start() <= self.end()
    }
}

impl GenomicInterval for (u64, u64) {
    fn start(&self) -> u64 {
        self.0
    }

    fn end(&self) -> u64 {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case((1, 5), (10, 20), AllenRelation::Precedes)]
    #[case((1, 9), (10, 20), AllenRelation::Meets)]
    #[case((1, 10), (5, 20), AllenRelation::Overlaps)]
    #[case((1, 10), (10, 20), AllenRelation::Overlaps)]
    #[case((5, 10), (5, 20), AllenRelation::Starts)]
    #[case((1, 30), (5, 20), AllenRelation::Contains)]
    #[case((5, 20), (5, 20), AllenRelation::Equals)]
    #[case((1, 20), (5, 20), AllenRelation::IsFinishedBy)]
    #[case((5, 30), (5, 20), AllenRelation::IsStartedBy)]
    #[case((10, 20), (5, 20), AllenRelation::Finishes)]
    #[case((6, 10), (5, 20), AllenRelation::IsContainedBy)]
    #[case((10, 30), (5, 20), AllenRelation::IsOverlappedBy)]
    #[case((21, 30), (5, 20), AllenRelation::IsMetBy)]
    #[case((25, 30), (5, 20), AllenRelation::IsPrecededBy)]
    fn test_classify(
        #[case] a: (u64, u64),
        #[case] b: (u64, u64),
        #[case] expected: AllenRelation,
    ) {
        assert_eq!(a.relation_to(&b), expected);
        assert_eq!(b.relation_to(&a), expected.inverse());
    }

    #[rstest]
    #[case((1, 1), (1, 1), AllenRelation::Equals)]
    #[case((1, 1), (2, 2), AllenRelation::Meets)]
    #[case((1, 1), (3, 3), AllenRelation::Precedes)]
    #[case((1, 3), (2, 2), AllenRelation::Contains)]
    fn test_classify_single_base(
        #[case] a: (u64, u64),
        #[case] b: (u64, u64),
        #[case] expected: AllenRelation,
    ) {
        assert_eq!(a.relation_to(&b), expected);
    }

    #[rstest]
    fn test_out_of_order_relations_need_later_start() {
        // every relation reachable with a.start <= b.start is in order
        for a_start in 1..6u64 {
            for a_end in a_start..8 {
                for b_start in a_start..8 {
                    for b_end in b_start..8 {
                        let rel = AllenRelation::classify(a_start, a_end, b_start, b_end);
                        assert!(!rel.is_out_of_order(), "{:?}", rel);
                    }
                }
            }
        }
    }

    #[rstest]
    fn test_disjoint() {
        assert!(AllenRelation::Meets.is_disjoint());
        assert!(AllenRelation::IsPrecededBy.is_disjoint());
        assert!(!AllenRelation::Overlaps.is_disjoint());
    }

    #[rstest]
    fn test_validity() {
        assert!((3u64, 3u64).is_valid_interval());
        assert!(!(4u64, 3u64).is_valid_interval());
    }
}
