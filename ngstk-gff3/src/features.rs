use std::collections::{BTreeMap, VecDeque};

use log::{debug, info};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use ngstk_core::{Selector, SelectorError, SelectorOperation};

use crate::allen::{AllenRelation, GenomicInterval};
use crate::consts::SEQID_KEY;
use crate::errors::FeatureError;
use crate::feature::{Feature, prudent_merge};

///
/// An ordered collection of [`Feature`]s tagged with the criterion that groups
/// them (`key`/`value`, for example `seqid`/`chr1`).
///
/// The collection remembers whether it is sorted. Anything that can disturb
/// the order clears that flag, and the operations that need sorted input
/// refuse to run without it.
///
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Features {
    pub key: String,
    pub value: String,
    features: Vec<Feature>,
    sorted: bool,
}

impl Features {
    pub fn new(key: &str, value: &str) -> Self {
        Features {
            key: key.to_string(),
            value: value.to_string(),
            features: Vec::new(),
            sorted: false,
        }
    }

    pub fn from_features(key: &str, value: &str, features: Vec<Feature>) -> Self {
        Features {
            key: key.to_string(),
            value: value.to_string(),
            features,
            sorted: false,
        }
    }

    /// `key:value`
    pub fn id(&self) -> String {
        format!("{}:{}", self.key, self.value)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn as_slice(&self) -> &[Feature] {
        &self.features
    }

    pub fn into_inner(self) -> Vec<Feature> {
        self.features
    }

    pub fn feature(&self, idx: usize) -> Option<&Feature> {
        self.features.get(idx)
    }

    /// Mutable access to one feature. Clears the sorted flag.
    pub fn feature_mut(&mut self, idx: usize) -> Option<&mut Feature> {
        self.sorted = false;
        self.features.get_mut(idx)
    }

    pub fn add_features<I: IntoIterator<Item = Feature>>(&mut self, features: I) {
        self.features.extend(features);
        self.sorted = false;
    }

    ///
    /// Append and re-sort. Sorting is the expensive part, so gather features
    /// and add them in one call rather than one at a time.
    ///
    pub fn add_features_with_sort<I: IntoIterator<Item = Feature>>(&mut self, features: I) {
        self.add_features(features);
        self.sort();
    }

    ///
    /// Recompute the sorted flag from the data: sequence ids must appear in
    /// lexicographic order and starts must not decrease within a sequence.
    ///
    pub fn check_sorted(&mut self) -> bool {
        self.sorted = self.features.windows(2).all(|w| {
            let (a, b) = (&w[0], &w[1]);
            a.seq_id < b.seq_id || (a.seq_id == b.seq_id && a.start <= b.start)
        });
        self.sorted
    }

    ///
    /// Sort by start (then end) within each sequence id and order the
    /// sequences lexicographically. Features from different sequences are
    /// never interleaved. Does nothing if the collection is already sorted.
    ///
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }

        let mut partitions: Vec<Vec<Feature>> = partition_by_seq_id(std::mem::take(&mut self.features))
            .into_values()
            .collect();
        partitions
            .par_iter_mut()
            .for_each(|p| p.sort_by_key(|f| (f.start, f.end)));

        self.features = partitions.into_iter().flatten().collect();
        self.sorted = true;
    }

    ///
    /// Collapse overlapping and adjacent features into the minimal covering
    /// set, destructively. Merged features follow [`Feature::merge_in_place`],
    /// so per-feature identity is lost: use this for masks and coverage, not
    /// for transcript models.
    ///
    /// The collection must be sorted and hold a single sequence id. It is left
    /// unchanged when an error is returned.
    ///
    pub fn consolidate_in_place(&mut self) -> Result<(), FeatureError> {
        self.check_mergeable()?;

        let mut keepers: Vec<Feature> = Vec::new();
        for candidate in &self.features {
            let Some(keeper) = keepers.last_mut() else {
                keepers.push(candidate.clone());
                continue;
            };

            let relation = keeper.relation_to(candidate);
            if relation.is_out_of_order() {
                return Err(FeatureError::UnexpectedRelation {
                    relation,
                    a: keeper.to_string(),
                    b: candidate.to_string(),
                });
            }
            if relation == AllenRelation::Precedes {
                keepers.push(candidate.clone());
            } else {
                keeper.merge_in_place(candidate)?;
            }
        }

        self.features = keepers;
        Ok(())
    }

    /// Non-destructive [`Features::consolidate_in_place`].
    pub fn consolidated(&self) -> Result<Features, FeatureError> {
        let mut copy = self.clone();
        copy.consolidate_in_place()?;
        Ok(copy)
    }

    ///
    /// Split every overlap into its own feature so the result is
    /// non-overlapping, covers exactly the same bases, and tags each overlap
    /// with all of its contributors (see [`prudent_merge`]).
    ///
    /// The collection must be sorted and hold a single sequence id. It is left
    /// unchanged when an error is returned.
    ///
    pub fn prudent_merge_by_type_in_place(&mut self) -> Result<(), FeatureError> {
        self.check_mergeable()?;
        if let Some(w) = self.features.windows(2).find(|w| w[0].start > w[1].start) {
            return Err(FeatureError::OutOfOrder {
                a_start: w[0].start,
                b_start: w[1].start,
            });
        }

        // ties on start may still be unordered by end
        let mut initial = self.features.clone();
        initial.sort_by_key(|f| (f.start, f.end));
        let mut candidates: VecDeque<Feature> = initial.into();
        let mut keepers: Vec<Feature> = Vec::with_capacity(candidates.len());

        while candidates.len() > 1 {
            let (Some(a), Some(b)) = (candidates.pop_front(), candidates.pop_front()) else {
                break;
            };
            debug!(
                "prudent merge {}:{}-{} with {}-{} ({} candidates left)",
                a.seq_id,
                a.start,
                a.end,
                b.start,
                b.end,
                candidates.len()
            );

            let mut pieces = prudent_merge(&a, &b)?.into_iter();
            let Some(first) = pieces.next() else {
                continue;
            };
            if pieces.len() == 0 {
                insert_sorted(&mut candidates, first);
                continue;
            }
            for piece in pieces {
                insert_sorted(&mut candidates, piece);
            }

            // a third feature may start inside the leftmost piece
            match candidates.front() {
                Some(next) if next.start <= first.end => insert_sorted(&mut candidates, first),
                _ => keepers.push(first),
            }
        }
        keepers.extend(candidates);

        self.features = keepers;
        self.sorted = true;
        Ok(())
    }

    /// Non-destructive [`Features::prudent_merge_by_type_in_place`].
    pub fn prudent_merged_by_type(&self) -> Result<Features, FeatureError> {
        let mut copy = self.clone();
        copy.prudent_merge_by_type_in_place()?;
        Ok(copy)
    }

    fn check_mergeable(&self) -> Result<(), FeatureError> {
        if !self.sorted {
            return Err(FeatureError::Unsorted(self.id()));
        }
        if let Some(first) = self.features.first() {
            if let Some(other) = self.features.iter().find(|f| f.seq_id != first.seq_id) {
                return Err(FeatureError::SeqIdMismatch {
                    a: first.seq_id.clone(),
                    b: other.seq_id.clone(),
                });
            }
        }
        self.features.iter().try_for_each(Feature::check_interval)
    }

    ///
    /// Keep only features whose type exactly matches one of `types`.
    ///
    /// # Returns
    /// - the number of features removed
    pub fn keep_by_type<S: AsRef<str>>(&mut self, types: &[S]) -> usize {
        let before = self.features.len();
        self.features
            .retain(|f| types.iter().any(|t| t.as_ref() == f.feature_type));
        before - self.features.len()
    }

    ///
    /// Keep the features whose sequence id matches `pattern`.
    ///
    /// # Returns
    /// - the sorted, distinct sequence ids that were kept
    pub fn keep_by_seq_id(&mut self, pattern: &str) -> Result<Vec<String>, FeatureError> {
        self.select_by_seq_id(pattern, true)
    }

    ///
    /// Delete the features whose sequence id matches `pattern`.
    ///
    /// # Returns
    /// - the sorted, distinct sequence ids that were deleted
    pub fn delete_by_seq_id(&mut self, pattern: &str) -> Result<Vec<String>, FeatureError> {
        self.select_by_seq_id(pattern, false)
    }

    fn select_by_seq_id(&mut self, pattern: &str, keep: bool) -> Result<Vec<String>, FeatureError> {
        let re = Regex::new(pattern).map_err(|e| SelectorError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let matched: Vec<String> = self
            .seq_ids()
            .into_iter()
            .filter(|id| re.is_match(id))
            .collect();
        self.features
            .retain(|f| re.is_match(&f.seq_id) == keep);

        Ok(matched)
    }

    /// Apply a `keep`/`delete` selector. Only the `seqid` subject is supported.
    pub fn apply_selector(&mut self, selector: &Selector) -> Result<Vec<String>, FeatureError> {
        if selector.subject != SEQID_KEY {
            return Err(SelectorError::UnsupportedSubject(selector.subject.clone()).into());
        }
        match selector.operation {
            SelectorOperation::Keep => self.keep_by_seq_id(&selector.pattern),
            SelectorOperation::Delete => self.delete_by_seq_id(&selector.pattern),
        }
    }

    /// Sorted, distinct sequence ids.
    pub fn seq_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.features.iter().map(|f| f.seq_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// How many features carry each attribute key.
    pub fn attribute_tally(&self) -> BTreeMap<String, usize> {
        let mut tally = BTreeMap::new();
        for key in self.features.iter().flat_map(|f| f.attributes.keys()) {
            *tally.entry(key.clone()).or_insert(0) += 1;
        }
        tally
    }

    ///
    /// Group features by sequence id without copying them.
    ///
    /// Each [`SeqIdView`] indexes into this collection, so the views see every
    /// later change made through [`Features::feature_mut`]. Call
    /// [`SeqIdView::to_features`] for an independent deep copy.
    ///
    pub fn by_seq_id(&self) -> BTreeMap<String, SeqIdView<'_>> {
        let mut views: BTreeMap<String, SeqIdView<'_>> = BTreeMap::new();
        for (idx, f) in self.features.iter().enumerate() {
            views
                .entry(f.seq_id.clone())
                .or_insert_with(|| SeqIdView {
                    source: self,
                    seq_id: f.seq_id.clone(),
                    indices: Vec::new(),
                })
                .indices
                .push(idx);
        }
        views
    }

    /// Move the features into one owned collection per sequence id.
    pub fn into_seq_id_partitions(self) -> BTreeMap<String, Features> {
        let sorted = self.sorted;
        partition_by_seq_id(self.features)
            .into_iter()
            .map(|(seq_id, features)| {
                let mut fs = Features::from_features(SEQID_KEY, &seq_id, features);
                fs.sorted = sorted;
                (seq_id, fs)
            })
            .collect()
    }

    /// Total bases covered, counting overlapping bases once per feature.
    pub fn sum_intervals(&self) -> u64 {
        self.features.iter().map(Feature::len).sum()
    }

    ///
    /// Consolidate every sequence id separately, on a sorted copy.
    ///
    /// # Returns
    /// - the consolidated features of all sequence ids, sorted
    pub fn consolidated_by_seq_id(&self) -> Result<Features, FeatureError> {
        let mut copy = self.clone();
        copy.sorted = false;
        copy.sort();

        let mut merged = Features::new(&self.key, &self.value);
        for partition in copy.into_seq_id_partitions().into_values() {
            merged.features.extend(partition.consolidated()?.features);
        }
        merged.sorted = true;
        Ok(merged)
    }

    /// Total distinct bases covered, computed on a consolidated copy.
    pub fn sum_consolidated_intervals(&self) -> Result<u64, FeatureError> {
        Ok(self.consolidated_by_seq_id()?.sum_intervals())
    }
}

impl<'a> IntoIterator for &'a Features {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// The features of one sequence id, as indices into a parent [`Features`].
#[derive(Debug, Clone)]
pub struct SeqIdView<'a> {
    source: &'a Features,
    seq_id: String,
    indices: Vec<usize>,
}

impl<'a> SeqIdView<'a> {
    pub fn seq_id(&self) -> &str {
        &self.seq_id
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Feature> + '_ {
        self.indices.iter().map(|&i| &self.source.features[i])
    }

    /// Deep copy into an independent `seqid` collection.
    pub fn to_features(&self) -> Features {
        let mut fs = Features::from_features(SEQID_KEY, &self.seq_id, self.iter().cloned().collect());
        fs.sorted = self.source.sorted;
        fs
    }
}

///
/// Merge two collections into a new one without touching either input.
///
/// All features are pooled, split by sequence id, and each sequence is sorted
/// and prudent-merged independently (in parallel). The result is keyed
/// `merged` with value `<a.id()>+<b.id()>`.
///
pub fn merge_features(a: &Features, b: &Features) -> Result<Features, FeatureError> {
    let pooled: Vec<Feature> = a.iter().chain(b.iter()).cloned().collect();
    let partitions = Features::from_features(SEQID_KEY, "pooled", pooled).into_seq_id_partitions();
    info!(
        "Merging {} and {} features across {} sequences",
        a.len(),
        b.len(),
        partitions.len()
    );

    let merged: Vec<Features> = partitions
        .into_par_iter()
        .map(|(seq_id, mut fs)| {
            fs.sort();
            fs.prudent_merge_by_type_in_place()?;
            debug!("{}: {} features after merge", seq_id, fs.len());
            Ok(fs)
        })
        .collect::<Result<Vec<_>, FeatureError>>()?;

    let mut result = Features::from_features(
        "merged",
        &format!("{}+{}", a.id(), b.id()),
        merged.into_iter().flat_map(Features::into_inner).collect(),
    );
    result.sorted = true;
    Ok(result)
}

fn partition_by_seq_id(features: Vec<Feature>) -> BTreeMap<String, Vec<Feature>> {
    let mut partitions: BTreeMap<String, Vec<Feature>> = BTreeMap::new();
    for f in features {
        partitions.entry(f.seq_id.clone()).or_default().push(f);
    }
    partitions
}

/// Insert after every feature that sorts at or before `feature` by (start, end).
fn insert_sorted(candidates: &mut VecDeque<Feature>, feature: Feature) {
    let key = (feature.start, feature.end);
    let idx = candidates.partition_point(|f| (f.start, f.end) <= key);
    candidates.insert(idx, feature);
}
