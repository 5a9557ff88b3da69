use crate::model::{Bucket, CheckedEntry, MatchCandidate};

pub(crate) const MATCH_THRESHOLD: u8 = 88;

#[derive(Debug, Default)]
pub(crate) struct StructuralPartition {
    pub healthy: Vec<CheckedEntry>,
    pub broken: Vec<CheckedEntry>,
}

#[derive(Debug, Default)]
pub(crate) struct ConfidencePartition {
    pub matched: Vec<MatchCandidate>,
    pub ambiguous: Vec<MatchCandidate>,
}

pub(crate) fn structural_bucket(entry: &CheckedEntry) -> Bucket {
    if entry.validation.is_valid() {
        Bucket::Healthy
    } else {
        Bucket::Broken
    }
}

pub(crate) fn confidence_bucket(score: u8) -> Bucket {
    if score >= MATCH_THRESHOLD {
        Bucket::Matched
    } else {
        Bucket::Ambiguous
    }
}

/// First pass: entries without a valid launch target are broken.
pub(crate) fn partition_structural(entries: Vec<CheckedEntry>) -> StructuralPartition {
    let mut partition = StructuralPartition::default();
    for entry in entries {
        match structural_bucket(&entry) {
            Bucket::Healthy => partition.healthy.push(entry),
            _ => partition.broken.push(entry),
        }
    }
    partition
}

/// Second pass over the survivors, on their primary best-match score.
pub(crate) fn partition_confidence(candidates: Vec<MatchCandidate>) -> ConfidencePartition {
    let mut partition = ConfidencePartition::default();
    for candidate in candidates {
        match confidence_bucket(candidate.score()) {
            Bucket::Matched => partition.matched.push(candidate),
            _ => partition.ambiguous.push(candidate),
        }
    }
    partition
}
