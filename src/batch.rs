//! Parallel processing of record batches
//!
//! Records are independent, so each step is applied to all of them at once
//! with rayon. Random segmentation derives a separate generator per record
//! from a base seed and the record position, which keeps results identical
//! regardless of how rayon schedules the work.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::Result;
use crate::pipeline::EcgRecord;
use crate::profile_scope;
use crate::types::SegmentBatch;
use crate::windowing::{random_segment, segment};

/// A collection of records processed together
#[derive(Debug, Clone, Default)]
pub struct EcgBatch {
    records: Vec<EcgRecord>,
}

impl EcgBatch {
    pub fn new(records: Vec<EcgRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EcgRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EcgRecord> {
        self.records
    }

    pub fn push(&mut self, record: EcgRecord) {
        self.records.push(record);
    }

    /// Run `step` on every record in parallel.
    ///
    /// Each step works on a copy of its record. The batch is only updated when
    /// every record succeeds; on failure it is left exactly as it was.
    pub fn apply<F>(&mut self, label: &str, step: F) -> Result<()>
    where
        F: Fn(&mut EcgRecord) -> Result<()> + Sync + Send,
    {
        profile_scope!(format!("batch step '{}' on {} records", label, self.records.len()));
        let updated = self
            .records
            .par_iter()
            .map(|record| -> Result<EcgRecord> {
                let mut record = record.clone();
                step(&mut record).inspect_err(|e| {
                    log::error!("Step '{}' failed on record {}: {}", label, record.index, e);
                })?;
                Ok(record)
            })
            .collect::<Result<Vec<_>>>()?;

        self.records = updated;
        Ok(())
    }

    /// Fixed-stride segmentation of every record's signal.
    pub fn segment(&self, length: usize, step: usize) -> Result<Vec<SegmentBatch>> {
        profile_scope!(format!("segment {} records", self.records.len()));
        self.records
            .par_iter()
            .map(|record| segment(record.signal.view(), length, step))
            .collect()
    }

    /// Random-offset segmentation of every record's signal.
    ///
    /// Record `i` draws its offsets from `StdRng::seed_from_u64(seed + i)`.
    pub fn random_segment(&self, length: usize, n_segments: usize, seed: u64) -> Result<Vec<SegmentBatch>> {
        profile_scope!(format!("random segment {} records", self.records.len()));
        self.records
            .par_iter()
            .enumerate()
            .map(|(i, record)| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                random_segment(record.signal.view(), length, n_segments, &mut rng)
            })
            .collect()
    }
}

impl From<Vec<EcgRecord>> for EcgBatch {
    fn from(records: Vec<EcgRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EcgError;
    use crate::pipeline::gradient;
    use ndarray::Array2;

    fn batch(n: usize) -> EcgBatch {
        (0..n)
            .map(|i| {
                let signal = Array2::from_shape_fn((2, 50 + i), |(c, t)| (c * 100 + t * (i + 1)) as f64);
                EcgRecord::new(format!("rec{}", i), signal)
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_apply_runs_on_every_record() {
        let mut batch = batch(8);
        batch.apply("gradient", |record| gradient(record, 1)).unwrap();
        assert!(batch.records().iter().all(|r| r.annotations.contains("grad_1")));
    }

    #[test]
    fn test_apply_reports_failure() {
        let mut batch = batch(3);
        batch.push(EcgRecord::new("tiny", Array2::zeros((2, 1))));
        let result = batch.apply("gradient", |record| gradient(record, 1));
        assert!(matches!(result, Err(EcgError::InvalidArgument(_))));
    }

    #[test]
    fn test_apply_failure_leaves_batch_untouched() {
        let mut batch = batch(64);
        batch.apply("gradient", |record| gradient(record, 1)).unwrap();
        batch.push(EcgRecord::new("tiny", Array2::zeros((2, 1))));
        let before: Vec<_> = batch.records().iter().map(|r| r.annotations.clone()).collect();

        let result = batch.apply("gradient", |record| gradient(record, 2));
        assert!(result.is_err());

        let after: Vec<_> = batch.records().iter().map(|r| r.annotations.clone()).collect();
        assert_eq!(after, before);
        assert!(batch.records().iter().all(|r| !r.annotations.contains("grad_2")));
        assert_eq!(batch.len(), 65);
    }

    #[test]
    fn test_segment_per_record() {
        let batch = batch(4);
        let segments = batch.segment(10, 5).unwrap();
        assert_eq!(segments.len(), 4);
        // record 0 has 50 samples: (50 - 10) / 5 + 1 = 9
        assert_eq!(segments[0].dim(), (9, 2, 10));
        // record 3 has 53 samples
        assert_eq!(segments[3].dim(), (9, 2, 10));
    }

    #[test]
    fn test_random_segment_is_reproducible() {
        let batch = batch(6);
        let a = batch.random_segment(12, 4, 99).unwrap();
        let b = batch.random_segment(12, 4, 99).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|s| s.dim() == (4, 2, 12)));
    }
}
