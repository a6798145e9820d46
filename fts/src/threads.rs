use std::collections::HashSet;

use tantivy::{
  collector::{Collector, SegmentCollector},
  fastfield::{DynamicFastFieldReader, FastFieldReader},
  schema::Field,
  DocId, Score, SegmentReader,
};

/// Compte les fils de discussion distincts parmi les documents retenus, à
/// partir du fast field `thread`.
pub struct ThreadCount {
  field: Field,
}

impl ThreadCount {
  pub fn new(field: Field) -> Self {
    Self { field }
  }
}

impl Collector for ThreadCount {
  type Fruit = u64;
  type Child = ThreadSegmentCollector;

  fn for_segment(
    &self,
    _segment_local_id: u32,
    segment_reader: &SegmentReader,
  ) -> tantivy::Result<ThreadSegmentCollector> {
    let threads = segment_reader.fast_fields().u64(self.field)?;
    Ok(ThreadSegmentCollector {
      threads,
      seen: HashSet::new(),
    })
  }

  fn requires_scoring(&self) -> bool {
    false
  }

  fn merge_fruits(&self, segment_fruits: Vec<HashSet<u64>>) -> tantivy::Result<u64> {
    // un même fil peut être réparti sur plusieurs segments
    let threads: HashSet<u64> = segment_fruits.into_iter().flatten().collect();
    Ok(threads.len() as u64)
  }
}

pub struct ThreadSegmentCollector {
  threads: DynamicFastFieldReader<u64>,
  seen: HashSet<u64>,
}

impl SegmentCollector for ThreadSegmentCollector {
  type Fruit = HashSet<u64>;

  fn collect(&mut self, doc: DocId, _score: Score) {
    self.seen.insert(self.threads.get(doc));
  }

  fn harvest(self) -> HashSet<u64> {
    self.seen
  }
}
