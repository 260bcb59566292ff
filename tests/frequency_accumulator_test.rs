// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::collections::BTreeMap;
use std::collections::HashMap;

use bitfreq::error::ErrorKind;
use bitfreq::frequency::FrequencyAccumulator;
use bitfreq::frequency::FrequencyMerger;
use roaring::RoaringBitmap;

#[test]
fn test_sharded_pipeline_matches_direct_counts() {
    let mut expected: HashMap<u32, u32> = HashMap::new();
    let mut merger: FrequencyMerger<RoaringBitmap> = FrequencyMerger::new(4);

    // Three partitions, overlapping key ranges, including one hot key that
    // overflows the 4-plane configuration.
    for shard in 0u32..3 {
        let mut accumulator: FrequencyAccumulator<RoaringBitmap> = FrequencyAccumulator::new(4);
        for key in (shard * 20)..(shard * 20 + 40) {
            let count = 1 + (key + shard) % 5;
            for _ in 0..count {
                accumulator.add_observation(key);
            }
            *expected.entry(key).or_insert(0) += count;
        }
        for _ in 0..9 {
            accumulator.add_observation(1000);
        }
        *expected.entry(1000).or_insert(0) += 9;

        merger.merge_shard(&accumulator.shard_value()).unwrap();
    }

    let mut reference: BTreeMap<u32, u64> = BTreeMap::new();
    for &count in expected.values() {
        *reference.entry(count).or_insert(0) += 1;
    }

    assert_eq!(merger.finish(), reference);
}

#[test]
fn test_merger_result_feeds_a_further_tier() {
    let mut accumulator: FrequencyAccumulator<RoaringBitmap> = FrequencyAccumulator::new(3);
    accumulator.add_observation(7);
    accumulator.add_observation(7);

    let mut lower: FrequencyMerger<RoaringBitmap> = FrequencyMerger::new(3);
    lower.merge_shard(&accumulator.shard_value()).unwrap();

    let mut upper: FrequencyMerger<RoaringBitmap> = FrequencyMerger::new(3);
    upper.merge_shard(&lower.shard_value()).unwrap();

    assert_eq!(upper.into_sketch().count(7), 2);
}

#[test]
fn test_merge_shard_rejects_mismatched_plane_count() {
    let accumulator: FrequencyAccumulator<RoaringBitmap> = FrequencyAccumulator::new(3);
    let mut merger: FrequencyMerger<RoaringBitmap> = FrequencyMerger::new(4);

    let err = merger.merge_shard(&accumulator.shard_value()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_merge_shard_rejects_garbage_and_keeps_state() {
    let mut merger: FrequencyMerger<RoaringBitmap> = FrequencyMerger::new(2);

    let mut accumulator: FrequencyAccumulator<RoaringBitmap> = FrequencyAccumulator::new(2);
    accumulator.add_observation(5);
    merger.merge_shard(&accumulator.shard_value()).unwrap();

    let err = merger.merge_shard(&[0xFF, 0xFF, 0xFF]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);

    assert_eq!(merger.into_sketch().count(5), 1);
}

#[test]
fn test_final_histogram() {
    let mut accumulator: FrequencyAccumulator<RoaringBitmap> = FrequencyAccumulator::new(3);
    accumulator.add_observation(1);
    accumulator.add_observation(2);
    accumulator.add_observation(2);

    let histogram = accumulator.final_histogram();
    assert_eq!(histogram.get(&1), Some(&1));
    assert_eq!(histogram.get(&2), Some(&1));
}
