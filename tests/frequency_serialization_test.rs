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

use bitfreq::error::ErrorKind;
use bitfreq::frequency::BitmapFrequencySketch32;
use bitfreq::frequency::BitmapFrequencySketch64;
use googletest::assert_that;
use googletest::prelude::contains_substring;

#[test]
fn test_empty_round_trip() {
    let counter = BitmapFrequencySketch32::new(4);
    let bytes = counter.serialize();
    assert_eq!(bytes.len(), 5);

    let restored = BitmapFrequencySketch32::deserialize(&bytes).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.num_planes(), 4);
}

#[test]
fn test_round_trip() {
    let mut counter = BitmapFrequencySketch32::new(3);
    for key in 1u32..30 {
        for _ in 0..key % 9 {
            counter.add(key);
        }
    }

    let bytes = counter.serialize();
    let restored = BitmapFrequencySketch32::deserialize(&bytes).unwrap();

    assert_eq!(restored.num_planes(), counter.num_planes());
    assert_eq!(restored.overflow(), counter.overflow());
    for key in 1u32..30 {
        assert_eq!(restored.count(key), counter.count(key));
    }
    assert_eq!(restored.decode(), counter.decode());
}

#[test]
fn test_round_trip_wide_keys() {
    let mut counter = BitmapFrequencySketch64::new(2);
    let wide = (1u64 << 40) + 17;
    counter.add(wide);
    counter.add(wide);
    for _ in 0..6 {
        counter.add(3);
    }

    let bytes = counter.serialize();
    let restored = BitmapFrequencySketch64::deserialize(&bytes).unwrap();

    assert_eq!(restored.count(wide), 2);
    assert_eq!(restored.count(3), 6);
    assert_eq!(restored.overflow().get(&3), Some(&6));
}

#[test]
fn test_round_trip_zero_planes() {
    let mut counter = BitmapFrequencySketch32::new(0);
    counter.add(1);
    counter.add(1);
    counter.add(9);

    let bytes = counter.serialize();
    let restored = BitmapFrequencySketch32::deserialize(&bytes).unwrap();

    assert_eq!(restored.num_planes(), 0);
    assert_eq!(restored.count(1), 2);
    assert_eq!(restored.count(9), 1);
}

#[test]
fn test_round_trip_preserves_non_canonical_state() {
    // A merged-but-unnormalized counter must survive serialization unchanged,
    // since shard results travel over the wire before normalization.
    let mut x = BitmapFrequencySketch32::new(2);
    let mut y = BitmapFrequencySketch32::new(2);
    for _ in 0..5 {
        x.add(8);
    }
    y.add(8);

    let merged = x.merge(y);
    let bytes = merged.serialize();
    let mut restored = BitmapFrequencySketch32::deserialize(&bytes).unwrap();

    assert_eq!(restored.count(8), 6);
    restored.normalize();
    assert_eq!(restored.overflow().get(&8), Some(&6));
}

#[test]
fn test_deserialize_rejects_bad_version() {
    let mut bytes = BitmapFrequencySketch32::new(2).serialize();
    bytes[0] = 99;

    let err = BitmapFrequencySketch32::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("serial version"));
}

#[test]
fn test_deserialize_rejects_bad_family() {
    let mut bytes = BitmapFrequencySketch32::new(2).serialize();
    bytes[1] = 0;

    let err = BitmapFrequencySketch32::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("family"));
}

#[test]
fn test_deserialize_rejects_key_width_mismatch() {
    let mut counter = BitmapFrequencySketch32::new(2);
    counter.add(5);
    let bytes = counter.serialize();

    let err = BitmapFrequencySketch64::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("key width"));
}

#[test]
fn test_deserialize_rejects_truncated_input() {
    let mut counter = BitmapFrequencySketch32::new(3);
    for key in 0u32..50 {
        counter.add(key);
        counter.add(key);
    }
    let bytes = counter.serialize();

    let err = BitmapFrequencySketch32::deserialize(&bytes[..bytes.len() - 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("truncated"));

    let err = BitmapFrequencySketch32::deserialize(&bytes[..3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}
