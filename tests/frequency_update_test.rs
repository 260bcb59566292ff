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

use bitfreq::frequency::BitmapFrequencySketch32;
use bitfreq::frequency::BitmapFrequencySketch64;

#[test]
fn test_empty_counter() {
    let counter = BitmapFrequencySketch32::new(4);
    assert!(counter.is_empty());
    assert_eq!(counter.num_planes(), 4);
    assert_eq!(counter.allocated_planes(), 0);
    assert_eq!(counter.count(42), 0);
    assert!(counter.decode().is_empty());
}

#[test]
fn test_count_grid() {
    let mut counter = BitmapFrequencySketch32::new(3);
    for key in 0u32..=10 {
        for _ in 0..key {
            counter.add(key);
        }
    }

    for key in 0u32..=10 {
        assert_eq!(counter.count(key), u64::from(key), "count for key {key}");
    }
}

#[test]
fn test_overflow_keys_leave_the_planes() {
    // Once a key's count reaches 2^planes, the carry chain clears its plane
    // bits and the count lives entirely in the overflow map.
    let mut counter = BitmapFrequencySketch32::new(2);
    for _ in 0..5 {
        counter.add(7);
    }

    assert_eq!(counter.count(7), 5);
    assert_eq!(counter.overflow().get(&7), Some(&5));
    // All plane-derived mass for the key is gone.
    let histogram = counter.decode();
    assert!(histogram.iter().all(|&keys| keys == 0));
}

#[test]
fn test_zero_planes_counts_in_overflow_only() {
    let mut counter = BitmapFrequencySketch32::new(0);
    counter.add(1);
    counter.add(1);
    counter.add(2);

    assert_eq!(counter.count(1), 2);
    assert_eq!(counter.count(2), 1);
    assert_eq!(counter.overflow().len(), 2);
    assert!(counter.decode().is_empty());
}

#[test]
fn test_normalize_is_idempotent() {
    let mut x = BitmapFrequencySketch32::new(2);
    let mut y = BitmapFrequencySketch32::new(2);
    for _ in 0..3 {
        x.add(9);
    }
    for _ in 0..3 {
        y.add(9);
    }

    // 3 + 3 = 6 overflows a 2-plane counter, leaving a non-canonical mix of
    // plane bits and overflow count until normalized.
    let mut merged = x.merge(y);
    assert_eq!(merged.count(9), 6);

    merged.normalize();
    let first = merged.frequency_of_frequencies();
    merged.normalize();
    let second = merged.frequency_of_frequencies();

    assert_eq!(merged.count(9), 6);
    assert_eq!(first, second);
}

#[test]
fn test_wide_keys() {
    let mut counter = BitmapFrequencySketch64::new(4);
    let key = 1u64 << 40;
    counter.add(key);
    counter.add(key);

    assert_eq!(counter.count(key), 2);
    assert_eq!(counter.count(key + 1), 0);
}
