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

//! Exact string-keyed frequency counting with top-K truncation.
//!
//! Unlike the bitmap counters, this is a plain hash-map counter: exact for
//! every term it retains, with an optional cap on how many terms a shard
//! result carries (the highest-count terms win).

use std::collections::HashMap;

use crate::codec::SketchSlice;
use crate::codec::put_u8;
use crate::codec::put_u32_le;
use crate::error::Error;
use crate::error::ErrorKind;

const TERM_FAMILY_ID: u8 = 22;
const SERIAL_VERSION: u8 = 1;

/// An exact frequency counter over string terms.
///
/// # Examples
///
/// ```
/// use bitfreq::term::TermFrequencyCounter;
///
/// let mut counter = TermFrequencyCounter::new();
/// counter.add("apple");
/// counter.add("apple");
/// counter.add("pear");
/// assert_eq!(counter.count("apple"), 2);
/// assert_eq!(counter.top_terms(1), vec![("apple", 2)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermFrequencyCounter {
    counts: HashMap<String, u32>,
}

impl TermFrequencyCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of the given term.
    pub fn add(&mut self, term: &str) {
        self.add_count(term, 1);
    }

    /// Adds `count` occurrences of the given term.
    pub fn add_count(&mut self, term: &str, count: u32) {
        if count == 0 {
            return;
        }
        if let Some(existing) = self.counts.get_mut(term) {
            *existing += count;
        } else {
            self.counts.insert(term.to_owned(), count);
        }
    }

    /// Returns the count of a term (zero if never seen).
    pub fn count(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct terms retained.
    pub fn num_terms(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no term has been added.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns up to `limit` terms, highest count first.
    ///
    /// Ties are broken by term so the truncation is deterministic.
    pub fn top_terms(&self, limit: usize) -> Vec<(&str, u32)> {
        let mut terms: Vec<(&str, u32)> = self
            .counts
            .iter()
            .map(|(term, count)| (term.as_str(), *count))
            .collect();
        terms.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(limit);
        terms
    }

    /// Folds another counter's terms into this one.
    pub fn merge(&mut self, other: Self) {
        for (term, count) in other.counts {
            *self.counts.entry(term).or_insert(0) += count;
        }
    }

    /// Serializes up to `limit` highest-count terms.
    pub fn serialize(&self, limit: usize) -> Vec<u8> {
        let terms = self.top_terms(limit);

        let mut out = Vec::with_capacity(8);
        put_u8(&mut out, SERIAL_VERSION);
        put_u8(&mut out, TERM_FAMILY_ID);
        put_u32_le(&mut out, terms.len() as u32);
        for (term, count) in terms {
            put_u32_le(&mut out, term.len() as u32);
            out.extend_from_slice(term.as_bytes());
            put_u32_le(&mut out, count);
        }
        out
    }

    /// Deserializes a counter.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut input = SketchSlice::new(bytes);

        let version = input.read_u8().map_err(truncated)?;
        if version != SERIAL_VERSION {
            return Err(
                Error::new(ErrorKind::MalformedDeserializeData, "unsupported serial version")
                    .with_context("version", version),
            );
        }
        let family = input.read_u8().map_err(truncated)?;
        if family != TERM_FAMILY_ID {
            return Err(
                Error::new(ErrorKind::MalformedDeserializeData, "unexpected family id")
                    .with_context("expected", TERM_FAMILY_ID)
                    .with_context("actual", family),
            );
        }

        let entries = input.read_u32_le().map_err(truncated)? as usize;
        // Each entry occupies at least 8 bytes (length prefix plus count), so
        // a count the remaining input cannot possibly hold is rejected before
        // any allocation sized from it.
        if entries > input.remaining() / 8 {
            return Err(Error::new(
                ErrorKind::MalformedDeserializeData,
                "entry count exceeds remaining input",
            )
            .with_context("entries", entries)
            .with_context("remaining", input.remaining()));
        }
        let mut counts = HashMap::with_capacity(entries);
        for _ in 0..entries {
            let len = input.read_u32_le().map_err(truncated)? as usize;
            let term_bytes = input.read_vec(len).map_err(truncated)?;
            let term = String::from_utf8(term_bytes).map_err(|err| {
                Error::new(
                    ErrorKind::MalformedDeserializeData,
                    "term is not valid UTF-8",
                )
                .set_source(err)
            })?;
            let count = input.read_u32_le().map_err(truncated)?;
            // Same filter as add_count: a zero-count entry is never stored.
            if count > 0 {
                counts.insert(term, count);
            }
        }

        Ok(Self { counts })
    }
}

fn truncated(err: std::io::Error) -> Error {
    Error::new(
        ErrorKind::MalformedDeserializeData,
        "serialized counter is truncated",
    )
    .set_source(err)
}
