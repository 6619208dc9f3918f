//! Activity alphabet and per-trace occurrence lists

use std::collections::HashMap;

use itertools::Itertools;

use super::preprocess::PreprocessedTrace;

///
/// Sorted set of distinct activity labels, with their number of occurrences in the log
///
/// Labels are sorted in lexicographic ([`String`]) order, so that index `i` refers to the
/// same activity in every matrix built from the same log.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityAlphabet {
    activities: Vec<String>,
    counts: Vec<u64>,
    index: HashMap<String, usize>,
}

impl ActivityAlphabet {
    /// Collect and count all activity labels of `traces`
    pub fn from_traces(traces: &[PreprocessedTrace]) -> Self {
        let counts = traces
            .iter()
            .flatten()
            .map(|e| e.activity.as_str())
            .counts();
        let (activities, counts): (Vec<String>, Vec<u64>) = counts
            .into_iter()
            .sorted_unstable_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(label, count)| (label.to_string(), count as u64))
            .unzip();
        let index = activities
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self {
            activities,
            counts,
            index,
        }
    }

    /// Number of distinct activities
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Returns `true` if there are no activities
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Index of an activity label
    pub fn index_of(&self, activity: &str) -> Option<usize> {
        self.index.get(activity).copied()
    }

    /// Label at index `i`
    pub fn label(&self, i: usize) -> &str {
        &self.activities[i]
    }

    /// Number of occurrences of the activity at index `i`
    pub fn count(&self, i: usize) -> u64 {
        self.counts[i]
    }

    /// Largest occurrence count (0 for an empty alphabet)
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Labels in index order
    pub fn labels(&self) -> &[String] {
        &self.activities
    }

    /// Occurrence counts in index order
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

/// Occurrence timestamps of every alphabet activity in one trace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTrace {
    /// `occurrences[i]`: ascending timestamps of activity `i` (empty if absent)
    pub occurrences: Vec<Vec<f64>>,
}

impl GroupedTrace {
    /// Timestamps of activity `i`
    pub fn of(&self, i: usize) -> &[f64] {
        &self.occurrences[i]
    }
}

/// [`ActivityAlphabet`] together with the [`GroupedTrace`] of every case
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedLog {
    /// Activities of the log
    pub alphabet: ActivityAlphabet,
    /// One entry per trace, in log order
    pub traces: Vec<GroupedTrace>,
}

impl GroupedLog {
    ///
    /// Iterate the occurrence slices `(a_i, a_j)` of all traces in which both activities occur
    ///
    /// Both the precedence and the duration estimator are driven by this iterator.
    ///
    pub fn co_occurring(&self, i: usize, j: usize) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.traces
            .iter()
            .map(move |t| (t.of(i), t.of(j)))
            .filter(|(a_i, a_j)| !a_i.is_empty() && !a_j.is_empty())
    }
}

/// Split every trace into per-activity occurrence lists
///
/// Input traces are expected in preprocessed `(timestamp, index)` order, so each list is
/// ascending.
pub fn group_traces(alphabet: ActivityAlphabet, traces: &[PreprocessedTrace]) -> GroupedLog {
    let grouped = traces
        .iter()
        .map(|trace| {
            let mut occurrences = vec![Vec::new(); alphabet.len()];
            for event in trace {
                if let Some(i) = alphabet.index_of(&event.activity) {
                    occurrences[i].push(event.timestamp);
                }
            }
            GroupedTrace { occurrences }
        })
        .collect();
    GroupedLog {
        alphabet,
        traces: grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        discovery::case_centric::correlation_mining::{
            parameters::CorrelationMinerParameters, preprocess::preprocess_log,
        },
        event_log,
    };

    fn sample() -> Vec<PreprocessedTrace> {
        let log = event_log!(
            ["register" => 0.0, "check" => 2.0, "check" => 1.0, "pay" => 3.0],
            ["register" => 10.0, "pay" => 11.0],
            []
        );
        preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap()
    }

    #[test]
    fn alphabet_is_sorted_and_counted() {
        let alphabet = ActivityAlphabet::from_traces(&sample());
        assert_eq!(alphabet.labels(), &["check", "pay", "register"]);
        assert_eq!(alphabet.counts(), &[2, 2, 2]);
        assert_eq!(alphabet.index_of("pay"), Some(1));
        assert_eq!(alphabet.index_of("ship"), None);
        assert_eq!(alphabet.max_count(), 2);
        assert!(ActivityAlphabet::from_traces(&[]).is_empty());
    }

    #[test]
    fn occurrences_are_grouped_per_trace() {
        let traces = sample();
        let grouped = group_traces(ActivityAlphabet::from_traces(&traces), &traces);
        assert_eq!(grouped.traces.len(), 3);
        assert_eq!(grouped.traces[0].of(0), &[1.0, 2.0]);
        assert_eq!(grouped.traces[1].of(0), &[] as &[f64]);
        assert_eq!(grouped.traces[1].of(2), &[10.0]);
        assert!(grouped.traces[2].occurrences.iter().all(Vec::is_empty));

        // check and pay only co-occur in the first trace
        let pairs: Vec<_> = grouped.co_occurring(0, 1).collect();
        assert_eq!(pairs, vec![(&[1.0, 2.0][..], &[3.0][..])]);
        assert_eq!(grouped.co_occurring(1, 2).count(), 2);
    }
}
