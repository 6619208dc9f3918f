//! Conversion of resolved edges into directly-follows graphs

use std::borrow::Cow;

use crate::core::process_models::case_centric::dfg::DirectlyFollowsGraph;

use super::{causality::ResolvedEdges, duration::DurationMatrix, grouping::ActivityAlphabet};

/// Frequency DFG (edge weight: number of occurrences) and performance DFG (edge weight: seconds)
pub type AssembledGraphs = (
    DirectlyFollowsGraph<'static, u64>,
    DirectlyFollowsGraph<'static, f64>,
);

///
/// Build the frequency and the performance [`DirectlyFollowsGraph`] from resolved edges
///
/// Both graphs contain every activity of `alphabet` (with its occurrence count) and the same
/// relations. The performance weight of an edge is its estimated duration.
///
pub fn assemble_graphs(
    alphabet: &ActivityAlphabet,
    resolved: &ResolvedEdges,
    durations: &DurationMatrix,
) -> AssembledGraphs {
    let mut frequency_dfg = DirectlyFollowsGraph::new();
    let mut performance_dfg = DirectlyFollowsGraph::new();
    for (label, &count) in alphabet.labels().iter().zip(alphabet.counts()) {
        frequency_dfg.add_activity(label.clone(), count);
        performance_dfg.add_activity(label.clone(), count);
    }
    for edge in &resolved.edges {
        let source: Cow<'static, str> = Cow::Owned(alphabet.label(edge.source).to_string());
        let target: Cow<'static, str> = Cow::Owned(alphabet.label(edge.target).to_string());
        frequency_dfg.add_df_relation(source.clone(), target.clone(), edge.frequency);
        performance_dfg.add_df_relation(source, target, durations.get(edge.source, edge.target));
    }
    (frequency_dfg, performance_dfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::case_centric::correlation_mining::{
        causality::ResolvedEdge,
        grouping::{group_traces, GroupedLog},
        parameters::CorrelationMinerParameters,
        preprocess::preprocess_log,
    };
    use crate::event_log;

    fn grouped() -> GroupedLog {
        let log = event_log!(["a" => 0.0, "b" => 2.5, "c" => 3.0], ["a" => 0.0, "b" => 1.5]);
        let traces = preprocess_log(&log, &CorrelationMinerParameters::default()).unwrap();
        group_traces(ActivityAlphabet::from_traces(&traces), &traces)
    }

    #[test]
    fn graphs_share_activities_and_relations() {
        let grouped = grouped();
        let durations = DurationMatrix::estimate(&grouped);
        let resolved = ResolvedEdges {
            edges: vec![
                ResolvedEdge {
                    source: 0,
                    target: 1,
                    frequency: 2,
                },
                ResolvedEdge {
                    source: 1,
                    target: 2,
                    frequency: 1,
                },
            ],
            approximate: false,
        };
        let (frequency, performance) = assemble_graphs(&grouped.alphabet, &resolved, &durations);

        assert_eq!(frequency.activities, performance.activities);
        assert_eq!(frequency.activities["a"], 2);
        assert_eq!(frequency.activities["c"], 1);
        assert_eq!(frequency.get_df_weight(("a", "b")), Some(2));
        assert_eq!(frequency.get_df_weight(("b", "c")), Some(1));
        assert_eq!(performance.get_df_weight(("a", "b")), Some(2.0));
        assert_eq!(performance.get_df_weight(("b", "c")), Some(0.5));
        assert_eq!(
            frequency.directly_follows_relations.len(),
            performance.directly_follows_relations.len()
        );
    }

    #[test]
    fn no_edges() {
        let grouped = grouped();
        let (frequency, performance) = assemble_graphs(
            &grouped.alphabet,
            &ResolvedEdges::default(),
            &DurationMatrix::estimate(&grouped),
        );
        assert_eq!(frequency.activities.len(), 3);
        assert!(frequency.directly_follows_relations.is_empty());
        assert!(performance.directly_follows_relations.is_empty());
    }
}
