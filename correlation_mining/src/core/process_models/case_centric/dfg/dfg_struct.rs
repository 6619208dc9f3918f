use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    iter::Sum,
    ops::AddAssign,
};

/// Activity in a directly-follows graph.
type Activity = String;

/// A directly-follows graph of [`Activity`]s.
///
/// Graph containing a set of activities (annotated with their number of occurrences) and a
/// set of directly-follows relations annotated with a weight of type `W`.
///
/// Correlation mining produces two graphs over the same relations: a _frequency_ graph
/// (`W = u64`, the estimated number of times the target directly followed the source) and a
/// _performance_ graph (`W = f64`, the estimated average time in seconds between the two).
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "W: Serialize", deserialize = "W: Deserialize<'de>"))]
pub struct DirectlyFollowsGraph<'a, W = u64> {
    /// Activities and their number of occurrences
    pub activities: HashMap<Activity, u64>,
    /// Directly-follows relations
    #[serde_as(as = "Vec<(_, _)>")]
    pub directly_follows_relations: HashMap<(Cow<'a, str>, Cow<'a, str>), W>,
}

impl<W> Default for DirectlyFollowsGraph<'_, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, W> DirectlyFollowsGraph<'a, W> {
    /// Create new [`DirectlyFollowsGraph`] with no activities and directly-follows relations.
    pub fn new() -> Self {
        Self {
            activities: HashMap::new(),
            directly_follows_relations: HashMap::new(),
        }
    }

    /// Add an activity with a frequency.
    ///
    /// If the activity already exists, the frequency count is added to the existing activity.
    pub fn add_activity(&mut self, activity: Activity, frequency: u64) {
        *self.activities.entry(activity).or_default() += frequency;
    }

    /// Checks if an activity is already contained in the directly-follows graph.
    pub fn contains_activity<S: AsRef<str>>(&self, activity: S) -> bool {
        self.activities.contains_key(activity.as_ref())
    }

    /// Checks if a directly-follows relation is already contained in the directly-follows graph.
    pub fn contains_df_relation<S: Into<Cow<'a, str>>>(&self, (a, b): (S, S)) -> bool {
        self.directly_follows_relations
            .contains_key(&(a.into(), b.into()))
    }

    /// Returns `true` if the graph has neither activities nor relations
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty() && self.directly_follows_relations.is_empty()
    }

    /// Returns the ingoing activities of an activity in the directly-follows graph.
    pub fn ingoing_activities<S: Into<Cow<'a, str>>>(&self, activity: S) -> HashSet<&Cow<'a, str>> {
        let a = activity.into();
        self.directly_follows_relations
            .keys()
            .filter_map(|(x, y)| if &a == y { Some(x) } else { None })
            .collect()
    }

    /// Returns the outgoing activities of an activity in the directly-follows graph.
    pub fn outgoing_activities<S: Into<Cow<'a, str>>>(
        &self,
        activity: S,
    ) -> HashSet<&Cow<'a, str>> {
        let a = activity.into();
        self.directly_follows_relations
            .keys()
            .filter_map(|(x, y)| if &a == x { Some(y) } else { None })
            .collect()
    }
}

impl<'a, W: Copy> DirectlyFollowsGraph<'a, W> {
    /// Weight of the directly-follows relation `(a, b)`, if present
    pub fn get_df_weight<S: Into<Cow<'a, str>>>(&self, (a, b): (S, S)) -> Option<W> {
        self.directly_follows_relations
            .get(&(a.into(), b.into()))
            .copied()
    }

    /// Sum of the weights of all relations leaving `activity`
    pub fn outgoing_weight<S: AsRef<str>>(&self, activity: S) -> W
    where
        W: Sum<W>,
    {
        self.directly_follows_relations
            .iter()
            .filter(|((from, _), _)| from == activity.as_ref())
            .map(|(_, w)| *w)
            .sum()
    }

    /// Sum of the weights of all relations entering `activity`
    pub fn incoming_weight<S: AsRef<str>>(&self, activity: S) -> W
    where
        W: Sum<W>,
    {
        self.directly_follows_relations
            .iter()
            .filter(|((_, to), _)| to == activity.as_ref())
            .map(|(_, w)| *w)
            .sum()
    }
}

impl<'a, W: AddAssign + Default> DirectlyFollowsGraph<'a, W> {
    /// Add a directly-follows relation with a weight.
    ///
    /// If the directly-follows relation already exists, the weight is added to the
    /// existing directly-follows relation.
    pub fn add_df_relation(&mut self, from: Cow<'a, str>, to: Cow<'a, str>, weight: W) {
        *self.directly_follows_relations.entry((from, to)).or_default() += weight;
    }
}

impl<W: Serialize> DirectlyFollowsGraph<'_, W> {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
