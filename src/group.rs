//! Nested sample groups and their traversal.
//!
//! A group is either a flat run of samples (a leaf) or an ordered list of
//! sub-groups. Walking is done with an explicit work-stack so arbitrarily
//! deep nesting never grows the native stack.

use crate::value::Sample;

#[derive(Clone, Debug)]
pub enum NestedGroup<'g> {
    Leaf(&'g [Sample]),
    Branch(Vec<NestedGroup<'g>>),
}

impl<'g> NestedGroup<'g> {
    /// Non-empty leaves, left to right.
    pub fn leaves(&self) -> Leaves<'_, 'g> {
        Leaves { pending: vec![self], include_empty: false }
    }

    pub fn for_each_leaf(&self, f: impl FnMut(&'g [Sample])) {
        self.leaves().for_each(f);
    }

    pub fn for_each_sample(&self, mut f: impl FnMut(Sample)) {
        for leaf in self.leaves() {
            leaf.iter().copied().for_each(&mut f);
        }
    }

    pub fn sample_count(&self) -> usize {
        self.leaves().map(<[Sample]>::len).sum()
    }

    /// Number of leaves, empty ones included. For an object group this is
    /// the number of sampled objects.
    pub fn leaf_count(&self) -> usize {
        Leaves { pending: vec![self], include_empty: true }.count()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves().next().is_none()
    }
}

pub struct Leaves<'s, 'g> {
    pending: Vec<&'s NestedGroup<'g>>,
    include_empty: bool,
}

impl<'s, 'g> Iterator for Leaves<'s, 'g> {
    type Item = &'g [Sample];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(group) = self.pending.pop() {
            match group {
                NestedGroup::Leaf(samples) => {
                    if self.include_empty || !samples.is_empty() {
                        return Some(*samples);
                    }
                }
                // reversed so the leftmost child is popped first
                NestedGroup::Branch(children) => self.pending.extend(children.iter().rev()),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaves_are_visited_left_to_right_and_empties_skipped() {
        let a = [Sample::Integer, Sample::Null];
        let b = [Sample::True];
        let c = [Sample::Double];
        let group = NestedGroup::Branch(vec![
            NestedGroup::Leaf(&a),
            NestedGroup::Branch(vec![]),
            NestedGroup::Branch(vec![NestedGroup::Leaf(&[]), NestedGroup::Leaf(&b)]),
            NestedGroup::Leaf(&c),
        ]);

        let mut seen = Vec::new();
        group.for_each_sample(|s| seen.push(s));
        assert_eq!(seen, vec![Sample::Integer, Sample::Null, Sample::True, Sample::Double]);

        let mut leaves = 0;
        group.for_each_leaf(|_| leaves += 1);
        assert_eq!(leaves, 3);
        assert_eq!(group.leaf_count(), 4);
        assert_eq!(group.sample_count(), 4);
    }

    #[test]
    fn empty_groups_contribute_nothing() {
        let group = NestedGroup::Branch(vec![NestedGroup::Leaf(&[]), NestedGroup::Branch(vec![])]);
        assert!(group.is_empty());
        assert_eq!(group.sample_count(), 0);
        assert_eq!(group.leaves().count(), 0);
    }

    #[test]
    fn deep_nesting_is_walked_without_recursion() {
        let leaf = [Sample::False];
        let mut group = NestedGroup::Leaf(&leaf);
        for _ in 0..1_000 {
            group = NestedGroup::Branch(vec![group]);
        }
        assert_eq!(group.sample_count(), 1);
    }
}
