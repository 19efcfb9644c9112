/// Criteria comparison for Pareto pruning.
///
/// `dominates` must be reflexive : a criteria dominates itself, so a front
/// never holds two entries with equal criteria.
pub trait Dominance {
    fn dominates(&self, other: &Self) -> bool;
}

/// A set of (item, criteria) where no criteria dominates another.
pub struct ParetoFront<Item, Criteria: Dominance> {
    elements: Vec<(Item, Criteria)>,
}

impl<Item, Criteria: Dominance> ParetoFront<Item, Criteria> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn dominates(&self, criteria: &Criteria) -> bool {
        self.elements
            .iter()
            .any(|(_, element)| element.dominates(criteria))
    }

    /// Insert unless dominated, evicting the elements the newcomer
    /// dominates. Returns whether the element was inserted.
    pub fn add(&mut self, item: Item, criteria: Criteria) -> bool {
        if self.dominates(&criteria) {
            return false;
        }
        self.elements
            .retain(|(_, element)| !criteria.dominates(element));
        self.elements.push((item, criteria));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Item, Criteria)> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // (arrival, transfers), lower is better on both
    impl Dominance for (u32, u32) {
        fn dominates(&self, other: &Self) -> bool {
            self.0 <= other.0 && self.1 <= other.1
        }
    }

    #[test]
    fn keeps_incomparable_drops_dominated() {
        let mut front = ParetoFront::new();
        assert!(front.add("slow direct", (100, 0)));
        assert!(front.add("fast with transfer", (50, 1)));
        assert_eq!(front.len(), 2);

        // dominated by "fast with transfer"
        assert!(!front.add("slower with transfer", (60, 1)));
        assert_eq!(front.len(), 2);

        // dominates both
        assert!(front.add("best", (40, 0)));
        assert_eq!(front.len(), 1);
    }

    #[test]
    fn equal_criteria_is_not_duplicated() {
        let mut front = ParetoFront::new();
        assert!(front.add("a", (10, 1)));
        assert!(!front.add("b", (10, 1)));
        assert_eq!(front.len(), 1);
    }
}
