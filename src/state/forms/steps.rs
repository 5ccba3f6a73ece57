//! Step definitions and forward-gated step navigation

use super::field_store::FieldStore;
use super::validation::{validate, Rule, ValidationResult};

/// One page of a wizard
#[derive(Debug, Clone)]
pub struct StepSchema {
    pub label: &'static str,
    /// Field keys shown on this step, in render order
    pub fields: Vec<&'static str>,
    pub rules: Vec<Rule>,
}

impl StepSchema {
    pub fn new(label: &'static str, fields: Vec<&'static str>, rules: Vec<Rule>) -> Self {
        Self {
            label,
            fields,
            rules,
        }
    }

    pub fn validate(&self, store: &FieldStore) -> ValidationResult {
        validate(&self.rules, store)
    }
}

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    /// Validation failed on step `at`; the index did not change past it
    Blocked { at: usize, errors: ValidationResult },
    Unchanged,
}

/// Holds the active step index; always within `0..count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepController {
    current: usize,
    count: usize,
}

impl StepController {
    pub fn new(count: usize) -> Self {
        Self {
            current: 0,
            count: count.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_current(&self, index: usize) -> bool {
        index == self.current
    }

    pub fn is_completed(&self, index: usize) -> bool {
        index < self.current
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.count
    }

    /// Advance one step if the current step validates; clamped to the last step
    pub fn next(&mut self, steps: &[StepSchema], store: &FieldStore) -> Transition {
        let from = self.current;
        let errors = steps
            .get(from)
            .map(|s| s.validate(store))
            .unwrap_or_default();
        if !errors.is_valid() {
            tracing::debug!(step = from, failing = errors.len(), "forward move blocked");
            return Transition::Blocked { at: from, errors };
        }
        if self.is_last() {
            return Transition::Unchanged;
        }
        self.current += 1;
        Transition::Moved {
            from,
            to: self.current,
        }
    }

    /// Retreat one step without validating; clamped to 0
    pub fn back(&mut self) -> Transition {
        if self.current == 0 {
            return Transition::Unchanged;
        }
        let from = self.current;
        self.current -= 1;
        Transition::Moved {
            from,
            to: self.current,
        }
    }

    /// Move to `index`. Backward jumps always succeed; forward jumps validate
    /// every step on the way and stop at the first one that fails.
    pub fn jump_to(&mut self, index: usize, steps: &[StepSchema], store: &FieldStore) -> Transition {
        let target = index.min(self.count - 1);
        let from = self.current;
        if target == from {
            return Transition::Unchanged;
        }
        if target < from {
            self.current = target;
            return Transition::Moved { from, to: target };
        }
        while self.current < target {
            // Partial progress is kept; the caller sees the step that blocked
            if let blocked @ Transition::Blocked { .. } = self.next(steps, store) {
                return blocked;
            }
        }
        Transition::Moved {
            from,
            to: self.current,
        }
    }

    /// Return to the first step
    pub fn restart(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::FormField;
    use pretty_assertions::assert_eq;

    fn store() -> FieldStore {
        FieldStore::new(vec![
            FormField::text("a", "A"),
            FormField::text("b", "B"),
            FormField::text("c", "C"),
        ])
    }

    fn required(key: &'static str) -> Rule {
        Rule::Required {
            key,
            message: "required",
        }
    }

    fn steps() -> Vec<StepSchema> {
        vec![
            StepSchema::new("One", vec!["a"], vec![required("a")]),
            StepSchema::new("Two", vec!["b"], vec![required("b")]),
            StepSchema::new("Three", vec!["c"], vec![required("c")]),
            StepSchema::new("Done", vec![], vec![]),
        ]
    }

    #[test]
    fn test_starts_at_zero() {
        let controller = StepController::new(4);
        assert_eq!(controller.current(), 0);
        assert!(controller.is_current(0));
        assert!(!controller.is_completed(0));
    }

    #[test]
    fn test_next_blocked_when_invalid() {
        let mut controller = StepController::new(4);
        let transition = controller.next(&steps(), &store());
        assert!(matches!(transition, Transition::Blocked { at: 0, .. }));
        assert_eq!(controller.current(), 0);
    }

    #[test]
    fn test_next_advances_when_valid() {
        let mut controller = StepController::new(4);
        let mut store = store();
        store.set_text("a", "x");
        assert_eq!(
            controller.next(&steps(), &store),
            Transition::Moved { from: 0, to: 1 }
        );
        assert!(controller.is_completed(0));
    }

    #[test]
    fn test_next_on_last_step_is_unchanged() {
        let mut controller = StepController::new(1);
        let steps = vec![StepSchema::new("Only", vec![], vec![])];
        assert_eq!(controller.next(&steps, &store()), Transition::Unchanged);
        assert_eq!(controller.current(), 0);
    }

    #[test]
    fn test_back_never_validates_and_clamps() {
        let mut controller = StepController::new(4);
        let mut store = store();
        store.set_text("a", "x");
        controller.next(&steps(), &store);
        store.set_text("a", "");
        assert_eq!(controller.back(), Transition::Moved { from: 1, to: 0 });
        assert_eq!(controller.back(), Transition::Unchanged);
        assert_eq!(controller.current(), 0);
    }

    #[test]
    fn test_jump_backward_matches_repeated_back() {
        let mut store = store();
        store.set_text("a", "x");
        store.set_text("b", "y");
        store.set_text("c", "z");

        let mut jumped = StepController::new(4);
        jumped.jump_to(3, &steps(), &store);
        let mut stepped = jumped;

        store.set_text("a", "");
        jumped.jump_to(1, &steps(), &store);
        stepped.back();
        stepped.back();
        assert_eq!(jumped, stepped);
        assert_eq!(jumped.current(), 1);
    }

    #[test]
    fn test_jump_forward_stops_at_first_failing_step() {
        let mut controller = StepController::new(4);
        let mut store = store();
        store.set_text("a", "x");
        let transition = controller.jump_to(3, &steps(), &store);
        assert!(matches!(transition, Transition::Blocked { at: 1, .. }));
        assert_eq!(controller.current(), 1);
    }

    #[test]
    fn test_jump_forward_reaches_target_when_all_valid() {
        let mut controller = StepController::new(4);
        let mut store = store();
        store.set_text("a", "x");
        store.set_text("b", "y");
        store.set_text("c", "z");
        assert_eq!(
            controller.jump_to(3, &steps(), &store),
            Transition::Moved { from: 0, to: 3 }
        );
    }

    #[test]
    fn test_jump_clamps_to_last_index() {
        let mut controller = StepController::new(4);
        let mut store = store();
        store.set_text("a", "x");
        store.set_text("b", "y");
        store.set_text("c", "z");
        controller.jump_to(99, &steps(), &store);
        assert_eq!(controller.current(), 3);
        assert!(controller.is_last());
    }
}
