//! Precomputed per-behavior access sets.
//!
//! [`AccessPlan::build`] runs once at emitter construction. It snapshots
//! every behavior's declared read and write sets so the per-tick path never
//! calls `reads()` / `writes()` or builds a set, and it yields the union of
//! all declared properties for lazy registration with the allocator.

use flare_core::standard::emitter_properties;
use flare_core::PropertySet;

use crate::behavior::{Initializer, Modifier};

/// Declared access of one behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BehaviorAccess {
    name: String,
    reads: PropertySet,
    writes: PropertySet,
}

impl BehaviorAccess {
    /// Name of the behavior this access belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties the behavior may read.
    pub fn reads(&self) -> &PropertySet {
        &self.reads
    }

    /// Properties the behavior may write.
    pub fn writes(&self) -> &PropertySet {
        &self.writes
    }
}

/// Access sets for an emitter's initializers and modifiers, in pipeline
/// order.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct AccessPlan {
    initializers: Vec<BehaviorAccess>,
    modifiers: Vec<BehaviorAccess>,
    properties: PropertySet,
}

impl AccessPlan {
    /// Snapshot the declarations of `initializers` and `modifiers`.
    ///
    /// Initializers get an empty read set. The property union always
    /// includes the emitter's own bookkeeping properties.
    pub fn build(initializers: &[Box<dyn Initializer>], modifiers: &[Box<dyn Modifier>]) -> Self {
        let mut properties = emitter_properties();

        let initializers: Vec<BehaviorAccess> = initializers
            .iter()
            .map(|init| BehaviorAccess {
                name: init.name().to_string(),
                reads: PropertySet::empty(),
                writes: init.writes(),
            })
            .collect();

        let modifiers: Vec<BehaviorAccess> = modifiers
            .iter()
            .map(|modifier| BehaviorAccess {
                name: modifier.name().to_string(),
                reads: modifier.reads(),
                writes: modifier.writes(),
            })
            .collect();

        for access in initializers.iter().chain(&modifiers) {
            properties.extend(access.reads.iter().copied());
            properties.extend(access.writes.iter().copied());
        }

        Self {
            initializers,
            modifiers,
            properties,
        }
    }

    /// Access of the initializer at `index`.
    pub fn initializer(&self, index: usize) -> Option<&BehaviorAccess> {
        self.initializers.get(index)
    }

    /// Access of the modifier at `index`.
    pub fn modifier(&self, index: usize) -> Option<&BehaviorAccess> {
        self.modifiers.get(index)
    }

    /// All initializer accesses, in order.
    pub fn initializers(&self) -> &[BehaviorAccess] {
        &self.initializers
    }

    /// All modifier accesses, in order.
    pub fn modifiers(&self) -> &[BehaviorAccess] {
        &self.modifiers
    }

    /// Every property any behavior or the emitter touches.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::collection::Collection;
    use crate::error::BehaviorError;
    use crate::state::EmitterState;
    use flare_core::standard::{
        CURRENT_WIDTH, INITIAL_WIDTH, IS_ALIVE, POSITION_X, TIME_ALIVE, VELOCITY_X,
    };

    #[derive(Clone, Debug)]
    struct WritesWidth;

    impl Behavior for WritesWidth {
        fn name(&self) -> &str {
            "writes_width"
        }
    }

    impl Initializer for WritesWidth {
        fn writes(&self) -> PropertySet {
            PropertySet::empty().with(INITIAL_WIDTH)
        }
        fn initialize(
            &mut self,
            _emitter: &EmitterState,
            _particles: &Collection<'_>,
            _new_indices: &[usize],
        ) -> Result<(), BehaviorError> {
            Ok(())
        }
        fn clone_initializer(&self) -> Box<dyn Initializer> {
            Box::new(self.clone())
        }
    }

    #[derive(Clone, Debug)]
    struct Moves;

    impl Behavior for Moves {
        fn name(&self) -> &str {
            "moves"
        }
    }

    impl Modifier for Moves {
        fn reads(&self) -> PropertySet {
            PropertySet::empty().with(VELOCITY_X).with(INITIAL_WIDTH)
        }
        fn writes(&self) -> PropertySet {
            PropertySet::empty().with(POSITION_X).with(CURRENT_WIDTH)
        }
        fn update(
            &mut self,
            _emitter: &EmitterState,
            _particles: &Collection<'_>,
            _dt: f32,
        ) -> Result<(), BehaviorError> {
            Ok(())
        }
        fn clone_modifier(&self) -> Box<dyn Modifier> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn empty_plan_still_covers_emitter_properties() {
        let plan = AccessPlan::build(&[], &[]);
        assert!(plan.initializers().is_empty());
        assert!(plan.modifiers().is_empty());
        assert!(plan.properties().contains(&IS_ALIVE.key()));
        assert!(plan.properties().contains(&TIME_ALIVE.key()));
    }

    #[test]
    fn snapshots_declarations_in_order() {
        let inits: Vec<Box<dyn Initializer>> = vec![Box::new(WritesWidth)];
        let mods: Vec<Box<dyn Modifier>> = vec![Box::new(Moves)];
        let plan = AccessPlan::build(&inits, &mods);

        let init = plan.initializer(0).unwrap();
        assert_eq!(init.name(), "writes_width");
        assert!(init.reads().is_empty());
        assert_eq!(init.writes(), &PropertySet::empty().with(INITIAL_WIDTH));

        let modifier = plan.modifier(0).unwrap();
        assert_eq!(modifier.reads().len(), 2);
        assert!(modifier.writes().contains(&CURRENT_WIDTH.key()));
        assert!(plan.modifier(1).is_none());
    }

    #[test]
    fn property_union_has_no_duplicates() {
        let inits: Vec<Box<dyn Initializer>> = vec![Box::new(WritesWidth), Box::new(WritesWidth)];
        let mods: Vec<Box<dyn Modifier>> = vec![Box::new(Moves)];
        let plan = AccessPlan::build(&inits, &mods);
        let expected = emitter_properties()
            .with(INITIAL_WIDTH)
            .with(VELOCITY_X)
            .with(POSITION_X)
            .with(CURRENT_WIDTH);
        assert_eq!(plan.properties().len(), expected.len());
        assert!(expected.is_subset(plan.properties()));
    }
}
