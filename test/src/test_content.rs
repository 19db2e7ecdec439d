use facade_shared::{
    ContentRegistryBuilder, IdentityRegistry, Identifier, StateId, SyntheticState,
};

/// Content fixture: air, stone and barrier built in, plus synthetic gem types
/// whose states all render as stone
pub struct TestContent {
    pub air: StateId,
    pub stone: StateId,
    pub barrier: StateId,
    /// Every synthetic state, in registration order
    pub synthetic: Vec<StateId>,
}

impl TestContent {
    /// `synthetic_types` synthetic types with two states each
    pub fn build(synthetic_types: usize) -> (Self, IdentityRegistry) {
        Self::build_with(synthetic_types, &["lit=false", "lit=true"])
    }

    /// `synthetic_states` synthetic types with a single state each
    pub fn with_synthetic_states(synthetic_states: usize) -> (Self, IdentityRegistry) {
        Self::build_with(synthetic_states, &[""])
    }

    fn build_with(synthetic_types: usize, properties: &[&str]) -> (Self, IdentityRegistry) {
        let mut builder = ContentRegistryBuilder::new();
        let mut builtin = |name: &str, label: &str| {
            builder
                .add_builtin(Identifier::new("minecraft", name), label, &[""])
                .expect("built-in content")
                .default_state()
        };
        let air = builtin("air", "Air");
        let stone = builtin("stone", "Stone");
        let barrier = builtin("barrier", "Barrier");
        builder.error_state(barrier);

        let mut synthetic = Vec::new();
        for index in 0..synthetic_types {
            let states = properties
                .iter()
                .map(|property| SyntheticState::new(property, stone))
                .collect();
            let content = builder
                .add_synthetic(
                    Identifier::new("gems", &format!("gem_{}", index)),
                    &format!("Gem {}", index),
                    states,
                )
                .expect("synthetic content");
            synthetic.extend(content.states);
        }

        let registry = IdentityRegistry::new(builder.build().expect("registry"));
        (
            Self {
                air,
                stone,
                barrier,
                synthetic,
            },
            registry,
        )
    }
}
