use strata::{EntityId, World};

#[derive(Clone, Copy, Debug, Default)]
pub struct Wealth {
    pub value: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Productivity {
    pub rate: f32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Tagged {
    pub group: u32,
}

pub const AGENTS_SMALL: usize = 1_000;
pub const AGENTS_MED: usize = 50_000;

pub fn make_world() -> World {
    let mut world = World::new();
    world.register_component::<Wealth>();
    world.register_component::<Productivity>();
    world.register_component::<Tagged>();
    world
}

pub fn populate(world: &mut World, count: usize) -> Vec<EntityId> {
    let mut entities = Vec::with_capacity(count);
    for i in 0..count {
        let entity = world.create_entity();
        world
            .add_component(
                entity,
                Wealth {
                    value: i as f32 * 0.5,
                },
            )
            .unwrap();
        world
            .add_component(
                entity,
                Productivity {
                    rate: 1.0 + (i % 7) as f32,
                },
            )
            .unwrap();
        entities.push(entity);
    }
    entities
}
