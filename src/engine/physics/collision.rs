use rapier2d::prelude::*;

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Simulated characters
    Character = 0b0000_0001,

    /// Static floors, platforms and walls
    Terrain = 0b0000_0010,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Characters pass through each other; contact between them is a
            // combat concern, not a physical one
            CollisionGroups::Character => Group::from_bits_truncate(CollisionGroups::Terrain as u32),

            CollisionGroups::Terrain => Group::from_bits_truncate(
                CollisionGroups::Character as u32 | CollisionGroups::Terrain as u32,
            ),
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Ray-cast filter that only reports terrain
    pub fn terrain_probe() -> InteractionGroups {
        InteractionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(CollisionGroups::Terrain as u32),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_doesnt_collide_with_character() {
        let groups = CollisionGroups::Character.to_interaction_groups();
        assert!(!groups.filter.contains(groups.memberships));
    }

    #[test]
    fn test_character_collides_with_terrain() {
        let character = CollisionGroups::Character.to_interaction_groups();
        let terrain = CollisionGroups::Terrain.to_interaction_groups();
        assert!(character.test(terrain));
    }

    #[test]
    fn test_probe_ignores_characters() {
        let probe = CollisionGroups::terrain_probe();
        let character = CollisionGroups::Character.to_interaction_groups();
        let terrain = CollisionGroups::Terrain.to_interaction_groups();
        assert!(!probe.test(character));
        assert!(probe.test(terrain));
    }
}
