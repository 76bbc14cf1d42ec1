//! The standard particle properties.
//!
//! Every emitter registers [`IS_ALIVE`], [`TIME_ALIVE`], [`POSITION_X`] and
//! [`POSITION_Y`]; the rest are registered lazily by the behaviors that
//! declare them. Renderers typically read `IS_ALIVE`, the position, the
//! current size and colour, the rotation and the texture section.

use crate::property::Property;
use crate::set::PropertySet;

/// Whether the slot holds a live particle.
pub const IS_ALIVE: Property<bool> = Property::new("IsAlive");
/// Seconds since the particle was emitted.
pub const TIME_ALIVE: Property<f32> = Property::new("TimeAlive");

/// World-space X position.
pub const POSITION_X: Property<f32> = Property::new("PositionX");
/// World-space Y position.
pub const POSITION_Y: Property<f32> = Property::new("PositionY");
/// X velocity in units per second.
pub const VELOCITY_X: Property<f32> = Property::new("VelocityX");
/// Y velocity in units per second.
pub const VELOCITY_Y: Property<f32> = Property::new("VelocityY");

/// Width at emission.
pub const INITIAL_WIDTH: Property<f32> = Property::new("InitialWidth");
/// Height at emission.
pub const INITIAL_HEIGHT: Property<f32> = Property::new("InitialHeight");
/// Width at the end of the particle's lifetime.
pub const ENDING_WIDTH: Property<f32> = Property::new("EndingWidth");
/// Height at the end of the particle's lifetime.
pub const ENDING_HEIGHT: Property<f32> = Property::new("EndingHeight");
/// Width to render this tick.
pub const CURRENT_WIDTH: Property<f32> = Property::new("CurrentWidth");
/// Height to render this tick.
pub const CURRENT_HEIGHT: Property<f32> = Property::new("CurrentHeight");

/// Red channel at emission.
pub const INITIAL_RED: Property<f32> = Property::new("InitialRed");
/// Green channel at emission.
pub const INITIAL_GREEN: Property<f32> = Property::new("InitialGreen");
/// Blue channel at emission.
pub const INITIAL_BLUE: Property<f32> = Property::new("InitialBlue");
/// Alpha channel at emission.
pub const INITIAL_ALPHA: Property<f32> = Property::new("InitialAlpha");
/// Red channel at end of life.
pub const ENDING_RED: Property<f32> = Property::new("EndingRed");
/// Green channel at end of life.
pub const ENDING_GREEN: Property<f32> = Property::new("EndingGreen");
/// Blue channel at end of life.
pub const ENDING_BLUE: Property<f32> = Property::new("EndingBlue");
/// Alpha channel at end of life.
pub const ENDING_ALPHA: Property<f32> = Property::new("EndingAlpha");
/// Red channel to render this tick.
pub const CURRENT_RED: Property<f32> = Property::new("CurrentRed");
/// Green channel to render this tick.
pub const CURRENT_GREEN: Property<f32> = Property::new("CurrentGreen");
/// Blue channel to render this tick.
pub const CURRENT_BLUE: Property<f32> = Property::new("CurrentBlue");
/// Alpha channel to render this tick.
pub const CURRENT_ALPHA: Property<f32> = Property::new("CurrentAlpha");

/// Rotation in radians.
pub const ROTATION_IN_RADIANS: Property<f32> = Property::new("RotationInRadians");
/// Angular velocity in radians per second.
pub const ROTATIONAL_VELOCITY_IN_RADIANS: Property<f32> =
    Property::new("RotationalVelocityInRadians");

/// Which section of a texture atlas to draw.
pub const TEXTURE_SECTION_INDEX: Property<i32> = Property::new("TextureSectionIndex");

/// Properties every emitter owns and maintains itself.
pub fn emitter_properties() -> PropertySet {
    PropertySet::empty()
        .with(IS_ALIVE)
        .with(TIME_ALIVE)
        .with(POSITION_X)
        .with(POSITION_Y)
}

/// Properties a renderer typically needs.
pub fn render_properties() -> PropertySet {
    PropertySet::empty()
        .with(IS_ALIVE)
        .with(POSITION_X)
        .with(POSITION_Y)
        .with(CURRENT_WIDTH)
        .with(CURRENT_HEIGHT)
        .with(CURRENT_RED)
        .with(CURRENT_GREEN)
        .with(CURRENT_BLUE)
        .with(CURRENT_ALPHA)
        .with(ROTATION_IN_RADIANS)
        .with(TEXTURE_SECTION_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitter_properties_are_the_lifecycle_and_position_columns() {
        let set = emitter_properties();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&IS_ALIVE.key()));
        assert!(set.contains(&TIME_ALIVE.key()));
        assert!(set.contains(&POSITION_X.key()));
        assert!(set.contains(&POSITION_Y.key()));
    }

    #[test]
    fn render_properties_include_alive_flag() {
        let set = render_properties();
        assert_eq!(set.len(), 11);
        assert!(set.contains(&IS_ALIVE.key()));
        assert!(set.contains(&TEXTURE_SECTION_INDEX.key()));
    }
}
