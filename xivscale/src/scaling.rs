//! Customize substitution around the native functions that derive scale and
//! height from a character record instead of its draw object.
//!
//! Each operation takes the already resolved character (or `None` when there
//! is none) and a closure running the original native function. The closure is
//! called exactly once, and any substituted field is back to its prior value
//! by the time the operation returns or unwinds.

use crate::{
    customize::{Race, Tribe},
    patch::{model_values, with_patched_fields, HEIGHT_FIELDS, MINION_FIELDS, SCALE_FIELDS},
    record::{Character, Field},
};
use log::{log_enabled, trace, Level};

fn trace_identity<C: Character + ?Sized>(entry: &str, character: &C, values: Option<&[u8]>) {
    if !log_enabled!(Level::Trace) {
        return;
    }
    match values {
        Some(values) => trace!(
            "{entry}: {}/{} -> {:?}",
            Race::from_raw(character.read(Field::Race)),
            Tribe::from_raw(character.read(Field::Tribe)),
            values
        ),
        None => trace!("{entry}: draw object is not human, leaving customize untouched"),
    }
}

fn scale_patched<C, R>(entry: &str, owner: Option<&C>, original: impl FnOnce() -> R) -> R
where
    C: Character + ?Sized,
{
    let Some(owner) = owner else {
        trace!("{entry}: no owner, calling original");
        return original();
    };

    let values = model_values(owner, &SCALE_FIELDS);
    trace_identity(entry, owner, values.as_ref().map(|v| &v[..]));

    with_patched_fields(owner, &SCALE_FIELDS, values, original)
}

/// Mount setup scales the mount by the rider's race, tribe and gender.
pub fn on_setup_mount<C, R>(owner: Option<&C>, original: impl FnOnce() -> R) -> R
where
    C: Character + ?Sized,
{
    scale_patched("SetupMount", owner, original)
}

/// Ornament setup scales the ornament by its parent's race, tribe and gender.
pub fn on_setup_ornament<C, R>(parent: Option<&C>, original: impl FnOnce() -> R) -> R
where
    C: Character + ?Sized,
{
    scale_patched("SetupOrnament", parent, original)
}

/// Minion placement only depends on the owner's race.
pub fn on_place_minion<C, R>(owner: Option<&C>, original: impl FnOnce() -> R) -> R
where
    C: Character + ?Sized,
{
    let Some(owner) = owner else {
        trace!("PlaceMinion: owner is not a character, calling original");
        return original();
    };

    let values = model_values(owner, &MINION_FIELDS);
    trace_identity("PlaceMinion", owner, values.as_ref().map(|v| &v[..]));

    with_patched_fields(owner, &MINION_FIELDS, values, original)
}

pub fn on_calculate_height<C>(character: Option<&C>, original: impl FnOnce() -> f32) -> f32
where
    C: Character + ?Sized,
{
    let Some(character) = character else {
        return original();
    };

    let values = model_values(character, &HEIGHT_FIELDS);
    trace_identity("CalculateHeight", character, values.as_ref().map(|v| &v[..]));

    with_patched_fields(character, &HEIGHT_FIELDS, values, original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        customize::Customize,
        record::{LocalCharacter, LocalModel},
    };
    use std::cell::Cell;

    fn customize(race: u8, sex: u8, body_type: u8, height: u8, tribe: u8) -> Customize {
        let mut data = [0u8; 26];
        data[..5].copy_from_slice(&[race, sex, body_type, height, tribe]);
        Customize::new(data)
    }

    #[test]
    fn mount_without_owner_calls_original() {
        let calls = Cell::new(0);
        on_setup_mount::<LocalCharacter, _>(None, || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn height_returns_original_value() {
        let c = LocalCharacter::new(
            customize(1, 0, 1, 50, 1),
            LocalModel::Human(customize(3, 1, 1, 100, 6)),
        );

        let height = on_calculate_height(Some(&c), || {
            assert_eq!(c.read(Field::Tribe), 6);
            assert_eq!(c.read(Field::Height), 100);
            assert_eq!(c.read(Field::Race), 1, "race is not part of the height set");
            0.87
        });

        assert_eq!(height, 0.87);
        assert_eq!(c.customize(), customize(1, 0, 1, 50, 1));
    }

    #[test]
    fn height_without_character_calls_original() {
        assert_eq!(on_calculate_height::<LocalCharacter>(None, || 1.5), 1.5);
    }
}
