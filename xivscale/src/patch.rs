use crate::record::{Character, DrawModel, Field};

/// Fields the mount and ornament scaling reads off the owner.
pub const SCALE_FIELDS: [Field; 3] = [Field::Race, Field::Tribe, Field::ObjectSex];
/// Fields the height calculation reads off the character.
pub const HEIGHT_FIELDS: [Field; 4] = [Field::Sex, Field::BodyType, Field::Tribe, Field::Height];
/// Minion placement only looks at the owner's race.
pub const MINION_FIELDS: [Field; 1] = [Field::Race];

/// Substituted fields on a character, restored when dropped.
///
/// Restoration happens in `Drop`, so it also runs while a panic or foreign
/// exception unwinds through the scope holding the patch.
#[must_use = "fields are restored as soon as the patch is dropped"]
pub struct FieldPatch<'a, C: Character + ?Sized, const N: usize> {
    record: &'a C,
    saved: Option<[(Field, u8); N]>,
}

impl<'a, C: Character + ?Sized, const N: usize> FieldPatch<'a, C, N> {
    /// Saves `fields` and overwrites them with `values`.
    ///
    /// With `values == None` nothing is read or written, and dropping the
    /// patch is a no-op.
    pub fn apply(record: &'a C, fields: &[Field; N], values: Option<[u8; N]>) -> Self {
        let saved = values.map(|values| {
            let saved = fields.map(|field| (field, record.read(field)));
            for (field, value) in fields.iter().zip(values) {
                record.write(*field, value);
            }
            saved
        });

        Self { record, saved }
    }

    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }
}

impl<C: Character + ?Sized, const N: usize> Drop for FieldPatch<'_, C, N> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            for (field, value) in saved {
                self.record.write(field, value);
            }
        }
    }
}

/// Values of `fields` taken from the character's draw object, if it is human.
pub fn model_values<C: Character + ?Sized, const N: usize>(
    record: &C,
    fields: &[Field; N],
) -> Option<[u8; N]> {
    record
        .model()
        .human_customize()
        .map(|customize| fields.map(|field| field.value_in(&customize)))
}

/// Runs `body` with `fields` on `record` set to `values`, then restores them.
pub fn with_patched_fields<C, R, const N: usize>(
    record: &C,
    fields: &[Field; N],
    values: Option<[u8; N]>,
    body: impl FnOnce() -> R,
) -> R
where
    C: Character + ?Sized,
{
    let _patch = FieldPatch::apply(record, fields, values);
    body()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        customize::Customize,
        record::{LocalCharacter, LocalModel},
    };
    use std::panic::{self, AssertUnwindSafe};

    fn hyur_midlander_male() -> Customize {
        Customize::from_hex("0100013201000000000000000000000000000000000000000000").unwrap()
    }

    #[test]
    fn restores_after_body() {
        let c = LocalCharacter::new(hyur_midlander_male(), LocalModel::NonHuman);

        let during = with_patched_fields(&c, &SCALE_FIELDS, Some([2, 3, 1]), || {
            (c.read(Field::Race), c.read(Field::Tribe), c.read(Field::ObjectSex))
        });

        assert_eq!(during, (2, 3, 1));
        assert_eq!(c.read(Field::Race), 1);
        assert_eq!(c.read(Field::Tribe), 1);
        assert_eq!(c.read(Field::ObjectSex), 0);
        assert_eq!(c.customize(), hyur_midlander_male());
    }

    #[test]
    fn none_writes_nothing() {
        let c = LocalCharacter::new(hyur_midlander_male(), LocalModel::NonHuman);

        let patch = FieldPatch::apply(&c, &HEIGHT_FIELDS, None);
        assert!(!patch.is_active());
        drop(patch);

        assert_eq!(c.writes(), 0);
    }

    #[test]
    fn restores_while_unwinding() {
        let c = LocalCharacter::new(hyur_midlander_male(), LocalModel::NonHuman);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            with_patched_fields(&c, &HEIGHT_FIELDS, Some([1, 2, 3, 99]), || {
                assert_eq!(c.read(Field::Height), 99);
                panic!("native call faulted");
            })
        }));

        assert!(result.is_err());
        assert_eq!(c.customize(), hyur_midlander_male());
    }

    #[test]
    fn model_values_follow_field_order() {
        let model = Customize::from_hex("0201050A030000000000000000000000000000000000000000000").ok();
        assert!(model.is_none(), "53 digits must be rejected");

        let model = Customize::from_hex("0201050A03000000000000000000000000000000000000000000").unwrap();
        let c = LocalCharacter::new(hyur_midlander_male(), LocalModel::Human(model));

        assert_eq!(model_values(&c, &SCALE_FIELDS), Some([2, 3, 1]));
        assert_eq!(model_values(&c, &HEIGHT_FIELDS), Some([1, 5, 3, 10]));
        assert_eq!(model_values(&c, &MINION_FIELDS), Some([2]));

        c.set_model(LocalModel::NonHuman);
        assert_eq!(model_values(&c, &HEIGHT_FIELDS), None);
    }
}
