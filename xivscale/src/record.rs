//! Accessor contracts for the game records touched around the scaling hooks.
//!
//! The records live in game memory and are shared with the engine, so writes
//! go through `&self`.

use crate::customize::{Customize, CustomizeIndex};
use std::{cell::Cell, ffi::c_void};

/// A single byte on a character record that the scaling hooks may substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Race,
    Tribe,
    /// Customize gender, read by the height calculation.
    Sex,
    BodyType,
    Height,
    /// Game object gender, read by mount and ornament scaling through a vfunc.
    ObjectSex,
}

impl Field {
    /// The value a human draw object would contribute for this field.
    pub fn value_in(self, customize: &Customize) -> u8 {
        match self {
            Self::Race => customize.race(),
            Self::Tribe => customize.tribe(),
            Self::Sex | Self::ObjectSex => customize.sex(),
            Self::BodyType => customize.body_type(),
            Self::Height => customize.height(),
        }
    }

    fn customize_index(self) -> Option<CustomizeIndex> {
        match self {
            Self::Race => Some(CustomizeIndex::Race),
            Self::Tribe => Some(CustomizeIndex::Clan),
            Self::Sex => Some(CustomizeIndex::Gender),
            Self::BodyType => Some(CustomizeIndex::BodyType),
            Self::Height => Some(CustomizeIndex::Height),
            Self::ObjectSex => None,
        }
    }
}

/// What the draw object of a character currently renders as.
pub trait DrawModel {
    /// Customize block of a human model; `None` for monsters, mounts and other shapes.
    fn human_customize(&self) -> Option<Customize>;

    fn is_human(&self) -> bool {
        self.human_customize().is_some()
    }
}

pub trait Character {
    type Model: DrawModel;

    fn read(&self, field: Field) -> u8;
    fn write(&self, field: Field, value: u8);
    fn model(&self) -> Self::Model;
}

impl<C: Character + ?Sized> Character for &C {
    type Model = C::Model;

    fn read(&self, field: Field) -> u8 {
        (**self).read(field)
    }

    fn write(&self, field: Field, value: u8) {
        (**self).write(field, value)
    }

    fn model(&self) -> Self::Model {
        (**self).model()
    }
}

/// Resolves native record pointers into characters.
///
/// Provided by the host's object model; every method must tolerate null and
/// stale pointers by returning `None`.
pub trait ObjectModel {
    type Character: Character;

    /// # Safety
    /// `container` must be null or point to a live mount container.
    unsafe fn mount_owner(&self, container: *mut c_void) -> Option<Self::Character>;

    /// # Safety
    /// `ornament` must be null or point to a live ornament.
    unsafe fn ornament_parent(&self, ornament: *mut c_void) -> Option<Self::Character>;

    /// Returns the character at `address` when the game object there is a character.
    ///
    /// # Safety
    /// `address` must be zero or the address of a game object.
    unsafe fn character_at(&self, address: usize) -> Option<Self::Character>;
}

/// In-process draw object, used by tooling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalModel {
    Human(Customize),
    NonHuman,
}

impl DrawModel for LocalModel {
    fn human_customize(&self) -> Option<Customize> {
        match self {
            Self::Human(customize) => Some(*customize),
            Self::NonHuman => None,
        }
    }
}

/// In-process character record, used by tooling and tests.
///
/// Counts every write so callers can tell a skipped substitution from one
/// that wrote back identical values.
#[derive(Debug)]
pub struct LocalCharacter {
    customize: Cell<Customize>,
    object_sex: Cell<u8>,
    model: Cell<LocalModel>,
    writes: Cell<usize>,
}

impl LocalCharacter {
    pub fn new(customize: Customize, model: LocalModel) -> Self {
        Self {
            customize: Cell::new(customize),
            object_sex: Cell::new(customize.sex()),
            model: Cell::new(model),
            writes: Cell::new(0),
        }
    }

    pub fn customize(&self) -> Customize {
        self.customize.get()
    }

    pub fn set_model(&self, model: LocalModel) {
        self.model.set(model);
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Character for LocalCharacter {
    type Model = LocalModel;

    fn read(&self, field: Field) -> u8 {
        match field.customize_index() {
            Some(index) => self.customize.get().get(index),
            None => self.object_sex.get(),
        }
    }

    fn write(&self, field: Field, value: u8) {
        self.writes.set(self.writes.get() + 1);
        match field.customize_index() {
            Some(index) => {
                let mut customize = self.customize.get();
                customize.set(index, value);
                self.customize.set(customize);
            }
            None => self.object_sex.set(value),
        }
    }

    fn model(&self) -> LocalModel {
        self.model.get()
    }
}
