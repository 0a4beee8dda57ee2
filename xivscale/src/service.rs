use crate::{
    config::ScalingConfig,
    error::InteropError,
    hook::{AddressResolver, Hook, HookTarget, Interception, Interceptor},
    layout::{companion_owner, Layout},
    record::ObjectModel,
    scaling,
};
use log::{info, warn};
use std::{error::Error, ffi::c_void};

pub type SetupMountFn = unsafe extern "C-unwind" fn(*mut c_void, i16, u32, u32, u32, u8);
pub type SetupOrnamentFn = unsafe extern "C-unwind" fn(*mut c_void, *mut u32, *mut f32);
pub type PlaceMinionFn = unsafe extern "C-unwind" fn(*mut c_void);
pub type CalculateHeightFn = unsafe extern "C-unwind" fn(*mut c_void) -> f32;

pub const SETUP_MOUNT: HookTarget = HookTarget::MemberFunction("MountContainer.SetupMount");
pub const CALCULATE_HEIGHT: HookTarget = HookTarget::MemberFunction("Character.CalculateHeight");

/// Entry points the host redirects the native functions to.
///
/// Each one is expected to forward its arguments to the matching method of
/// the live [`ScalingService`].
#[derive(Clone, Copy)]
pub struct Detours {
    pub setup_mount: SetupMountFn,
    pub setup_ornament: SetupOrnamentFn,
    pub place_minion: PlaceMinionFn,
    pub calculate_height: CalculateHeightFn,
}

/// Owns the four scaling hooks.
///
/// All hooks are installed and enabled by [`ScalingService::new`] and disabled
/// and released together when the service is dropped.
pub struct ScalingService<M: ObjectModel, I: Interception> {
    objects: M,
    layout: Layout,
    setup_mount: Hook<SetupMountFn, I>,
    setup_ornament: Hook<SetupOrnamentFn, I>,
    place_minion: Hook<PlaceMinionFn, I>,
    calculate_height: Hook<CalculateHeightFn, I>,
}

impl<M: ObjectModel, I: Interception> ScalingService<M, I> {
    /// Installs and enables all four hooks, or none of them.
    ///
    /// # Safety
    /// Each detour must have the signature of the native function it replaces,
    /// and `objects` must describe the running client.
    pub unsafe fn new<T>(
        interceptor: &T,
        resolver: &impl AddressResolver,
        config: &ScalingConfig,
        objects: M,
        detours: Detours,
    ) -> Result<Self, InteropError>
    where
        T: Interceptor<Interception = I>,
    {
        let layout = config.layout()?.clone();
        let ornament = HookTarget::Signature(config.signatures.setup_ornament.clone());
        let minion = HookTarget::Signature(config.signatures.place_minion.clone());

        let setup_mount = Hook::install(
            interceptor,
            "SetupMount",
            SETUP_MOUNT.resolve("SetupMount", resolver)?,
            detours.setup_mount,
        )?;
        let setup_ornament = Hook::install(
            interceptor,
            "SetupOrnament",
            ornament.resolve("SetupOrnament", resolver)?,
            detours.setup_ornament,
        )?;
        let place_minion = Hook::install(
            interceptor,
            "PlaceMinion",
            minion.resolve("PlaceMinion", resolver)?,
            detours.place_minion,
        )?;
        let calculate_height = Hook::install(
            interceptor,
            "CalculateHeight",
            CALCULATE_HEIGHT.resolve("CalculateHeight", resolver)?,
            detours.calculate_height,
        )?;

        let service = Self {
            objects,
            layout,
            setup_mount,
            setup_ornament,
            place_minion,
            calculate_height,
        };

        // On failure `service` is dropped here, which disables whatever was enabled.
        service.setup_mount.enable()?;
        service.setup_ornament.enable()?;
        service.place_minion.enable()?;
        service.calculate_height.enable()?;

        info!("Scaling hooks enabled for game version {}", service.layout.game_version);
        Ok(service)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn objects(&self) -> &M {
        &self.objects
    }

    /// # Safety
    /// Must only be called from the `SetupMount` detour with its native arguments.
    pub unsafe fn setup_mount(&self, container: *mut c_void, mount_id: i16, unk1: u32, unk2: u32, unk3: u32, unk4: u8) {
        let original = self.setup_mount.original();
        let owner = self.objects.mount_owner(container);

        scaling::on_setup_mount(owner.as_ref(), || original(container, mount_id, unk1, unk2, unk3, unk4))
    }

    /// # Safety
    /// Must only be called from the `SetupOrnament` detour with its native arguments.
    pub unsafe fn setup_ornament(&self, ornament: *mut c_void, unk1: *mut u32, unk2: *mut f32) {
        let original = self.setup_ornament.original();
        let parent = self.objects.ornament_parent(ornament);

        scaling::on_setup_ornament(parent.as_ref(), || original(ornament, unk1, unk2))
    }

    /// # Safety
    /// Must only be called from the `PlaceMinion` detour with its native arguments.
    pub unsafe fn place_minion(&self, companion: *mut c_void) {
        let original = self.place_minion.original();
        let owner = self.objects.character_at(companion_owner(companion, &self.layout));

        scaling::on_place_minion(owner.as_ref(), || original(companion))
    }

    /// # Safety
    /// Must only be called from the `CalculateHeight` detour with its native arguments.
    pub unsafe fn calculate_height(&self, character: *mut c_void) -> f32 {
        let original = self.calculate_height.original();
        let target = self.objects.character_at(character as usize);

        scaling::on_calculate_height(target.as_ref(), || original(character))
    }
}

impl<M: ObjectModel, I: Interception> Drop for ScalingService<M, I> {
    fn drop(&mut self) {
        for result in [
            self.calculate_height.disable(),
            self.place_minion.disable(),
            self.setup_ornament.disable(),
            self.setup_mount.disable(),
        ] {
            if let Err(e) = result {
                warn!("{e}: {}", e.source().map(ToString::to_string).unwrap_or_default());
            }
        }
        info!("Scaling hooks disposed");
    }
}
