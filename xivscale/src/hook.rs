//! Typed wrappers over the host's function interception.
//!
//! The host redirects a native function to a detour and hands back a
//! trampoline that still runs the original code. Everything here only
//! deals in addresses; the hooking itself belongs to the host.

use crate::error::InteropError;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

lazy_static! {
    static ref SIGNATURE_REGEX: Regex =
        Regex::new(r"^(?:[0-9A-Fa-f]{2}|\?\?)(?: (?:[0-9A-Fa-f]{2}|\?\?))*$").unwrap();
}

/// Byte pattern locating a function in the game's text section, `??` matching any byte.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(Box<str>);

impl Signature {
    pub fn parse(signature: impl AsRef<str>) -> Result<Self, InteropError> {
        let signature = signature.as_ref().trim();
        if SIGNATURE_REGEX.is_match(signature) {
            Ok(Self(signature.into()))
        } else {
            Err(InteropError::SignatureFormat(signature.into()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes of the pattern, `None` for wildcards.
    pub fn pattern(&self) -> Vec<Option<u8>> {
        self.0
            .split(' ')
            .map(|byte| u8::from_str_radix(byte, 16).ok())
            .collect()
    }
}

impl TryFrom<String> for Signature {
    type Error = InteropError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.0.into()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Signature({})", self.0))
    }
}

/// Where a hooked function lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookTarget {
    /// Member function exported by the host object model, e.g. `Character.CalculateHeight`.
    MemberFunction(&'static str),
    Signature(Signature),
}

/// Address lookup provided by the host.
pub trait AddressResolver {
    fn member_function(&self, name: &str) -> Option<usize>;
    fn scan_text(&self, signature: &Signature) -> Option<usize>;
}

impl HookTarget {
    pub fn resolve(&self, name: &'static str, resolver: &impl AddressResolver) -> Result<usize, InteropError> {
        let address = match self {
            Self::MemberFunction(member) => resolver.member_function(member),
            Self::Signature(signature) => resolver.scan_text(signature),
        }
        .ok_or(InteropError::SignatureNotFound(name))?;

        if address == 0 {
            return Err(InteropError::NullAddress(name));
        }
        Ok(address)
    }
}

/// One installed redirect. Dropping it releases the redirect.
pub trait Interception {
    type Error: Error + Send + Sync + 'static;

    fn enable(&self) -> Result<(), Self::Error>;
    fn disable(&self) -> Result<(), Self::Error>;
    /// Address that runs the original code of the target.
    fn trampoline(&self) -> usize;
}

pub trait Interceptor {
    type Interception: Interception;
    type Error: Error + Send + Sync + 'static;

    /// Redirects `target` to `detour`. The redirect starts out disabled.
    ///
    /// # Safety
    /// `target` and `detour` must be functions of the same signature and ABI.
    unsafe fn install(&self, target: usize, detour: usize) -> Result<Self::Interception, Self::Error>;
}

/// Native function pointer that can round-trip through an address.
pub trait NativeFn: Copy {
    fn address(self) -> usize;

    /// # Safety
    /// `address` must point to a function with this exact signature and ABI.
    unsafe fn from_address(address: usize) -> Self;
}

macro_rules! impl_native_fn {
    ($($arg:ident),*) => {
        impl<Ret, $($arg),*> NativeFn for unsafe extern "C-unwind" fn($($arg),*) -> Ret {
            fn address(self) -> usize {
                self as usize
            }

            unsafe fn from_address(address: usize) -> Self {
                std::mem::transmute_copy::<usize, Self>(&address)
            }
        }
    };
}

impl_native_fn!(A);
impl_native_fn!(A, B);
impl_native_fn!(A, B, C);
impl_native_fn!(A, B, C, D);
impl_native_fn!(A, B, C, D, E);
impl_native_fn!(A, B, C, D, E, G);

/// An installed redirect together with a typed pointer to the original function.
pub struct Hook<F: NativeFn, I: Interception> {
    name: &'static str,
    interception: I,
    original: F,
}

impl<F: NativeFn, I: Interception> Hook<F, I> {
    /// # Safety
    /// `target` must point to a function of type `F`.
    pub unsafe fn install<T>(interceptor: &T, name: &'static str, target: usize, detour: F) -> Result<Self, InteropError>
    where
        T: Interceptor<Interception = I>,
    {
        let interception = interceptor
            .install(target, detour.address())
            .map_err(|e| InteropError::HookInstall { name, source: Box::new(e) })?;
        let original = F::from_address(interception.trampoline());
        debug!("Installed hook for {name} at {target:#x}");

        Ok(Self { name, interception, original })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn original(&self) -> F {
        self.original
    }

    pub fn enable(&self) -> Result<(), InteropError> {
        self.interception
            .enable()
            .map_err(|e| InteropError::HookEnable { name: self.name, source: Box::new(e) })
    }

    pub fn disable(&self) -> Result<(), InteropError> {
        self.interception
            .disable()
            .map_err(|e| InteropError::HookDisable { name: self.name, source: Box::new(e) })
    }
}

impl<F: NativeFn, I: Interception> fmt::Debug for Hook<F, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Hook({} -> {:#x})", self.name, self.original.address()))
    }
}
