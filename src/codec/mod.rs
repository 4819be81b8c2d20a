//! Codec abstraction and the character string family codecs.
mod text;
mod enums;

pub use text::TextCodec;
pub use enums::EnumCodec;

use crate::{
    encode::{Encode, EncodePlan},
    postgres::FormatCode,
    scan::{ScanPlan, ScanTarget},
};

/// Conversion strategy resolution for one postgres type family.
///
/// A codec maps the concrete shape of a native value to a reusable
/// [`EncodePlan`], and the concrete shape of a destination to a
/// [`ScanPlan`]. Returning [`None`] from either factory is not an error,
/// it only means the shape is unsupported; whether that is fatal, or
/// another codec should be tried, is the caller's decision.
pub trait Codec {
    /// Return `true` if the codec can convert in `format`.
    fn format_supported(&self, format: FormatCode) -> bool;

    /// Format the codec prefers when the caller has a choice.
    fn preferred_format(&self) -> FormatCode;

    /// Resolve an encode plan for the shape of `value`.
    ///
    /// Codecs that transmit identical bytes in both formats ignore `format`.
    fn resolve_encode(&self, format: FormatCode, value: &dyn Encode)
        -> Option<Box<dyn EncodePlan>>;

    /// Resolve a scan plan for the shape of `target`.
    fn resolve_scan(&self, format: FormatCode, target: &mut dyn ScanTarget)
        -> Option<Box<dyn ScanPlan>>;
}

/// Recover the concrete shape a plan was resolved with.
pub(crate) fn downcast_ref<T: 'static>(value: &dyn Encode) -> &T {
    value
        .as_any()
        .downcast_ref()
        .expect("value shape differs from the resolved plan")
}

/// Recover the concrete shape a plan was resolved with.
pub(crate) fn downcast_mut<T: 'static>(target: &mut dyn ScanTarget) -> &mut T {
    target
        .as_any_mut()
        .downcast_mut()
        .expect("target shape differs from the resolved plan")
}
