//! Core [`Component`] trait.
//!
//! Every piece of data stored in the runtime must implement [`Component`].
//! Components are plain values owned by exactly one entity; the trait only
//! asks for a stable human-readable name, used in logs and error messages.

/// The core component trait.
///
/// A component is a plain data value of a registered type. The runtime
/// stores one instance per (entity, type) pair; attaching a second instance
/// of the same type replaces the first.
///
/// # Examples
///
/// ```rust
/// use kestrel_component::Component;
///
/// #[derive(Debug, Clone)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str;
}
