//! Items used by code the derive macros generate. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::TypeRegistry;

    /// A registration function submitted by `#[crunchy(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    fn __mark_available(registry: &mut TypeRegistry) {
        registry.auto_available = true;
    }

    // Only runs where `inventory` works on the target.
    inventory::submit! {
        __AutoRegisterFunc(__mark_available)
    }

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
