#[doc(hidden)]
#[macro_export]
macro_rules! cfg_layer {
    ($($item:item)*) => {
        $( #[cfg(feature = "layer")] $item )*
    }
}
