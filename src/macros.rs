/// Implements `Copy`, `Clone`, `Default`, `PartialEq` and `Debug` for a `#[repr(C)]` struct whose
/// fields all share the type parameter, plus zero-copy slice views when the `unsafe` feature is enabled.
#[macro_export]
macro_rules! impl_standard_traits {
    ($type_name:ident, $type_param:ident, [$($field:ident),+ $(,)?]) => {
        impl<$type_param> Copy for $type_name<$type_param> where $type_param: Copy {}

        impl<$type_param> Clone for $type_name<$type_param>
        where
            $type_param: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    $($field: self.$field.clone(),)+
                }
            }
        }

        impl<$type_param> Default for $type_name<$type_param>
        where
            $type_param: Default,
        {
            #[inline]
            fn default() -> Self {
                Self {
                    $($field: Default::default(),)+
                }
            }
        }

        impl<$type_param> PartialEq for $type_name<$type_param>
        where
            $type_param: PartialEq,
        {
            fn eq(&self, other: &Self) -> bool {
                true $(&& self.$field == other.$field)+
            }
        }

        impl<$type_param> core::fmt::Debug for $type_name<$type_param>
        where
            $type_param: core::fmt::Debug,
        {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($type_name))
                    $(.field(stringify!($field), &self.$field))+
                    .finish()
            }
        }

        #[cfg_attr(docsrs, doc(cfg(feature = "unsafe")))]
        #[cfg(feature = "unsafe")]
        impl<$type_param> $type_name<$type_param> {
            /// Views a slice of exactly as many values as the struct has fields as an instance.
            #[allow(unused)]
            #[inline]
            pub fn from_slice(slice: &[$type_param]) -> &Self {
                assert_eq!(
                    slice.len(),
                    core::mem::size_of::<Self>() / core::mem::size_of::<$type_param>()
                );

                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe { &*(slice.as_ptr() as *const Self) }
            }

            /// Views a mutable slice of exactly as many values as the struct has fields as an instance.
            #[allow(unused)]
            #[inline]
            pub fn from_mut_slice(slice: &mut [$type_param]) -> &mut Self {
                assert_eq!(
                    slice.len(),
                    core::mem::size_of::<Self>() / core::mem::size_of::<$type_param>()
                );

                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe { &mut *(slice.as_mut_ptr() as *mut Self) }
            }
        }

        #[cfg_attr(docsrs, doc(cfg(feature = "unsafe")))]
        #[cfg(feature = "unsafe")]
        impl<$type_param> core::convert::AsRef<[$type_param]> for $type_name<$type_param> {
            fn as_ref(&self) -> &[$type_param] {
                unsafe {
                    // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                    core::slice::from_raw_parts(
                        self as *const _ as *const $type_param,
                        core::mem::size_of::<$type_name<$type_param>>()
                            / core::mem::size_of::<$type_param>(),
                    )
                }
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:snake>] {
                use super::*;

                #[test]
                fn test_default_is_zero() {
                    let value = $type_name::<u32>::default();
                    $(assert_eq!(value.$field, 0);)+
                }

                #[test]
                fn test_clone_equals_original() {
                    let mut value = $type_name::<u32>::default();
                    let mut counter = 0;
                    $(
                        counter += 1;
                        value.$field = counter;
                    )+
                    assert_eq!(value.clone(), value);
                    assert_ne!(value, $type_name::<u32>::default());
                }

                #[test]
                #[cfg(feature = "unsafe")]
                fn test_from_slice() {
                    const TYPE_SIZE: usize = core::mem::size_of::<$type_name<u32>>();
                    const NUM_ELEMS: usize = TYPE_SIZE / core::mem::size_of::<u32>();
                    const ARRAY_SIZE: usize = NUM_ELEMS + 1;
                    let data = [0; ARRAY_SIZE];
                    let value = $type_name::from_slice(&data[..NUM_ELEMS]);
                    assert_eq!(value.as_ref().len(), NUM_ELEMS);
                    assert!(core::ptr::eq(value.as_ref().as_ptr(), data.as_ptr()));
                }

                #[test]
                #[cfg(feature = "unsafe")]
                fn test_from_slice_mut() {
                    const TYPE_SIZE: usize = core::mem::size_of::<$type_name<u32>>();
                    const NUM_ELEMS: usize = TYPE_SIZE / core::mem::size_of::<u32>();
                    const ARRAY_SIZE: usize = NUM_ELEMS + 1;
                    let mut data = [0; ARRAY_SIZE];
                    {
                        let value = $type_name::from_mut_slice(&mut data[..NUM_ELEMS]);
                        let first = value.as_ref()[0];
                        assert_eq!(first, 0);
                        *value = $type_name::<u32>::default();
                    }
                    assert_eq!(data[NUM_ELEMS], 0, "expect trailing element to be untouched");
                }
            }
        }
    };
}
