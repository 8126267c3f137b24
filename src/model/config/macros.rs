#[macro_export]
macro_rules! try_from_impl {
    ($struct_name:ident) => {
        paste::paste! {
            impl TryFrom<[<$struct_name Dto>]> for $struct_name {
                type Error = $crate::error::StrmSyncError;
                fn try_from(dto: [<$struct_name Dto>]) -> Result<Self, $crate::error::StrmSyncError> {
                    $struct_name::try_from(&dto)
                }
            }
        }
    }
}

pub use try_from_impl;
