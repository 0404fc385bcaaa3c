//! Built-in migration steps, oldest first

mod v1_to_v2;
mod v2_to_v2_1;

pub use v1_to_v2::V1ToV2;
pub use v2_to_v2_1::V2ToV21;
