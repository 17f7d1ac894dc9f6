//! Two-level SAH BVH acceleration-structure builder: bottom-level
//! structures over mesh triangles, top-level structures over transformed
//! instances, flattened into a pointer-free device layout and
//! bit-exact-serializable to disk.

pub mod blas;
pub mod builder;
pub mod config;
pub mod demo_loader;
pub mod device;
pub mod device_layout;
pub mod error;
pub mod geometry;
pub mod instance;
pub mod mesh;
pub mod progress;
pub mod serialize;
pub mod tlas;

pub use blas::{build_blas, Blas};
pub use config::BuildConfig;
pub use device::{DeviceHandle, DeviceMemory, HostMemory};
pub use error::{Error, Result};
pub use instance::Instance;
pub use mesh::Mesh;
pub use tlas::{build_tlas, Tlas};
