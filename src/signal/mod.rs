/// Signal layer: aligned inputs and subspace projection.
///
/// Architecture:
/// ```text
///  estimated, real_source, interference[], noise?
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  truncate to len(estimated), validate → AlignedSignals
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection  │  SVD of the basis → U_r U_rᵗ · signal
///   └────────────┘
/// ```

pub mod model;
pub mod projection;

pub use model::{add, energy, sub, AlignedSignals};
pub use projection::project;
