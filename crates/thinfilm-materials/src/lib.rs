//! # Thinfilm Materials
//!
//! Refractive indices of common optical coating materials. The
//! [`MaterialCatalog`](catalog::MaterialCatalog) is an immutable lookup from
//! material identifier to [`OpticalMedium`](thinfilm_core::OpticalMedium),
//! passed explicitly to whatever needs it.
//!
//! ## Standard entries
//!
//! | Identifier | Material | n |
//! |-----------|----------|---|
//! | `Cryolite` | Cryolite | 1.32 |
//! | `MgF2` | MgF₂ | 1.38 |
//! | `SiO2` | SiO₂ | 1.46 |
//! | `SiO3` | SiO₃ | 1.78 |
//! | `Al2O3` | Al₂O₃ | 1.60 |
//! | `CeF3` | CeF₃ | 1.65 |
//! | `ThO2` | ThO₂ | 1.80 |
//! | `Nd2O3` | Nd₂O₃ | 2.0 |
//! | `ZrO2` | ZrO₂ | 2.1 |
//! | `CeO2` | CeO₂ | 2.35 |
//! | `ZnS` | ZnS | 2.35 |
//! | `TiO2` | TiO₂ | 2.4 |
//! | `CrownGlass` | Crown glass (substrate) | 1.52 |
//!
//! Indices are single representative visible-band values; no dispersion
//! is modelled.

pub mod catalog;

pub use catalog::{Material, MaterialCatalog, MaterialEntry, MaterialError, MaterialRole};
