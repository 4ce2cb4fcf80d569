//! Satellite band simulation over hyperspectral water-reflectance spectra.
//!
//! Converts continuous per-station reflectance spectra (one value per 1 nm
//! wavelength) into discrete multispectral band values by convolving each
//! spectrum with the published spectral response function of each supported
//! satellite sensor.

pub mod assemble;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod output;
pub mod reflectance;
pub mod runner;
pub mod srf;
