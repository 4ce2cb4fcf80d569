//! Per-sensor band declarations: which SRF columns are real bands, the
//! nominal center wavelength of each band, and whether a wavelength window
//! restricts the SRF before normalization.
//!
//! This is static declarative data keyed by [`Sensor`]; the convolution
//! engine is generic over it, so adding a sensor means adding a table row.

use crate::domain::{Sensor, SrfKey};

/// Restriction window applied to window-limited sensors before SRF
/// normalization, in integer nm.
pub const VISIBLE_NIR_WINDOW: (i32, i32) = (400, 900);

/// One sensor band: 1-based SRF source column, label wavelength, optional
/// normalization window. The center is a label only and never enters the
/// computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandDefinition {
    pub column: usize,
    pub center_nm: i32,
    pub window: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSpec {
    pub sensor: Sensor,
    pub srf_keys: &'static [SrfKey],
    pub band_columns: &'static [usize],
    pub band_centers: &'static [i32],
    pub window: Option<(i32, i32)>,
}

impl SensorSpec {
    pub fn band_count(&self) -> usize {
        self.band_centers.len()
    }

    pub const fn is_dual_variant(&self) -> bool {
        self.srf_keys.len() == 2
    }

    pub fn band_definitions(&self) -> Vec<BandDefinition> {
        self.band_columns
            .iter()
            .zip(self.band_centers)
            .map(|(&column, &center_nm)| BandDefinition {
                column,
                center_nm,
                window: self.window,
            })
            .collect()
    }
}

const OLCI_CENTERS: [i32; 19] = [
    400, 412, 442, 490, 510, 560, 620, 665, 673, 681, 708, 753, 761, 764, 767, 778, 865, 885, 900,
];
const MSI_CENTERS: [i32; 9] = [440, 490, 560, 665, 705, 740, 783, 842, 865];
const OLI_CENTERS: [i32; 5] = [440, 490, 560, 665, 865];
const ETM_CENTERS: [i32; 4] = [490, 560, 665, 865];
const TM_CENTERS: [i32; 4] = [490, 560, 665, 865];
const SUPERDOVE_CENTERS: [i32; 8] = [443, 490, 531, 565, 610, 665, 705, 865];
const MODIS_CENTERS: [i32; 16] = [
    412, 443, 469, 488, 531, 551, 555, 645, 667, 678, 748, 859, 869, 1240, 1640, 2130,
];

const OLCI_COLUMNS: [usize; 19] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
];
const MSI_COLUMNS: [usize; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
const OLI_COLUMNS: [usize; 5] = [1, 2, 3, 4, 5];
const ETM_COLUMNS: [usize; 4] = [1, 2, 3, 4];
const TM_COLUMNS: [usize; 4] = [1, 2, 3, 4];
const SUPERDOVE_COLUMNS: [usize; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
const MODIS_COLUMNS: [usize; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];

pub static SENSOR_SPECS: [SensorSpec; 7] = [
    SensorSpec {
        sensor: Sensor::Msi,
        srf_keys: &[SrfKey::S2a, SrfKey::S2b],
        band_columns: &MSI_COLUMNS,
        band_centers: &MSI_CENTERS,
        window: Some(VISIBLE_NIR_WINDOW),
    },
    SensorSpec {
        sensor: Sensor::Oli,
        srf_keys: &[SrfKey::L8],
        band_columns: &OLI_COLUMNS,
        band_centers: &OLI_CENTERS,
        window: None,
    },
    SensorSpec {
        sensor: Sensor::Etm,
        srf_keys: &[SrfKey::L7],
        band_columns: &ETM_COLUMNS,
        band_centers: &ETM_CENTERS,
        window: None,
    },
    SensorSpec {
        sensor: Sensor::Tm,
        srf_keys: &[SrfKey::L5],
        band_columns: &TM_COLUMNS,
        band_centers: &TM_CENTERS,
        window: None,
    },
    SensorSpec {
        sensor: Sensor::Olci,
        srf_keys: &[SrfKey::S3],
        band_columns: &OLCI_COLUMNS,
        band_centers: &OLCI_CENTERS,
        window: Some(VISIBLE_NIR_WINDOW),
    },
    SensorSpec {
        sensor: Sensor::SuperDove,
        srf_keys: &[SrfKey::Planet],
        band_columns: &SUPERDOVE_COLUMNS,
        band_centers: &SUPERDOVE_CENTERS,
        window: Some(VISIBLE_NIR_WINDOW),
    },
    SensorSpec {
        sensor: Sensor::Modis,
        srf_keys: &[SrfKey::Modis],
        band_columns: &MODIS_COLUMNS,
        band_centers: &MODIS_CENTERS,
        window: Some(VISIBLE_NIR_WINDOW),
    },
];

pub fn spec_for(sensor: Sensor) -> &'static SensorSpec {
    SENSOR_SPECS
        .iter()
        .find(|spec| spec.sensor == sensor)
        .expect("every sensor has a catalog row")
}

/// Largest band column a given SRF table must provide, across all sensors
/// that read it. Used to validate table shape at load time.
pub fn required_columns(key: SrfKey) -> usize {
    SENSOR_SPECS
        .iter()
        .filter(|spec| spec.srf_keys.contains(&key))
        .flat_map(|spec| spec.band_columns.iter().copied())
        .max()
        .unwrap_or(0)
}
