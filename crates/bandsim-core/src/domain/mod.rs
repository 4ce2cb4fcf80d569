pub mod errors;

pub use errors::{SimError, SimErrorCategory, SimResult};

use std::fmt::{Display, Formatter};

/// Supported satellite sensors, in batch execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Msi,
    Oli,
    Etm,
    Tm,
    Olci,
    SuperDove,
    Modis,
}

impl Sensor {
    pub const ALL: [Sensor; 7] = [
        Self::Msi,
        Self::Oli,
        Self::Etm,
        Self::Tm,
        Self::Olci,
        Self::SuperDove,
        Self::Modis,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Msi => "MSI",
            Self::Oli => "OLI",
            Self::Etm => "ETM",
            Self::Tm => "TM",
            Self::Olci => "OLCI",
            Self::SuperDove => "SuperDove",
            Self::Modis => "MODIS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sensor| sensor.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl Display for Sensor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Keys for the eight persisted SRF calibration tables. MSI is served by two
/// near-identical satellite variants (S2A/S2B) with separate calibrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrfKey {
    S3,
    S2a,
    S2b,
    L8,
    L7,
    L5,
    Planet,
    Modis,
}

impl SrfKey {
    pub const ALL: [SrfKey; 8] = [
        Self::S3,
        Self::S2a,
        Self::S2b,
        Self::L8,
        Self::L7,
        Self::L5,
        Self::Planet,
        Self::Modis,
    ];

    /// File stem of the persisted table, `<stem>.csv` on disk.
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::S3 => "s3_srf",
            Self::S2a => "s2_srf",
            Self::S2b => "s2b_srf",
            Self::L8 => "l8_srf",
            Self::L7 => "l7_srf",
            Self::L5 => "l5_srf",
            Self::Planet => "planet_srf",
            Self::Modis => "modis_srf",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::S3 => 0,
            Self::S2a => 1,
            Self::S2b => 2,
            Self::L8 => 3,
            Self::L7 => 4,
            Self::L5 => 5,
            Self::Planet => 6,
            Self::Modis => 7,
        }
    }
}

impl Display for SrfKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}
