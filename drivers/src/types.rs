use core::fmt::{self, Display, Formatter};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Kind of source attached to USBIN
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargerType {
    Unknown = 0,
    /// Standard downstream port
    Sdp = 4,
    /// Dedicated charging port
    Dcp = 5,
    /// Charging downstream port
    Cdp = 6,
    Aca = 7,
    TypeC = 8,
    Pd = 9,
    PdDrp = 10,
    PdPps = 11,
    AppleBrickId = 12,
    Hvdcp2 = 13,
    Hvdcp3 = 14,
    Float = 15,
}

/// USB sub-type reported alongside [`ChargerType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbType {
    Unknown = 0,
    Sdp = 1,
    Dcp = 2,
    Cdp = 3,
    Aca = 4,
    /// Type-C source that has not (yet) negotiated PD
    C = 5,
    Pd = 6,
    PdDrp = 7,
    PdPps = 8,
    AppleBrickId = 9,
}

impl From<UsbType> for ChargerType {
    fn from(usb_type: UsbType) -> Self {
        match usb_type {
            UsbType::Unknown => ChargerType::Unknown,
            UsbType::Sdp => ChargerType::Sdp,
            UsbType::Dcp => ChargerType::Dcp,
            UsbType::Cdp => ChargerType::Cdp,
            UsbType::Aca => ChargerType::Aca,
            UsbType::C => ChargerType::TypeC,
            UsbType::Pd => ChargerType::Pd,
            UsbType::PdDrp => ChargerType::PdDrp,
            UsbType::PdPps => ChargerType::PdPps,
            UsbType::AppleBrickId => ChargerType::AppleBrickId,
        }
    }
}

impl Display for ChargerType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ChargerType::Unknown => write!(f, "Unknown"),
            ChargerType::Sdp => write!(f, "USB SDP"),
            ChargerType::Dcp => write!(f, "USB DCP"),
            ChargerType::Cdp => write!(f, "USB CDP"),
            ChargerType::Aca => write!(f, "USB ACA"),
            ChargerType::TypeC => write!(f, "USB Type-C"),
            ChargerType::Pd => write!(f, "USB PD"),
            ChargerType::PdDrp => write!(f, "USB PD DRP"),
            ChargerType::PdPps => write!(f, "USB PD PPS"),
            ChargerType::AppleBrickId => write!(f, "Apple brick ID"),
            ChargerType::Hvdcp2 => write!(f, "HVDCP 2.0"),
            ChargerType::Hvdcp3 => write!(f, "HVDCP 3.0"),
            ChargerType::Float => write!(f, "Float"),
        }
    }
}

/// Which power supply endpoint changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSupplyKind {
    Usb,
    Battery,
}

/// Notifications delivered by the power supply framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PsyEvent {
    PropChanged,
    Registered,
    Unregistered,
}

/// BATTERY_CHARGER_STATUS_1 state field
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargerStatus {
    Trickle = 0,
    PreCharge = 1,
    FullOn = 2,
    Taper = 3,
    Terminate = 4,
    Inhibit = 5,
    Disable = 6,
    Pause = 7,
}

impl Display for ChargerStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ChargerStatus::Trickle => write!(f, "Trickle charge"),
            ChargerStatus::PreCharge => write!(f, "Pre-charge"),
            ChargerStatus::FullOn => write!(f, "Full-on charge"),
            ChargerStatus::Taper => write!(f, "Taper charge"),
            ChargerStatus::Terminate => write!(f, "Charge terminated"),
            ChargerStatus::Inhibit => write!(f, "Charge inhibited"),
            ChargerStatus::Disable => write!(f, "Charging disabled"),
            ChargerStatus::Pause => write!(f, "Charging paused"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryStatus {
    Unknown = 0,
    Charging = 1,
    Discharging = 2,
    NotCharging = 3,
    Full = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeType {
    Unknown = 0,
    None = 1,
    Trickle = 2,
    Fast = 3,
    Taper = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Health {
    Unknown = 0,
    Good = 1,
    Overheat = 2,
    Dead = 3,
    OverVoltage = 4,
    UnspecFailure = 5,
    Cold = 6,
    WatchdogTimerExpire = 7,
    SafetyTimerExpire = 8,
    OverCurrent = 9,
    CalibrationRequired = 10,
    Warm = 11,
    Cool = 12,
    Hot = 13,
}
