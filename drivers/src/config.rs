//! Charger configuration, the values a board would otherwise describe in its
//! devicetree node. Everything not overridden keeps the driver default.

use alloc::string::String;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::ChargerError;

pub(crate) const DEFAULT_TRICKLE_CHARGE_CURRENT_UA: u32 = 50_000;
pub(crate) const DEFAULT_PRE_CHARGE_CURRENT_UA: u32 = 750_000;
pub(crate) const DEFAULT_MAX_PRE_CHARGE_CURRENT_UA: u32 = 1_000_000;
pub(crate) const DEFAULT_FAST_CHARGE_CURRENT_UA: u32 = 3_250_000;
pub(crate) const DEFAULT_MAX_FCC_UA: u32 = 3_250_000;
pub(crate) const DEFAULT_TERMINATION_CURRENT_UA: i32 = -325_000;
pub(crate) const DEFAULT_FLOAT_VOLTAGE_UV: u32 = 8_800_000;
pub(crate) const DEFAULT_AUTO_RECHARGE_SOC: u8 = 98;

/// Prefix of the TCPM source power supply name, completed by
/// [`ChargerConfig::tcpm_psy_name`].
pub const TCPM_PSY_NAME_PREFIX: &str = "tcpm-source-psy-";

/// What the charger does when APSD reports a floating data line source
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FloatOption {
    /// Treat the source as an SDP
    ForceSdp = 1,
    DisableCharging = 2,
    SuspendInput = 3,
}

/// Charge inhibit threshold below the float voltage
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InhibitThreshold {
    VfltMinus100mV = 0,
    VfltMinus200mV = 1,
    VfltMinus400mV = 2,
    VfltMinus600mV = 3,
}

impl InhibitThreshold {
    pub fn try_from_mv(millivolt: u32) -> Result<Self, ChargerError> {
        match millivolt {
            100 => Ok(InhibitThreshold::VfltMinus100mV),
            200 => Ok(InhibitThreshold::VfltMinus200mV),
            400 => Ok(InhibitThreshold::VfltMinus400mV),
            600 => Ok(InhibitThreshold::VfltMinus600mV),
            _ => Err(ChargerError::InvalidArgument),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChargerConfig {
    pub trickle_charge_current_ua: u32,
    pub pre_charge_current_ua: u32,
    pub max_pre_charge_current_ua: u32,
    pub fast_charge_current_ua: u32,
    pub max_fcc_ua: u32,
    pub float_voltage_uv: u32,
    /// Negative, the battery current is measured discharge-positive
    pub termination_current_ua: i32,
    pub auto_recharge_soc: u8,
    pub float_option: Option<FloatOption>,
    /// Charge inhibit threshold in uV, 0 disables inhibit
    pub chg_inhibit_threshold_uv: Option<u32>,
    /// Suffix appended to [`TCPM_PSY_NAME_PREFIX`]
    pub tcpm_psy_name: String,
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            trickle_charge_current_ua: DEFAULT_TRICKLE_CHARGE_CURRENT_UA,
            pre_charge_current_ua: DEFAULT_PRE_CHARGE_CURRENT_UA,
            max_pre_charge_current_ua: DEFAULT_MAX_PRE_CHARGE_CURRENT_UA,
            fast_charge_current_ua: DEFAULT_FAST_CHARGE_CURRENT_UA,
            max_fcc_ua: DEFAULT_MAX_FCC_UA,
            float_voltage_uv: DEFAULT_FLOAT_VOLTAGE_UV,
            termination_current_ua: DEFAULT_TERMINATION_CURRENT_UA,
            auto_recharge_soc: DEFAULT_AUTO_RECHARGE_SOC,
            float_option: None,
            chg_inhibit_threshold_uv: None,
            tcpm_psy_name: String::new(),
        }
    }
}

impl ChargerConfig {
    pub fn with_tcpm_psy_name(mut self, name: &str) -> Self {
        self.tcpm_psy_name = String::from(name);
        self
    }

    pub fn with_float_voltage_uv(mut self, microvolt: u32) -> Self {
        self.float_voltage_uv = microvolt;
        self
    }

    pub fn with_fast_charge_current_ua(mut self, microampere: u32) -> Self {
        self.fast_charge_current_ua = microampere;
        self
    }

    pub fn with_max_fcc_ua(mut self, microampere: u32) -> Self {
        self.max_fcc_ua = microampere;
        self
    }

    pub fn with_trickle_charge_current_ua(mut self, microampere: u32) -> Self {
        self.trickle_charge_current_ua = microampere;
        self
    }

    pub fn with_pre_charge_current_ua(mut self, microampere: u32) -> Self {
        self.pre_charge_current_ua = microampere;
        self
    }

    pub fn with_max_pre_charge_current_ua(mut self, microampere: u32) -> Self {
        self.max_pre_charge_current_ua = microampere;
        self
    }

    pub fn with_termination_current_ua(mut self, microampere: i32) -> Self {
        self.termination_current_ua = microampere;
        self
    }

    pub fn with_auto_recharge_soc(mut self, soc: u8) -> Self {
        self.auto_recharge_soc = soc;
        self
    }

    pub fn with_float_option(mut self, option: FloatOption) -> Self {
        self.float_option = Some(option);
        self
    }

    pub fn with_chg_inhibit_threshold_uv(mut self, microvolt: u32) -> Self {
        self.chg_inhibit_threshold_uv = Some(microvolt);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_board_reference() {
        let config = ChargerConfig::default();
        assert_eq!(config.float_voltage_uv, 8_800_000);
        assert_eq!(config.fast_charge_current_ua, 3_250_000);
        assert_eq!(config.termination_current_ua, -325_000);
        assert_eq!(config.auto_recharge_soc, 98);
        assert!(config.float_option.is_none());
        assert!(config.chg_inhibit_threshold_uv.is_none());
    }

    #[test]
    fn builder_overrides_single_field() {
        let config = ChargerConfig::default()
            .with_float_voltage_uv(8_400_000)
            .with_tcpm_psy_name("c4000000.i2c");
        assert_eq!(config.float_voltage_uv, 8_400_000);
        assert_eq!(config.tcpm_psy_name, "c4000000.i2c");
        assert_eq!(config.max_fcc_ua, DEFAULT_MAX_FCC_UA);
    }

    #[test]
    fn float_option_from_raw() {
        assert_eq!(FloatOption::try_from(1).ok(), Some(FloatOption::ForceSdp));
        assert_eq!(FloatOption::try_from(3).ok(), Some(FloatOption::SuspendInput));
        assert!(FloatOption::try_from(0).is_err());
    }

    #[test]
    fn inhibit_threshold_rejects_unsupported_values() {
        assert_eq!(
            InhibitThreshold::try_from_mv(400),
            Ok(InhibitThreshold::VfltMinus400mV)
        );
        assert_eq!(
            InhibitThreshold::try_from_mv(300),
            Err(ChargerError::InvalidArgument)
        );
    }
}
