//! SMB235x register map.
//!
//! Addresses are 16 bit: the peripheral base in the upper byte, the register
//! offset in the lower byte.

use bitflags::bitflags;

pub(crate) const CHGR_BASE: u16 = 0x1000;
pub(crate) const DCDC_BASE: u16 = 0x1100;
pub(crate) const BATIF_BASE: u16 = 0x1200;
pub(crate) const USBIN_BASE: u16 = 0x1300;
pub(crate) const MISC_BASE: u16 = 0x1600;

// CHGR peripheral
pub(crate) const BATTERY_CHARGER_STATUS_1_REG: u16 = CHGR_BASE + 0x06;
pub(crate) const BATTERY_CHARGER_STATUS_2_REG: u16 = CHGR_BASE + 0x07;
pub(crate) const BATTERY_CHARGER_STATUS_7_REG: u16 = CHGR_BASE + 0x0D;
pub(crate) const CHARGING_ENABLE_CMD_REG: u16 = CHGR_BASE + 0x42;
pub(crate) const CHGR_CFG2_REG: u16 = CHGR_BASE + 0x51;
pub(crate) const CHARGE_INHIBIT_THRESHOLD_CFG_REG: u16 = CHGR_BASE + 0x52;
pub(crate) const CHGR_PRE_CHARGE_CURRENT_CFG_REG: u16 = CHGR_BASE + 0x60;
pub(crate) const CHGR_FAST_CHARGE_CURRENT_CFG_REG: u16 = CHGR_BASE + 0x61;
pub(crate) const CHGR_CHARGE_CURRENT_TERMINATION_CFG_REG: u16 = CHGR_BASE + 0x62;
pub(crate) const CHGR_TRICKLE_CHARGE_CURRENT_CFG_REG: u16 = CHGR_BASE + 0x63;
pub(crate) const CHGR_MAX_PRE_CHARGE_CURRENT_CFG_REG: u16 = CHGR_BASE + 0x64;
pub(crate) const CHGR_MAX_FAST_CHARGE_CURRENT_CFG_REG: u16 = CHGR_BASE + 0x65;
pub(crate) const CHGR_FLOAT_VOLTAGE_CFG_REG: u16 = CHGR_BASE + 0x70;
pub(crate) const CHGR_RCHG_SOC_THRESHOLD_CFG_REG: u16 = CHGR_BASE + 0x7D;
pub(crate) const CHGR_STEP_CHG_SOC_VBATT_V_REG: u16 = CHGR_BASE + 0x94;
pub(crate) const CHGR_STEP_CHG_SOC_VBATT_V_UPDATE_REG: u16 = CHGR_BASE + 0x95;

// DCDC peripheral
pub(crate) const DCDC_ICL_MAX_STATUS_REG: u16 = DCDC_BASE + 0x06;
pub(crate) const DCDC_AICL_ICL_STATUS_REG: u16 = DCDC_BASE + 0x08;
pub(crate) const DCDC_POWER_PATH_STATUS_REG: u16 = DCDC_BASE + 0x0B;

// BATIF peripheral
pub(crate) const BATIF_INT_RT_STS_OFFSET_REG: u16 = BATIF_BASE + 0x10;

// USBIN peripheral
pub(crate) const USB_APSD_STATUS_REG: u16 = USBIN_BASE + 0x07;
pub(crate) const USB_APSD_RESULT_STATUS_REG: u16 = USBIN_BASE + 0x08;
pub(crate) const USB_QC_CHANGE_STATUS_REG: u16 = USBIN_BASE + 0x0A;
pub(crate) const USB_INT_RT_STS_OFFSET_REG: u16 = USBIN_BASE + 0x10;
pub(crate) const USB_CMD_APSD_REG: u16 = USBIN_BASE + 0x41;
pub(crate) const USB_CMD_ICL_OVERRIDE_REG: u16 = USBIN_BASE + 0x42;
pub(crate) const USB_CMD_HVDCP_2_REG: u16 = USBIN_BASE + 0x43;
pub(crate) const USB_HVDCP_PULSE_COUNT_MAX_REG: u16 = USBIN_BASE + 0x5B;
pub(crate) const USBIN_OPTIONS_1_CFG_REG: u16 = USBIN_BASE + 0x62;
pub(crate) const USBIN_OPTIONS_2_CFG_REG: u16 = USBIN_BASE + 0x63;
pub(crate) const USBIN_LOAD_CFG_REG: u16 = USBIN_BASE + 0x65;
pub(crate) const USBIN_CURRENT_LIMIT_CFG_REG: u16 = USBIN_BASE + 0x70;
pub(crate) const USBIN_AICL_OPTIONS_CFG_REG: u16 = USBIN_BASE + 0x80;

// MISC peripheral
pub(crate) const MISC_BARK_BITE_WDOG_PET_REG: u16 = MISC_BASE + 0x43;
pub(crate) const MISC_WD_CFG_REG: u16 = MISC_BASE + 0x51;

pub(crate) const BATTERY_CHARGER_STATUS_MASK: u8 = 0x07;
pub(crate) const HVDCP_PULSE_COUNT_MAX_QC3P0_MASK: u8 = 0x3F;
pub(crate) const CHARGE_INHIBIT_THRESHOLD_MASK: u8 = 0x03;

pub(crate) const CHARGING_ENABLE_BIT: u8 = 1 << 0;
pub(crate) const USB_APSD_RERUN_BIT: u8 = 1 << 0;
pub(crate) const ICL_OVERRIDE_BIT: u8 = 1 << 0;
pub(crate) const ICL_OVERRIDE_AFTER_APSD_BIT: u8 = 1 << 4;
pub(crate) const APSD_DTC_STATUS_DONE_BIT: u8 = 1 << 0;
pub(crate) const USBIN_PLUGIN_RT_STS_BIT: u8 = 1 << 4;
pub(crate) const BARK_BITE_WDOG_PET_BIT: u8 = 1 << 0;
pub(crate) const CHGR_STEP_SOC_VBATT_V_UPDATE_BIT: u8 = 1 << 0;

bitflags! {
    /// DCDC_POWER_PATH_STATUS
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PowerPathStatus: u8 {
        const USE_USBIN = 1 << 4;
        const VALID_INPUT_POWER_SOURCE = 1 << 0;
    }
}

bitflags! {
    /// USB_APSD_RESULT_STATUS, bit 7 is the ICL override latch and not part of the result
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApsdResult: u8 {
        const QC_3P0 = 1 << 6;
        const QC_2P0 = 1 << 5;
        const FLOAT_CHARGER = 1 << 4;
        const DCP_CHARGER = 1 << 3;
        const CDP_CHARGER = 1 << 2;
        const OCP_CHARGER = 1 << 1;
        const SDP_CHARGER = 1 << 0;
    }
}

bitflags! {
    /// USB_CMD_HVDCP_2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HvdcpCmd: u8 {
        const FORCE_12V = 1 << 5;
        const FORCE_9V = 1 << 4;
        const FORCE_5V = 1 << 3;
        const SINGLE_DECREMENT = 1 << 1;
        const SINGLE_INCREMENT = 1 << 0;
    }
}

bitflags! {
    /// USB_QC_CHANGE_STATUS
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QcChangeStatus: u8 {
        const QC_12V = 1 << 2;
        const QC_9V = 1 << 1;
        const QC_5V = 1 << 0;
    }
}

bitflags! {
    /// BATIF_INT_RT_STS
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BatIfRtStatus: u8 {
        const BAT_TERMINAL_MISSING = 1 << 5;
        const BAT_THERM_OR_ID_MISSING = 1 << 4;
        const BAT_LOW = 1 << 1;
        const BAT_OV = 1 << 0;
    }
}

bitflags! {
    /// BATTERY_CHARGER_STATUS_2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChargerErrorStatus: u8 {
        const SFT_EXPIRE = 1 << 5;
        const BAT_OV = 1 << 4;
        const BAT_TERM_MISSING = 1 << 3;
    }
}

bitflags! {
    /// BATTERY_CHARGER_STATUS_7
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BatTempStatus: u8 {
        const TOO_HOT = 1 << 5;
        const HOT_SOFT = 1 << 4;
        const COLD_SOFT = 1 << 3;
        const TOO_COLD = 1 << 2;
    }
}

bitflags! {
    /// USBIN_OPTIONS_1_CFG
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbinOptions1: u8 {
        const HVDCP_AUTH_ALG_EN = 1 << 6;
        const HVDCP_AUTONOMOUS_MODE_EN = 1 << 5;
        const APSD_ENABLE = 1 << 3;
        const HVDCP_EN = 1 << 2;
    }
}

bitflags! {
    /// USBIN_OPTIONS_2_CFG float charger handling
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FloatOptions: u8 {
        const FLOAT_DIS_CHGING = 1 << 2;
        const SUSPEND_FLOAT = 1 << 1;
        const FORCE_FLOAT_SDP = 1 << 0;
    }
}

bitflags! {
    /// USBIN_AICL_OPTIONS_CFG
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AiclOptions: u8 {
        const PERIODIC_RERUN_EN = 1 << 4;
        const AICL_EN = 1 << 2;
    }
}

bitflags! {
    /// MISC_WD_CFG
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WatchdogCfg: u8 {
        const BARK_WDOG_INT_EN = 1 << 3;
        const WDOG_TIMER_EN_ON_PLUGIN = 1 << 1;
    }
}

bitflags! {
    /// CHGR_CFG2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChgrCfg2: u8 {
        const SOC_BASED_RECHG = 1 << 1;
        const CHARGER_INHIBIT = 1 << 0;
    }
}
