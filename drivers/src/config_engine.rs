//! Translation of physical current/voltage targets into register codes, and
//! the setters that program them.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::charger::Smb235x;
use crate::error::ChargerError;
use crate::peer::PowerSupplyRegistry;
use crate::regmap::Regmap;
use crate::regs::*;

pub const FLOAT_VOLTAGE_BASE_MV: u32 = 7200;
pub const FLOAT_VOLTAGE_STEP_MV: u32 = 20;
/// Step of every charge and input current field
pub const CURRENT_STEP_MA: u32 = 50;

fn saturate(code: u32) -> u8 {
    u8::try_from(code).unwrap_or(u8::MAX)
}

/// Float voltage code, 7.2V base in 20mV steps. Voltages below the base
/// program the base.
pub fn float_voltage_code(microvolt: u32) -> u8 {
    saturate((microvolt / 1000).saturating_sub(FLOAT_VOLTAGE_BASE_MV) / FLOAT_VOLTAGE_STEP_MV)
}

/// Code for the trickle and pre-charge current fields, saturating
pub fn current_code(microampere: u32) -> u8 {
    saturate(microampere / 1000 / CURRENT_STEP_MA)
}

/// Fast charge current code. The register counts from one step above zero.
pub fn fcc_code(microampere: u32) -> u8 {
    current_code(microampere).saturating_add(1)
}

/// Termination current code.
///
/// Negative currents (termination is measured discharge-positive) program
/// the two's complement byte of the step count, e.g. -325mA is 0xFA. Both
/// directions saturate.
pub fn termination_code(microampere: i32) -> u8 {
    match u32::try_from(microampere) {
        Ok(microampere) => current_code(microampere),
        Err(_) => {
            let steps = (microampere / 1000 / CURRENT_STEP_MA as i32).max(i32::from(i8::MIN));
            steps as i8 as u8
        }
    }
}

/// Input current limit code
pub fn icl_code(milliampere: u32) -> u8 {
    saturate(milliampere / CURRENT_STEP_MA)
}

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    async fn write_code(&self, reg: u16, code: u8, what: &str) -> Result<(), ChargerError> {
        self.write_reg(reg, code).await.map_err(|e| {
            error!("Failed to write {}: {:?}", what, e);
            e
        })
    }

    /// Programs the float voltage
    ///
    /// # Arguments
    /// * `microvolt` - Float voltage in uV
    pub async fn set_fv(&self, microvolt: u32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_FLOAT_VOLTAGE_CFG_REG,
            float_voltage_code(microvolt),
            "float voltage",
        )
        .await
    }

    /// Programs the fast charge current
    ///
    /// # Arguments
    /// * `microampere` - Fast charge current in uA
    pub async fn set_fcc(&self, microampere: u32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_FAST_CHARGE_CURRENT_CFG_REG,
            fcc_code(microampere),
            "fast charge current",
        )
        .await
    }

    pub async fn set_max_fcc(&self, microampere: u32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_MAX_FAST_CHARGE_CURRENT_CFG_REG,
            fcc_code(microampere),
            "max fast charge current",
        )
        .await
    }

    pub async fn set_trickle_current(&self, microampere: u32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_TRICKLE_CHARGE_CURRENT_CFG_REG,
            current_code(microampere),
            "trickle charge current",
        )
        .await
    }

    pub async fn set_precharge_current(&self, microampere: u32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_PRE_CHARGE_CURRENT_CFG_REG,
            current_code(microampere),
            "pre charge current",
        )
        .await
    }

    pub async fn set_max_precharge_current(&self, microampere: u32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_MAX_PRE_CHARGE_CURRENT_CFG_REG,
            current_code(microampere),
            "max pre charge current",
        )
        .await
    }

    /// Programs the charge termination threshold
    ///
    /// # Arguments
    /// * `microampere` - Termination current in uA, negative for charging
    pub async fn set_termination_current(&self, microampere: i32) -> Result<(), ChargerError> {
        self.write_code(
            CHGR_CHARGE_CURRENT_TERMINATION_CFG_REG,
            termination_code(microampere),
            "ITERM threshold",
        )
        .await
    }

    /// Takes the input current limit over from APSD and programs it
    ///
    /// # Arguments
    /// * `milliampere` - Input current limit in mA
    pub async fn set_icl_sw(&self, milliampere: u32) -> Result<(), ChargerError> {
        self.update_reg(
            USBIN_LOAD_CFG_REG,
            ICL_OVERRIDE_AFTER_APSD_BIT,
            ICL_OVERRIDE_AFTER_APSD_BIT,
        )
        .await
        .map_err(|e| {
            error!("Failed to enable SW icl control: {:?}", e);
            e
        })?;

        self.update_reg(USB_CMD_ICL_OVERRIDE_REG, ICL_OVERRIDE_BIT, ICL_OVERRIDE_BIT)
            .await
            .map_err(|e| {
                error!("Failed to enable ICL_OVERRIDE: {:?}", e);
                e
            })?;

        self.write_code(
            USBIN_CURRENT_LIMIT_CFG_REG,
            icl_code(milliampere),
            "USBIN_CURRENT_LIMIT_CFG",
        )
        .await
    }
}
