//! HVDCP voltage handling. HVDCP2 sources are forced to a fixed rail and only
//! read back; HVDCP3 sources are stepped in 200mV pulses.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::charger::{Smb235x, BASED_VOLTAGE_UV};
use crate::error::ChargerError;
use crate::peer::PowerSupplyRegistry;
use crate::regmap::Regmap;
use crate::regs::{HvdcpCmd, QcChangeStatus, USB_CMD_HVDCP_2_REG, USB_QC_CHANGE_STATUS_REG};

pub const QC3_VOLTAGE_STEP_UV: u32 = 200_000;
pub const VOLTAGE_FORCE_5V_UV: u32 = 5_000_000;
pub const VOLTAGE_FORCE_9V_UV: u32 = 9_000_000;
pub const VOLTAGE_FORCE_12V_UV: u32 = 12_000_000;
/// Settle time after each pulse
const PULSE_SETTLE_US: u32 = 500;

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    /// Rail an HVDCP2 source currently supplies, in uV
    pub async fn get_hvdcp2_voltage(&self) -> Result<u32, ChargerError> {
        let stat = self.read_reg(USB_QC_CHANGE_STATUS_REG).await.map_err(|e| {
            error!("Failed to read USB_QC_CHANGE_STATUS: {:?}", e);
            e
        })?;

        let stat = QcChangeStatus::from_bits_truncate(stat);
        let voltage_uv = if stat.contains(QcChangeStatus::QC_12V) {
            VOLTAGE_FORCE_12V_UV
        } else if stat.contains(QcChangeStatus::QC_9V) {
            VOLTAGE_FORCE_9V_UV
        } else {
            VOLTAGE_FORCE_5V_UV
        };
        Ok(voltage_uv)
    }

    /// Steps an HVDCP3 source towards `microvolt`.
    ///
    /// Raising counts pulses from the based voltage and is capped by the
    /// hardware pulse count limit. Lowering counts from the last negotiated
    /// voltage and is not capped. Targets below 5V are ignored.
    ///
    /// A failed pulse aborts the sequence without touching the stored
    /// voltages, the pulses already sent are not undone.
    ///
    /// # Arguments
    /// * `microvolt` - Target voltage in uV
    pub async fn set_hvdcp3_voltage(&self, microvolt: u32) -> Result<(), ChargerError> {
        if microvolt < BASED_VOLTAGE_UV {
            return Ok(());
        }

        let mut delay = self.hvdcp.lock().await;

        let (based_uv, current_uv, pulse_count_max) = {
            let state = self.state.lock().await;
            (
                state.based_hvdcp_voltage_uv,
                state.hvdcp3_voltage_uv,
                state.hvdcp_pulse_count_max,
            )
        };

        let (pulse, count) = if microvolt > based_uv {
            let count = (microvolt - based_uv) / QC3_VOLTAGE_STEP_UV;
            (HvdcpCmd::SINGLE_INCREMENT, count.min(u32::from(pulse_count_max)))
        } else {
            let count = current_uv.saturating_sub(microvolt) / QC3_VOLTAGE_STEP_UV;
            (HvdcpCmd::SINGLE_DECREMENT, count)
        };
        debug!("hvdcp3 {}uV -> {}uV, {} x {:#x}", current_uv, microvolt, count, pulse.bits());

        for _ in 0..count {
            self.update_reg(USB_CMD_HVDCP_2_REG, pulse.bits(), pulse.bits())
                .await
                .map_err(|e| {
                    error!("Failed to pulse USB_CMD_HVDCP_2: {:?}", e);
                    e
                })?;
            delay.delay_us(PULSE_SETTLE_US).await;
        }

        let mut state = self.state.lock().await;
        state.hvdcp3_voltage_uv = microvolt;
        state.based_hvdcp_voltage_uv = microvolt;
        Ok(())
    }
}
