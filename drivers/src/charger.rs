//! Driver context: register access, charger state and the synchronisation
//! primitives shared by the interrupt handlers and the background tasks.

use alloc::{format, string::String};
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Receiver},
    mutex::Mutex,
    signal::Signal,
};
use embedded_hal_async::delay::DelayNs;

use crate::config::{ChargerConfig, FloatOption, InhibitThreshold, TCPM_PSY_NAME_PREFIX};
use crate::error::ChargerError;
use crate::peer::{PeerProperty, PowerSupply, PowerSupplyRegistry, BMS_PSY_NAME};
use crate::regmap::Regmap;
use crate::regs::*;
use crate::types::{ChargerType, PowerSupplyKind, UsbType};

/// Reference voltage an HVDCP3 source starts from
pub const BASED_VOLTAGE_UV: u32 = 5_000_000;
pub const QC3_DEFAULT_VOLTAGE_UV: u32 = 9_000_000;

/// Depth of the power supply changed queue
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Mutable charger state, guarded as a whole by one lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargerState {
    pub charger_type: ChargerType,
    pub usb_type: UsbType,
    pub pd_active: bool,
    pub hvdcp3_voltage_uv: u32,
    pub based_hvdcp_voltage_uv: u32,
    pub hvdcp_pulse_count_max: u8,
    pub trickle_charge_current_ua: u32,
    pub pre_charge_current_ua: u32,
    pub max_pre_charge_current_ua: u32,
    pub fastchg_curr_ua: u32,
    pub max_fcc_ua: u32,
    pub float_volt_uv: u32,
    pub termination_current_ua: i32,
    pub auto_recharge_soc: u8,
    /// 0 until a host sets the SDP current limit
    pub sdp_icl_ua: u32,
}

impl ChargerState {
    fn new(config: &ChargerConfig) -> Self {
        Self {
            charger_type: ChargerType::Unknown,
            usb_type: UsbType::Unknown,
            pd_active: false,
            hvdcp3_voltage_uv: QC3_DEFAULT_VOLTAGE_UV,
            based_hvdcp_voltage_uv: BASED_VOLTAGE_UV,
            hvdcp_pulse_count_max: 0,
            trickle_charge_current_ua: config.trickle_charge_current_ua,
            pre_charge_current_ua: config.pre_charge_current_ua,
            max_pre_charge_current_ua: config.max_pre_charge_current_ua,
            fastchg_curr_ua: config.fast_charge_current_ua,
            max_fcc_ua: config.max_fcc_ua,
            float_volt_uv: config.float_voltage_uv,
            termination_current_ua: config.termination_current_ua,
            auto_recharge_soc: config.auto_recharge_soc,
            sdp_icl_ua: 0,
        }
    }
}

/// SMB235x charger driver.
///
/// Shared by reference between the interrupt dispatcher, the periodic update
/// loop and the PD status worker. Bus transactions, charger state and the
/// HVDCP3 pulse sequence are each serialised by their own lock; the state lock
/// is never held across a peer query or the negotiation lock.
///
/// # Type parameters
/// * `M` - raw mutex flavour of the embassy primitives
/// * `R` - register access
/// * `D` - delay used to settle HVDCP3 pulses
/// * `P` - power supply lookup for the BMS and TCPM peers
pub struct Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    regmap: Mutex<M, R>,
    pub(crate) state: Mutex<M, ChargerState>,
    pub(crate) hvdcp: Mutex<M, D>,
    bms: Mutex<M, Option<P::Supply>>,
    tcpm: Mutex<M, Option<P::Supply>>,
    registry: P,
    float_option: Option<FloatOption>,
    chg_inhibit_threshold_uv: Option<u32>,
    pub(crate) tcpm_full_name: String,
    pub(crate) status_change: Signal<M, ()>,
    pub(crate) update_stop: Signal<M, ()>,
    pub(crate) status_stop: Signal<M, ()>,
    pub(crate) irq_stop: Signal<M, ()>,
    events: Channel<M, PowerSupplyKind, EVENT_QUEUE_DEPTH>,
}

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    /// Creates the driver without touching the hardware, see [`Self::init`]
    ///
    /// # Arguments
    /// * `config` - board configuration
    /// * `regmap` - register access to the charger
    /// * `delay` - delay provider for HVDCP3 pulse settling
    /// * `registry` - lookup of the BMS and TCPM power supplies
    pub fn new(config: ChargerConfig, regmap: R, delay: D, registry: P) -> Self {
        let tcpm_full_name = format!("{}{}", TCPM_PSY_NAME_PREFIX, config.tcpm_psy_name);
        Self {
            regmap: Mutex::new(regmap),
            state: Mutex::new(ChargerState::new(&config)),
            hvdcp: Mutex::new(delay),
            bms: Mutex::new(None),
            tcpm: Mutex::new(None),
            registry,
            float_option: config.float_option,
            chg_inhibit_threshold_uv: config.chg_inhibit_threshold_uv,
            tcpm_full_name,
            status_change: Signal::new(),
            update_stop: Signal::new(),
            status_stop: Signal::new(),
            irq_stop: Signal::new(),
            events: Channel::new(),
        }
    }

    /// Name of the TCPM power supply the PD notifier listens to
    pub fn tcpm_psy_name(&self) -> &str {
        &self.tcpm_full_name
    }

    /// Receiver of "power supply changed" notifications
    pub fn events(&self) -> Receiver<'_, M, PowerSupplyKind, EVENT_QUEUE_DEPTH> {
        self.events.receiver()
    }

    /// Snapshot of the charger state
    pub async fn state(&self) -> ChargerState {
        self.state.lock().await.clone()
    }

    pub async fn charger_type(&self) -> ChargerType {
        self.state.lock().await.charger_type
    }

    pub async fn usb_type(&self) -> UsbType {
        self.state.lock().await.usb_type
    }

    pub async fn pd_active(&self) -> bool {
        self.state.lock().await.pd_active
    }

    /// Stops the update loop, the PD status worker and the interrupt
    /// dispatcher. Work already in progress runs to completion.
    pub fn shutdown(&self) {
        self.update_stop.signal(());
        self.status_stop.signal(());
        self.irq_stop.signal(());
    }

    /// Hands back the register access, e.g. to release the bus
    pub fn release(self) -> R {
        self.regmap.into_inner()
    }

    pub(crate) fn power_supply_changed(&self, kind: PowerSupplyKind) {
        if self.events.try_send(kind).is_err() {
            // the consumer is not keeping up, the next change notifies again
            warn!("power supply event queue full, could not add: {:?}", kind);
        }
    }

    pub(crate) async fn read_reg(&self, reg: u16) -> Result<u8, ChargerError> {
        self.regmap.lock().await.read(reg).await
    }

    pub(crate) async fn write_reg(&self, reg: u16, val: u8) -> Result<(), ChargerError> {
        self.regmap.lock().await.write(reg, val).await
    }

    pub(crate) async fn update_reg(&self, reg: u16, mask: u8, val: u8) -> Result<(), ChargerError> {
        self.regmap.lock().await.update_bits(reg, mask, val).await
    }

    pub(crate) async fn get_prop_from_bms(&self, prop: PeerProperty) -> Result<i32, ChargerError> {
        let mut bms = self.bms.lock().await;
        if bms.is_none() {
            *bms = self.registry.get_by_name(BMS_PSY_NAME);
        }
        match bms.as_mut() {
            Some(supply) => supply.get_property(prop).await,
            None => {
                debug!("bms driver not enabled");
                Err(ChargerError::PeerAbsent)
            }
        }
    }

    pub(crate) async fn get_prop_from_tcpm(&self, prop: PeerProperty) -> Result<i32, ChargerError> {
        let mut tcpm = self.tcpm.lock().await;
        if tcpm.is_none() {
            *tcpm = self.registry.get_by_name(&self.tcpm_full_name);
        }
        match tcpm.as_mut() {
            Some(supply) => supply.get_property(prop).await,
            None => {
                debug!("tcpm driver not enabled");
                Err(ChargerError::PeerAbsent)
            }
        }
    }

    pub async fn enable_charge(&self, enable: bool) -> Result<(), ChargerError> {
        let val = if enable { CHARGING_ENABLE_BIT } else { 0 };
        self.update_reg(CHARGING_ENABLE_CMD_REG, CHARGING_ENABLE_BIT, val)
            .await
            .map_err(|e| {
                error!("Failed to set CHARGING_ENABLE_BIT: {:?}", e);
                e
            })
    }

    pub async fn rerun_apsd(&self) -> Result<(), ChargerError> {
        self.update_reg(USB_CMD_APSD_REG, USB_APSD_RERUN_BIT, USB_APSD_RERUN_BIT)
            .await
            .map_err(|e| {
                error!("Failed to rerun APSD: {:?}", e);
                e
            })
    }

    /// Resets the HVDCP3 voltages, latches the pulse count limit and starts
    /// source detection with HVDCP authentication in non-autonomous mode.
    pub(crate) async fn enable_apsd(&self) -> Result<(), ChargerError> {
        {
            let mut state = self.state.lock().await;
            state.hvdcp3_voltage_uv = QC3_DEFAULT_VOLTAGE_UV;
            state.based_hvdcp_voltage_uv = BASED_VOLTAGE_UV;
        }

        let stat = self.read_reg(USB_HVDCP_PULSE_COUNT_MAX_REG).await.map_err(|e| {
            error!("Failed to read USB_HVDCP_PULSE_COUNT_MAX: {:?}", e);
            e
        })?;
        self.state.lock().await.hvdcp_pulse_count_max = stat & HVDCP_PULSE_COUNT_MAX_QC3P0_MASK;

        let mask = UsbinOptions1::HVDCP_AUTH_ALG_EN
            | UsbinOptions1::HVDCP_AUTONOMOUS_MODE_EN
            | UsbinOptions1::APSD_ENABLE
            | UsbinOptions1::HVDCP_EN;
        let val =
            UsbinOptions1::HVDCP_AUTH_ALG_EN | UsbinOptions1::APSD_ENABLE | UsbinOptions1::HVDCP_EN;
        self.update_reg(USBIN_OPTIONS_1_CFG_REG, mask.bits(), val.bits())
            .await
            .map_err(|e| {
                error!("Failed to set USBIN_APSD_ENABLE_BIT: {:?}", e);
                e
            })?;

        self.rerun_apsd().await
    }

    async fn config_chg_current_voltage(&self) -> Result<(), ChargerError> {
        let state = self.state().await;
        self.set_fcc(state.fastchg_curr_ua).await?;
        self.set_max_fcc(state.max_fcc_ua).await?;
        self.set_fv(state.float_volt_uv).await?;
        self.set_trickle_current(state.trickle_charge_current_ua).await?;
        self.set_precharge_current(state.pre_charge_current_ua).await?;
        self.set_max_precharge_current(state.max_pre_charge_current_ua)
            .await
    }

    async fn config_aicl(&self) -> Result<(), ChargerError> {
        let bits = (AiclOptions::PERIODIC_RERUN_EN | AiclOptions::AICL_EN).bits();
        self.update_reg(USBIN_AICL_OPTIONS_CFG_REG, bits, bits)
            .await
            .map_err(|e| {
                error!("Failed to set aicl: {:?}", e);
                e
            })
    }

    async fn enable_watchdog(&self) -> Result<(), ChargerError> {
        let bits = (WatchdogCfg::BARK_WDOG_INT_EN | WatchdogCfg::WDOG_TIMER_EN_ON_PLUGIN).bits();
        self.update_reg(MISC_WD_CFG_REG, bits, bits)
            .await
            .map_err(|e| {
                error!("Failed to set MISC_WD_CFG: {:?}", e);
                e
            })
    }

    async fn config_charge_termination(&self) -> Result<(), ChargerError> {
        let termination_current_ua = self.state.lock().await.termination_current_ua;
        self.set_termination_current(termination_current_ua).await
    }

    async fn config_recharge(&self) -> Result<(), ChargerError> {
        let bit = ChgrCfg2::SOC_BASED_RECHG.bits();
        self.update_reg(CHGR_CFG2_REG, bit, bit).await.map_err(|e| {
            error!("Failed to enable SOC based recharge: {:?}", e);
            e
        })?;

        let soc = self.state.lock().await.auto_recharge_soc;
        self.write_reg(CHGR_RCHG_SOC_THRESHOLD_CFG_REG, soc)
            .await
            .map_err(|e| {
                error!("Failed to config recharge SOC: {:?}", e);
                e
            })
    }

    async fn config_float_charge(&self) -> Result<(), ChargerError> {
        let Some(option) = self.float_option else {
            return Ok(());
        };

        let val = match option {
            FloatOption::ForceSdp => FloatOptions::FORCE_FLOAT_SDP,
            FloatOption::DisableCharging => FloatOptions::FLOAT_DIS_CHGING,
            FloatOption::SuspendInput => FloatOptions::SUSPEND_FLOAT,
        };
        self.update_reg(USBIN_OPTIONS_2_CFG_REG, FloatOptions::all().bits(), val.bits())
            .await
            .map_err(|e| {
                error!("Failed to set float charge: {:?}", e);
                e
            })
    }

    async fn config_inhibit(&self) -> Result<(), ChargerError> {
        let Some(threshold_uv) = self.chg_inhibit_threshold_uv else {
            return Ok(());
        };

        let inhibit = ChgrCfg2::CHARGER_INHIBIT.bits();
        if threshold_uv == 0 {
            return self.update_reg(CHGR_CFG2_REG, inhibit, 0).await.map_err(|e| {
                error!("Failed to disable charge inhibit: {:?}", e);
                e
            });
        }

        let threshold = match InhibitThreshold::try_from_mv(threshold_uv / 1000) {
            Ok(threshold) => threshold,
            Err(e) => {
                error!("Invalid inhibit threshold {}uV", threshold_uv);
                return Err(e);
            }
        };

        self.update_reg(CHGR_CFG2_REG, inhibit, inhibit)
            .await
            .map_err(|e| {
                error!("Failed to config inhibit mode: {:?}", e);
                e
            })?;

        self.update_reg(
            CHARGE_INHIBIT_THRESHOLD_CFG_REG,
            CHARGE_INHIBIT_THRESHOLD_MASK,
            threshold.into(),
        )
        .await
        .map_err(|e| {
            error!("Failed to config the charge inhibit threshold: {:?}", e);
            e
        })
    }

    /// Programs the charger. Stops at the first failing step.
    pub async fn init(&self) -> Result<(), ChargerError> {
        self.config_chg_current_voltage().await.map_err(|e| {
            error!("Failed to config the charging current and voltage: {:?}", e);
            e
        })?;
        self.enable_apsd().await?;
        self.config_aicl().await?;
        self.enable_watchdog().await?;
        self.config_charge_termination().await?;
        self.config_recharge().await?;
        self.config_float_charge().await?;
        self.config_inhibit().await?;
        self.enable_charge(true).await?;

        info!("smb235x charger initialized");
        Ok(())
    }

    /// Classifies whatever is attached at probe time and applies its input
    /// current limit, as if the source change interrupt had fired.
    pub async fn set_initial_status(&self) {
        if let Err(e) = self.classify().await {
            error!("Failed to get the charger type: {:?}", e);
        }
        self.usbin_src_change_handler().await;
    }
}
