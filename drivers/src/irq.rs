//! Interrupt lines of the charger, their handlers and the dispatch loop.

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver};
use embedded_hal_async::delay::DelayNs;

use crate::charger::Smb235x;
use crate::config_engine::CURRENT_STEP_MA;
use crate::error::ChargerError;
use crate::peer::PowerSupplyRegistry;
use crate::regmap::Regmap;
use crate::regs::*;
use crate::types::{ChargerStatus, PowerSupplyKind};

/// Number of interrupt lines the charger exposes
pub const IRQ_COUNT: usize = 19;

/// Charger interrupt line, in the order of [`IRQ_TABLE`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqLine {
    // CHGR
    /// Safety timer, battery OV or missing terminal stopped charging
    ChgrError,
    /// BATTERY_CHARGER_STATUS_1 changed
    ChgrStateChange,
    // DCDC
    OtgFail,
    InputCurrentLimit,
    // BATIF
    BattTemp,
    BattOv,
    BattLow,
    BattThermOrIdMissing,
    BattTerminalMissing,
    // USBIN
    UsbinCollapse,
    UsbinVashdn,
    UsbinUv,
    UsbinOv,
    /// VBUS attached or removed
    UsbinPlugin,
    /// APSD progressed, see USB_APSD_STATUS
    UsbinSrcChange,
    UsbinIclChange,
    // MISC
    AiclDone,
    TempChange,
    /// Watchdog bark, must be petted before it bites
    WdogBark,
}

/// Handler bound to an interrupt line
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqHandler {
    ChargeError,
    ChgStateChange,
    BattTempChanged,
    BattPsyChanged,
    UsbinUv,
    UsbinOv,
    UsbPlugin,
    UsbSourceChange,
    AiclDone,
    WdogBark,
    Default,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IrqInfo {
    pub line: IrqLine,
    /// Name the interrupt controller knows the line by
    pub name: &'static str,
    pub handler: IrqHandler,
    /// Line may wake the system from suspend
    pub wake: bool,
}

const fn irq(line: IrqLine, name: &'static str, handler: IrqHandler, wake: bool) -> IrqInfo {
    IrqInfo {
        line,
        name,
        handler,
        wake,
    }
}

pub static IRQ_TABLE: [IrqInfo; IRQ_COUNT] = [
    irq(IrqLine::ChgrError, "chgr-error", IrqHandler::ChargeError, false),
    irq(IrqLine::ChgrStateChange, "chgr-state-change", IrqHandler::ChgStateChange, true),
    irq(IrqLine::OtgFail, "otg-fail", IrqHandler::Default, false),
    irq(IrqLine::InputCurrentLimit, "input-current-limit", IrqHandler::Default, false),
    irq(IrqLine::BattTemp, "batt-temp", IrqHandler::BattTempChanged, true),
    irq(IrqLine::BattOv, "batt-ov", IrqHandler::BattPsyChanged, false),
    irq(IrqLine::BattLow, "batt-low", IrqHandler::BattPsyChanged, false),
    irq(
        IrqLine::BattThermOrIdMissing,
        "batt-therm-or-id-missing",
        IrqHandler::BattPsyChanged,
        false,
    ),
    irq(
        IrqLine::BattTerminalMissing,
        "batt-terminal-missing",
        IrqHandler::BattPsyChanged,
        false,
    ),
    irq(IrqLine::UsbinCollapse, "usbin-collapse", IrqHandler::Default, false),
    irq(IrqLine::UsbinVashdn, "usbin-vashdn", IrqHandler::Default, false),
    irq(IrqLine::UsbinUv, "usbin-uv", IrqHandler::UsbinUv, true),
    irq(IrqLine::UsbinOv, "usbin-ov", IrqHandler::UsbinOv, false),
    irq(IrqLine::UsbinPlugin, "usbin-plugin", IrqHandler::UsbPlugin, true),
    irq(IrqLine::UsbinSrcChange, "usbin-src-change", IrqHandler::UsbSourceChange, true),
    irq(IrqLine::UsbinIclChange, "usbin-icl-change", IrqHandler::Default, true),
    irq(IrqLine::AiclDone, "aicl-done", IrqHandler::AiclDone, false),
    irq(IrqLine::TempChange, "temp-change", IrqHandler::Default, false),
    irq(IrqLine::WdogBark, "wdog-bark", IrqHandler::WdogBark, true),
];

impl IrqLine {
    pub fn info(self) -> &'static IrqInfo {
        &IRQ_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// The interrupt was not serviced
    None,
    Handled,
}

/// Host interrupt controller the charger's lines are routed through
pub trait IrqController {
    /// Resolves a line name to the host interrupt number
    fn irq_by_name(&mut self, name: &str) -> Option<u32>;

    fn enable_wake(&mut self, irq: u32);

    fn disable_wake(&mut self, irq: u32);

    fn disable(&mut self, irq: u32);
}

/// Host interrupt numbers of the charger's lines, indexed like [`IRQ_TABLE`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrqBindings {
    irqs: [Option<u32>; IRQ_COUNT],
}

impl IrqBindings {
    pub fn irq(&self, line: IrqLine) -> Option<u32> {
        self.irqs[line as usize]
    }

    /// Maps a host interrupt number back to the charger line
    pub fn line(&self, irq: u32) -> Option<IrqLine> {
        IRQ_TABLE
            .iter()
            .zip(self.irqs.iter())
            .find(|(_, bound)| **bound == Some(irq))
            .map(|(info, _)| info.line)
    }
}

/// Resolves every line of [`IRQ_TABLE`] and enables wake on the wake capable
/// ones. Fails on the first line the controller does not know.
pub fn request_interrupts<C: IrqController>(
    controller: &mut C,
) -> Result<IrqBindings, ChargerError> {
    let mut irqs = [None; IRQ_COUNT];
    for (slot, info) in irqs.iter_mut().zip(IRQ_TABLE.iter()) {
        let Some(irq) = controller.irq_by_name(info.name) else {
            error!("Couldn't get irq {} by name", info.name);
            return Err(ChargerError::InvalidArgument);
        };
        *slot = Some(irq);
        if info.wake {
            controller.enable_wake(irq);
        }
    }
    Ok(IrqBindings { irqs })
}

/// Releases lines requested by [`request_interrupts`]
pub fn free_interrupts<C: IrqController>(controller: &mut C, bindings: IrqBindings) {
    for (info, bound) in IRQ_TABLE.iter().zip(bindings.irqs.iter()) {
        if let Some(irq) = *bound {
            if info.wake {
                controller.disable_wake(irq);
            }
            controller.disable(irq);
        }
    }
}

impl<M, R, D, P> Smb235x<M, R, D, P>
where
    M: RawMutex,
    R: Regmap,
    D: DelayNs,
    P: PowerSupplyRegistry,
{
    /// Services one interrupt line
    pub async fn handle_irq(&self, line: IrqLine) -> IrqReturn {
        let info = line.info();
        debug!("IRQ: {}", info.name);

        match info.handler {
            IrqHandler::ChargeError => self.charge_error_handler().await,
            IrqHandler::ChgStateChange => self.chg_state_change_handler().await,
            IrqHandler::BattTempChanged | IrqHandler::BattPsyChanged => {
                self.power_supply_changed(PowerSupplyKind::Battery);
                IrqReturn::Handled
            }
            IrqHandler::UsbPlugin => self.usbin_plugin_handler().await,
            IrqHandler::UsbSourceChange => self.usbin_src_change_handler().await,
            IrqHandler::AiclDone => self.aicl_done_handler().await,
            IrqHandler::WdogBark => self.wdog_bark_handler().await,
            IrqHandler::UsbinUv | IrqHandler::UsbinOv | IrqHandler::Default => IrqReturn::Handled,
        }
    }

    /// Runs handlers for lines received from the interrupt glue, one at a
    /// time, until [`Smb235x::shutdown`]. Lines already queued are serviced
    /// before the loop stops.
    pub async fn run_irq_dispatcher<RM: RawMutex, const N: usize>(
        &self,
        irqs: Receiver<'_, RM, IrqLine, N>,
    ) {
        loop {
            match select(irqs.receive(), self.irq_stop.wait()).await {
                Either::First(line) => {
                    if self.handle_irq(line).await == IrqReturn::None {
                        debug!("IRQ {} not handled", line.name());
                    }
                }
                Either::Second(()) => break,
            }
        }
    }

    async fn charge_error_handler(&self) -> IrqReturn {
        let stat = match self.read_reg(BATTERY_CHARGER_STATUS_2_REG).await {
            Ok(stat) => ChargerErrorStatus::from_bits_truncate(stat),
            Err(e) => {
                error!("Failed to read BATTERY_CHARGER_STATUS_2: {:?}", e);
                return IrqReturn::None;
            }
        };

        if stat.contains(ChargerErrorStatus::SFT_EXPIRE) {
            info!("Charge error due to safety timer expiry");
        }
        if stat.contains(ChargerErrorStatus::BAT_OV) {
            info!("Charge error due to battery over voltage");
        }
        if stat.contains(ChargerErrorStatus::BAT_TERM_MISSING) {
            info!("Charge error due to missing battery terminal");
        }
        IrqReturn::Handled
    }

    async fn chg_state_change_handler(&self) -> IrqReturn {
        let stat = match self.read_reg(BATTERY_CHARGER_STATUS_1_REG).await {
            Ok(stat) => stat & BATTERY_CHARGER_STATUS_MASK,
            Err(e) => {
                error!("Couldn't read BATTERY_CHARGER_STATUS_1: {:?}", e);
                return IrqReturn::None;
            }
        };

        if let Ok(status) = ChargerStatus::try_from(stat) {
            debug!("battery charger status is {}", status);
        }
        self.power_supply_changed(PowerSupplyKind::Battery);
        IrqReturn::Handled
    }

    async fn usbin_plugin_handler(&self) -> IrqReturn {
        let stat = match self.read_reg(USB_INT_RT_STS_OFFSET_REG).await {
            Ok(stat) => stat,
            Err(e) => {
                error!("Failed to read USB_INT_RT_STS: {:?}", e);
                return IrqReturn::None;
            }
        };

        let vbus_rising = stat & USBIN_PLUGIN_RT_STS_BIT != 0;
        if self.enable_charge(vbus_rising).await.is_err() {
            return IrqReturn::Handled;
        }

        self.power_supply_changed(PowerSupplyKind::Usb);
        debug!(
            "IRQ: usbin-plugin {}",
            if vbus_rising { "attached" } else { "detached" }
        );
        IrqReturn::Handled
    }

    pub(crate) async fn usbin_src_change_handler(&self) -> IrqReturn {
        let stat = match self.read_reg(USB_APSD_STATUS_REG).await {
            Ok(stat) => stat,
            Err(e) => {
                error!("Failed to read USB_APSD_STATUS: {:?}", e);
                return IrqReturn::None;
            }
        };
        debug!("APSD_STATUS = {:#x}", stat);

        self.handle_apsd_done(stat & APSD_DTC_STATUS_DONE_BIT != 0)
            .await;

        self.power_supply_changed(PowerSupplyKind::Usb);
        IrqReturn::Handled
    }

    async fn aicl_done_handler(&self) -> IrqReturn {
        match self.read_reg(DCDC_AICL_ICL_STATUS_REG).await {
            Ok(stat) => {
                debug!("aicl result is {}mA", u32::from(stat) * CURRENT_STEP_MA);
                IrqReturn::Handled
            }
            Err(e) => {
                error!("Failed to read aicl status: {:?}", e);
                IrqReturn::None
            }
        }
    }

    async fn wdog_bark_handler(&self) -> IrqReturn {
        if let Err(e) = self
            .write_reg(MISC_BARK_BITE_WDOG_PET_REG, BARK_BITE_WDOG_PET_BIT)
            .await
        {
            error!("Failed to reset BARK watchdog: {:?}", e);
        }
        IrqReturn::Handled
    }
}
