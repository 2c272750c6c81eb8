use cortex_m::peripheral::SCB;
use oneled_clock::PowerSave;

/// Cortex-M sleep: plain WFI with SLEEPDEEP cleared, so the timer keeps
/// running and its alarm can wake the core.
pub struct CortexSleep {
    scb: SCB,
    armed: bool,
}

impl CortexSleep {
    pub fn new(scb: SCB) -> Self {
        Self { scb, armed: false }
    }
}

impl PowerSave for CortexSleep {
    fn disable_interrupts(&mut self) {
        cortex_m::interrupt::disable();
    }

    fn arm_sleep(&mut self) {
        self.scb.clear_sleepdeep();
        self.armed = true;
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: idle holds no critical section across this call
        unsafe { cortex_m::interrupt::enable() };
    }

    fn sleep(&mut self) {
        if self.armed {
            cortex_m::asm::wfi();
        }
    }

    fn disarm_sleep(&mut self) {
        self.armed = false;
    }
}
