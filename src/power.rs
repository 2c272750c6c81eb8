//! Entering low-power sleep without losing a wake event.

/// Board hooks for the sleep sequence.
///
/// `disable_interrupts`/`enable_interrupts` mask and unmask interrupts
/// globally. `arm_sleep` selects the sleep mode and permits the sleep
/// instruction; `disarm_sleep` revokes that permission. `sleep` halts until
/// any enabled interrupt fires.
pub trait PowerSave {
    fn disable_interrupts(&mut self);
    fn arm_sleep(&mut self);
    fn enable_interrupts(&mut self);
    fn sleep(&mut self);
    fn disarm_sleep(&mut self);
}

/// Sleeps until the next interrupt.
///
/// Sleep is armed with interrupts masked and disarmed straight after waking,
/// before the caller looks at any flag.
pub fn sleep_until_interrupt<P: PowerSave>(power: &mut P) {
    power.disable_interrupts();
    power.arm_sleep();
    power.enable_interrupts();
    power.sleep();
    power.disarm_sleep();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<&'static str>);

    impl PowerSave for Trace {
        fn disable_interrupts(&mut self) {
            self.0.push("cli");
        }
        fn arm_sleep(&mut self) {
            self.0.push("arm");
        }
        fn enable_interrupts(&mut self) {
            self.0.push("sei");
        }
        fn sleep(&mut self) {
            self.0.push("sleep");
        }
        fn disarm_sleep(&mut self) {
            self.0.push("disarm");
        }
    }

    #[test]
    fn sequence_order() {
        let mut trace = Trace::default();
        sleep_until_interrupt(&mut trace);
        assert_eq!(trace.0, ["cli", "arm", "sei", "sleep", "disarm"]);
    }
}
