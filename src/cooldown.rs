use crate::gesture::Gesture;

/// Decides whether a gesture may fire at `now` (seconds).
///
/// No gesture never fires. An unset `last_fired` always permits firing;
/// otherwise strictly more than `cooldown_secs` must have passed.
pub fn may_fire(
    gesture: Option<Gesture>,
    now: f64,
    last_fired: Option<f64>,
    cooldown_secs: f64,
) -> bool {
    if gesture.is_none() {
        return false;
    }
    match last_fired {
        Some(last) => now - last > cooldown_secs,
        None => true,
    }
}

/// Cooldown timer holding the timestamp of the last fired gesture
#[derive(Debug, Clone)]
pub struct CooldownGate {
    cooldown_secs: f64,
    last_fired: Option<f64>,
}

impl CooldownGate {
    pub fn new(cooldown_secs: f64) -> Self {
        Self {
            cooldown_secs,
            last_fired: None,
        }
    }

    /// Checks the gate and, when it opens, records `now` as the last fire.
    /// Gestures arriving during the cooldown are dropped, not queued.
    pub fn try_fire(&mut self, gesture: Option<Gesture>, now: f64) -> bool {
        let allowed = may_fire(gesture, now, self.last_fired, self.cooldown_secs);
        if allowed {
            self.last_fired = Some(now);
        }
        allowed
    }

    pub fn last_fired(&self) -> Option<f64> {
        self.last_fired
    }

    pub fn cooldown_secs(&self) -> f64 {
        self.cooldown_secs
    }
}
