//! Damped float parameters

/// A float parameter with the velocity state its damping needs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FloatParam {
    pub value: f32,
    pub velocity: f32,
}

impl FloatParam {
    /// Snap to a value and drop any damping velocity
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }

    /// Move towards `target` with critically damped smoothing
    pub fn damp_towards(&mut self, target: f32, damp_time: f32, dt: f32) {
        if damp_time <= 0.0 {
            self.set(target);
            return;
        }
        let (value, velocity) = smooth_damp(self.value, target, self.velocity, damp_time, dt);
        self.value = value;
        self.velocity = velocity;
    }
}

/// Critically damped spring step. Returns the new value and velocity.
///
/// Never overshoots `target`; with `dt == 0` the value is unchanged.
pub fn smooth_damp(current: f32, target: f32, velocity: f32, smooth_time: f32, dt: f32) -> (f32, f32) {
    if dt <= 0.0 {
        return (current, velocity);
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let mut new_velocity = (velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        new_velocity = 0.0;
    }

    (output, new_velocity)
}
