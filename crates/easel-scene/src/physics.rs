/// A stepped rigid-body simulation consumed once per tick, strictly after
/// event processing and before drawing. The view does not interpret poses;
/// elements read them back from the stepper they share.
pub trait PhysicsStepper: Send {
    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);
}
