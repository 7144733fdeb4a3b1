use glint_device::cmd::MatrixMode;
use glint_device::DeviceCommands;

use crate::cache::{matrix_index, StateCache};

impl StateCache {
    /// Load `matrix` into the given matrix stack if it differs from the
    /// mirrored one. The mode select is only emitted when a load actually
    /// happens and the device is in a different mode.
    pub fn apply_transform(
        &mut self,
        dev: &mut dyn DeviceCommands,
        mode: MatrixMode,
        matrix: &[f32; 16],
    ) {
        if !self.transforms[matrix_index(mode)].needs(matrix) {
            return;
        }
        self.select_matrix(dev, mode);
        dev.load_matrix(*matrix);
        self.transforms[matrix_index(mode)].store(*matrix);
        self.stats.inc_state_changes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const IDENTITY: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    #[test]
    fn mode_select_only_emitted_on_actual_loads() {
        let mut dev = TraceDevice::new();
        let mut cache = StateCache::new(&DeviceCaps::default(), Arc::new(RenderStats::new()));
        let mut translated = IDENTITY;
        translated[12] = 4.0;

        cache.apply_transform(&mut dev, MatrixMode::ModelView, &IDENTITY);
        cache.apply_transform(&mut dev, MatrixMode::ModelView, &translated);
        // Equal matrix: neither select nor load.
        cache.apply_transform(&mut dev, MatrixMode::ModelView, &translated);
        cache.apply_transform(&mut dev, MatrixMode::Projection, &IDENTITY);

        assert_eq!(
            dev.take_commands(),
            vec![
                Command::SelectMatrixMode(MatrixMode::ModelView),
                Command::LoadMatrix(IDENTITY),
                Command::LoadMatrix(translated),
                Command::SelectMatrixMode(MatrixMode::Projection),
                Command::LoadMatrix(IDENTITY),
            ]
        );
    }
}
