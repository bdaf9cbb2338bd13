//! Translation of raw input into simulator commands.

use crate::compute::{Command, PRESET_SLOTS};
use crate::schema::SessionConfig;

use super::{CELL_KEYS, InputSnapshot, Key};

/// Maps one frame of input to the commands it implies.
#[derive(Debug, Clone)]
pub struct Controls {
    kernel_step: f32,
    terrain_step: f32,
    field_width: usize,
    field_height: usize,
}

impl Controls {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            kernel_step: config.controls.kernel_step,
            terrain_step: config.controls.terrain_step,
            field_width: config.screen.backdrop_width(),
            field_height: config.screen.backdrop_height(),
        }
    }

    /// Commands for one frame, in application order.
    ///
    /// Held-key adjustments come first (every held cell key is adjusted in the
    /// same tick), then key-down events, then painting. Up wins over Down
    /// when both are held.
    pub fn translate(&self, input: &InputSnapshot) -> Vec<Command> {
        let mut commands = Vec::new();

        let direction = if input.is_held(Key::Up) {
            Some(1.0)
        } else if input.is_held(Key::Down) {
            Some(-1.0)
        } else {
            None
        };

        if let Some(sign) = direction {
            for &(key, (row, col)) in &CELL_KEYS {
                if input.is_held(key) {
                    commands.push(Command::AdjustCell {
                        row,
                        col,
                        delta: sign * self.kernel_step,
                    });
                }
            }
            if input.is_held(Key::T) {
                commands.push(Command::AdjustTerrainAlpha(sign * self.terrain_step));
            }
        }

        let shift = input.is_held(Key::Shift);
        for &key in &input.pressed {
            let command = match key {
                Key::Space => Command::Reset,
                Key::R => Command::RandomizeField,
                Key::K => Command::RandomizeKernel,
                Key::Tab => Command::CycleActivation(1),
                Key::Backquote => Command::CycleActivation(-1),
                Key::Digit(d) if (d as usize) < PRESET_SLOTS => {
                    if shift {
                        Command::SavePreset(d as usize)
                    } else {
                        Command::LoadPreset(d as usize)
                    }
                }
                _ => continue,
            };
            commands.push(command);
        }

        if input.pointer_down {
            let (x, y) = input.pointer;
            if x >= 0 && y >= 0 && (x as usize) < self.field_width && (y as usize) < self.field_height {
                commands.push(Command::Paint { x, y });
            }
        }

        commands
    }
}
