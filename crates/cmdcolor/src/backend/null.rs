use std::io::{Result, Write};

use super::Backend;
use crate::ColorValue;

/// A backend for sinks that cannot render color.
#[derive(Debug, Default)]
pub struct NullBackend {}

impl Backend for NullBackend {
    fn name(&self) -> &'static str {
        "None"
    }

    fn can_use(&self) -> bool {
        false
    }

    fn color_count(&self) -> u32 {
        1
    }

    fn set_color(&mut self, _color: &ColorValue, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}
