//! Rendering of sequencer state into lamp colours.
//!
//! [`Frame::render`] is a pure function from a lamp layout and the set of lit
//! lamps to the colour of every lens. Sequencers hand frames to a
//! [`SignalHead`], which is the only thing that touches real output.

use crate::lamp::{Lamp, LampSet};
use crate::style::LampStyle;
use heapless::Vec;
use palette::Srgb;

/// Maximum number of lenses on a head (one per [`Lamp`] variant).
pub const MAX_LENSES: usize = Lamp::ALL.len();

/// Trait for abstracting signal head output.
///
/// Implement this for whatever shows the lights: GPIO lamps, an LED strip,
/// a terminal, a test recorder.
pub trait SignalHead {
    /// Displays a frame. Called only when the frame differs from the last
    /// one shown. Handle output errors internally - this method cannot fail.
    fn show(&mut self, frame: &Frame);
}

/// Colour of one lens in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub lamp: Lamp,
    pub lit: bool,
    pub color: Srgb,
}

/// Colours of every lens of one signal head, in layout order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    lenses: Vec<Lens, MAX_LENSES>,
}

impl Frame {
    /// Frame with no lenses.
    pub fn dark() -> Self {
        Self { lenses: Vec::new() }
    }

    /// Renders a layout with the given lamps lit.
    ///
    /// Lamps in `lit` that are not part of `layout` are not rendered.
    pub fn render<'a>(layout: impl IntoIterator<Item = (Lamp, &'a LampStyle)>, lit: LampSet) -> Self {
        let mut lenses = Vec::new();
        for (lamp, style) in layout {
            let on = lit.contains(lamp);
            // Layouts hold distinct lamps, so they always fit.
            if lenses
                .push(Lens {
                    lamp,
                    lit: on,
                    color: style.render(on),
                })
                .is_err()
            {
                break;
            }
        }
        Self { lenses }
    }

    pub fn lenses(&self) -> &[Lens] {
        &self.lenses
    }

    /// Lit state of a lamp, `None` if the lamp is not on this head.
    pub fn is_lit(&self, lamp: Lamp) -> Option<bool> {
        self.lens(lamp).map(|lens| lens.lit)
    }

    pub fn color_of(&self, lamp: Lamp) -> Option<Srgb> {
        self.lens(lamp).map(|lens| lens.color)
    }

    /// Set of lit lamps.
    pub fn lit(&self) -> LampSet {
        self.lenses
            .iter()
            .filter(|lens| lens.lit)
            .map(|lens| lens.lamp)
            .collect()
    }

    fn lens(&self, lamp: Lamp) -> Option<&Lens> {
        self.lenses.iter().find(|lens| lens.lamp == lamp)
    }
}
