use arrowmark_annotation::{Arrow, ArrowColor};
use arrowmark_base::Vec3;

/// What a renderer needs to draw one arrow. Points are in volume order.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowPrimitive {
    pub start: Vec3,
    pub end: Vec3,
    pub color: ArrowColor,
    pub edge_width: f64,
    pub opacity: f64,
}

impl From<&Arrow> for ArrowPrimitive {
    fn from(arrow: &Arrow) -> Self {
        Self {
            start: arrow.start(),
            end: arrow.end(),
            color: arrow.color().clone(),
            edge_width: arrow.edge_width(),
            opacity: arrow.opacity(),
        }
    }
}

pub trait RenderSink {
    /// Replaces whatever was drawn before with `arrows`, in order.
    fn draw_arrows(&mut self, arrows: &[ArrowPrimitive]);
}

#[derive(Default)]
pub struct PrimitiveCollector {
    pub primitives: Vec<ArrowPrimitive>,
}

impl RenderSink for PrimitiveCollector {
    fn draw_arrows(&mut self, arrows: &[ArrowPrimitive]) {
        self.primitives.clear();
        self.primitives.extend_from_slice(arrows);
    }
}

pub fn primitives(arrows: &[Arrow]) -> Vec<ArrowPrimitive> {
    arrows.iter().map(ArrowPrimitive::from).collect()
}
