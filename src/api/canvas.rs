//! Canvas replay target for committed strokes

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::drawing::{Point, RenderTarget};

const STROKE_COLOR: &str = "#000000";

pub struct CanvasTarget {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasTarget {
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Context is not a CanvasRenderingContext2d"))?;
        Ok(Self {
            context,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }
}

impl RenderTarget for CanvasTarget {
    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_polyline(&mut self, points: &[Point], line_width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let ctx = &self.context;
        ctx.begin_path();
        ctx.set_line_width(line_width);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        #[allow(deprecated)]
        ctx.set_stroke_style(&JsValue::from_str(STROKE_COLOR));
        ctx.move_to(first.x, first.y);
        for point in rest {
            ctx.line_to(point.x, point.y);
        }
        ctx.stroke();
    }
}
