use super::{LabelFont, LabeledPoint, Renderer, ScatterPlot};
use anyhow::{anyhow, Result};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::ops::Range;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const POINT_SIZE: i32 = 5;

/// Scatter plot renderer on the plotters bitmap backend.
pub struct PlotRenderer {
    font: LabelFont,
    width: u32,
    height: u32,
}

impl PlotRenderer {
    pub fn new(font: LabelFont) -> Self {
        Self {
            font,
            width: WIDTH,
            height: HEIGHT,
        }
    }

    fn draw(&self, plot: &ScatterPlot, buf: &mut [u8]) -> Result<()> {
        let root =
            BitMapBackend::with_buffer(buf, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_range, y_range) = bounds(&plot.points);
        let family = self.font.family();

        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        // family is only unset when even the bundled face failed to register
        if let Some(family) = family {
            builder
                .caption(&plot.title, (family, 20.0).into_font())
                .x_label_area_size(30)
                .y_label_area_size(40);
        }
        let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

        let mut mesh = chart.configure_mesh();
        if let Some(family) = family {
            mesh.label_style((family, 12.0).into_font());
        }
        mesh.draw()?;

        chart.draw_series(
            plot.points
                .iter()
                .map(|p| Circle::new((p.x, p.y), POINT_SIZE, color(p).filled())),
        )?;

        if let Some(family) = family {
            let dx = (x_range.end - x_range.start) * 0.01;
            let dy = (y_range.end - y_range.start) * 0.01;
            chart.draw_series(plot.points.iter().map(|p| {
                Text::new(
                    p.label.clone(),
                    (p.x + dx, p.y + dy),
                    (family, 16.0).into_font().color(&color(p)),
                )
            }))?;
        }

        root.present()?;
        Ok(())
    }
}

impl Renderer for PlotRenderer {
    fn render(&self, plot: &ScatterPlot) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.width as usize * self.height as usize * 3];
        self.draw(plot, &mut buf)?;

        let (width, height) = (self.width, self.height);
        let image = RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| anyhow!("bitmap buffer does not fit {}x{}", width, height))?;
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;
        debug!(
            "rendered {} points into {} png bytes",
            plot.points.len(),
            png.get_ref().len()
        );
        Ok(png.into_inner())
    }
}

fn color(point: &LabeledPoint) -> RGBColor {
    if point.highlighted {
        RED
    } else {
        BLUE
    }
}

/// Data bounds padded by a tenth of the span on each side.
fn bounds(points: &[LabeledPoint]) -> (Range<f64>, Range<f64>) {
    let axis = |values: Vec<f64>| {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return -1.0..1.0;
        }
        let pad = if max > min { (max - min) * 0.1 } else { 1.0 };
        (min - pad)..(max + pad)
    };
    (
        axis(points.iter().map(|p| p.x).collect()),
        axis(points.iter().map(|p| p.y).collect()),
    )
}
