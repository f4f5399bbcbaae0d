//! SVG chart rendering.

use crate::domain::error::CoinbetaError;
use crate::domain::ohlc::OhlcBucket;
use crate::domain::series::DerivedSeries;
use crate::ports::chart_port::{ChartPort, ChartSpec};

const LINE_COLORS: [&str; 4] = ["#4c72b0", "#dd8452", "#55a868", "#c44e52"];
const CANDLE_UP: &str = "#77d879";
const CANDLE_DOWN: &str = "#db3f3f";
const VOLUME_FILL: &str = "#9999aa";

pub struct SvgChart {
    width: f64,
    height: f64,
    padding: f64,
}

impl Default for SvgChart {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            padding: 48.0,
        }
    }
}

impl SvgChart {
    pub fn new() -> Self {
        Self::default()
    }

    fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }

    fn header(&self, title: &str) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" "#,
                r#"viewBox="0 0 {w:.0} {h:.0}">"#,
                "\n",
                r#"<rect width="{w:.0}" height="{h:.0}" fill="white"/>"#,
                "\n",
                r#"<text x="{tx:.0}" y="24" font-family="sans-serif" font-size="14" "#,
                r#"text-anchor="middle">{title}</text>"#,
                "\n",
            ),
            w = self.width,
            h = self.height,
            tx = self.width / 2.0,
            title = title,
        )
    }

    fn axes(&self) -> String {
        let left = self.padding;
        let bottom = self.height - self.padding;
        format!(
            concat!(
                r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
                "\n",
                r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
                "\n",
            ),
            l = left,
            t = self.padding,
            b = bottom,
            r = self.width - self.padding,
        )
    }

    fn render_lines(
        &self,
        title: &str,
        series: &[&DerivedSeries],
    ) -> Result<String, CoinbetaError> {
        let values: Vec<f64> = series
            .iter()
            .flat_map(|s| s.points.iter().filter(|p| p.valid).map(|p| p.value))
            .collect();
        if values.is_empty() {
            return Err(CoinbetaError::Chart {
                reason: "no defined points to plot".into(),
            });
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        let scale_y = if range > 0.0 {
            self.plot_height() / range
        } else {
            1.0
        };

        let len = series.iter().map(|s| s.len()).max().unwrap_or(0);
        let scale_x = if len > 1 {
            self.plot_width() / (len - 1) as f64
        } else {
            0.0
        };

        let mut svg = self.header(title);
        svg.push_str(&self.axes());

        for (idx, s) in series.iter().enumerate() {
            let color = LINE_COLORS[idx % LINE_COLORS.len()];
            let points: Vec<String> = s
                .points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.valid)
                .map(|(i, p)| {
                    let x = self.padding + i as f64 * scale_x;
                    let y = self.height - self.padding - (p.value - min) * scale_y;
                    format!("{:.1},{:.1}", x, y)
                })
                .collect();

            svg.push_str(&format!(
                "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" points=\"{}\"/>\n",
                color,
                points.join(" "),
            ));

            // legend swatch + label, stacked top-left inside the plot
            let ly = self.padding + 14.0 * idx as f64 + 4.0;
            svg.push_str(&format!(
                concat!(
                    r#"<rect x="{x:.1}" y="{y:.1}" width="10" height="10" fill="{color}"/>"#,
                    r#"<text x="{tx:.1}" y="{ty:.1}" font-family="sans-serif" "#,
                    r#"font-size="11">{label}</text>"#,
                    "\n",
                ),
                x = self.padding + 6.0,
                y = ly,
                color = color,
                tx = self.padding + 20.0,
                ty = ly + 9.0,
                label = s.name,
            ));
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }

    fn render_candlestick(
        &self,
        title: &str,
        buckets: &[OhlcBucket],
    ) -> Result<String, CoinbetaError> {
        if buckets.is_empty() {
            return Err(CoinbetaError::Chart {
                reason: "no buckets to plot".into(),
            });
        }

        let min = buckets.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let max = buckets.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let max_volume = buckets.iter().map(|b| b.volume).fold(0.0_f64, f64::max);
        let range = max - min;

        // price pane above, volume band in the lower quarter
        let volume_height = self.plot_height() * 0.25;
        let price_height = self.plot_height() - volume_height - 8.0;
        let price_bottom = self.padding + price_height;
        let scale_y = if range > 0.0 { price_height / range } else { 1.0 };

        let slot = self.plot_width() / buckets.len() as f64;
        let candle_width = (slot * 0.7).max(1.0);

        let mut svg = self.header(title);
        svg.push_str(&self.axes());

        for (i, bucket) in buckets.iter().enumerate() {
            let center = self.padding + slot * (i as f64 + 0.5);
            let y_of = |price: f64| price_bottom - (price - min) * scale_y;

            let color = if bucket.close >= bucket.open {
                CANDLE_UP
            } else {
                CANDLE_DOWN
            };
            let body_top = y_of(bucket.open.max(bucket.close));
            let body_height = (y_of(bucket.open.min(bucket.close)) - body_top).max(1.0);

            svg.push_str(&format!(
                concat!(
                    r#"<line x1="{c:.1}" y1="{hi:.1}" x2="{c:.1}" y2="{lo:.1}" "#,
                    r#"stroke="{color}"/>"#,
                    "\n",
                    r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" "#,
                    r#"fill="{color}"/>"#,
                    "\n",
                ),
                c = center,
                hi = y_of(bucket.high),
                lo = y_of(bucket.low),
                x = center - candle_width / 2.0,
                y = body_top,
                w = candle_width,
                h = body_height,
                color = color,
            ));

            if max_volume > 0.0 {
                let bar_height = bucket.volume / max_volume * volume_height;
                svg.push_str(&format!(
                    concat!(
                        r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" "#,
                        r#"fill="{fill}" opacity="0.6"/>"#,
                        "\n",
                    ),
                    x = center - candle_width / 2.0,
                    y = self.height - self.padding - bar_height,
                    w = candle_width,
                    h = bar_height,
                    fill = VOLUME_FILL,
                ));
            }
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl ChartPort for SvgChart {
    fn render(&self, spec: &ChartSpec) -> Result<String, CoinbetaError> {
        match spec {
            ChartSpec::Lines { title, series } => self.render_lines(title, series),
            ChartSpec::Candlestick { title, buckets } => self.render_candlestick(title, buckets),
        }
    }
}
