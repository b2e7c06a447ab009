//! Chart artifact construction
//!
//! The assembled long-form table feeds two figures: a multi-series
//! measurement chart (raw value plus rolling average per category) and a
//! weekly-binned factor occurrence chart. Figures are typed trace/layout
//! structs serialized to the renderer's JSON schema and wrapped into
//! self-contained HTML artifacts; the actual drawing happens browser-side.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::PipelineError;
use crate::types::{AggregatedRecord, Category};

/// Bin width for factor occurrence buckets: 7 days in milliseconds
pub const WEEK_BIN_MS: u64 = 604_800_000;

/// Series colors carried over from the reference palette
const COLORWAY: [&str; 7] = [
    "#00429d", "#4b568d", "#6c6a7a", "#ff0000", "#fdd249", "#ffa563", "#e06dff",
];

const RENDERER_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// One drawable series
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Trace {
    Scatter(ScatterTrace),
    Histogram(HistogramTrace),
}

/// Filled spline series of raw or averaged measurements
#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    kind: &'static str,
    x: Vec<String>,
    y: Vec<Option<f64>>,
    name: String,
    showlegend: bool,
    line: LineStyle,
    fill: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct LineStyle {
    shape: &'static str,
}

/// Occurrence counts summed into fixed-width time bins
#[derive(Debug, Clone, Serialize)]
pub struct HistogramTrace {
    #[serde(rename = "type")]
    kind: &'static str,
    x: Vec<String>,
    y: Vec<Option<f64>>,
    name: String,
    histfunc: &'static str,
    xbins: BinSpec,
    autobinx: bool,
}

#[derive(Debug, Clone, Serialize)]
struct BinSpec {
    size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    autosize: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    colorway: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    xaxis: Option<AxisStyle>,
}

#[derive(Debug, Clone, Serialize)]
struct Margin {
    t: u32,
    b: u32,
    l: u32,
    r: u32,
}

#[derive(Debug, Clone, Serialize)]
struct AxisStyle {
    rangeslider: RangeSlider,
}

#[derive(Debug, Clone, Serialize)]
struct RangeSlider {
    visible: bool,
}

/// A renderable figure: traces plus layout
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    data: Vec<Trace>,
    layout: Layout,
}

impl Figure {
    /// Serialize the figure to the renderer's JSON schema
    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wrap the figure into a self-contained HTML artifact
    pub fn to_html(&self, title: &str) -> Result<String, PipelineError> {
        let payload = self.to_json()?;
        Ok(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"generator\" content=\"pawprint {version}\">\n\
             <title>{title}</title>\n\
             <script src=\"{cdn}\"></script>\n\
             </head>\n\
             <body>\n\
             <div id=\"figure\"></div>\n\
             <script>\n\
             var figure = {payload};\n\
             Plotly.newPlot(\"figure\", figure.data, figure.layout, {{responsive: true}});\n\
             </script>\n\
             </body>\n\
             </html>\n",
            version = crate::PAWPRINT_VERSION,
            cdn = RENDERER_CDN,
        ))
    }

    /// Write the HTML artifact to disk
    pub fn write_html(&self, path: &Path, title: &str) -> Result<(), PipelineError> {
        let html = self.to_html(title)?;
        fs::write(path, html).map_err(|source| PipelineError::WriteError {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn traces(&self) -> &[Trace] {
        &self.data
    }
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Scatter(t) => &t.name,
            Trace::Histogram(t) => &t.name,
        }
    }
}

/// Builder turning the long-form table into the two figures
pub struct ChartBuilder;

impl ChartBuilder {
    /// Build the measurements figure and the factor occurrence figure
    pub fn build(table: &[AggregatedRecord], factors_unique: &[String]) -> (Figure, Figure) {
        (
            Self::build_measurements(table),
            Self::build_factors(table, factors_unique),
        )
    }

    /// Two time-aligned traces per non-Factors category: the raw values and
    /// their rolling average
    pub fn build_measurements(table: &[AggregatedRecord]) -> Figure {
        let mut data = Vec::new();

        for category in Category::ALL {
            if category == Category::Factors {
                continue;
            }
            let selection: Vec<&AggregatedRecord> = table
                .iter()
                .filter(|record| record.category == category)
                .collect();

            let x: Vec<String> = selection.iter().map(|r| timestamp(r)).collect();
            data.push(Trace::Scatter(ScatterTrace {
                kind: "scatter",
                x: x.clone(),
                y: selection.iter().map(|r| Some(r.rating)).collect(),
                name: category.as_str().to_string(),
                showlegend: true,
                line: LineStyle { shape: "spline" },
                fill: "tozeroy",
            }));
            data.push(Trace::Scatter(ScatterTrace {
                kind: "scatter",
                x,
                y: selection.iter().map(|r| r.average).collect(),
                name: format!("{} average", category.as_str()),
                showlegend: true,
                line: LineStyle { shape: "spline" },
                fill: "tozeroy",
            }));
        }

        Figure {
            data,
            layout: Layout {
                autosize: true,
                margin: Some(Margin {
                    t: 40,
                    b: 10,
                    l: 10,
                    r: 10,
                }),
                colorway: Some(COLORWAY.to_vec()),
                xaxis: Some(AxisStyle {
                    rangeslider: RangeSlider { visible: true },
                }),
            },
        }
    }

    /// One histogram trace per unique factor, occurrences summed into fixed
    /// 7-day bins anchored by the renderer
    pub fn build_factors(table: &[AggregatedRecord], factors_unique: &[String]) -> Figure {
        let data = factors_unique
            .iter()
            .map(|factor| {
                let selection: Vec<&AggregatedRecord> = table
                    .iter()
                    .filter(|record| {
                        record.category == Category::Factors
                            && record.factor.as_deref() == Some(factor.as_str())
                    })
                    .collect();

                Trace::Histogram(HistogramTrace {
                    kind: "histogram",
                    x: selection.iter().map(|r| timestamp(r)).collect(),
                    y: selection.iter().map(|r| Some(r.rating)).collect(),
                    name: factor.clone(),
                    histfunc: "sum",
                    xbins: BinSpec { size: WEEK_BIN_MS },
                    autobinx: false,
                })
            })
            .collect();

        Figure {
            data,
            layout: Layout {
                autosize: true,
                ..Layout::default()
            },
        }
    }
}

fn timestamp(record: &AggregatedRecord) -> String {
    record.datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}
